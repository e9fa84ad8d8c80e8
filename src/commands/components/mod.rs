pub mod create_component_command;
pub mod update_component_command;

pub use create_component_command::{CreateComponentCommand, CreateComponentResult};
pub use update_component_command::{UpdateComponentCommand, UpdateComponentResult};
