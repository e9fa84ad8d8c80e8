pub mod create_location_command;
pub mod update_location_command;

pub use create_location_command::{CreateLocationCommand, CreateLocationResult};
pub use update_location_command::{UpdateLocationCommand, UpdateLocationResult};
