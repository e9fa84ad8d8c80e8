pub mod create_component_type_command;
pub mod create_device_type_command;

pub use create_component_type_command::{CreateComponentTypeCommand, CreateComponentTypeResult};
pub use create_device_type_command::{CreateDeviceTypeCommand, CreateDeviceTypeResult};
