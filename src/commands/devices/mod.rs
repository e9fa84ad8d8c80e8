pub mod create_device_command;
pub mod update_device_command;

pub use create_device_command::{CreateDeviceCommand, CreateDeviceResult};
pub use update_device_command::{UpdateDeviceCommand, UpdateDeviceResult};
