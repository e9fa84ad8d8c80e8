pub mod component;
pub mod component_type;
pub mod device;
pub mod device_type;
pub mod history_entry;
pub mod location;
