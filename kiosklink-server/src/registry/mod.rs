mod registry;
mod registry_command;
mod registry_error;
mod registry_handle;
mod registry_types;
mod tables;

pub use registry::*;
pub use registry_command::*;
pub use registry_error::*;
pub use registry_handle::*;
pub use registry_types::*;
