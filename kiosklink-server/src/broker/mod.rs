mod broker;
mod broker_error;

pub use broker::*;
pub use broker_error::*;
