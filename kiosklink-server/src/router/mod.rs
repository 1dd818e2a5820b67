mod connection_router;

pub use connection_router::*;
