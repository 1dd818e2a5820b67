pub mod app;
pub mod broker;
pub mod config;
pub mod registry;
pub mod router;
pub mod signaling;

pub use app::{AppState, build_router, serve, serve_with_listener};
pub use broker::{Broker, BrokerError};
pub use config::{ConfigError, ServerConfig};
pub use registry::{RegistryError, RegistryHandle, Role};
pub use router::ConnectionRouter;
pub use signaling::{DeliveryError, SignalingOutput, SignalingService};
