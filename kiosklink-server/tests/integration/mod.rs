//! Integration tests for kiosklink_server.
//!
//! - `pairing_tests` - register, connect and disconnect flows
//! - `relay_tests` - negotiation and pointer forwarding
//! - `closure_tests` - socket loss on either side
//! - `websocket_tests` - the real endpoints over TCP


use std::sync::Arc;
use tracing::Level;

use kiosklink_server::{Broker, RegistryHandle};

use crate::utils::MockSignalingOutput;

/// Initialize tracing for tests (call once per test).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Create a broker with a live registry loop and mock signaling.
pub fn create_test_broker() -> (Broker, RegistryHandle, MockSignalingOutput) {
    let registry = RegistryHandle::spawn(100);
    let signaling = MockSignalingOutput::new_stored_only();
    let broker = Broker::new(registry.clone(), Arc::new(signaling.clone()));

    (broker, registry, signaling)
}
