use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ping interval must be greater than zero")]
    ZeroPingInterval,

    #[error("idle timeout ({idle:?}) must be longer than the ping interval ({ping:?})")]
    IdleTimeoutTooShort { idle: Duration, ping: Duration },

    #[error("max frame size must be greater than zero")]
    ZeroFrameSize,
}

/// Runtime settings for the broker.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// How often the writer pings an idle socket.
    pub ping_interval: Duration,
    /// A socket that sends nothing (not even a pong) for this long is closed.
    pub idle_timeout: Duration,
    pub max_frame_bytes: usize,
    /// Bound of the registry command channel.
    pub registry_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            ping_interval: Duration::from_secs(15),
            idle_timeout: Duration::from_secs(45),
            max_frame_bytes: 64 * 1024,
            registry_capacity: 256,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ping_interval.is_zero() {
            return Err(ConfigError::ZeroPingInterval);
        }
        if self.idle_timeout <= self.ping_interval {
            return Err(ConfigError::IdleTimeoutTooShort {
                idle: self.idle_timeout,
                ping: self.ping_interval,
            });
        }
        if self.max_frame_bytes == 0 {
            return Err(ConfigError::ZeroFrameSize);
        }
        Ok(())
    }
}
