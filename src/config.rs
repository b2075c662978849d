//! Configuration for miniresp
//!
//! Centralized configuration with sensible defaults.

/// Configuration for a client instance
///
/// The target server is the only recognized configuration: a host and a
/// port. Timeouts, pooling, and TLS are deliberately out of scope for this
/// layer.
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Server hostname or IP address
    pub host: String,

    /// Server TCP port
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 6379,
        }
    }
}

impl Config {
    /// Create a config for the given host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// The `host:port` dial address
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
