//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"              # Network interface (127.0.0.1 = localhost only)
//! port = 5277                          # HTTP port number
//! base_url = "https://cdn.example.com" # Public origin used in generated URLs
//! workers = 4                          # Request worker threads
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.
//! Without `base_url`, URLs point at `http://<interface>:<port>`.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// Media server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    /// - `127.0.0.1` (default): localhost only
    /// - `0.0.0.0`: all interfaces (LAN accessible)
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Public origin for generated URLs.
    pub base_url: Option<String>,

    /// Request worker threads; every transcode blocks one worker.
    pub workers: usize,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
            base_url: None,
            workers: 4,
        }
    }
}

impl ServeConfig {
    /// Configured base URL, or the local server origin.
    pub fn base_url(&self) -> String {
        match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", std::net::SocketAddr::new(self.interface, self.port)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    use crate::config::test_parse_config;

    #[test]
    fn test_serve_config() {
        let config = test_parse_config(
            "[serve]\ninterface = \"0.0.0.0\"\nport = 8080\nbase_url = \"https://cdn.example.com/\"\nworkers = 8",
        );

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
        assert_eq!(config.serve.port, 8080);
        assert_eq!(config.serve.workers, 8);
        assert_eq!(config.serve.base_url(), "https://cdn.example.com");
    }

    #[test]
    fn test_serve_config_defaults() {
        let config = test_parse_config("");

        assert_eq!(config.serve.interface, IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        assert_eq!(config.serve.port, 5277);
        assert_eq!(config.serve.workers, 4);
        assert_eq!(config.serve.base_url(), "http://127.0.0.1:5277");
    }

    #[test]
    fn test_base_url_ipv6() {
        let config = test_parse_config("[serve]\ninterface = \"::1\"\nport = 3000");
        assert_eq!(
            config.serve.interface,
            IpAddr::V6(Ipv6Addr::new(0, 0, 0, 0, 0, 0, 0, 1))
        );
        assert_eq!(config.serve.base_url(), "http://[::1]:3000");
    }
}
