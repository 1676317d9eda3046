//! Gateway configuration

use kisan_core::AdvisorConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::{GatewayError, DEFAULT_HOST, DEFAULT_PORT};

/// Main gateway configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Enable request tracing
    pub tracing: bool,

    /// Generation settings handed to the advisor
    pub advisor: AdvisorConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tracing: true,
            advisor: AdvisorConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the advisor configuration
    pub fn with_advisor(mut self, advisor: AdvisorConfig) -> Self {
        self.advisor = advisor;
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| GatewayError::InvalidConfig(format!("invalid address {}:{}", self.host, self.port)))
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = if is_toml(path) {
            toml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };
        Ok(config)
    }

    /// Save configuration to a file, in the format its extension names
    pub fn to_file(&self, path: impl AsRef<Path>) -> crate::Result<()> {
        let path = path.as_ref();
        let content = if is_toml(path) {
            toml::to_string_pretty(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some("toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GatewayConfig::default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.host, DEFAULT_HOST);
        assert!(config.advisor.api_key.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = GatewayConfig::new()
            .with_host("0.0.0.0")
            .with_port(9000)
            .with_advisor(AdvisorConfig::new().with_api_key("key"));

        assert_eq!(config.socket_addr().unwrap().port(), 9000);
        assert_eq!(config.advisor.api_key.as_deref(), Some("key"));
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = GatewayConfig::new().with_host("not a host");
        assert!(matches!(
            config.socket_addr(),
            Err(GatewayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_toml_and_json_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = GatewayConfig::new().with_port(8080);

        for name in ["gateway.toml", "gateway.json"] {
            let path = dir.path().join(name);
            config.to_file(&path).unwrap();
            assert_eq!(GatewayConfig::from_file(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_partial_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "port = 3000\n\n[advisor]\ntext_model = \"gemini-2.0-flash\"\n").unwrap();

        let config = GatewayConfig::from_file(&path).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.host, DEFAULT_HOST);
        assert_eq!(config.advisor.text_model, "gemini-2.0-flash");
    }
}
