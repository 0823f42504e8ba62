/// Server configuration
use crate::error::{Result, ServerError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_proxy")]
    pub proxy: ProxySettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub web: WebSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProxySettings {
    /// Route the proxy is mounted on
    #[serde(default = "default_proxy_path")]
    pub path: String,

    /// Upstream hosts; subdomains of each are allowed too
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CatalogSettings {
    /// JSON catalog; an empty catalog is served when unset
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WebSettings {
    /// Built PWA shell to serve for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// `path` wins over `./config.toml`; `MEZGEBE__SECTION__KEY` variables
    /// override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("config.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (MEZGEBE__PROXY__MAX_BYTES, ...)
        settings = settings.add_source(
            config::Environment::with_prefix("MEZGEBE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("proxy.allowed_hosts")
                .try_parsing(true),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.proxy.allowed_hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(ServerError::Config(
                "At least one allowed proxy host is required".to_string(),
            ));
        }

        if self.proxy.max_bytes == 0 {
            return Err(ServerError::Config(
                "proxy.max_bytes must be greater than zero".to_string(),
            ));
        }

        if !self.proxy.path.starts_with('/') {
            return Err(ServerError::Config(format!(
                "proxy.path must start with '/': {:?}",
                self.proxy.path
            )));
        }

        if let Some(dir) = &self.web.static_dir {
            if !dir.is_dir() {
                return Err(ServerError::Config(format!(
                    "Static directory not found at {:?}",
                    dir
                )));
            }
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_proxy() -> ProxySettings {
    ProxySettings {
        path: default_proxy_path(),
        allowed_hosts: default_allowed_hosts(),
        max_bytes: default_max_bytes(),
        user_agent: default_user_agent(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_proxy_path() -> String {
    "/audio-proxy".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    vec![
        "www.ethiopianorthodox.org".to_string(),
        "ethiopianorthodox.org".to_string(),
    ]
}

fn default_max_bytes() -> u64 {
    20 * 1024 * 1024
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; rv:109.0) Gecko/20100101 Firefox/115.0".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            proxy: default_proxy(),
            catalog: CatalogSettings::default(),
            web: WebSettings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = ServerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.proxy.path, "/audio-proxy");
        assert_eq!(config.proxy.max_bytes, 20 * 1024 * 1024);
    }

    #[test]
    fn empty_allow_list_is_rejected() {
        let mut config = ServerConfig::default();
        config.proxy.allowed_hosts = vec![" ".to_string()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_size_cap_is_rejected() {
        let mut config = ServerConfig::default();
        config.proxy.max_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn relative_proxy_path_is_rejected() {
        let mut config = ServerConfig::default();
        config.proxy.path = "audio-proxy".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("mezgebe.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9000\n\n[proxy]\nallowed_hosts = [\"cdn.example\"]\nmax_bytes = 1024\n",
        )
        .unwrap();

        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.proxy.allowed_hosts, vec!["cdn.example"]);
        assert_eq!(config.proxy.max_bytes, 1024);
        assert_eq!(config.proxy.path, "/audio-proxy");
    }
}
