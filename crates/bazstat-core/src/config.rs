use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Version string used for snapshot resolution when neither config nor CLI names one.
pub const DEFAULT_HOST_VERSION: &str = "3.1.0";

/// Marketplace endpoints (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Version-resolution API host (`/apis/siyuan/version`).
    pub aliyun_server: String,
    /// Download statistics bucket (`/bazaar/index.json`).
    pub bazaar_stat_server: String,
    /// Object store serving the per-snapshot stage catalogs.
    pub bazaar_oss_server: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            aliyun_server: "https://siyuan-sync.b3logfile.com".to_string(),
            bazaar_stat_server: "http://bazaar.b3logfile.com".to_string(),
            bazaar_oss_server: "https://oss.b3logfile.com".to_string(),
        }
    }
}

/// Transfer limits applied to every GET.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer limit; a hung endpoint fails with a network error after this.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 60,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Global configuration loaded from `~/.config/bazstat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BazstatConfig {
    /// SiYuan kernel version whose bazaar snapshot is resolved.
    pub host_version: String,
    /// Preferred locale for package display names (e.g. "zh_CN").
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub servers: ServerConfig,
    /// Optional transfer limits; if missing, built-in defaults are used.
    #[serde(default)]
    pub http: Option<HttpConfig>,
}

impl Default for BazstatConfig {
    fn default() -> Self {
        Self {
            host_version: DEFAULT_HOST_VERSION.to_string(),
            locale: None,
            servers: ServerConfig::default(),
            http: None,
        }
    }
}

impl BazstatConfig {
    pub fn http_or_default(&self) -> HttpConfig {
        self.http.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("bazstat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BazstatConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<BazstatConfig> {
    if !path.exists() {
        let default_cfg = BazstatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: BazstatConfig = toml::from_str(&data)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = BazstatConfig::default();
        assert_eq!(cfg.host_version, DEFAULT_HOST_VERSION);
        assert!(cfg.locale.is_none());
        assert_eq!(cfg.servers.bazaar_oss_server, "https://oss.b3logfile.com");
        assert_eq!(cfg.http_or_default(), HttpConfig::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = BazstatConfig::default();
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: BazstatConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.host_version, cfg.host_version);
        assert_eq!(parsed.servers, cfg.servers);
    }

    #[test]
    fn config_toml_minimal_uses_default_servers() {
        let cfg: BazstatConfig = toml::from_str(r#"host_version = "2.10.5""#).unwrap();
        assert_eq!(cfg.host_version, "2.10.5");
        assert_eq!(cfg.servers, ServerConfig::default());
        assert!(cfg.http.is_none());
    }

    #[test]
    fn config_toml_custom_servers_and_http() {
        let toml = r#"
            host_version = "3.0.0"
            locale = "zh_CN"

            [servers]
            aliyun_server = "http://127.0.0.1:9000"
            bazaar_stat_server = "http://127.0.0.1:9001"
            bazaar_oss_server = "http://127.0.0.1:9002"

            [http]
            connect_timeout_secs = 3
            timeout_secs = 10
        "#;
        let cfg: BazstatConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.locale.as_deref(), Some("zh_CN"));
        assert_eq!(cfg.servers.bazaar_stat_server, "http://127.0.0.1:9001");
        let http = cfg.http_or_default();
        assert_eq!(http.connect_timeout(), Duration::from_secs(3));
        assert_eq!(http.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn load_or_init_at_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        assert_eq!(cfg.host_version, DEFAULT_HOST_VERSION);

        std::fs::write(&path, "host_version = \"9.9.9\"\n").unwrap();
        let reloaded = load_or_init_at(&path).unwrap();
        assert_eq!(reloaded.host_version, "9.9.9");
    }
}
