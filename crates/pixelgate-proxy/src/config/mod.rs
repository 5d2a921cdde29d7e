//! Configuration types for the Pixelgate proxy.

mod allowlist;
mod geofence;
mod listen;
mod upstream;

use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export all types for library consumers
pub use allowlist::AllowlistConfig;
pub use geofence::GeofenceConfig;
pub use listen::ListenConfig;
pub use upstream::{ConnectionPoolConfig, OriginConfig};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub listen: ListenConfig,

    /// Domain and ASN allowlists. Loaded once; immutable while serving.
    #[serde(default)]
    pub allowlist: AllowlistConfig,

    #[serde(default)]
    pub geofence: GeofenceConfig,

    /// Origin endpoints (download template, rate-limit relay).
    #[serde(default)]
    pub origin: OriginConfig,

    #[serde(default)]
    pub connection_pool: ConnectionPoolConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.allowlist.domains.is_empty() {
            anyhow::bail!(
                "Domain allowlist must not be empty: the proxy would reject every target"
            );
        }

        if !self.origin.download_template.contains("{id}") {
            anyhow::bail!(
                "origin.download_template must contain the '{{id}}' placeholder, got '{}'",
                self.origin.download_template
            );
        }

        if self.geofence.enabled && self.geofence.lookup_timeout_ms == 0 {
            anyhow::bail!("geofence.lookup_timeout_ms must be greater than zero");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen.port, 8080);
        assert_eq!(
            config.allowlist.domains,
            vec!["pixeldrain.com", "cdn.pixeldrain.com"]
        );
        assert_eq!(config.allowlist.asns, vec!["AS13335", "AS812"]);
        assert!(config.geofence.enabled);
        assert_eq!(config.geofence.lookup_timeout_ms, 3000);
        assert_eq!(
            config.origin.download_template,
            "https://pixeldrain.com/api/file/{id}?download"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
listen:
  port: 9000
allowlist:
  domains:
    - pixeldrain.com
    - cdn.pixeldrain.com
  asns:
    - AS13335
geofence:
  lookup_url: "https://ipapi.co"
  lookup_timeout_ms: 1500
connection_pool:
  max_redirects: 3
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, 9000);
        assert_eq!(config.allowlist.asns, vec!["AS13335"]);
        assert_eq!(config.geofence.lookup_timeout_ms, 1500);
        assert_eq!(config.connection_pool.max_redirects, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let yaml = r#"
listen:
  port: 3000
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.listen.port, 3000);
        assert_eq!(config.allowlist.domains.len(), 2);
        assert_eq!(config.connection_pool.max_redirects, 5);
    }

    #[test]
    fn test_validate_rejects_empty_domains() {
        let yaml = r#"
allowlist:
  domains: []
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_template_without_placeholder() {
        let yaml = r#"
origin:
  download_template: "https://pixeldrain.com/api/file?download"
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_lookup_timeout() {
        let yaml = r#"
geofence:
  lookup_timeout_ms: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_geofence_disabled_allows_zero_timeout() {
        let yaml = r#"
geofence:
  enabled: false
  lookup_timeout_ms: 0
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "listen:\n  port: 8181\nallowlist:\n  asns:\n    - AS812"
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.listen.port, 8181);
        assert_eq!(config.allowlist.asns, vec!["AS812"]);
    }
}
