//! Origin endpoints and connection pool configuration.

use serde::{Deserialize, Serialize};

/// Fixed origin endpoints the proxy talks to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OriginConfig {
    /// Download URL template for `?id=` requests. `{id}` is replaced by the
    /// caller-supplied file identifier.
    #[serde(default = "default_download_template")]
    pub download_template: String,

    /// Rate-limit status endpoint relayed by `GET /limit`.
    #[serde(default = "default_rate_limit_url")]
    pub rate_limit_url: String,
}

fn default_download_template() -> String {
    "https://pixeldrain.com/api/file/{id}?download".to_string()
}

fn default_rate_limit_url() -> String {
    "https://pixeldrain.com/api/misc/rate_limits".to_string()
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            download_template: default_download_template(),
            rate_limit_url: default_rate_limit_url(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectionPoolConfig {
    #[serde(default = "default_pool_max_idle_per_host")]
    pub max_idle_per_host: usize,

    #[serde(default = "default_pool_idle_timeout")]
    pub idle_timeout_secs: u64,

    #[serde(default = "default_keepalive_timeout")]
    pub keepalive_timeout_secs: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Redirect hops followed before giving up with an upstream error.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for ConnectionPoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: default_pool_max_idle_per_host(),
            idle_timeout_secs: default_pool_idle_timeout(),
            keepalive_timeout_secs: default_keepalive_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_pool_max_idle_per_host() -> usize {
    100
}

fn default_pool_idle_timeout() -> u64 {
    90
}

fn default_keepalive_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_max_redirects() -> usize {
    5
}
