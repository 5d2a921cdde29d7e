//! Geofencing and ASN lookup configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeofenceConfig {
    /// Master switch. When false the guard admits every request without
    /// extracting an IP or performing lookups.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Base URL of the IP geolocation service. The resolver appends
    /// `/{ip}/json/`.
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    /// Upper bound on a single ASN lookup. On expiry the guard denies.
    #[serde(default = "default_lookup_timeout_ms")]
    pub lookup_timeout_ms: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_lookup_url() -> String {
    "https://ipapi.co".to_string()
}

fn default_lookup_timeout_ms() -> u64 {
    3000
}

impl Default for GeofenceConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            lookup_url: default_lookup_url(),
            lookup_timeout_ms: default_lookup_timeout_ms(),
        }
    }
}
