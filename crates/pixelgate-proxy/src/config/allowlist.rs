//! Static domain and ASN allowlists.
//!
//! Both sets are loaded once at startup and never mutated while serving.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowlistConfig {
    /// Hostnames permitted as proxy targets. Subdomains of an entry are
    /// also accepted.
    #[serde(default = "default_domains")]
    pub domains: Vec<String>,

    /// ASNs whose public-IP clients are admitted, e.g. "AS13335".
    #[serde(default = "default_asns")]
    pub asns: Vec<String>,
}

fn default_domains() -> Vec<String> {
    vec!["pixeldrain.com".to_string(), "cdn.pixeldrain.com".to_string()]
}

fn default_asns() -> Vec<String> {
    vec!["AS13335".to_string(), "AS812".to_string()]
}

impl Default for AllowlistConfig {
    fn default() -> Self {
        Self {
            domains: default_domains(),
            asns: default_asns(),
        }
    }
}

impl AllowlistConfig {
    /// True if `host` equals an allowlisted domain or is a subdomain of one.
    pub fn allows_domain(&self, host: &str) -> bool {
        self.domains
            .iter()
            .any(|d| host == d || host.ends_with(&format!(".{d}")))
    }

    /// True if `asn` is in the allowed set.
    pub fn allows_asn(&self, asn: &str) -> bool {
        self.asns.iter().any(|a| a == asn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_domain_match() {
        let allowlist = AllowlistConfig::default();
        assert!(allowlist.allows_domain("pixeldrain.com"));
        assert!(allowlist.allows_domain("cdn.pixeldrain.com"));
    }

    #[test]
    fn test_subdomain_match() {
        let allowlist = AllowlistConfig::default();
        assert!(allowlist.allows_domain("mirror.pixeldrain.com"));
        assert!(allowlist.allows_domain("eu.cdn.pixeldrain.com"));
    }

    #[test]
    fn test_foreign_domain_denied() {
        let allowlist = AllowlistConfig::default();
        assert!(!allowlist.allows_domain("evil.example"));
        // Suffix tricks without the dot separator must not match
        assert!(!allowlist.allows_domain("evilpixeldrain.com"));
        assert!(!allowlist.allows_domain("pixeldrain.com.evil.example"));
    }

    #[test]
    fn test_asn_membership() {
        let allowlist = AllowlistConfig::default();
        assert!(allowlist.allows_asn("AS13335"));
        assert!(allowlist.allows_asn("AS812"));
        assert!(!allowlist.allows_asn("AS15169"));
    }
}
