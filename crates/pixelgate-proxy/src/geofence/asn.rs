//! ASN resolution via an external IP geolocation service.
//!
//! The resolver is a trait so the guard can be tested without network
//! access, and so a caching resolver can be slotted in later without
//! touching the policy logic.

use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Resolves the autonomous system number that owns an IP address.
///
/// `None` is the single absence-of-result signal: lookup failure, timeout,
/// malformed response, and unknown IP are indistinguishable to callers.
/// Policy on absence belongs to the caller.
#[async_trait]
pub trait AsnResolver: Send + Sync {
    async fn resolve(&self, ip: &str) -> Option<String>;
}

/// Resolver backed by an ipapi.co-style JSON endpoint.
pub struct HttpAsnResolver {
    client: reqwest::Client,
    lookup_url: String,
}

impl HttpAsnResolver {
    /// Build a resolver with a hard per-lookup timeout. No retries.
    pub fn new(lookup_url: &str, timeout_ms: u64) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            lookup_url: lookup_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl AsnResolver for HttpAsnResolver {
    async fn resolve(&self, ip: &str) -> Option<String> {
        let url = format!("{}/{}/json/", self.lookup_url, ip);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("ASN lookup failed for {}: {}", ip, e);
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(
                "ASN lookup for {} returned status {}",
                ip,
                response.status()
            );
            return None;
        }

        let body: serde_json::Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                warn!("ASN lookup for {} returned malformed JSON: {}", ip, e);
                return None;
            }
        };

        let asn = body.get("asn").and_then(|v| v.as_str()).map(str::to_string);
        debug!("ASN lookup for {}: {:?}", ip, asn);
        asn
    }
}
