//! Fail-closed admission policy based on client network origin.

use super::asn::AsnResolver;
use super::ip::{extract_client_ip, is_private_ip};
use crate::config::{AllowlistConfig, GeofenceConfig};
use hyper::HeaderMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Why a request was admitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// Private or loopback address; no lookup performed.
    PrivateAddress,
    /// Resolved ASN is in the allowed set.
    AsnPermitted,
    /// Geofencing disabled in config.
    GuardDisabled,
}

/// Why a request was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Neither forwarding header yielded an address.
    NoClientIp,
    /// Lookup errored or timed out. Fail-closed.
    LookupFailed,
    /// ASN resolved but is not in the allowed set.
    AsnNotPermitted,
}

impl DenyReason {
    /// Caller-facing literal. Lookup failure and a foreign ASN surface the
    /// same message so callers cannot probe which one occurred.
    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::NoClientIp => "No IP detected",
            DenyReason::LookupFailed | DenyReason::AsnNotPermitted => {
                "Access denied from your network"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow(_))
    }
}

/// Per-request admission context. Built once per request, never stored.
#[derive(Debug, Clone)]
pub struct ClientContext {
    pub ip: Option<String>,
    pub private: bool,
    pub asn: Option<String>,
    pub verdict: Verdict,
}

/// Evaluates the geofencing policy for incoming requests.
///
/// Private clients are admitted directly. Public clients require a live
/// ASN resolution against the allowed set; any ambiguity (no IP, lookup
/// failure, timeout) denies.
pub struct GeofenceGuard {
    config: GeofenceConfig,
    allowlist: Arc<AllowlistConfig>,
    resolver: Arc<dyn AsnResolver>,
}

impl GeofenceGuard {
    pub fn new(
        config: GeofenceConfig,
        allowlist: Arc<AllowlistConfig>,
        resolver: Arc<dyn AsnResolver>,
    ) -> Self {
        Self {
            config,
            allowlist,
            resolver,
        }
    }

    /// Evaluate the request headers into an admission decision.
    pub async fn evaluate(&self, headers: &HeaderMap) -> ClientContext {
        if !self.config.enabled {
            return ClientContext {
                ip: None,
                private: false,
                asn: None,
                verdict: Verdict::Allow(AllowReason::GuardDisabled),
            };
        }

        let ip = match extract_client_ip(headers) {
            Some(ip) => ip,
            None => {
                info!("Geofence denial: no client IP in forwarding headers");
                return ClientContext {
                    ip: None,
                    private: false,
                    asn: None,
                    verdict: Verdict::Deny(DenyReason::NoClientIp),
                };
            }
        };

        if is_private_ip(&ip) {
            debug!("Private client {} admitted without lookup", ip);
            return ClientContext {
                ip: Some(ip),
                private: true,
                asn: None,
                verdict: Verdict::Allow(AllowReason::PrivateAddress),
            };
        }

        let asn = self.resolver.resolve(&ip).await;
        let verdict = match asn.as_deref() {
            Some(asn) if self.allowlist.allows_asn(asn) => {
                debug!("Client {} admitted via {}", ip, asn);
                Verdict::Allow(AllowReason::AsnPermitted)
            }
            Some(asn) => {
                info!("Geofence denial: client {} on unpermitted {}", ip, asn);
                Verdict::Deny(DenyReason::AsnNotPermitted)
            }
            None => {
                info!("Geofence denial: ASN lookup failed for {}", ip);
                Verdict::Deny(DenyReason::LookupFailed)
            }
        };

        ClientContext {
            ip: Some(ip),
            private: false,
            asn,
            verdict,
        }
    }
}
