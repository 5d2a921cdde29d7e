//! Geofenced request admission.
//!
//! Requests are admitted or denied before any proxying happens, based on
//! the client's network origin:
//!
//! - `ip` - client IP extraction from forwarding headers and private-range
//!   classification
//! - `asn` - ASN resolution against an external geolocation service
//! - `guard` - the fail-closed allow/deny policy combining the two

mod asn;
mod guard;
mod ip;

pub use asn::{AsnResolver, HttpAsnResolver};
pub use guard::{AllowReason, ClientContext, DenyReason, GeofenceGuard, Verdict};
pub use ip::{extract_client_ip, is_private_ip};
