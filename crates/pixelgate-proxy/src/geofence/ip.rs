//! Client IP extraction and private-range classification.

use hyper::HeaderMap;

/// Extract the client IP from forwarding headers.
///
/// Prefers the first comma-separated entry of `x-forwarded-for` (the
/// original client as seen by the outermost edge), falling back to
/// `x-real-ip`. Returns `None` when neither header is usable.
pub fn extract_client_ip(headers: &HeaderMap) -> Option<String> {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }

    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

/// Classify an IP as private (loopback or RFC 1918 style).
///
/// The `172.` check covers all of 172.0.0.0/8, wider than the RFC 1918
/// 172.16.0.0/12 block. This matches the deployed admission policy and is
/// kept intentionally; narrowing it would change which clients skip the
/// ASN lookup.
pub fn is_private_ip(ip: &str) -> bool {
    ip == "127.0.0.1"
        || ip == "::1"
        || ip.starts_with("10.")
        || ip.starts_with("192.168.")
        || ip.starts_with("172.")
}
