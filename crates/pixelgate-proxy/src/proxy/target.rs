//! Target URL resolution and domain allowlist validation.
//!
//! A [`ProxyTarget`] can only be obtained through [`resolve_target`], which
//! validates the hostname against the domain allowlist. Nothing downstream
//! fetches a URL that did not pass through here.

use crate::config::{AllowlistConfig, OriginConfig};
use crate::error::ProxyError;
use hyper::Uri;

/// A validated, absolute upstream URL.
#[derive(Debug, Clone)]
pub struct ProxyTarget {
    pub uri: Uri,
    pub host: String,
}

/// Parse a raw query string into decoded key/value pairs.
///
/// Keys without a value decode to an empty string. Undecodable
/// percent-sequences keep the raw text.
pub fn parse_query(query: Option<&str>) -> Vec<(String, String)> {
    let Some(query) = query else {
        return Vec::new();
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode_component(key), decode_component(value))
        })
        .collect()
}

fn decode_component(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}

/// Look up the first occurrence of `name` in parsed query pairs.
fn query_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// Resolve the upstream target from the request query.
///
/// `origin` (a literal URL) takes precedence over `id` (a file identifier
/// substituted into the origin download template). The resolved hostname
/// must be on the domain allowlist.
pub fn resolve_target(
    query: Option<&str>,
    origin: &OriginConfig,
    allowlist: &AllowlistConfig,
) -> Result<ProxyTarget, ProxyError> {
    let params = parse_query(query);

    let raw_url = if let Some(url) = query_param(&params, "origin").filter(|v| !v.is_empty()) {
        url.to_string()
    } else if let Some(id) = query_param(&params, "id").filter(|v| !v.is_empty()) {
        origin.download_template.replace("{id}", id)
    } else {
        return Err(ProxyError::Validation(
            "Missing origin or id parameter".to_string(),
        ));
    };

    let uri: Uri = raw_url
        .parse()
        .map_err(|_| ProxyError::Validation(format!("Invalid target URL: {raw_url}")))?;

    // Relative or scheme-less URIs parse fine; reject them explicitly
    if uri.scheme().is_none() {
        return Err(ProxyError::Validation(format!(
            "Target URL must be absolute: {raw_url}"
        )));
    }

    let host = uri
        .host()
        .ok_or_else(|| ProxyError::Validation(format!("Target URL has no host: {raw_url}")))?
        .to_string();

    if !allowlist.allows_domain(&host) {
        return Err(ProxyError::PolicyDenied("Domain not allowed".to_string()));
    }

    Ok(ProxyTarget { uri, host })
}
