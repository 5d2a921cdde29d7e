//! Upstream fetching and streaming relay.
//!
//! Responses are mirrored raw: the upstream status and every upstream
//! header pass through unchanged, and the body is piped without buffering.
//! Only transport-level failures are translated into a generic 502.

use super::client::HttpClient;
use crate::error::ProxyError;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, Full};
use hyper::body::Bytes;
use hyper::header::{self, HeaderValue};
use hyper::{Method, Request, Response, Uri};
use std::convert::Infallible;
use tracing::{debug, error};

/// Helper function to create an error response.
///
/// The body is serialized, not formatted, so a message echoing caller
/// input stays valid JSON.
pub fn error_response(status: u16, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

fn empty_body() -> BoxBody<Bytes, hyper::Error> {
    BoxBody::new(Empty::<Bytes>::new().map_err(|never: Infallible| match never {}))
}

/// Resolve a `location` header value against the URL that produced it.
///
/// Handles absolute URLs and root-relative paths. Anything else (including
/// path-relative references, which the origin never emits) is rejected.
pub fn resolve_location(current: &Uri, location: &str) -> Option<Uri> {
    if let Ok(uri) = location.parse::<Uri>() {
        if uri.scheme().is_some() {
            return Some(uri);
        }
    }

    if location.starts_with('/') {
        return Uri::builder()
            .scheme(current.scheme()?.clone())
            .authority(current.authority()?.clone())
            .path_and_query(location)
            .build()
            .ok();
    }

    None
}

/// Fetch the target and stream the upstream response back.
///
/// The inbound `range` header is forwarded verbatim when present and
/// omitted entirely when absent. Redirects are followed transparently up
/// to `max_redirects` hops. The returned body is the live upstream stream;
/// it is never collected.
pub async fn fetch_and_stream(
    http_client: &HttpClient,
    uri: Uri,
    range: Option<&HeaderValue>,
    max_redirects: usize,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, ProxyError> {
    let mut uri = uri;
    let mut hops = 0;

    loop {
        debug!("Fetching upstream: {}", uri);

        let mut upstream_req = Request::builder().method(Method::GET).uri(uri.clone());
        if let Some(range) = range {
            upstream_req = upstream_req.header(header::RANGE, range);
        }
        let upstream_req = upstream_req
            .body(empty_body())
            .map_err(|e| ProxyError::Internal(e.into()))?;

        let upstream_response = http_client.request(upstream_req).await.map_err(|e| {
            error!("Upstream fetch failed for {}: {}", uri, e);
            ProxyError::Upstream("Failed to reach upstream".to_string())
        })?;

        if upstream_response.status().is_redirection() {
            if hops >= max_redirects {
                error!("Redirect limit ({}) exhausted at {}", max_redirects, uri);
                return Err(ProxyError::Upstream(
                    "Too many upstream redirects".to_string(),
                ));
            }

            let location = upstream_response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
                .ok_or_else(|| {
                    ProxyError::Upstream("Redirect without a location header".to_string())
                })?;

            uri = resolve_location(&uri, &location).ok_or_else(|| {
                ProxyError::Upstream("Unresolvable redirect location".to_string())
            })?;

            debug!("Following redirect ({}/{}) to {}", hops + 1, max_redirects, uri);
            hops += 1;
            continue;
        }

        // Raw mirror: status and headers verbatim, body as a live stream
        let (parts, body) = upstream_response.into_parts();
        return Ok(Response::from_parts(parts, BoxBody::new(body)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_shape() {
        let response = error_response(502, "Failed to reach upstream");
        assert_eq!(response.status(), 502);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }

    #[test]
    fn test_error_response_statuses() {
        for status in [400u16, 403, 500, 502] {
            assert_eq!(error_response(status, "x").status(), status);
        }
    }

    #[tokio::test]
    async fn test_error_body_stays_valid_json_for_hostile_message() {
        // Messages can echo caller input; quotes and backslashes must not
        // break the body out of the error field
        let message = r#"Invalid target URL: ht"tp://\x"#;
        let response = error_response(400, message);
        let body = response.into_body().collect().await.unwrap().to_bytes();

        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["error"], message);
    }

    #[test]
    fn test_resolve_location_absolute() {
        let current: Uri = "https://pixeldrain.com/api/file/abc".parse().unwrap();
        let resolved = resolve_location(&current, "https://cdn.pixeldrain.com/f/abc").unwrap();
        assert_eq!(resolved.host(), Some("cdn.pixeldrain.com"));
    }

    #[test]
    fn test_resolve_location_root_relative() {
        let current: Uri = "https://pixeldrain.com/api/file/abc?download".parse().unwrap();
        let resolved = resolve_location(&current, "/moved/file/abc").unwrap();
        assert_eq!(resolved.host(), Some("pixeldrain.com"));
        assert_eq!(resolved.path(), "/moved/file/abc");
        assert_eq!(resolved.scheme_str(), Some("https"));
    }

    #[test]
    fn test_resolve_location_path_relative_rejected() {
        let current: Uri = "https://pixeldrain.com/api/file/abc".parse().unwrap();
        assert!(resolve_location(&current, "other/file").is_none());
    }
}
