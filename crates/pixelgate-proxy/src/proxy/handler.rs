//! Route dispatch and per-route handlers.
//!
//! The admission pipeline for `/api` runs in a fixed order: geofence guard,
//! target resolution, domain allowlist, upstream fetch. A denial at any
//! stage stops the request before the next stage runs.

use super::client::HttpClient;
use super::forwarding::{error_response, fetch_and_stream};
use super::response_ext::ResponseExt;
use super::target::resolve_target;
use crate::config::Config;
use crate::error::ProxyError;
use crate::geofence::{GeofenceGuard, Verdict};
use http_body_util::combinators::BoxBody;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header;
use hyper::{Method, Request, Response, Uri};
use std::convert::Infallible;
use tracing::{debug, info};

/// Borrowed per-request view of the server state.
pub struct RequestHandlerContext<'a> {
    pub http_client: &'a HttpClient,
    pub guard: &'a GeofenceGuard,
    pub config: &'a Config,
}

/// JSON response with the given status.
fn json_response(status: u16, body: &serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn proxy_error_response(err: &ProxyError) -> Response<BoxBody<Bytes, hyper::Error>> {
    error_response(err.status(), &err.message()).into_boxed()
}

/// Main request router.
pub async fn handle_request(
    ctx: &RequestHandlerContext<'_>,
    req: Request<hyper::body::Incoming>,
) -> Result<Response<BoxBody<Bytes, hyper::Error>>, Infallible> {
    debug!("Received request: {} {}", req.method(), req.uri());

    let response = match (req.method(), req.uri().path()) {
        (&Method::GET, "/") => handle_root(),
        (&Method::GET, "/api") => handle_proxy(ctx, &req).await,
        (&Method::GET, "/ip") => handle_ip_report(ctx, &req).await,
        (&Method::GET, "/limit") => handle_limit(ctx).await,
        _ => error_response(404, "Not found").into_boxed(),
    };

    Ok(response)
}

/// `GET /` - liveness.
fn handle_root() -> Response<BoxBody<Bytes, hyper::Error>> {
    json_response(
        200,
        &serde_json::json!({
            "service": "pixelgate-proxy",
            "status": "ok",
        }),
    )
    .into_boxed()
}

/// `GET /api?origin=<url>|id=<fileId>` - the proxy pipeline.
async fn handle_proxy(
    ctx: &RequestHandlerContext<'_>,
    req: &Request<hyper::body::Incoming>,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    let client = ctx.guard.evaluate(req.headers()).await;
    if let Verdict::Deny(reason) = client.verdict {
        info!(
            "Request denied by geofence (ip: {:?}, reason: {:?})",
            client.ip, reason
        );
        return error_response(403, reason.message()).into_boxed();
    }

    let target = match resolve_target(
        req.uri().query(),
        &ctx.config.origin,
        &ctx.config.allowlist,
    ) {
        Ok(target) => target,
        Err(e) => return proxy_error_response(&e),
    };

    info!("Proxying download from {}", target.host);

    let range = req.headers().get(header::RANGE);
    match fetch_and_stream(
        ctx.http_client,
        target.uri,
        range,
        ctx.config.connection_pool.max_redirects,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => proxy_error_response(&e),
    }
}

/// `GET /ip` - admission diagnostic. Reports the decision, never blocks.
async fn handle_ip_report(
    ctx: &RequestHandlerContext<'_>,
    req: &Request<hyper::body::Incoming>,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    let client = ctx.guard.evaluate(req.headers()).await;

    json_response(
        200,
        &serde_json::json!({
            "ip": client.ip,
            "private": client.private,
            "asn": client.asn,
            "allowed": client.verdict.is_allowed(),
        }),
    )
    .into_boxed()
}

/// `GET /limit` - relay of the origin's rate-limit status endpoint.
async fn handle_limit(
    ctx: &RequestHandlerContext<'_>,
) -> Response<BoxBody<Bytes, hyper::Error>> {
    let uri: Uri = match ctx.config.origin.rate_limit_url.parse() {
        Ok(uri) => uri,
        Err(_) => {
            return proxy_error_response(&ProxyError::Internal(anyhow::anyhow!(
                "invalid rate_limit_url in config"
            )))
        }
    };

    match fetch_and_stream(
        ctx.http_client,
        uri,
        None,
        ctx.config.connection_pool.max_redirects,
    )
    .await
    {
        Ok(response) => response,
        Err(e) => proxy_error_response(&e),
    }
}
