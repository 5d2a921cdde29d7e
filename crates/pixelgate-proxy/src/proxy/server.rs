//! ProxyServer struct and main run loop.

use super::client::{create_http_client, HttpClient};
use super::handler::{handle_request, RequestHandlerContext};
use crate::config::Config;
use crate::geofence::{AsnResolver, GeofenceGuard, HttpAsnResolver};
use http_body_util::combinators::BoxBody;
use hyper::body::Bytes;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// The main proxy server struct.
pub struct ProxyServer {
    config: Arc<Config>,
    guard: GeofenceGuard,
    http_client: HttpClient,
}

impl ProxyServer {
    /// Create a new ProxyServer from configuration.
    pub fn new(config: Config) -> Result<Self, anyhow::Error> {
        let resolver = Arc::new(HttpAsnResolver::new(
            &config.geofence.lookup_url,
            config.geofence.lookup_timeout_ms,
        )?);
        Self::with_resolver(config, resolver)
    }

    /// Create a new ProxyServer with an injected ASN resolver.
    pub fn with_resolver(
        config: Config,
        resolver: Arc<dyn AsnResolver>,
    ) -> Result<Self, anyhow::Error> {
        config.validate()?;

        let http_client = create_http_client(&config);
        let guard = GeofenceGuard::new(
            config.geofence.clone(),
            Arc::new(config.allowlist.clone()),
            resolver,
        );

        Ok(Self {
            config: Arc::new(config),
            guard,
            http_client,
        })
    }

    /// Bind the configured port and serve until the process exits.
    pub async fn run(self) -> Result<(), anyhow::Error> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.listen.port));
        let listener = TcpListener::bind(addr).await?;
        info!("Listening on http://{}", addr);
        self.serve(listener).await
    }

    /// Serve requests from an already-bound listener.
    ///
    /// Split from [`run`](Self::run) so tests can bind an ephemeral port.
    pub async fn serve(self, listener: TcpListener) -> Result<(), anyhow::Error> {
        info!(
            "Allowed domains: {:?}, allowed ASNs: {:?}",
            self.config.allowlist.domains, self.config.allowlist.asns
        );
        if !self.config.geofence.enabled {
            info!("Geofencing disabled; all clients admitted");
        }

        let server = Arc::new(self);

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let server = Arc::clone(&server);

            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service = service_fn(move |req| {
                    let server = Arc::clone(&server);
                    async move { server.handle_request_internal(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection from {}: {}", remote_addr, err);
                }
            });
        }
    }

    /// Internal request handler that builds the context and delegates to the handler module.
    async fn handle_request_internal(
        &self,
        req: hyper::Request<hyper::body::Incoming>,
    ) -> Result<hyper::Response<BoxBody<Bytes, hyper::Error>>, Infallible> {
        let ctx = RequestHandlerContext {
            http_client: &self.http_client,
            guard: &self.guard,
            config: &self.config,
        };

        handle_request(&ctx, req).await
    }
}
