use clap::Parser;
use pixelgate_proxy::config::Config;
use pixelgate_proxy::proxy::ProxyServer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pixelgate-proxy")]
struct Args {
    /// Port to listen on (overrides config)
    #[arg(short, long, env = "PIXELGATE_PORT")]
    port: Option<u16>,

    /// Path to the YAML config file
    #[arg(short, long, env = "PIXELGATE_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut config = match args.config {
        Some(path) => Config::from_file(&path)?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.listen.port = port;
    }

    info!("Starting pixelgate-proxy on port {}", config.listen.port);

    let server = ProxyServer::new(config)?;
    server.run().await
}
