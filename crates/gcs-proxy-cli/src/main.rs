//! GCS Proxy - read-only HTTP gateway for a Cloud Storage bucket

use clap::Parser;
use gcs_proxy_cli::{GatewayConfig, ProxyConfig, run_server_with_shutdown};
use gcs_proxy_store::gcs::DEFAULT_GCS_ENDPOINT;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "gcs-proxy")]
#[command(about = "Serve objects from a Google Cloud Storage bucket over HTTP")]
#[command(version)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1", env = "GCS_PROXY_ADDRESS")]
    address: String,

    /// Port to serve
    #[arg(short, long, default_value = "8080", env = "PORT")]
    port: u16,

    /// Google Cloud Storage bucket name
    #[arg(short, long, env = "GCS_BUCKET", default_value = "")]
    bucket: String,

    /// Optional prefix for all objects, e.g. --prefix=foo/ to work under foo in the bucket
    #[arg(long, env = "GCS_PREFIX", default_value = "")]
    prefix: String,

    /// Optional object served when the root is requested, e.g. --index=index.html
    #[arg(long, env = "GCS_INDEX", default_value = "")]
    index: String,

    /// Optional object served when the requested one cannot be found, e.g. --missing=404.html
    #[arg(long, env = "GCS_MISSING", default_value = "")]
    missing: String,

    /// Respond 200 instead of 404 when serving the missing object
    #[arg(long, env = "GCS_SUPPRESS404", value_parser = clap::builder::BoolishValueParser::new())]
    suppress404: bool,

    /// Storage JSON API endpoint (set for emulators)
    #[arg(long, default_value = DEFAULT_GCS_ENDPOINT, env = "GCS_ENDPOINT")]
    endpoint: String,

    /// OAuth2 access token for the storage API
    #[arg(long, env = "GCS_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    /// Use in-memory storage (for testing, bucket is empty)
    #[arg(long, env = "GCS_PROXY_MEMORY_STORE")]
    memory_store: bool,

    /// Log every object under the prefix before serving
    #[arg(long, env = "GCS_LIST_OBJECTS")]
    list_objects: bool,

    /// Enable debug logging
    #[arg(short, long, env = "GCS_PROXY_DEBUG")]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("gcs_proxy_cli={log_level},gcs_proxy_store={log_level},tower_http=info").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting GCS proxy on {}:{}", args.address, args.port);
    if args.memory_store {
        tracing::warn!("⚠️  Using in-memory storage - no bucket is contacted!");
    } else {
        tracing::info!("Bucket: {}", args.bucket);
    }

    let config = GatewayConfig {
        host: args.address,
        port: args.port,
        bucket: args.bucket,
        gcs_endpoint: args.endpoint,
        access_token: args.access_token,
        use_memory_store: args.memory_store,
        list_objects_on_start: args.list_objects,
        proxy: ProxyConfig {
            key_prefix: args.prefix,
            index_name: args.index,
            fallback_name: args.missing,
            suppress_not_found: args.suppress404,
        },
    };

    let result = run_server_with_shutdown(config, async {
        tokio::signal::ctrl_c().await.ok();
    })
    .await;

    if let Err(ref e) = result {
        tracing::error!("Failed to start proxy: {e:#}");
    }
    result
}
