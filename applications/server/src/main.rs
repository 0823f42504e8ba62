/// Mezgebe Server - audio proxy and catalog API
use clap::{Parser, Subcommand};
use mezgebe_core::{CatalogProvider, StaticCatalog, DEFAULT_SEARCH_LIMIT};
use mezgebe_playback::UrlResolver;
use mezgebe_server::{api, config::ServerConfig, services::AudioGateway, state::AppState};
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mezgebe-server")]
#[command(about = "Mezgebe audio proxy and catalog server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "MEZGEBE_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Show the URL the player would load for a source URL
    Resolve {
        /// Source URL
        url: String,
        /// Origin the app is served from
        #[arg(long)]
        origin: Option<String>,
        /// Proxy endpoint path
        #[arg(long, default_value = "/audio-proxy")]
        proxy_path: String,
    },
    /// Search a catalog file
    Search {
        /// Search text
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        /// Catalog JSON file (defaults to `catalog.path` from the config)
        #[arg(short, long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mezgebe_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Resolve {
            url,
            origin,
            proxy_path,
        } => {
            let resolver = UrlResolver::new(origin.as_deref(), proxy_path);
            println!("{}", resolver.resolve(&url));
        }
        Commands::Search {
            query,
            limit,
            catalog,
        } => {
            let path = match catalog {
                Some(path) => path,
                None => ServerConfig::load(None)?
                    .catalog
                    .path
                    .ok_or_else(|| anyhow::anyhow!("No catalog given and none configured"))?,
            };
            let catalog = StaticCatalog::from_path(&path)?;
            for track in catalog.search(&query, limit) {
                println!("{}\t{}\t{}", track.id(), track.title(), track.source_url());
            }
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Mezgebe Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let catalog = match &config.catalog.path {
        Some(path) => {
            let catalog = StaticCatalog::from_path(path)?;
            tracing::info!("Catalog loaded: {} months", catalog.months().len());
            catalog
        }
        None => {
            tracing::warn!("No catalog configured; catalog routes will be empty");
            StaticCatalog::new(Vec::new())
        }
    };

    let gateway = AudioGateway::new(&config.proxy)?;
    tracing::info!(
        "Audio proxy on {} for {:?}",
        config.proxy.path,
        config.proxy.allowed_hosts
    );

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    // Build application state
    let app_state = AppState::new(Arc::new(config), Arc::new(gateway), Arc::new(catalog));
    let app = api::router(app_state);

    tracing::info!("Server listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
