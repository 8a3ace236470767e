mod cli;

use dircast::{
    catalog::{CatalogBuilder, Entry},
    config, server, state, watch,
};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(
    host: String,
    port: u16,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    // The only fatal error class: nothing to serve, or nowhere to serve
    // it from.
    config::validate_config(&config)?;
    let announce = config::announce_ip(&config.server)?;

    tracing::info!("Starting dircast server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    let base_url = format!("http://{}:{}", announce, config.server.port);
    let shares = config.shares.iter().map(|s| s.to_share()).collect();
    let state = state::AppState::new(base_url, shares);

    // Initial catalog build, off the async threads
    {
        let state = state.clone();
        tokio::task::spawn_blocking(move || state.rebuild()).await?;
    }

    // Start catalog watcher if enabled
    let mut watcher = watch::CatalogWatcher::new(config.watch.clone(), state.clone());
    if config.watch.enabled {
        watcher.start().await?;
    }

    // Start HTTP server
    server::start_server(config, state).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "dircast=trace,dircast_common=debug,tower_http=debug".to_string()
        } else {
            "dircast=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Scan => scan_catalog(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("dircast {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Build the catalog once and print what would be shared.
fn scan_catalog(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    config::validate_config(&config)?;

    let announce = config::announce_ip(&config.server)?;
    let base_url = format!("http://{}:{}", announce, config.server.port);
    let shares: Vec<_> = config.shares.iter().map(|s| s.to_share()).collect();

    let catalog = CatalogBuilder::new(base_url).build(&shares);

    println!("Catalog: {} entries", catalog.len());
    print_tree(&catalog, catalog.root(), 0);

    Ok(())
}

fn print_tree(catalog: &dircast::catalog::Catalog, entry: &Entry, depth: usize) {
    let indent = "  ".repeat(depth);
    if entry.is_container() {
        println!(
            "{}[{}] {}/ ({} children)",
            indent,
            entry.id,
            entry.title,
            entry.child_count()
        );
    } else {
        println!("{}[{}] {} ({} bytes)", indent, entry.id, entry.title, entry.size());
    }

    for child_id in entry.children() {
        if let Some(child) = catalog.get(child_id.value()) {
            print_tree(catalog, child, depth + 1);
        }
    }
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Name: {}", config.server.name);
            println!("  Shares: {}", config.shares.len());
            for share in &config.shares {
                println!("    {:?}", share.path);
            }
            println!("  Watch enabled: {}", config.watch.enabled);
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
