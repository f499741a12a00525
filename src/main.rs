use anyhow::Result;
use kgscope::store::SparqlClient;
use kgscope::web::HttpServer;
use kgscope::Config;

fn init_logging(config: &Config) {
    // RUST_LOG wins over the configured level
    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("RUST_LOG", config.kgscope.log_level.as_str()),
    )
    .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    init_logging(&config);

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("serve");

    match command {
        "serve" => run_http_server(config).await?,
        "check" => run_endpoint_check(config).await?,
        other => {
            anyhow::bail!("Unknown command: {}\nUsage: kgscope [serve|check]", other);
        }
    }

    Ok(())
}

/// Run the web front-end
async fn run_http_server(config: Config) -> Result<()> {
    log::info!("Starting kgscope v{}", env!("CARGO_PKG_VERSION"));

    let store = SparqlClient::new(config.store.clone())?;
    let server = HttpServer::new(store, config)?;
    server.run().await?;

    Ok(())
}

/// Verify the configured endpoint answers SELECT queries
async fn run_endpoint_check(config: Config) -> Result<()> {
    log::info!("Configuration loaded successfully");
    log::info!("Label language: {}", config.store.language);
    log::info!(
        "Graph limits: {} nodes, {} edges, depth {}",
        config.graph.max_nodes,
        config.graph.max_edges,
        config.graph.max_depth
    );

    let store = SparqlClient::new(config.store)?;
    log::info!("SPARQL endpoint: {}", store.endpoint());
    let results = store
        .select("SELECT ?s WHERE { ?s ?p ?o } LIMIT 1")
        .await?;

    if results.is_empty() {
        log::warn!("Endpoint answered but returned no triples");
    } else {
        log::info!("✓ Endpoint is reachable");
    }

    Ok(())
}
