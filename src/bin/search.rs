//! Search CLI: resolve a name against the configured SPARQL endpoint.

use clap::Parser;
use kgscope::{store::SparqlClient, Config, Resolver};
use std::time::Instant;

/// Print candidate entities for a free-text name.
#[derive(Parser, Debug)]
#[command(name = "search")]
struct Args {
    /// Name to look up, e.g. "Curie".
    query: String,

    /// Print the resolution as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    if args.query.trim().is_empty() {
        anyhow::bail!("Query cannot be empty");
    }

    let config = Config::load()?;
    let store = SparqlClient::new(config.store.clone())?;
    let resolver = Resolver::new(&store, config.resolver.clone());

    let start = Instant::now();
    let resolution = resolver.resolve(&args.query).await;
    let elapsed = start.elapsed();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolution)?);
        return Ok(());
    }

    if let Some(error) = &resolution.error {
        anyhow::bail!("{}", error);
    }

    println!(
        "Found {} candidates for \"{}\" in {:.2}s\n",
        resolution.candidates.len(),
        args.query.trim(),
        elapsed.as_secs_f64()
    );

    for (i, candidate) in resolution.candidates.iter().enumerate() {
        println!(
            "{:>2}. {:<40} {:>5.1}  {}",
            i + 1,
            candidate.label,
            candidate.score,
            candidate.uri
        );
    }

    Ok(())
}
