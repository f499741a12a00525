//! Expand CLI: build the bounded graph around one entity and print it.

use clap::Parser;
use kgscope::graph::humanize_uri;
use kgscope::render::render_fragment;
use kgscope::store::{query::validate_uri, SparqlClient};
use kgscope::{Config, GraphBuilder, GraphLimits, RenderAdapter};

/// Build a knowledge graph from a seed entity URI.
#[derive(Parser, Debug)]
#[command(name = "expand")]
struct Args {
    /// Seed entity URI, e.g. http://dbpedia.org/resource/Marie_Curie
    uri: String,

    /// Root label (default: derived from the URI).
    #[arg(long)]
    label: Option<String>,

    /// Print the render model and build report as JSON.
    #[arg(long, conflicts_with = "html")]
    json: bool,

    /// Print the embeddable HTML fragment.
    #[arg(long)]
    html: bool,

    /// Disable the force-directed layout in the output.
    #[arg(long)]
    no_physics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    validate_uri(&args.uri)?;

    let config = Config::load()?;
    let store = SparqlClient::new(config.store.clone())?;
    let adapter = RenderAdapter::from_config(&config.render)?;

    let label = args.label.clone().unwrap_or_else(|| humanize_uri(&args.uri));
    let builder = GraphBuilder::new(&store, GraphLimits::from(&config.graph));
    let graph = builder.build(&args.uri, &label).await;

    let physics = config.render.physics && !args.no_physics;
    let model = adapter.to_render_model(&graph, physics);

    if args.json {
        let output = serde_json::json!({ "model": model, "report": graph.report });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if args.html {
        println!(
            "{}",
            render_fragment(&model, &config.render.height, &config.render.width)?
        );
        return Ok(());
    }

    println!(
        "{}: {} nodes, {} edges ({} expanded, stopped: {:?})",
        label,
        graph.node_count(),
        graph.edge_count(),
        graph.report.expanded,
        graph.report.stop_reason
    );
    if !graph.report.failed.is_empty() {
        println!("Failed to expand: {}", graph.report.failed.join(", "));
    }
    println!();

    for edge in graph.edges() {
        let target = graph
            .node(&edge.target)
            .map(|n| n.label.as_str())
            .unwrap_or(edge.target.as_str());
        let source = graph
            .node(&edge.source)
            .map(|n| n.label.as_str())
            .unwrap_or(edge.source.as_str());
        println!("  {} --{}--> {}", source, edge.property, target);
    }

    Ok(())
}
