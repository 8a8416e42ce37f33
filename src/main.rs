mod app;

use std::path::PathBuf;

use clap::Parser;
use code_lens::EngineConfig;
use code_lens::graph::Lens;
use code_lens::source::{GraphRequest, SubgraphQuery};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Graph snapshot: a JSON document with `nodes` and `edges`.
    #[arg(long)]
    graph: PathBuf,

    /// Initial lens: structure, business, infra or pattern.
    #[arg(long, default_value = "structure")]
    lens: Lens,

    /// Keep only the neighborhood of this node id.
    #[arg(long)]
    center: Option<String>,

    /// Undirected hops kept around `--center`.
    #[arg(long, default_value_t = 2)]
    depth: usize,

    /// Relationship kinds to include, comma separated. Empty keeps all of them.
    #[arg(long, value_delimiter = ',')]
    kinds: Vec<String>,

    /// JSON file overriding layout and interaction tuning values.
    #[arg(long)]
    layout_config: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    let _ = tracing_subscriber::fmt::try_init();
    let args = Args::parse();

    let engine = match &args.layout_config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|error| {
            tracing::warn!("{error:#}; using default tuning");
            EngineConfig::default()
        }),
        None => EngineConfig::default(),
    };

    let config = app::AppConfig {
        graph_path: args.graph,
        request: GraphRequest::Subgraph(SubgraphQuery {
            center: args.center,
            depth: args.depth,
            kinds: args.kinds,
        }),
        lens: args.lens,
        engine,
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "code-lens",
        options,
        Box::new(move |cc| Ok(Box::new(app::CodeLensApp::new(cc, config)))),
    )
}
