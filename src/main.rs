mod app;
mod markdown;
mod taxonomy;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Taxonomy document (JSON, or YAML by extension).
    document: PathBuf,

    /// Separate components document; overrides components declared inline.
    #[arg(long)]
    components: Option<PathBuf>,
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "taxograph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::TaxographApp::new(
                cc,
                args.document.clone(),
                args.components.clone(),
                Arc::new(markdown::CommonMarkHtml),
            )))
        }),
    )
}
