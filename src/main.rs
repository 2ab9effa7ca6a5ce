use clap::Parser;
use folio::{ExportBuilder, ExportConfig, ExportError, ExportOutcome, Manifest, PaginationStrategy, StackCapture};
use std::fs;
use std::path::PathBuf;

/// Paginate a document manifest into a multi-page PDF.
#[derive(Parser, Debug)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Path to the JSON document manifest.
    manifest: PathBuf,

    /// Directory the PDF is written to.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Pagination strategy: `reflow` or `raster-slice`.
    #[arg(long)]
    strategy: Option<PaginationStrategy>,

    /// JSON export configuration. Flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fraction of a slice below which a trailing strip is dropped.
    #[arg(long)]
    threshold: Option<f32>,

    /// Device pixels per layout pixel when capturing.
    #[arg(long)]
    scale: Option<f32>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ExportError> {
    env_logger::init();
    let cli = Cli::parse();

    let mut builder = match &cli.config {
        Some(path) => ExportBuilder::from_config(ExportConfig::from_json(&fs::read_to_string(path)?)?),
        None => ExportBuilder::new(),
    };
    if let Some(strategy) = cli.strategy {
        builder = builder.with_strategy(strategy);
    }
    if let Some(threshold) = cli.threshold {
        builder = builder.with_remainder_threshold(threshold);
    }
    if let Some(scale) = cli.scale {
        builder = builder.with_capture_scale(scale);
    }
    let exporter = builder.build()?;

    println!("Loading manifest from {}", cli.manifest.display());
    let (document, mut oracle) = Manifest::from_path(&cli.manifest)?.load()?;

    match exporter.export(&mut oracle, &StackCapture, document).await? {
        ExportOutcome::Document(artifact) => {
            let path = artifact.write_to_dir(&cli.output)?;
            println!(
                "Successfully generated {} ({} page(s))",
                path.display(),
                artifact.page_count
            );
        }
        ExportOutcome::Empty => println!("Nothing to export; no PDF was written."),
    }
    Ok(())
}
