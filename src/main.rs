use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use medata_catalog::pipeline::llm_extract_fn;
use medata_catalog::{CatalogPipeline, PdfLoader};
use medata_llm::openai::OpenAiProvider;
use medata_render::{LabelPalette, TagRenderer, encode_png};
use tracing_subscriber::EnvFilter;

mod config;

use config::Config;

#[derive(Debug, Parser)]
#[command(
    name = "medata",
    version,
    about = "Generate a tag-metadata catalog and visualization for a PDF"
)]
struct Cli {
    /// Input document; only .pdf files are processed.
    input: PathBuf,

    /// Directory for metadata.json and tag_visualization.png
    /// (defaults to the configured output dir).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Configuration file.
    #[arg(long, default_value = "medata.toml")]
    config: PathBuf,

    /// Fixed seed for label colors, for reproducible renders.
    #[arg(long)]
    color_seed: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    let api_key = std::env::var("MEDATA_OPENAI_API_KEY")
        .context("MEDATA_OPENAI_API_KEY must be set to call the tag extractor")?;

    let provider = OpenAiProvider::new(
        api_key,
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.max_tokens,
    );
    let pipeline = CatalogPipeline::new(Box::new(PdfLoader::default()), llm_extract_fn(provider));

    let document = pipeline
        .generate(&cli.input)
        .await
        .with_context(|| format!("failed to process {}", cli.input.display()))?;

    let output_dir = cli.output_dir.unwrap_or(config.output.dir);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    let json_path = output_dir.join("metadata.json");
    std::fs::write(&json_path, document.to_pretty_json()?)
        .with_context(|| format!("failed to write {}", json_path.display()))?;

    let mut palette = cli
        .color_seed
        .map_or_else(LabelPalette::new, LabelPalette::seeded);
    let image = TagRenderer::default().render(&document, &mut palette);

    let png_path = output_dir.join("tag_visualization.png");
    std::fs::write(&png_path, encode_png(&image)?)
        .with_context(|| format!("failed to write {}", png_path.display()))?;

    tracing::info!(
        pages = document.page_count.first().copied().unwrap_or(0),
        tags = document.tag_values.len(),
        "catalog generated"
    );
    println!("Metadata: {}", json_path.display());
    println!("Visualization: {}", png_path.display());

    Ok(())
}
