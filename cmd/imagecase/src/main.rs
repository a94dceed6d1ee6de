//! imagecase - case-based image classification.
//!
//! Reference images are embedded once and stored in a JSON case
//! library; new images are assigned to the best-matching category.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use pixsort_caselib::{CaseEntry, CaseLibrary, Classifier};
use pixsort_cli::{
    build_embedder, collect_images, embed_batch, resolve_output_path, ClassifyReport,
    OutputFormat, DEFAULT_CONCURRENCY,
};
use pixsort_embed::ImageEmbedder;

/// Case-based image classification tool.
#[derive(Parser)]
#[command(name = "imagecase")]
#[command(about = "Case-based image classification tool")]
#[command(version)]
struct Cli {
    /// Case library file
    #[arg(long, global = true, default_value = "case_library.json")]
    library: PathBuf,

    /// Embedding service base URL (default: $PIXSORT_EMBED_URL)
    #[arg(long, global = true)]
    embed_url: Option<String>,

    /// Embedding model name
    #[arg(long, global = true)]
    model: Option<String>,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a reference image to the case library
    AddCase {
        /// Category label
        label: String,
        /// Reference image path
        image: PathBuf,
        /// Free-form description for the entry
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove a category, or a single entry by index
    RemoveCase {
        label: String,
        /// Entry index within the category (whole category when omitted)
        #[arg(long)]
        index: Option<usize>,
    },
    /// List categories in the case library
    ListCases,
    /// Classify images against the case library
    Classify {
        /// Image files or directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Minimum similarity for an assignment
        #[arg(long, default_value_t = 0.0)]
        threshold: f32,
        /// Write the report to this path
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,
        /// Report format when not implied by the output extension
        #[arg(long, default_value = "json")]
        format: String,
        /// Max concurrent embedding requests
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match &cli.command {
        Commands::AddCase {
            label,
            image,
            description,
        } => run_add_case(&cli, label, image, description).await,
        Commands::RemoveCase { label, index } => run_remove_case(&cli, label, *index),
        Commands::ListCases => run_list_cases(&cli),
        Commands::Classify {
            paths,
            threshold,
            output,
            format,
            concurrency,
        } => run_classify(&cli, paths, *threshold, output.as_deref(), format, *concurrency).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run_add_case(cli: &Cli, label: &str, image: &PathBuf, description: &str) -> Result<()> {
    let mut library = CaseLibrary::load_or_default(&cli.library)?;

    let embedder = build_embedder(cli.embed_url.as_deref(), cli.model.as_deref());
    let vector = embedder
        .embed_path(image)
        .await
        .with_context(|| format!("failed to embed {}", image.display()))?;

    let count = library.add_case(
        label,
        CaseEntry::new(&image.display().to_string(), vector, description),
    );
    library.save(&cli.library)?;

    println!("Added case: {label} ({count} entries) - {}", image.display());
    Ok(())
}

fn run_remove_case(cli: &Cli, label: &str, index: Option<usize>) -> Result<()> {
    let mut library = CaseLibrary::load(&cli.library)?;
    library.remove_case(label, index)?;
    library.save(&cli.library)?;

    match index {
        Some(i) => println!("Removed entry {i} from category: {label}"),
        None => println!("Removed category: {label}"),
    }
    Ok(())
}

fn run_list_cases(cli: &Cli) -> Result<()> {
    let library = CaseLibrary::load_or_default(&cli.library)?;
    if library.is_empty() {
        println!("Case library is empty");
        return Ok(());
    }

    println!(
        "{} categories, {} entries:",
        library.len(),
        library.total_entries()
    );
    for label in library.list_categories() {
        println!("  - {label} ({} entries)", library.count(label));
        if let Some(entry) = library.get_entry(label, None) {
            if !entry.description.is_empty() {
                println!("    description: {}", entry.description);
            }
            println!("    source: {}", entry.source);
        }
    }
    Ok(())
}

async fn run_classify(
    cli: &Cli,
    paths: &[PathBuf],
    threshold: f32,
    output: Option<&std::path::Path>,
    format: &str,
    concurrency: usize,
) -> Result<()> {
    let library = CaseLibrary::load(&cli.library)?;
    if library.is_empty() {
        bail!("case library is empty, add cases first");
    }

    let images = collect_images(paths);
    if images.is_empty() {
        bail!("no image files found");
    }
    println!("Found {} images", images.len());

    let embedder = build_embedder(cli.embed_url.as_deref(), cli.model.as_deref());
    let batch = embed_batch(&embedder, &images, concurrency).await;
    if batch.embedded_count() == 0 {
        bail!("no images could be embedded");
    }

    let classifier = Classifier::new(&library);
    let classifications = classifier.classify_batch(&batch.results, threshold)?;

    let report = ClassifyReport::new(classifications);
    report.print();

    if let Some(output) = output {
        let flag_format: OutputFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let format = OutputFormat::from_path(output).unwrap_or(flag_format);
        let path = resolve_output_path(output.to_path_buf(), format);
        report.save(&path, format)?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
}
