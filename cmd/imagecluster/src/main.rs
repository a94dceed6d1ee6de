//! imagecluster - group images by embedding similarity.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

use pixsort_cli::{
    build_embedder, collect_images, embed_batch, resolve_output_path, ClusterReport,
    OutputFormat, DEFAULT_CONCURRENCY,
};
use pixsort_cluster::{
    cluster_by_kmeans, cluster_by_similarity, Algorithm, KMeansConfig, DEFAULT_THRESHOLD,
};
use pixsort_vecsim::Method;

/// Similarity-based image clustering tool.
#[derive(Parser)]
#[command(name = "imagecluster")]
#[command(about = "Similarity-based image clustering tool")]
#[command(version)]
struct Args {
    /// Image files or directories
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Clustering method: similarity or kmeans
    #[arg(long, default_value = "similarity")]
    method: String,

    /// Similarity threshold (similarity method)
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Cluster count (kmeans method; auto-selected when omitted)
    #[arg(long)]
    n_clusters: Option<usize>,

    /// Similarity metric: cosine, euclidean or dot
    #[arg(long, default_value = "cosine")]
    metric: String,

    /// Embedding service base URL (default: $PIXSORT_EMBED_URL)
    #[arg(long)]
    embed_url: Option<String>,

    /// Embedding model name
    #[arg(long)]
    model: Option<String>,

    /// Write the report to this path
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Report format when not implied by the output extension
    #[arg(long, default_value = "json")]
    format: String,

    /// Max concurrent embedding requests
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let algorithm: Algorithm = args.method.parse()?;
    let metric: Method = args.metric.parse()?;

    let images = collect_images(&args.paths);
    if images.is_empty() {
        bail!("no image files found");
    }
    println!("Found {} images", images.len());

    let embedder = build_embedder(args.embed_url.as_deref(), args.model.as_deref());
    let batch = embed_batch(&embedder, &images, args.concurrency).await;
    if batch.embedded_count() == 0 {
        bail!("no images could be embedded");
    }
    println!(
        "Embedded {} images ({} failed)",
        batch.embedded_count(),
        batch.failed().len()
    );

    let items = batch.embedded();
    let clusters = match algorithm {
        Algorithm::Similarity => cluster_by_similarity(&items, args.threshold, metric),
        Algorithm::Kmeans => cluster_by_kmeans(
            &items,
            &KMeansConfig {
                k: args.n_clusters,
                ..Default::default()
            },
        ),
    };

    let report = ClusterReport::new(clusters, batch.failed());
    report.print();

    if let Some(output) = args.output {
        let flag_format: OutputFormat = args
            .format
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))?;
        let format = OutputFormat::from_path(&output).unwrap_or(flag_format);
        let path = resolve_output_path(output, format);
        report.save(&path, format)?;
        println!("\nReport written to {}", path.display());
    }
    Ok(())
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
