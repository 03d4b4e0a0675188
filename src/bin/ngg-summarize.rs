use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rapid_ngg::io::{CorpusReader, SummaryWriter};
use rapid_ngg::pipeline::observer::StageTimingObserver;
use rapid_ngg::{SummarizationPipeline, SummarizerConfig};

#[derive(Parser, Debug)]
#[command(
    name = "ngg-summarize",
    version,
    about = "Summarize a directory of documents with n-gram graphs"
)]
struct Cli {
    /// Directory holding the input documents
    input_dir: PathBuf,

    /// Directory receiving one `<event id>.txt` summary per event
    output_dir: PathBuf,

    /// Path to config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Extension of the files to read, without the dot
    #[arg(long, default_value = "txt")]
    extension: String,

    /// Worker threads (overrides the config file)
    #[arg(long)]
    threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // 1) Load config
    let mut config = match &cli.config {
        Some(path) => SummarizerConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SummarizerConfig::default(),
    };
    if cli.threads.is_some() {
        config.runtime.parallelism = cli.threads;
    }
    let config = config.validated()?;

    // 2) Read corpus
    let documents = CorpusReader::new()
        .with_extension(cli.extension.as_str())
        .read(&cli.input_dir)
        .with_context(|| format!("reading {}", cli.input_dir.display()))?;
    if documents.is_empty() {
        tracing::warn!(dir = %cli.input_dir.display(), "no documents found");
    }

    // 3) Summarize
    let mut observer = StageTimingObserver::new();
    let summary = SummarizationPipeline::from_config(&config).run(&documents, &mut observer)?;
    for (stage, report) in observer.reports() {
        tracing::debug!(stage, elapsed_ms = report.elapsed().as_secs_f64() * 1e3, "stage timing");
    }

    // 4) Write one file per event; failed writes are already logged
    let report = SummaryWriter::new(&cli.output_dir).write(&summary)?;
    tracing::info!(
        events = summary.len(),
        written = report.written.len(),
        failed = report.failed.len(),
        out = %cli.output_dir.display(),
        "summaries written"
    );

    Ok(())
}
