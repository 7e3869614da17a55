//! studio-rag CLI
//!
//! Run with: cargo run -p studio-rag --bin studio-rag -- <command>

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use studio_rag::providers::OllamaClient;
use studio_rag::{
    Answer, BackendProvider, CodeGenerator, PipelineVariant, ProcessReport, ProviderSet,
    QnaPipeline, StudioConfig, Summarizer,
};

#[derive(Parser)]
#[command(
    name = "studio-rag",
    version,
    about = "Document and article QnA with citations, plus summarization and generation tools"
)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the local fallback backend instead of the hosted API
    #[arg(long, global = true)]
    local: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the document index from up to 3 files (PDF/DOCX/CSV/TXT/MD)
    ProcessDocs {
        /// Files to index
        files: Vec<PathBuf>,
    },
    /// Ask a question against the document index
    AskDocs {
        /// The question
        question: String,
    },
    /// Build the article index from up to 3 http(s) URLs
    ProcessUrls {
        /// Article URLs to index
        urls: Vec<String>,
    },
    /// Ask a question against the article index
    AskUrls {
        /// The question
        question: String,
    },
    /// Summarize raw text, an uploaded file, or an article URL
    Summarize {
        /// Raw text to summarize
        #[arg(long, conflicts_with_all = ["file", "url"])]
        text: Option<String>,
        /// File to summarize
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,
        /// Article URL to summarize
        #[arg(long)]
        url: Option<String>,
    },
    /// Extract text from an image via OCR
    ExtractImage {
        /// Image file
        image: PathBuf,
    },
    /// Generate code from a natural-language request
    GenerateCode {
        /// What the code should do
        request: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "studio_rag=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = StudioConfig::load(cli.config.as_deref())?;
    if cli.local {
        config.backend = BackendProvider::Local;
    }

    if config.backend == BackendProvider::Local {
        let client = OllamaClient::new(&config.local);
        if !client.health_check().await {
            tracing::warn!("Ollama not reachable at {}", config.local.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Pull models with: ollama pull {} && ollama pull {}",
                config.local.embed_model,
                config.local.generate_model
            );
        }
    }

    let providers = ProviderSet::from_config(&config)?;

    match cli.command {
        Command::ProcessDocs { files } => {
            let pipeline =
                QnaPipeline::new(&config, providers, PipelineVariant::Documents)?;
            let report = pipeline.process_files(&read_files(&files)?).await?;
            print_report(&report);
        }
        Command::AskDocs { question } => {
            let pipeline =
                QnaPipeline::new(&config, providers, PipelineVariant::Documents)?;
            let answer = pipeline.ask(&question).await?;
            print_answer(&answer);
        }
        Command::ProcessUrls { urls } => {
            let pipeline = QnaPipeline::new(&config, providers, PipelineVariant::Articles)?;
            let report = pipeline.process_urls(&urls).await?;
            print_report(&report);
        }
        Command::AskUrls { question } => {
            let pipeline = QnaPipeline::new(&config, providers, PipelineVariant::Articles)?;
            let answer = pipeline.ask(&question).await?;
            print_answer(&answer);
        }
        Command::Summarize { text, file, url } => {
            let summarizer = Summarizer::new(&config, providers)?;
            let summary = if let Some(text) = text {
                summarizer.summarize_text(&text).await?
            } else if let Some(path) = file {
                let bytes = std::fs::read(&path)?;
                summarizer.summarize_file(&display_name(&path), &bytes).await?
            } else if let Some(url) = url {
                summarizer.summarize_url(&url).await?
            } else {
                anyhow::bail!("provide one of --text, --file, or --url");
            };
            println!("{}", summary);
        }
        Command::ExtractImage { image } => {
            let summarizer = Summarizer::new(&config, providers)?;
            let bytes = std::fs::read(&image)?;
            match summarizer.extract_image_text(&bytes)? {
                Some(text) => println!("{}", text),
                None => println!("No text could be extracted from the image."),
            }
        }
        Command::GenerateCode { request } => {
            let generator = CodeGenerator::new(&config, providers);
            let code = generator.generate(&request).await?;
            println!("{}", code);
        }
    }

    Ok(())
}

/// Read each file into (name, bytes) pairs for the loader
fn read_files(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, Vec<u8>)>> {
    if paths.is_empty() {
        anyhow::bail!("provide at least one file to process");
    }
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let bytes = std::fs::read(path)?;
        files.push((display_name(path), bytes));
    }
    Ok(files)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_report(report: &ProcessReport) {
    println!(
        "Indexed {} chunks from {} sources in {} ms",
        report.total_chunks,
        report.documents.len(),
        report.processing_time_ms
    );
    for doc in &report.documents {
        println!("  {} ({} chunks)", doc.identifier, doc.chunks);
    }
    for skipped in &report.skipped {
        println!("  skipped: {}", skipped);
    }
}

fn print_answer(answer: &Answer) {
    println!("{}\n", answer.text);
    if !answer.sources.is_empty() {
        println!("Sources:");
        for source in &answer.sources {
            println!("  - {}", source);
        }
    }
}
