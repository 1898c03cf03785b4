use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use retrieval::persist::{load_index, save_index, IndexPaths};
use retrieval::queries::{format_results, parse_query_file};
use retrieval::report::CollectionReport;
use retrieval::trec::ingest_trec;
use retrieval::{BooleanRetrieval, InvertedIndex};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;
use zip::ZipArchive;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build a Boolean inverted index and answer RPN queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from TREC files or zip archives of them (a file or a directory)
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output index directory
        #[arg(long)]
        output: String,
    },
    /// Answer every query in a query file, one result line per query
    Query {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// Query file, one RPN query per line
        #[arg(long)]
        queries: String,
        /// Results file
        #[arg(long)]
        output: String,
    },
    /// Write the document-frequency report
    Stats {
        /// Index directory
        #[arg(long, default_value = "./index")]
        index: String,
        /// Report file
        #[arg(long)]
        output: String,
        /// Number of terms listed at each end of the ranking
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
    /// Build, save, query and report in one pass
    Run {
        #[arg(long)]
        input: String,
        #[arg(long, default_value = "./index")]
        index: String,
        #[arg(long)]
        queries: String,
        #[arg(long)]
        results: String,
        #[arg(long)]
        stats: String,
        #[arg(long, default_value_t = 10)]
        top: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => {
            let index = build_index(Path::new(&input))?;
            save_index(&IndexPaths::new(&output), &index, &now_rfc3339())
        }
        Commands::Query { index, queries, output } => {
            let index = load_index(&IndexPaths::new(&index))?;
            answer_queries(&index, Path::new(&queries), Path::new(&output))
        }
        Commands::Stats { index, output, top } => {
            let index = load_index(&IndexPaths::new(&index))?;
            write_report(&index, Path::new(&output), top)
        }
        Commands::Run { input, index, queries, results, stats, top } => {
            let built = build_index(Path::new(&input))?;
            save_index(&IndexPaths::new(&index), &built, &now_rfc3339())?;
            answer_queries(&built, Path::new(&queries), Path::new(&results))?;
            write_report(&built, Path::new(&stats), top)
        }
    }
}

fn now_rfc3339() -> String {
    time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_default()
}

/// Regular files under `input`, sorted so internal ids are reproducible.
fn collect_files(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

fn is_zip(path: &str) -> bool {
    Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
}

/// Ingest every entry of a zip archive in archive order. Directories and
/// nested archives are skipped.
fn ingest_zip(index: &mut InvertedIndex, path: &Path) -> Result<usize> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = ZipArchive::new(file)
        .with_context(|| format!("reading zip archive {}", path.display()))?;

    let mut ingested = 0;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() || is_zip(entry.name()) {
            tracing::debug!(entry = entry.name(), "skipping zip entry");
            continue;
        }
        let mut bytes = Vec::new();
        entry
            .read_to_end(&mut bytes)
            .with_context(|| format!("reading {} from {}", entry.name(), path.display()))?;
        ingested += ingest_trec(index, &String::from_utf8_lossy(&bytes));
    }
    Ok(ingested)
}

fn build_index(input: &Path) -> Result<InvertedIndex> {
    let files = collect_files(input);
    tracing::info!(num_files = files.len(), input = %input.display(), "building index");

    let mut index = InvertedIndex::new();
    for file in &files {
        let ingested = if is_zip(&file.to_string_lossy()) {
            ingest_zip(&mut index, file)?
        } else {
            let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
            ingest_trec(&mut index, &String::from_utf8_lossy(&bytes))
        };
        tracing::debug!(path = %file.display(), ingested, "file processed");
    }

    tracing::info!(
        num_docs = index.collection_size(),
        num_terms = index.vocabulary_size(),
        "ingested documents"
    );
    Ok(index)
}

fn answer_queries(index: &InvertedIndex, queries: &Path, output: &Path) -> Result<()> {
    let content = fs::read_to_string(queries)
        .with_context(|| format!("reading queries from {}", queries.display()))?;
    let br = BooleanRetrieval::new(index);

    let results: Vec<Vec<String>> = parse_query_file(&content)
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let hits = br.retrieve(q);
            tracing::info!(query_no = i + 1, query = %q, hits = hits.len(), "query processed");
            hits
        })
        .collect();

    fs::write(output, format_results(&results))
        .with_context(|| format!("writing results to {}", output.display()))?;
    tracing::info!(output = %output.display(), num_queries = results.len(), "results written");
    Ok(())
}

fn write_report(index: &InvertedIndex, output: &Path, top: usize) -> Result<()> {
    let report = CollectionReport::build(index, top);
    fs::write(output, report.render())
        .with_context(|| format!("writing report to {}", output.display()))?;
    tracing::info!(output = %output.display(), "statistics written");
    Ok(())
}
