use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use dgml_chunker::{Chunk, ChunkingConfig, corpus, get_chunks_str};
use serde::Serialize;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "dgml-chunk")]
#[command(about = "Split DGML documents into size-bounded, structure-aware chunks")]
#[command(version)]
struct Cli {
    /// DGML files or directories to chunk
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum chunk length before merging forward
    #[arg(long)]
    min_text_length: Option<usize>,

    /// Maximum chunk length in characters
    #[arg(long)]
    max_text_length: Option<usize>,

    /// Keep whitespace exactly as in the source
    #[arg(long)]
    no_normalize: bool,

    /// Descend into tables
    #[arg(long)]
    sub_chunk_tables: bool,

    /// Render plain text with neighbour-window context
    #[arg(long)]
    text_mode: bool,

    /// Ancestor depth (xml mode) or window radius (text mode)
    #[arg(long)]
    parent_hierarchy_levels: Option<usize>,

    /// Emit nothing for documents without structure markers
    #[arg(long)]
    no_fallback: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Json)]
    format: Format,

    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    /// One JSON array of chunks per file
    Json,
    /// One chunk per line, tagged with its source path
    Jsonl,
    /// Counts and length statistics
    Summary,
}

#[derive(Serialize)]
struct FileChunks<'a> {
    path: String,
    chunks: &'a [Chunk],
}

#[derive(Serialize)]
struct ChunkLine<'a> {
    path: &'a str,
    #[serde(flatten)]
    chunk: &'a Chunk,
}

impl Cli {
    /// Defaults, then the config file, then flags
    fn chunking_config(&self) -> Result<ChunkingConfig> {
        let mut config = match &self.config {
            Some(path) => ChunkingConfig::from_json_file(path)?,
            None => ChunkingConfig::default(),
        };

        if let Some(min) = self.min_text_length {
            config.min_text_length = min;
        }
        if let Some(max) = self.max_text_length {
            config.max_text_length = max;
        }
        if let Some(levels) = self.parent_hierarchy_levels {
            config.parent_hierarchy_levels = levels;
        }
        if self.no_normalize {
            config.whitespace_normalize_text = false;
        }
        if self.sub_chunk_tables {
            config.sub_chunk_tables = true;
        }
        if self.text_mode {
            config.xml_mode = false;
        }
        if self.no_fallback {
            config.whole_document_fallback = false;
        }

        config.validate().context("Invalid chunking options")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = cli.chunking_config()?;
    let files = corpus::discover(&cli.paths)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut stats = Stats::default();

    for path in &files {
        let start = Instant::now();
        let xml = match fs::read_to_string(path) {
            Ok(xml) => xml,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                stats.skipped += 1;
                continue;
            }
        };

        let chunks = match get_chunks_str(&xml, &config) {
            Ok(chunks) => chunks,
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                stats.skipped += 1;
                continue;
            }
        };

        info!(
            "{}: {} chunks [{:.3}s]",
            path.display(),
            chunks.len(),
            start.elapsed().as_secs_f64()
        );

        let display = path.display().to_string();
        match cli.format {
            Format::Json => {
                let record = FileChunks {
                    path: display,
                    chunks: &chunks,
                };
                serde_json::to_writer_pretty(&mut out, &record)
                    .context("Failed to write JSON output")?;
                writeln!(out)?;
            }
            Format::Jsonl => {
                for chunk in &chunks {
                    let line = ChunkLine {
                        path: &display,
                        chunk,
                    };
                    serde_json::to_writer(&mut out, &line)
                        .context("Failed to write JSON output")?;
                    writeln!(out)?;
                }
            }
            Format::Summary => stats.record(&chunks),
        }
    }

    if let Format::Summary = cli.format {
        stats.print(&mut out, files.len())?;
    }

    out.flush()?;
    Ok(())
}

#[derive(Default)]
struct Stats {
    documents: usize,
    skipped: usize,
    chunks: usize,
    total_len: usize,
    min_len: Option<usize>,
    max_len: usize,
    with_context: usize,
}

impl Stats {
    fn record(&mut self, chunks: &[Chunk]) {
        self.documents += 1;
        for chunk in chunks {
            let len = chunk.text_len();
            self.chunks += 1;
            self.total_len += len;
            self.min_len = Some(self.min_len.map_or(len, |m| m.min(len)));
            self.max_len = self.max_len.max(len);
            if chunk.parent.is_some() {
                self.with_context += 1;
            }
        }
    }

    fn print(&self, out: &mut impl Write, discovered: usize) -> Result<()> {
        writeln!(out, "=== Chunking Statistics ===")?;
        writeln!(out, "Files discovered:     {}", discovered)?;
        writeln!(out, "Documents chunked:    {}", self.documents)?;
        writeln!(out, "Files skipped:        {}", self.skipped)?;
        writeln!(out, "Total chunks:         {}", self.chunks)?;
        writeln!(out, "Chunks with context:  {}", self.with_context)?;
        writeln!(out, "Min chunk length:     {}", self.min_len.unwrap_or(0))?;
        writeln!(out, "Max chunk length:     {}", self.max_len)?;
        writeln!(
            out,
            "Avg chunk length:     {:.1}",
            if self.chunks > 0 {
                self.total_len as f64 / self.chunks as f64
            } else {
                0.0
            }
        )?;
        Ok(())
    }
}
