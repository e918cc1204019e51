//! ft-dump: parse a FamiTracker text export and list what it contains.
//!
//! Usage:
//!   ft-dump song.txt
//!   ft-dump --strict --quiet song.txt
//!   ft-dump - < song.txt

mod dump;

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ft_formats::{read_module, ParseOptions};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ft-dump")]
#[command(about = "Parse a FamiTracker text export and dump the module")]
#[command(version)]
struct Cli {
    /// Text export to read, or `-` for stdin
    input: PathBuf,

    /// Exit with an error if any line was rejected
    #[arg(long)]
    strict: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Most elements any one container may hold
    #[arg(long)]
    limit: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let name = cli.input.display().to_string();
    let mut options = ParseOptions::default().with_source_name(name.as_str());
    if let Some(limit) = cli.limit {
        options = options.with_container_limit(limit);
    }

    let parsed = if name == "-" {
        read_module(io::stdin().lock(), options)
    } else {
        let file = File::open(&cli.input).with_context(|| format!("failed to open {name}"))?;
        read_module(BufReader::new(file), options)
    }
    .with_context(|| format!("failed to load {name}"))?;

    info!(
        songs = parsed.module.songs.len(),
        instruments = parsed.module.instruments.len(),
        envelopes = parsed.module.envelopes.len(),
        rejected = parsed.diagnostics.len(),
        "done parsing module"
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    dump::dump_module(&mut out, &parsed.module)?;
    dump::dump_diagnostics(&mut out, &name, &parsed.diagnostics)?;
    out.flush()?;

    if cli.strict && !parsed.is_clean() {
        bail!("{name}: {} line(s) rejected", parsed.diagnostics.len());
    }
    Ok(())
}
