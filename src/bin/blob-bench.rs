//! blob-bench CLI tool
//!
//! `blob-bench test` checks all five strategies against BENCH_MD5,
//! `blob-bench bench` times them.

use anyhow::Result;
use blob_bench::runner::{self, BenchOptions};
use blob_bench::{strategy, verify, BenchConfig, Mode};
use clap::{Parser, ValueEnum};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blob-bench")]
#[command(about = "Cross-validate and benchmark five ways of reading a git blob")]
struct Cli {
    /// `test` or `bench`
    mode: Option<String>,
    /// Untimed fetches per strategy before measuring
    #[arg(long, default_value_t = 0)]
    warmup: u64,
    /// Timed fetches per strategy even after BENCH_COUNT ms have passed
    #[arg(long, default_value_t = 10)]
    min_iterations: u64,
    /// Fail any single fetch that takes longer than this
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Report format for `bench`
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // BENCH_* may come from a .env file; real environment wins
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Configuration first: a missing variable fails before anything else
    let config = BenchConfig::from_env()?;
    let mode = Mode::from_arg(cli.mode.as_deref())?;
    let timeout = cli.timeout_ms.map(Duration::from_millis);
    tracing::debug!(?config, %mode, "starting");

    let sources = strategy::all(config.blob_ref());

    match mode {
        Mode::Test => {
            let verified = verify::verify_all(&sources, &config.expected_md5, timeout).await?;
            for v in &verified {
                println!("ok {} {} ({} bytes)", v.strategy, v.digest, v.bytes);
            }
            println!(
                "✅ all {} strategies match {}",
                verified.len(),
                config.expected_md5
            );
        }
        Mode::Bench => {
            let options = BenchOptions {
                time: config.budget()?,
                min_iterations: cli.min_iterations,
                warmup_iterations: cli.warmup,
                timeout,
            };
            let report = runner::run_all(&sources, &options).await?;
            match cli.format {
                Format::Table => println!("{}", report),
                Format::Json => println!("{}", report.to_json()?),
            }
        }
    }

    Ok(())
}
