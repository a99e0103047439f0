//! Benchmark runner
//!
//! Strategies are measured one after another, never interleaved. Each one
//! keeps running until both the time budget is spent and the minimum
//! sample count is reached.

use crate::error::{BenchError, Result, RetrievalError};
use crate::report::{BenchReport, TaskResult};
use crate::strategy::{fetch_with_timeout, BlobSource};
use std::time::{Duration, Instant};

/// Knobs for one `bench` run
#[derive(Debug, Clone)]
pub struct BenchOptions {
    /// Measurement time per strategy
    pub time: Duration,
    /// Timed samples required even when `time` has run out
    pub min_iterations: u64,
    /// Untimed calls before measuring
    pub warmup_iterations: u64,
    /// Per-fetch timeout; `None` waits forever
    pub timeout: Option<Duration>,
}

impl BenchOptions {
    pub fn new(time: Duration) -> Self {
        Self {
            time,
            min_iterations: 10,
            warmup_iterations: 0,
            timeout: None,
        }
    }
}

/// Summary statistics over per-call times, in microseconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Statistics {
    pub samples: u64,
    pub mean: f64,
    /// Sample variance (n - 1), zero for fewer than two samples
    pub variance: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl Statistics {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self {
                samples: 0,
                mean: 0.0,
                variance: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
            };
        }

        let micros: Vec<f64> = samples.iter().map(|d| d.as_secs_f64() * 1e6).collect();
        let n = micros.len() as f64;
        let mean = micros.iter().sum::<f64>() / n;
        let variance = if micros.len() > 1 {
            micros.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };

        Self {
            samples: micros.len() as u64,
            mean,
            variance,
            std_dev: variance.sqrt(),
            min: micros.iter().copied().fold(f64::INFINITY, f64::min),
            max: micros.iter().copied().fold(0.0, f64::max),
        }
    }
}

/// Time one source. An error in any call, warmup included, ends the run.
pub async fn bench_one(source: &dyn BlobSource, options: &BenchOptions) -> Result<TaskResult> {
    let strategy = source.name();
    let retrieval = |e: RetrievalError| BenchError::Retrieval {
        strategy,
        source: e,
    };

    for _ in 0..options.warmup_iterations {
        fetch_with_timeout(source, options.timeout)
            .await
            .map_err(retrieval)?;
    }

    let mut samples = Vec::new();
    let start = Instant::now();
    while start.elapsed() < options.time || (samples.len() as u64) < options.min_iterations {
        let call = Instant::now();
        fetch_with_timeout(source, options.timeout)
            .await
            .map_err(retrieval)?;
        samples.push(call.elapsed());
    }
    let total = start.elapsed();

    let stats = Statistics::from_samples(&samples);
    tracing::info!(
        strategy,
        samples = stats.samples,
        mean_us = stats.mean,
        "benchmark finished"
    );
    Ok(TaskResult::new(strategy, stats, total))
}

/// Time every source in order
pub async fn run_all(
    sources: &[Box<dyn BlobSource>],
    options: &BenchOptions,
) -> Result<BenchReport> {
    let mut tasks = Vec::with_capacity(sources.len());
    for source in sources {
        tasks.push(bench_one(source.as_ref(), options).await?);
    }
    Ok(BenchReport { tasks })
}
