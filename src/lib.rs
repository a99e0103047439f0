//! blob-bench - cross-validation and benchmarking of git blob retrieval
//!
//! Five strategies read the same file at the same commit: libgit2, gitoxide
//! and three ways of running `git show`. `test` mode checks that they all
//! agree with an expected digest; `bench` mode times them one by one.

/// Error types
pub mod error;

/// `BENCH_*` environment configuration
pub mod config;

/// The five retrieval strategies
pub mod strategy;

pub mod digest;
pub mod verify;

/// Benchmark runner and statistics
pub mod runner;
pub mod report;

pub mod mode;

/// Fixture repositories for tests and benches
pub mod fixture;

pub use config::BenchConfig;
pub use error::{BenchError, RetrievalError};
pub use mode::Mode;
pub use strategy::{BlobRef, BlobSource};
