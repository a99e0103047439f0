//! Error types
//!
//! `BenchError` is what the harness reports; `RetrievalError` is whatever a
//! strategy's collaborator reported, kept intact as the source.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single `fetch()` call
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    Git2(#[from] git2::Error),

    #[error(transparent)]
    Gix(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("path {path:?} does not exist in commit {commit}")]
    PathNotFound { commit: String, path: String },

    #[error("{path:?} in commit {commit} is not a blob")]
    NotABlob { commit: String, path: String },

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("`git show {object}` failed with {status}: {stderr}")]
    Exit {
        object: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("output exceeded {limit} bytes")]
    OutputTooLarge { limit: u64 },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl RetrievalError {
    /// Box any gitoxide error; gix has one error type per call site.
    pub fn gix<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Gix(Box::new(err))
    }
}

/// Everything that can stop a `test` or `bench` run
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("env {0} is not set")]
    MissingEnv(&'static str),

    #[error("invalid benchmark budget {value:?}: expected a whole number of milliseconds")]
    InvalidBudget { value: String },

    #[error("{strategy}: {source}")]
    Retrieval {
        strategy: &'static str,
        #[source]
        source: RetrievalError,
    },

    #[error("{strategy}: digest mismatch, expected {expected}, got {actual}")]
    DigestMismatch {
        strategy: &'static str,
        expected: String,
        actual: String,
    },

    #[error("unrecognized mode {}, expected `test` or `bench`", display_mode(.0))]
    UnrecognizedMode(Option<String>),
}

fn display_mode(mode: &Option<String>) -> String {
    match mode {
        Some(mode) => format!("{:?}", mode),
        None => "(none)".to_string(),
    }
}

pub type Result<T, E = BenchError> = std::result::Result<T, E>;
