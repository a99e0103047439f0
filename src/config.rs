//! Benchmark configuration
//!
//! All five `BENCH_*` variables are required. The record is built once at
//! startup and handed to whatever needs it.

use crate::error::{BenchError, Result};
use crate::strategy::BlobRef;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_REPO: &str = "BENCH_REPO";
pub const ENV_COMMIT: &str = "BENCH_COMMIT";
pub const ENV_PATH: &str = "BENCH_PATH";
pub const ENV_MD5: &str = "BENCH_MD5";
pub const ENV_COUNT: &str = "BENCH_COUNT";

/// Fixture and budget read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    /// Repository root (work tree)
    pub repo: PathBuf,
    /// Commit to read the file from
    pub commit: String,
    /// File path relative to the repository root
    pub path: String,
    /// Expected lowercase hex MD5 of the file content
    pub expected_md5: String,
    /// Bench budget, parsed by [`BenchConfig::budget`]
    pub count: String,
}

impl BenchConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the configuration through `lookup`, failing on the first
    /// variable that is unset or empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &'static str| -> Result<String> {
            match lookup(name) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(BenchError::MissingEnv(name)),
            }
        };

        Ok(Self {
            repo: PathBuf::from(get(ENV_REPO)?),
            commit: get(ENV_COMMIT)?,
            path: get(ENV_PATH)?,
            expected_md5: get(ENV_MD5)?,
            count: get(ENV_COUNT)?,
        })
    }

    /// The (repo, commit, path) triple every strategy reads
    pub fn blob_ref(&self) -> BlobRef {
        BlobRef {
            repo: self.repo.clone(),
            commit: self.commit.clone(),
            path: self.path.clone(),
        }
    }

    /// Measurement time per strategy: `BENCH_COUNT` milliseconds
    pub fn budget(&self) -> Result<Duration> {
        self.count
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| BenchError::InvalidBudget {
                value: self.count.clone(),
            })
    }
}
