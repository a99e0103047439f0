//! Cross-validation of every strategy against the expected digest

use crate::digest::digest;
use crate::error::{BenchError, Result};
use crate::strategy::{fetch_with_timeout, BlobSource};
use std::time::Duration;

/// Digest check for one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verified {
    pub strategy: &'static str,
    pub digest: String,
    pub bytes: usize,
}

/// Fetch and digest each source in order. The first retrieval error or
/// mismatch stops the run; later sources are never fetched.
pub async fn verify_all(
    sources: &[Box<dyn BlobSource>],
    expected: &str,
    timeout: Option<Duration>,
) -> Result<Vec<Verified>> {
    let mut verified = Vec::with_capacity(sources.len());

    for source in sources {
        let strategy = source.name();
        let content = fetch_with_timeout(source.as_ref(), timeout)
            .await
            .map_err(|e| BenchError::Retrieval {
                strategy,
                source: e,
            })?;

        let actual = digest(&content);
        if actual != expected {
            return Err(BenchError::DigestMismatch {
                strategy,
                expected: expected.to_string(),
                actual,
            });
        }

        tracing::info!(strategy, bytes = content.len(), "digest matches");
        verified.push(Verified {
            strategy,
            digest: actual,
            bytes: content.len(),
        });
    }

    Ok(verified)
}
