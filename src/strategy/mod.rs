//! Blob retrieval strategies
//!
//! Five interchangeable ways of reading `path` as it existed in `commit`.
//! Verification and benchmarking only ever see `dyn BlobSource`.

mod gitoxide;
mod libgit2;
mod process;

pub use gitoxide::GixShow;
pub use libgit2::Git2Show;
pub use process::{GitShow, StdProcessShow, StreamedProcessShow, TokioProcessShow, MAX_OUTPUT};

use crate::error::RetrievalError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// The file every strategy reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub repo: PathBuf,
    pub commit: String,
    pub path: String,
}

impl BlobRef {
    /// `<commit>:<path>`, the object name `git show` expects
    pub fn object_spec(&self) -> String {
        format!("{}:{}", self.commit, self.path)
    }
}

/// One way of fetching the blob's bytes
///
/// Each call opens whatever handle it needs and releases it before
/// returning, on every path.
#[async_trait]
pub trait BlobSource: Send + Sync {
    /// Name shown in reports and errors
    fn name(&self) -> &'static str;

    /// Exact byte content of the blob
    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError>;
}

/// All five strategies, in verification order
pub fn all(blob: BlobRef) -> Vec<Box<dyn BlobSource>> {
    let blob = Arc::new(blob);
    let git = GitShow::locate(blob.clone());
    tracing::debug!(program = %git.program().display(), "git executable");

    vec![
        Box::new(Git2Show::new(blob.clone())),
        Box::new(GixShow::new(blob)),
        Box::new(TokioProcessShow::new(git.clone())),
        Box::new(StdProcessShow::new(git.clone())),
        Box::new(StreamedProcessShow::new(git)),
    ]
}

/// Run one fetch, optionally bounded by `timeout`
pub async fn fetch_with_timeout(
    source: &dyn BlobSource,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, RetrievalError> {
    let content = match timeout {
        Some(limit) => tokio::time::timeout(limit, source.fetch())
            .await
            .map_err(|_| RetrievalError::Timeout(limit))??,
        None => source.fetch().await?,
    };
    tracing::debug!(strategy = source.name(), bytes = content.len(), "fetched blob");
    Ok(content)
}
