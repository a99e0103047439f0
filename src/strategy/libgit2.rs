//! libgit2 through the `git2` binding

use super::{BlobRef, BlobSource};
use crate::error::RetrievalError;
use async_trait::async_trait;
use git2::Repository;
use std::path::Path;
use std::sync::Arc;

pub struct Git2Show {
    blob: Arc<BlobRef>,
}

impl Git2Show {
    pub fn new(blob: Arc<BlobRef>) -> Self {
        Self { blob }
    }
}

/// Open the repository, resolve the commit and copy out the blob.
/// The `Repository` is dropped before this returns.
fn read_blob(blob: &BlobRef) -> Result<Vec<u8>, RetrievalError> {
    let repo = Repository::open(&blob.repo)?;
    let commit = repo.revparse_single(&blob.commit)?.peel_to_commit()?;
    let tree = commit.tree()?;

    let entry = match tree.get_path(Path::new(&blob.path)) {
        Ok(entry) => entry,
        Err(e) if e.code() == git2::ErrorCode::NotFound => {
            return Err(RetrievalError::PathNotFound {
                commit: blob.commit.clone(),
                path: blob.path.clone(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let object = entry.to_object(&repo)?;
    let content = match object.as_blob() {
        Some(b) => b.content().to_vec(),
        None => {
            return Err(RetrievalError::NotABlob {
                commit: blob.commit.clone(),
                path: blob.path.clone(),
            })
        }
    };
    Ok(content)
}

#[async_trait]
impl BlobSource for Git2Show {
    fn name(&self) -> &'static str {
        "git2_show"
    }

    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let blob = self.blob.clone();
        tokio::task::spawn_blocking(move || read_blob(&blob)).await?
    }
}
