//! gitoxide, the pure-Rust git implementation

use super::{BlobRef, BlobSource};
use crate::error::RetrievalError;
use async_trait::async_trait;
use std::sync::Arc;

pub struct GixShow {
    blob: Arc<BlobRef>,
}

impl GixShow {
    pub fn new(blob: Arc<BlobRef>) -> Self {
        Self { blob }
    }
}

fn read_blob(blob: &BlobRef) -> Result<Vec<u8>, RetrievalError> {
    let repo = gix::open(&blob.repo).map_err(RetrievalError::gix)?;

    let commit = repo
        .rev_parse_single(blob.commit.as_str())
        .map_err(RetrievalError::gix)?
        .object()
        .map_err(RetrievalError::gix)?
        .peel_to_kind(gix::object::Kind::Commit)
        .map_err(RetrievalError::gix)?
        .into_commit();
    let tree = commit.tree().map_err(RetrievalError::gix)?;

    let mut buf = Vec::new();
    let entry = tree
        .lookup_entry_by_path(&blob.path, &mut buf)
        .map_err(RetrievalError::gix)?
        .ok_or_else(|| RetrievalError::PathNotFound {
            commit: blob.commit.clone(),
            path: blob.path.clone(),
        })?;

    // Trees and submodule commits have no blob content
    if entry.mode().is_tree() || entry.mode().is_commit() {
        return Err(RetrievalError::NotABlob {
            commit: blob.commit.clone(),
            path: blob.path.clone(),
        });
    }

    let mut object = entry
        .object()
        .map_err(RetrievalError::gix)?
        .try_into_blob()
        .map_err(RetrievalError::gix)?;
    Ok(std::mem::take(&mut object.data))
}

#[async_trait]
impl BlobSource for GixShow {
    fn name(&self) -> &'static str {
        "gix_show"
    }

    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let blob = self.blob.clone();
        tokio::task::spawn_blocking(move || read_blob(&blob)).await?
    }
}
