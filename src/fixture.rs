//! Throwaway git repositories for tests and benches

use crate::strategy::BlobRef;
use anyhow::{Context, Result};
use git2::{Repository, Signature};
use std::path::Path;
use tempfile::TempDir;

/// A repository in a temporary directory, removed on drop
pub struct FixtureRepo {
    dir: TempDir,
    commits: Vec<String>,
}

impl FixtureRepo {
    /// Initialise an empty repository
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("Failed to create fixture directory")?;
        Repository::init(dir.path())
            .with_context(|| format!("Failed to init repository in {}", dir.path().display()))?;
        Ok(Self {
            dir,
            commits: Vec::new(),
        })
    }

    /// Repository with a single commit holding `files`
    pub fn with_files<C: AsRef<[u8]>>(files: &[(&str, C)]) -> Result<Self> {
        let mut fixture = Self::new()?;
        fixture.commit(files, "initial")?;
        Ok(fixture)
    }

    /// Work tree root
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Commit ids in creation order
    pub fn commits(&self) -> &[String] {
        &self.commits
    }

    /// Write `files` into the work tree and commit them on top of HEAD.
    /// Returns the new commit id.
    pub fn commit<C: AsRef<[u8]>>(
        &mut self,
        files: &[(&str, C)],
        message: &str,
    ) -> Result<String> {
        let repo = Repository::open(self.dir.path())?;
        let mut index = repo.index()?;

        for (path, content) in files {
            let full = self.dir.path().join(path);
            if let Some(parent) = full.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&full, content.as_ref())
                .with_context(|| format!("Failed to write {}", full.display()))?;
            index.add_path(Path::new(path))?;
        }
        index.write()?;

        let tree = repo.find_tree(index.write_tree()?)?;
        let signature = Signature::now("blob-bench", "blob-bench@example.invalid")?;
        let parent = match repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(_) => None,
        };
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let oid = repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)?;
        let id = oid.to_string();
        self.commits.push(id.clone());
        Ok(id)
    }

    pub fn blob_ref(&self, commit: &str, path: &str) -> BlobRef {
        BlobRef {
            repo: self.path().to_path_buf(),
            commit: commit.to_string(),
            path: path.to_string(),
        }
    }
}

/// Whether a `git` executable is on PATH
pub fn git_available() -> bool {
    which::which("git").is_ok()
}
