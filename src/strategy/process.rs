//! Strategies that shell out to `git show <commit>:<path>`
//!
//! All three share [`GitShow`] for the program, arguments and working
//! directory; they differ only in how the child is driven. stdout is
//! handled as raw bytes throughout.

use super::{BlobRef, BlobSource};
use crate::error::RetrievalError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::{ExitStatus, Output, Stdio};
use std::sync::Arc;
use tokio::io::AsyncReadExt;

/// Output cap for strategies that enforce one: 1 GiB
pub const MAX_OUTPUT: u64 = 1024 * 1024 * 1024;

/// `git show` invocation for one blob
#[derive(Debug, Clone)]
pub struct GitShow {
    program: PathBuf,
    blob: Arc<BlobRef>,
}

impl GitShow {
    /// Resolve `git` on PATH once. If it cannot be found the bare name is
    /// kept and the spawn error surfaces on the first fetch.
    pub fn locate(blob: Arc<BlobRef>) -> Self {
        let program = which::which("git").unwrap_or_else(|_| PathBuf::from("git"));
        Self::with_program(program, blob)
    }

    pub fn with_program(program: impl Into<PathBuf>, blob: Arc<BlobRef>) -> Self {
        Self {
            program: program.into(),
            blob,
        }
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// `--end-of-options` keeps a commit like `--output=x` from being
    /// parsed as a flag
    fn args(&self) -> [String; 3] {
        [
            "show".to_string(),
            "--end-of-options".to_string(),
            self.blob.object_spec(),
        ]
    }

    fn std_command(&self) -> std::process::Command {
        let mut cmd = std::process::Command::new(&self.program);
        cmd.args(self.args())
            .current_dir(&self.blob.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }

    fn tokio_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(self.args())
            .current_dir(&self.blob.repo)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    fn spawn_error(&self, source: std::io::Error) -> RetrievalError {
        RetrievalError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }

    fn check_status(&self, status: ExitStatus, stderr: &[u8]) -> Result<(), RetrievalError> {
        if status.success() {
            return Ok(());
        }
        Err(RetrievalError::Exit {
            object: self.blob.object_spec(),
            status,
            stderr: String::from_utf8_lossy(stderr).trim().to_string(),
        })
    }

    fn into_stdout(&self, output: Output) -> Result<Vec<u8>, RetrievalError> {
        self.check_status(output.status, &output.stderr)?;
        Ok(output.stdout)
    }
}

/// Awaits `tokio::process::Command::output`
pub struct TokioProcessShow {
    git: GitShow,
}

impl TokioProcessShow {
    pub fn new(git: GitShow) -> Self {
        Self { git }
    }
}

#[async_trait]
impl BlobSource for TokioProcessShow {
    fn name(&self) -> &'static str {
        "tokio_process_show"
    }

    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let output = self
            .git
            .tokio_command()
            .output()
            .await
            .map_err(|e| self.git.spawn_error(e))?;
        self.git.into_stdout(output)
    }
}

/// Plain `std::process::Command::output` on the blocking pool
pub struct StdProcessShow {
    git: GitShow,
}

impl StdProcessShow {
    pub fn new(git: GitShow) -> Self {
        Self { git }
    }
}

#[async_trait]
impl BlobSource for StdProcessShow {
    fn name(&self) -> &'static str {
        "std_process_show"
    }

    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let git = self.git.clone();
        tokio::task::spawn_blocking(move || {
            let output = git.std_command().output().map_err(|e| git.spawn_error(e))?;
            git.into_stdout(output)
        })
        .await?
    }
}

/// Spawns the child and streams stdout into a buffer capped at
/// [`MAX_OUTPUT`]. stderr is drained on its own task so neither pipe can
/// stall, and the child is killed as soon as stdout passes the cap.
pub struct StreamedProcessShow {
    git: GitShow,
    limit: u64,
}

impl StreamedProcessShow {
    pub fn new(git: GitShow) -> Self {
        Self {
            git,
            limit: MAX_OUTPUT,
        }
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }
}

#[async_trait]
impl BlobSource for StreamedProcessShow {
    fn name(&self) -> &'static str {
        "streamed_process_show"
    }

    async fn fetch(&self) -> Result<Vec<u8>, RetrievalError> {
        let mut child = self
            .git
            .tokio_command()
            .spawn()
            .map_err(|e| self.git.spawn_error(e))?;

        let stdout = child.stdout.take().ok_or_else(|| {
            RetrievalError::Io(std::io::Error::other("child stdout was not piped"))
        })?;
        let mut stderr = child.stderr.take().ok_or_else(|| {
            RetrievalError::Io(std::io::Error::other("child stderr was not piped"))
        })?;
        let drain_stderr = tokio::spawn(async move {
            let mut errors = Vec::new();
            stderr.read_to_end(&mut errors).await.map(|_| errors)
        });

        let mut content = Vec::new();
        // One byte past the limit tells "exactly at limit" from "over it"
        let mut limited = stdout.take(self.limit + 1);
        if let Err(e) = limited.read_to_end(&mut content).await {
            drain_stderr.abort();
            return Err(e.into());
        }

        if content.len() as u64 > self.limit {
            drain_stderr.abort();
            child.start_kill()?;
            child.wait().await?;
            return Err(RetrievalError::OutputTooLarge { limit: self.limit });
        }

        let status = child.wait().await?;
        let errors = drain_stderr.await??;
        self.git.check_status(status, &errors)?;
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn blob() -> Arc<BlobRef> {
        Arc::new(BlobRef {
            repo: std::env::temp_dir(),
            commit: "HEAD".to_string(),
            path: "README.md".to_string(),
        })
    }

    #[test]
    fn test_show_arguments() {
        let git = GitShow::with_program("git", blob());
        let cmd = git.std_command();
        assert_eq!(cmd.get_current_dir(), Some(std::env::temp_dir().as_path()));
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, ["show", "--end-of-options", "HEAD:README.md"]);
    }

    #[test]
    fn test_dash_commit_stays_after_end_of_options() {
        let blob = Arc::new(BlobRef {
            repo: std::env::temp_dir(),
            commit: "--output=/tmp/blob-bench-written".to_string(),
            path: "README.md".to_string(),
        });
        let args = GitShow::with_program("git", blob).args();
        assert_eq!(args[1], "--end-of-options");
        assert_eq!(args[2], "--output=/tmp/blob-bench-written:README.md");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let git = GitShow::with_program("/nonexistent/bin/git-does-not-exist", blob());
        let sources: Vec<Box<dyn BlobSource>> = vec![
            Box::new(TokioProcessShow::new(git.clone())),
            Box::new(StdProcessShow::new(git.clone())),
            Box::new(StreamedProcessShow::new(git)),
        ];
        for source in sources {
            let err = source.fetch().await.unwrap_err();
            assert!(
                matches!(err, RetrievalError::Spawn { .. }),
                "{}: {:?}",
                source.name(),
                err
            );
        }
    }

    #[test]
    fn test_limit_is_one_gib() {
        assert_eq!(MAX_OUTPUT, 1 << 30);
        let streamed = StreamedProcessShow::new(GitShow::with_program("git", blob()));
        assert_eq!(streamed.limit, MAX_OUTPUT);
    }

    // `yes` never exits on its own: the fetch must kill it once over the cap
    #[cfg(unix)]
    #[tokio::test]
    async fn test_endless_output_fails_over_limit() {
        let source =
            StreamedProcessShow::new(GitShow::with_program("yes", blob())).with_limit(1024);
        let result = tokio::time::timeout(Duration::from_secs(10), source.fetch())
            .await
            .expect("fetch did not stop at the output limit");
        assert!(
            matches!(result, Err(RetrievalError::OutputTooLarge { limit: 1024 })),
            "{:?}",
            result
        );
    }

    // `echo` prints its arguments, so the output size is known up front
    #[cfg(unix)]
    #[tokio::test]
    async fn test_output_exactly_at_limit_succeeds() {
        let git = GitShow::with_program("echo", blob());
        let expected = format!("{}\n", git.args().join(" "));
        let limit = expected.len() as u64;

        let at_limit = StreamedProcessShow::new(git.clone()).with_limit(limit);
        let content = tokio::time::timeout(Duration::from_secs(10), at_limit.fetch())
            .await
            .expect("fetch hung")
            .unwrap();
        assert_eq!(content, expected.as_bytes());

        let one_short = StreamedProcessShow::new(git).with_limit(limit - 1);
        let result = tokio::time::timeout(Duration::from_secs(10), one_short.fetch())
            .await
            .expect("fetch hung");
        assert!(
            matches!(result, Err(RetrievalError::OutputTooLarge { .. })),
            "{:?}",
            result
        );
    }
}
