//! Every strategy against real fixture repositories

use blob_bench::digest::digest;
use blob_bench::fixture::{git_available, FixtureRepo};
use blob_bench::strategy::{self, BlobSource};
use blob_bench::RetrievalError;

const HELLO_MD5: &str = "b1946ac92492d2347c6235b4d2611184";

fn sources_for(fixture: &FixtureRepo, commit: &str, path: &str) -> Vec<Box<dyn BlobSource>> {
    strategy::all(fixture.blob_ref(commit, path))
}

macro_rules! require_git {
    () => {
        if !git_available() {
            eprintln!("skipping: no git executable on PATH");
            return;
        }
    };
}

#[tokio::test]
async fn all_strategies_return_identical_bytes() {
    require_git!();
    let fixture = FixtureRepo::with_files(&[("README.md", b"hello\n")]).unwrap();
    let commit = &fixture.commits()[0];

    for source in sources_for(&fixture, commit, "README.md") {
        let content = source.fetch().await.unwrap();
        assert_eq!(content, b"hello\n", "{}", source.name());
        assert_eq!(digest(&content), HELLO_MD5, "{}", source.name());
    }
}

#[tokio::test]
async fn bytes_are_not_normalized() {
    require_git!();
    // CRLF, no trailing newline, NUL and high bytes
    let content: &[u8] = b"line one\r\nline two\r\n\x00\xff\xfe tail";
    let fixture = FixtureRepo::with_files(&[("data/raw.bin", content)]).unwrap();
    let commit = &fixture.commits()[0];

    for source in sources_for(&fixture, commit, "data/raw.bin") {
        let fetched = source.fetch().await.unwrap();
        assert_eq!(fetched, content, "{}", source.name());
    }
}

#[tokio::test]
async fn empty_file_is_empty_not_an_error() {
    require_git!();
    let fixture = FixtureRepo::with_files(&[("empty", b"")]).unwrap();
    let commit = &fixture.commits()[0];

    for source in sources_for(&fixture, commit, "empty") {
        let fetched = source.fetch().await.unwrap();
        assert!(fetched.is_empty(), "{}", source.name());
    }
}

#[tokio::test]
async fn reads_content_as_of_the_given_commit() {
    require_git!();
    let mut fixture = FixtureRepo::with_files(&[("README.md", "hello\n")]).unwrap();
    let first = fixture.commits()[0].clone();
    fixture.commit(&[("README.md", "changed\n")], "edit").unwrap();

    for source in sources_for(&fixture, &first, "README.md") {
        assert_eq!(source.fetch().await.unwrap(), b"hello\n", "{}", source.name());
    }
    for source in sources_for(&fixture, "HEAD", "README.md") {
        assert_eq!(source.fetch().await.unwrap(), b"changed\n", "{}", source.name());
    }
}

#[tokio::test]
async fn unknown_commit_fails_everywhere() {
    require_git!();
    let fixture = FixtureRepo::with_files(&[("README.md", b"hello\n")]).unwrap();

    for commit in ["deadbeefdeadbeefdeadbeefdeadbeefdeadbeef", "no-such-branch"] {
        for source in sources_for(&fixture, commit, "README.md") {
            let result = source.fetch().await;
            assert!(result.is_err(), "{} accepted commit {}", source.name(), commit);
        }
    }
}

#[tokio::test]
async fn dash_commit_is_not_a_git_option() {
    require_git!();
    let fixture = FixtureRepo::with_files(&[("README.md", b"hello\n")]).unwrap();
    let written = fixture.path().join("leaked");
    let commit = format!("--output={}", written.display());

    for source in sources_for(&fixture, &commit, "README.md") {
        assert!(source.fetch().await.is_err(), "{} accepted {}", source.name(), commit);
    }
    assert!(!written.exists());
    assert!(!fixture.path().join("leaked:README.md").exists());
}

#[tokio::test]
async fn missing_path_fails_everywhere() {
    require_git!();
    let fixture = FixtureRepo::with_files(&[("README.md", b"hello\n")]).unwrap();
    let commit = &fixture.commits()[0];

    for source in sources_for(&fixture, commit, "does/not/exist.txt") {
        let err = source.fetch().await.unwrap_err();
        match source.name() {
            "git2_show" | "gix_show" => {
                assert!(
                    matches!(err, RetrievalError::PathNotFound { .. }),
                    "{}: {:?}",
                    source.name(),
                    err
                );
            }
            _ => {
                assert!(
                    matches!(err, RetrievalError::Exit { .. }),
                    "{}: {:?}",
                    source.name(),
                    err
                );
            }
        }
    }
}

#[tokio::test]
async fn in_process_strategies_reject_directories() {
    let fixture = FixtureRepo::with_files(&[("docs/guide.txt", b"guide")]).unwrap();
    let commit = &fixture.commits()[0];

    for source in sources_for(&fixture, commit, "docs").into_iter().take(2) {
        let err = source.fetch().await.unwrap_err();
        assert!(
            matches!(err, RetrievalError::NotABlob { .. }),
            "{}: {:?}",
            source.name(),
            err
        );
    }
}

#[tokio::test]
async fn in_process_strategies_work_without_git() {
    let fixture = FixtureRepo::with_files(&[("README.md", b"hello\n")]).unwrap();
    let commit = &fixture.commits()[0];

    let sources = sources_for(&fixture, commit, "README.md");
    for source in sources.iter().take(2) {
        assert_eq!(source.fetch().await.unwrap(), b"hello\n", "{}", source.name());
    }
}

#[tokio::test]
async fn not_a_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blob = blob_bench::BlobRef {
        repo: dir.path().join("nowhere"),
        commit: "HEAD".to_string(),
        path: "README.md".to_string(),
    };

    for source in strategy::all(blob) {
        assert!(source.fetch().await.is_err(), "{}", source.name());
    }
}
