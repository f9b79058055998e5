use std::path::{Path, PathBuf};

use tokio::process::Command;

pub const COMMIT_MESSAGE: &str = "chore: update stream URLs [automated]";

// Identity used when none is configured, matching the scheduler's bot user
const BOT_NAME: &str = "github-actions[bot]";
const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

#[derive(thiserror::Error, Debug)]
pub enum GitError {
    #[error("not a file path: {0}")]
    BadPath(PathBuf),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("git {op} failed: {stderr}")]
    CommandFailed { op: &'static str, stderr: String },
    #[error("git push failed: {stderr}")]
    PushFailed { stderr: String },
}

/// Porcelain driver scoped to one tracked file. Commands run from the
/// file's directory; git discovers the repository from there.
pub struct Repo {
    workdir: PathBuf,
    file: PathBuf,
}

impl Repo {
    pub fn for_file(path: &Path) -> Result<Repo, GitError> {
        let file = path
            .file_name()
            .map(PathBuf::from)
            .ok_or_else(|| GitError::BadPath(path.to_path_buf()))?;
        let workdir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Repo { workdir, file })
    }

    async fn output(&self, args: &[&str]) -> std::io::Result<std::process::Output> {
        Command::new("git")
            .current_dir(&self.workdir)
            .args(args)
            .output()
            .await
    }

    async fn run(&self, op: &'static str, args: &[&str]) -> Result<String, GitError> {
        let output = self.output(args).await?;
        if !output.status.success() {
            return Err(GitError::CommandFailed {
                op,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Whether the file differs from its last committed state. Diffing
    /// against HEAD so that changes a previous run staged but never
    /// committed still count.
    pub async fn has_changes(&self) -> Result<bool, GitError> {
        let file = self.file.to_string_lossy();
        let output = self
            .output(&["diff", "--quiet", "HEAD", "--", &*file])
            .await?;

        // diff --quiet exits 1 on difference, 0 on none
        match output.status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(GitError::CommandFailed {
                op: "diff",
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }),
        }
    }

    /// Unified diff of the file against its last committed state.
    pub async fn diff(&self) -> Result<String, GitError> {
        let file = self.file.to_string_lossy();
        self.run("diff", &["diff", "HEAD", "--", &*file]).await
    }

    async fn config_get(&self, key: &str) -> Result<Option<String>, GitError> {
        let output = self.output(&["config", key]).await?;
        if !output.status.success() {
            return Ok(None);
        }

        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    /// Sets a bot identity for `user.name`/`user.email`, each only when no
    /// value is visible to git from this repository.
    pub async fn ensure_identity(&self) -> Result<(), GitError> {
        if self.config_get("user.name").await?.is_none() {
            info!("No git user.name configured, using {}", BOT_NAME);
            self.run("config", &["config", "--global", "user.name", BOT_NAME])
                .await?;
        }
        if self.config_get("user.email").await?.is_none() {
            info!("No git user.email configured, using {}", BOT_EMAIL);
            self.run("config", &["config", "--global", "user.email", BOT_EMAIL])
                .await?;
        }

        Ok(())
    }

    pub async fn add(&self) -> Result<(), GitError> {
        let file = self.file.to_string_lossy();
        self.run("add", &["add", "--", &*file]).await.map(|_| ())
    }

    pub async fn commit(&self, message: &str) -> Result<(), GitError> {
        self.run("commit", &["commit", "-m", message]).await.map(|_| ())
    }

    pub async fn push(&self) -> Result<(), GitError> {
        let output = self.output(&["push"]).await?;
        if !output.status.success() {
            return Err(GitError::PushFailed {
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
