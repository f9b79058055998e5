use colored::Colorize;

use crate::{cli::UpdateOptions, git, update, util};

#[derive(thiserror::Error, Debug)]
pub enum CommitError {
    #[error("update failed: {0}")]
    UpdateError(#[from] update::UpdateError),
    #[error(transparent)]
    GitError(#[from] git::GitError),
}

/// Runs the update routine, then commits and pushes the playlist file if
/// its content differs from the last committed state. An update failure
/// aborts before any git side effect; a push failure leaves the local
/// commit in place for manual recovery.
pub async fn run(client: &util::HttpClient, opts: &UpdateOptions) -> Result<(), CommitError> {
    update::run(client, opts).await?;

    // The diff decides, not the updater's outcome: an earlier uncommitted
    // run may have left the file dirty already.
    let repo = git::Repo::for_file(&opts.file)?;
    if !repo.has_changes().await? {
        println!("{}", "Playlist is up to date, nothing to commit".green());
        return Ok(());
    }

    println!(
        "{}",
        format!("Playlist {} changed, committing", opts.file.display()).yellow()
    );
    print!("{}", repo.diff().await?);

    repo.ensure_identity().await?;
    repo.add().await?;
    repo.commit(git::COMMIT_MESSAGE).await?;

    match repo.push().await {
        Ok(()) => {
            println!("{}", "Pushed stream URL update".green());
            Ok(())
        }
        Err(e) => {
            println!(
                "{}",
                "Push failed, local commit kept for manual recovery".red()
            );
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::process::Command;

    use super::*;

    const SAMPLE: &str = "#EXTM3U\n\
        #EXTINF:-1 tvg-id=\"one\",Channel One\n\
        https://cdn.one.example/live/one.m3u8\n";

    async fn git(dir: &Path, args: &[&str]) -> String {
        let output = Command::new("git")
            .current_dir(dir)
            .args(args)
            .output()
            .await
            .expect("Could not run git");
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    async fn init_repo_with_sample(dir: &Path) {
        git(dir, &["init", "-q"]).await;
        git(dir, &["config", "user.name", "Test"]).await;
        git(dir, &["config", "user.email", "test@example.com"]).await;
        std::fs::write(dir.join("playlist.m3u"), SAMPLE).expect("Could not write playlist");
        git(dir, &["add", "playlist.m3u"]).await;
        git(dir, &["commit", "-q", "-m", "initial"]).await;
    }

    // One-shot HTTP responder serving a fixed page body
    async fn serve_page(body: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind listener");
        let addr = listener.local_addr().expect("No local addr");

        tokio::spawn(async move {
            if let Ok((mut sock, _)) = listener.accept().await {
                let mut buf = [0u8; 2048];
                let _ = sock.read(&mut buf).await;
                let resp = format!(
                    "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = sock.write_all(resp.as_bytes()).await;
            }
        });

        format!("http://{}/watch", addr)
    }

    fn options(url: String, dir: &Path) -> UpdateOptions {
        UpdateOptions {
            url,
            file: dir.join("playlist.m3u"),
            entry_name: "Channel One".to_string(),
            preferred_domain: None,
            strip_parameters: false,
        }
    }

    #[tokio::test]
    async fn failing_update_creates_no_commit() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        init_repo_with_sample(dir.path()).await;

        let client = util::HttpClient::new().expect("Could not create HttpClient");
        // Nothing listens on port 1
        let opts = options("http://127.0.0.1:1/watch".to_string(), dir.path());

        let res = run(&client, &opts).await;
        assert!(matches!(res, Err(CommitError::UpdateError(_))));

        let count = git(dir.path(), &["rev-list", "--count", "HEAD"]).await;
        assert_eq!(count.trim(), "1", "No commit may be created");
        let content =
            std::fs::read_to_string(dir.path().join("playlist.m3u")).expect("Could not read");
        assert_eq!(content, SAMPLE, "Playlist must be untouched");
    }

    #[tokio::test]
    async fn unchanged_playlist_commits_nothing() {
        let dir = tempfile::tempdir().expect("Could not create temp dir");
        init_repo_with_sample(dir.path()).await;

        // The page carries the URL the playlist already has
        let url = serve_page(r#"<video src="https://cdn.one.example/live/one.m3u8">"#).await;
        let client = util::HttpClient::new().expect("Could not create HttpClient");

        run(&client, &options(url, dir.path()))
            .await
            .expect("Pipeline must succeed on a no-op");

        let count = git(dir.path(), &["rev-list", "--count", "HEAD"]).await;
        assert_eq!(count.trim(), "1", "No commit on an unchanged playlist");
    }
}
