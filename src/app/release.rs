// ABOUTME: Fetches the latest upstream commit subject for the about overlay
// Runs once in a background task; any failure just means no message is shown

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

pub const COMMITS_URL: &str = "https://api.github.com/repos/non-erx/spv/commits?per_page=1";

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

/// First line of the newest commit message in a commits API response.
pub fn latest_commit_subject(body: &str) -> Option<String> {
    let commits: Vec<CommitEntry> = serde_json::from_str(body).ok()?;
    let latest = commits.into_iter().next()?;
    let subject = latest.commit.message.lines().next()?.trim();
    (!subject.is_empty()).then(|| subject.to_string())
}

async fn fetch_latest_commit() -> Result<Option<String>> {
    let client = reqwest::Client::builder()
        .user_agent(concat!("spv/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(5))
        .build()
        .context("failed to build http client")?;

    let body = client
        .get(COMMITS_URL)
        .send()
        .await
        .context("commits request failed")?
        .error_for_status()
        .context("commits request rejected")?
        .text()
        .await
        .context("failed to read commits response")?;

    Ok(latest_commit_subject(&body))
}

/// Spawn the fetch on the current runtime. The receiver yields `None` on any failure.
pub fn spawn_latest_commit_fetch() -> oneshot::Receiver<Option<String>> {
    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let subject = match fetch_latest_commit().await {
            Ok(subject) => subject,
            Err(e) => {
                warn!("Could not fetch latest commit: {:#}", e);
                None
            }
        };
        debug!("Latest commit: {:?}", subject);
        let _ = tx.send(subject);
    });
    rx
}
