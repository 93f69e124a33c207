//! Loading the history feed: a local `data.json` written by the collector,
//! or the copy published alongside the static dashboard.

use crate::history::DayRecord;
use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

const MAX_RETRIES: usize = 3;

/// Reads the feed from disk. A missing file is an error; an empty array is
/// not (the collector simply has not run yet).
pub async fn load_file(path: &Path) -> Result<Vec<DayRecord>> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("failed to read history feed {}", path.display()))?;
    parse_records(&bytes).with_context(|| format!("failed to parse history feed {}", path.display()))
}

/// Downloads the published feed.
pub async fn fetch(client: &Client, url: &str) -> Result<Vec<DayRecord>> {
    let bytes = fetch_bytes_with_retry(client, url).await?;
    parse_records(&bytes).with_context(|| format!("failed to parse history feed from {url}"))
}

pub fn parse_records(bytes: &[u8]) -> Result<Vec<DayRecord>> {
    serde_json::from_slice(bytes).context("history feed is not a JSON array of day records")
}

async fn fetch_bytes_with_retry(client: &Client, url: &str) -> Result<Vec<u8>> {
    let bytes = send_with_retry(client, url)
        .await?
        .bytes()
        .await
        .with_context(|| format!("failed to read response body from {url}"))?;
    Ok(bytes.to_vec())
}

async fn send_with_retry(client: &Client, url: &str) -> Result<Response> {
    let mut last_err: Option<anyhow::Error> = None;
    for attempt in 1..=MAX_RETRIES {
        match client.get(url).send().await {
            Ok(response) => match response.error_for_status() {
                Ok(success) => return Ok(success),
                Err(err) => last_err = Some(err.into()),
            },
            Err(err) => last_err = Some(err.into()),
        }

        if attempt < MAX_RETRIES {
            sleep(backoff(attempt)).await;
        }
    }

    let detail = last_err
        .as_ref()
        .map_or_else(|| "unknown error".to_string(), describe_error);
    Err(anyhow!(
        "failed to fetch {url} after {MAX_RETRIES} attempts: {detail}"
    ))
}

fn backoff(attempt: usize) -> Duration {
    const MAX_EXPONENT: u32 = 6;
    let exponent = u32::try_from(attempt).unwrap_or(MAX_EXPONENT).min(MAX_EXPONENT);
    Duration::from_secs(2_u64.saturating_pow(exponent))
}

fn describe_error(error: &anyhow::Error) -> String {
    let mut pieces: Vec<String> = Vec::new();
    for (idx, cause) in error.chain().enumerate() {
        let text = cause.to_string();
        if text.is_empty() {
            continue;
        }
        if idx == 0 {
            pieces.push(text);
        } else {
            pieces.push(format!("caused by {text}"));
        }
    }

    if pieces.is_empty() {
        format!("{error:?}")
    } else {
        pieces.join(" | ")
    }
}
