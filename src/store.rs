//! # Ledger Store Module
//!
//! Adapter over the GitHub contents API: the ledger CSV lives at a fixed
//! path in a repository, fetched and rewritten whole on every operation.
//! The blob SHA returned by a read doubles as the revision token for the
//! following conditional write, so a stale write is rejected by the store
//! instead of clobbering a concurrent one.
//!
//! `append` is still a read-then-write pair, not a transaction. On a
//! revision conflict it re-reads and replays the append a bounded number
//! of times before giving up.

use anyhow::Context;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use log::{info, warn};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::BotConfig;
use crate::ledger::{ExpenseRecord, Ledger};

/// Commit message for every ledger write.
pub const COMMIT_MESSAGE: &str = "Nuevo gasto";

/// Upper bound on read→write replays when the store reports a conflict.
pub const MAX_APPEND_ATTEMPTS: u32 = 3;

/// Failure modes of the remote ledger store.
#[derive(Debug, Clone)]
pub enum StoreError {
    /// The GET failed or returned an unexpected status.
    Fetch(String),
    /// The blob came back but could not be decoded into a ledger.
    Decode(String),
    /// The PUT failed or returned an unexpected status.
    Write(String),
    /// The store rejected the write because the revision token was stale.
    Conflict,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Fetch(msg) => write!(f, "Fetch error: {msg}"),
            StoreError::Decode(msg) => write!(f, "Decode error: {msg}"),
            StoreError::Write(msg) => write!(f, "Write error: {msg}"),
            StoreError::Conflict => write!(f, "Revision conflict on write"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Read/write access to the remote ledger blob.
///
/// The production implementation is [`LedgerStore`]; the append retry
/// policy lives here so it can be exercised against a scripted stand-in.
#[async_trait]
pub trait LedgerBackend: Send + Sync {
    /// Fetch the current ledger and its revision token.
    async fn read(&self) -> Result<(Ledger, Option<String>), StoreError>;

    /// Write the full ledger back, conditioned on `sha` when present.
    async fn write(&self, ledger: &Ledger, sha: Option<&str>) -> Result<(), StoreError>;

    /// Read, append one record, write back.
    ///
    /// Retries the whole read→write cycle on a revision conflict, up to
    /// [`MAX_APPEND_ATTEMPTS`] times, so a concurrent append is merged
    /// instead of lost. Any other failure is returned immediately.
    async fn append(&self, record: &ExpenseRecord) -> Result<(), StoreError> {
        for attempt in 1..=MAX_APPEND_ATTEMPTS {
            let (mut ledger, sha) = self.read().await?;
            ledger.push(record.clone());
            match self.write(&ledger, sha.as_deref()).await {
                Ok(()) => return Ok(()),
                Err(StoreError::Conflict) if attempt < MAX_APPEND_ATTEMPTS => {
                    warn!("Revision conflict appending record (attempt {attempt}), refetching");
                }
                Err(e) => return Err(e),
            }
        }
        Err(StoreError::Conflict)
    }
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    sha: String,
}

#[derive(Debug, Serialize)]
struct PutPayload<'a> {
    message: &'a str,
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

/// Remote ledger handle bound to one repository path.
pub struct LedgerStore {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl LedgerStore {
    /// Build a store for the repository path in `config`.
    ///
    /// Fails when the HTTP client cannot be constructed; better to abort
    /// at startup than run with a client missing the User-Agent header.
    pub fn new(config: &BotConfig) -> anyhow::Result<Self> {
        // GitHub rejects requests without a User-Agent.
        let client = reqwest::Client::builder()
            .user_agent("gastos-bot")
            .build()
            .context("failed to build HTTP client for the ledger store")?;
        Ok(Self {
            client,
            url: format!(
                "https://api.github.com/repos/{}/contents/{}",
                config.repo, config.ledger_path
            ),
            token: config.github_token.clone(),
        })
    }
}

#[async_trait]
impl LedgerBackend for LedgerStore {
    /// A missing blob is not an error: the ledger simply does not exist
    /// yet, so an empty one is returned with no token and the next write
    /// performs an unconditioned create.
    async fn read(&self) -> Result<(Ledger, Option<String>), StoreError> {
        let response = self
            .client
            .get(&self.url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| StoreError::Fetch(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                info!("Ledger blob not found, starting empty");
                Ok((Ledger::empty(), None))
            }
            status if status.is_success() => {
                let body: ContentsResponse = response
                    .json()
                    .await
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                let csv = decode_contents(&body.content)?;
                let ledger =
                    Ledger::from_csv(&csv).map_err(|e| StoreError::Decode(e.to_string()))?;
                info!("Fetched ledger with {} records", ledger.len());
                Ok((ledger, Some(body.sha)))
            }
            status => Err(StoreError::Fetch(format!("unexpected status {status}"))),
        }
    }

    async fn write(&self, ledger: &Ledger, sha: Option<&str>) -> Result<(), StoreError> {
        let csv = ledger
            .to_csv()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        let payload = PutPayload {
            message: COMMIT_MESSAGE,
            content: encode_contents(&csv),
            sha,
        };

        let response = self
            .client
            .put(&self.url)
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(&payload)
            .send()
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                info!("Wrote ledger with {} records", ledger.len());
                Ok(())
            }
            StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => Err(StoreError::Conflict),
            status => Err(StoreError::Write(format!("unexpected status {status}"))),
        }
    }
}

/// Decode a contents-API `content` field into CSV text.
///
/// GitHub wraps the base64 body at 60 columns with embedded newlines, so
/// whitespace is stripped before decoding.
pub fn decode_contents(content: &str) -> Result<String, StoreError> {
    let compact: String = content.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64
        .decode(compact.as_bytes())
        .map_err(|e| StoreError::Decode(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// Encode CSV text for a contents-API request body.
pub fn encode_contents(csv: &str) -> String {
    BASE64.encode(csv.as_bytes())
}
