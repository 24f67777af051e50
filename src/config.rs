//! # Configuration Module
//!
//! Immutable process configuration, built once in `main` and passed
//! explicitly into every component. No ambient globals.
//!
//! Sources: a small JSON file for the authorized chat id, and environment
//! variables (loaded from `.env` first) for the secrets.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use teloxide::types::ChatId;

/// JSON config file read from the working directory at startup.
pub const CONFIG_FILE: &str = "config_telegram_expense.json";

/// Repository holding the ledger, unless `GITHUB_REPO` overrides it.
pub const DEFAULT_REPO: &str = "estudiochapunov/expense-tracker-bot";

/// Path of the ledger CSV inside the repository.
pub const LEDGER_PATH: &str = "gastos.csv";

/// On-disk shape of [`CONFIG_FILE`].
#[derive(Debug, Clone, Deserialize)]
struct ChatConfig {
    /// The single authorized chat. `null` (or absent) authorizes nobody.
    #[serde(default)]
    telegram_chat_id: Option<i64>,
}

/// Everything the bot needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub telegram_token: String,
    pub github_token: String,
    pub repo: String,
    pub ledger_path: String,
    /// Optional Hugging Face token for the OCR inference endpoint.
    pub hf_token: Option<String>,
    allowed_chats: Vec<ChatId>,
}

impl BotConfig {
    /// Load configuration from [`CONFIG_FILE`] and the environment.
    ///
    /// Required environment: `TELEGRAM_TOKEN`, `GITHUB_TOKEN`.
    /// Optional: `GITHUB_REPO`, `HF_TOKEN`.
    pub fn load() -> Result<Self> {
        let raw = fs::read_to_string(CONFIG_FILE)
            .with_context(|| format!("failed to read {CONFIG_FILE}"))?;
        let chat_config: ChatConfig = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse {CONFIG_FILE}"))?;

        let telegram_token =
            env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN must be set")?;
        let github_token = env::var("GITHUB_TOKEN").context("GITHUB_TOKEN must be set")?;
        let repo = env::var("GITHUB_REPO").unwrap_or_else(|_| DEFAULT_REPO.to_string());
        let hf_token = env::var("HF_TOKEN").ok();

        Ok(Self::new(
            telegram_token,
            github_token,
            repo,
            hf_token,
            chat_config.telegram_chat_id,
        ))
    }

    /// Assemble a config from already-resolved parts.
    pub fn new(
        telegram_token: String,
        github_token: String,
        repo: String,
        hf_token: Option<String>,
        telegram_chat_id: Option<i64>,
    ) -> Self {
        let allowed_chats = telegram_chat_id.map(ChatId).into_iter().collect();
        Self {
            telegram_token,
            github_token,
            repo,
            ledger_path: LEDGER_PATH.to_string(),
            hf_token,
            allowed_chats,
        }
    }

    /// Whether a chat may use the bot. Empty set means nobody is authorized.
    pub fn is_authorized(&self, chat: ChatId) -> bool {
        self.allowed_chats.contains(&chat)
    }
}
