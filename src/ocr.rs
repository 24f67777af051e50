//! # OCR Module
//!
//! The OCR collaborator is an opaque bytes-to-text function behind the
//! [`TextExtractor`] trait so handlers can be tested with a stub and the
//! backing service swapped without touching the dispatch code.
//!
//! The production implementation posts the raw image bytes to the Hugging
//! Face hosted inference endpoint for a printed-text TrOCR model and reads
//! the generated text out of the JSON response.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::info;
use serde::Deserialize;

/// Inference model used for receipt images.
pub const OCR_MODEL: &str = "microsoft/trocr-base-printed";

const INFERENCE_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Opaque text extraction capability: image bytes in, recognized text out.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract_text(&self, image: &[u8]) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct GeneratedText {
    generated_text: String,
}

/// [`TextExtractor`] backed by the Hugging Face inference API.
pub struct TrOcrClient {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl TrOcrClient {
    /// Build a client for [`OCR_MODEL`]. The token is optional; anonymous
    /// calls work but are rate-limited harder.
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{INFERENCE_BASE_URL}/{OCR_MODEL}"),
            token,
        }
    }
}

#[async_trait]
impl TextExtractor for TrOcrClient {
    async fn extract_text(&self, image: &[u8]) -> Result<String> {
        info!("Sending {} image bytes to OCR endpoint", image.len());

        let mut request = self.client.post(&self.endpoint).body(image.to_vec());
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("OCR endpoint returned status {status}"));
        }

        let outputs: Vec<GeneratedText> = response.json().await?;
        let raw = outputs
            .into_iter()
            .next()
            .map(|o| o.generated_text)
            .ok_or_else(|| anyhow!("OCR endpoint returned an empty result list"))?;

        Ok(clean_ocr_text(&raw))
    }
}

/// Normalize OCR output: trim each line, drop empty ones.
pub fn clean_ocr_text(text: &str) -> String {
    text.trim()
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}
