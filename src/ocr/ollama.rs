//! Ollamaビジョンモデルによる OCR
//!
//! 画像をBase64でchatメッセージに添付して送る。チャット要約と違い、
//! 非2xxはエラーとして扱う（その画像は失敗扱いになる）。

use super::{ensure_image_exists, OcrEngine};
use crate::chat::wire::{ChatMessage, ChatRequest, ChatResponse};
use crate::config::Config;
use crate::error::{PosterAiError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub struct OllamaOcrEngine {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaOcrEngine {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            model: config.ocr_model.clone(),
        })
    }
}

#[async_trait]
impl OcrEngine for OllamaOcrEngine {
    async fn infer(&self, image_path: &Path, prompt: &str) -> Result<String> {
        ensure_image_exists(image_path)?;
        let bytes = tokio::fs::read(image_path).await?;
        debug!(path = %image_path.display(), size = bytes.len(), model = %self.model, "ocr request");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
                images: Some(vec![BASE64.encode(&bytes)]),
            }],
            stream: false,
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PosterAiError::Ocr(format!("{} - {}", status.as_u16(), body)));
        }

        let data: ChatResponse = response
            .json()
            .await
            .map_err(|e| PosterAiError::ApiParse(format!("OCRレスポンス: {}", e)))?;

        Ok(data.message.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
