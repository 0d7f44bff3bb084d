use crate::error::{PosterAiError, Result};
use poster_ai_common::{FieldSchema, FieldSpec, OCR_PROMPT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// エンドポイントを上書きする環境変数
pub const ENDPOINT_ENV: &str = "POSTER_AI_ENDPOINT";

/// OCRの実行方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackend {
    /// Ollamaのビジョンモデル（chatエンドポイントに画像を添付）
    #[default]
    Ollama,
    /// 外部コマンド（`program [args..] <画像パス> <プロンプト>`）
    Command,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub chat_model: String,
    pub ocr_backend: OcrBackend,
    pub ocr_model: String,
    pub ocr_command: Vec<String>,
    pub ocr_prompt: String,
    pub output_file_name: String,
    pub timeout_seconds: u64,
    /// 抽出項目の上書き（未指定なら既定スキーマ）
    pub fields: Option<Vec<FieldSpec>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434/api/chat".into(),
            chat_model: "deepseek-r1:70b".into(),
            ocr_backend: OcrBackend::Ollama,
            ocr_model: "deepseek-ocr".into(),
            ocr_command: Vec::new(),
            ocr_prompt: OCR_PROMPT.into(),
            output_file_name: "医生信息批量汇总.xlsx".into(),
            timeout_seconds: 600, // 70Bモデルの応答待ち
            fields: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| PosterAiError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("poster-ai").join("config.json"))
    }

    /// チャットエンドポイント（環境変数を優先）
    pub fn endpoint(&self) -> String {
        match std::env::var(ENDPOINT_ENV) {
            Ok(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => self.endpoint.clone(),
        }
    }

    pub fn schema(&self) -> FieldSchema {
        match &self.fields {
            Some(fields) if !fields.is_empty() => FieldSchema::new(fields.clone()),
            _ => FieldSchema::default(),
        }
    }

    pub fn set_endpoint(&mut self, endpoint: String) -> Result<()> {
        self.endpoint = endpoint;
        self.save()
    }

    pub fn set_chat_model(&mut self, model: String) -> Result<()> {
        self.chat_model = model;
        self.save()
    }
}
