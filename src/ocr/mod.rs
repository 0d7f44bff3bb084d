//! OCRエンジン
//!
//! 画像パスと指示プロンプトからテキストを得る。エンジンは起動時に1度だけ
//! 生成してバッチ処理に渡し、全画像で使い回す。

mod command;
mod ollama;

pub use command::CommandOcrEngine;
pub use ollama::OllamaOcrEngine;

use crate::config::{Config, OcrBackend};
use crate::error::{PosterAiError, Result};
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait OcrEngine: Send + Sync {
    async fn infer(&self, image_path: &Path, prompt: &str) -> Result<String>;

    /// エンジンの識別名（モデル名またはコマンド名）
    fn model(&self) -> &str;
}

/// 設定からOCRエンジンを生成
pub fn build_engine(config: &Config) -> Result<Box<dyn OcrEngine>> {
    match config.ocr_backend {
        OcrBackend::Ollama => Ok(Box::new(OllamaOcrEngine::from_config(config)?)),
        OcrBackend::Command => {
            let (program, args) = config.ocr_command.split_first().ok_or_else(|| {
                PosterAiError::Config("ocr_command が空です（例: [\"my-ocr\", \"--lang\", \"chi_sim\"]）".into())
            })?;
            Ok(Box::new(CommandOcrEngine::new(program.clone(), args.to_vec())))
        }
    }
}

fn ensure_image_exists(image_path: &Path) -> Result<()> {
    if !image_path.is_file() {
        return Err(PosterAiError::FileNotFound(image_path.display().to_string()));
    }
    Ok(())
}
