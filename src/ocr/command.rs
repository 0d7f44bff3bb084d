//! 外部コマンドによる OCR
//!
//! `program [args..] <画像パス> <プロンプト>` を実行し、標準出力を結果とする

use super::{ensure_image_exists, OcrEngine};
use crate::error::{PosterAiError, Result};
use async_trait::async_trait;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

pub struct CommandOcrEngine {
    program: String,
    args: Vec<String>,
}

impl CommandOcrEngine {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl OcrEngine for CommandOcrEngine {
    async fn infer(&self, image_path: &Path, prompt: &str) -> Result<String> {
        ensure_image_exists(image_path)?;
        debug!(program = %self.program, path = %image_path.display(), "ocr command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(image_path)
            .arg(prompt)
            .output()
            .await
            .map_err(|e| PosterAiError::CliExecution(format!("{} の起動に失敗: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PosterAiError::CliExecution(format!(
                "{} failed (code {:?}): {}",
                self.program,
                output.status.code(),
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn model(&self) -> &str {
        &self.program
    }
}
