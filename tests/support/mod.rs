//! テスト用のフェイクOCR・フェイクチャット

#![allow(dead_code)]

use async_trait::async_trait;
use poster_ai_rust::chat::ChatModel;
use poster_ai_rust::error::{PosterAiError, Result};
use poster_ai_rust::ocr::OcrEngine;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// ファイル名を埋め込んだテキストを返すOCR。指定ファイルでは失敗する
#[derive(Default)]
pub struct FakeOcr {
    pub fail_on: Vec<String>,
    pub calls: Arc<AtomicUsize>,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl FakeOcr {
    pub fn failing_on(names: &[&str]) -> Self {
        Self {
            fail_on: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl OcrEngine for FakeOcr {
    async fn infer(&self, image_path: &Path, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let name = image_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.fail_on.contains(&name) {
            return Err(PosterAiError::Ocr(format!("認識失敗: {}", name)));
        }
        Ok(format!("OCR[{}]", name))
    }

    fn model(&self) -> &str {
        "fake-ocr"
    }
}

/// 受け取ったプロンプトを記録し、OCRテキストを姓名に入れた回答を返す
pub struct FakeChat {
    pub model: String,
    pub prompts: Arc<Mutex<Vec<String>>>,
}

impl Default for FakeChat {
    fn default() -> Self {
        Self::named("fake-chat")
    }
}

impl FakeChat {
    pub fn named(model: &str) -> Self {
        Self {
            model: model.to_string(),
            prompts: Arc::default(),
        }
    }

    pub fn recorder(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let ocr_text = prompt.rsplit("介绍: ").next().unwrap_or_default();
        Ok(format!("以下是整理结果\n姓名: {}\n科室: 心内科\n职称: 未提及", ocr_text))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// 常に固定の回答を返す
pub struct FixedChat(pub String);

#[async_trait]
impl ChatModel for FixedChat {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }

    fn model(&self) -> &str {
        "fixed-chat"
    }
}

/// 常に失敗する
pub struct FailingChat;

#[async_trait]
impl ChatModel for FailingChat {
    async fn complete(&self, _prompt: &str) -> Result<String> {
        Err(PosterAiError::ApiCall("connection refused".into()))
    }

    fn model(&self) -> &str {
        "failing-chat"
    }
}

/// 空のダミー画像を作成
pub fn touch(dir: &Path, name: &str) {
    if let Some(parent) = dir.join(name).parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(dir.join(name), name.as_bytes()).unwrap();
}
