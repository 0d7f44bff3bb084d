//! バッチ抽出モジュール
//!
//! 1画像ごとの処理:
//! 1. OCR（固定プロンプト）
//! 2. OCRテキストを埋め込んだ要約プロンプトをチャットモデルへ
//! 3. 回答をRecordにパース
//! 4. 出所列を付与して蓄積
//!
//! どの段階で失敗してもその画像だけを失敗として数え、次の画像へ進む。

pub mod cache;

use crate::chat::ChatModel;
use crate::error::Result;
use crate::ocr::OcrEngine;
use crate::scanner::{scan_folder, ImageInfo};
use cache::{compute_file_hash, CacheEntry, CacheFile, ExtractionSource};
use indicatif::ProgressBar;
use poster_ai_common::{build_summary_prompt, parse_record, FieldSchema, Record, ReportRow, ReportTable, OCR_PROMPT};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// 失敗した画像
#[derive(Debug, Clone)]
pub struct ImageFailure {
    pub path: PathBuf,
    pub file_name: String,
    pub reason: String,
}

/// 1画像の処理結果
#[derive(Debug, Clone)]
pub enum ImageOutcome {
    Success { row: ReportRow, cached: bool },
    Failure(ImageFailure),
}

/// バッチ全体の終了状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    /// 1件以上成功
    Completed,
    /// 対象画像が0件
    NoImagesFound,
    /// 画像はあったが全件失敗
    AllFailed,
}

#[derive(Debug)]
pub struct BatchReport {
    pub table: ReportTable,
    pub discovered: usize,
    pub processed: usize,
    pub failed: usize,
    pub cache_hits: usize,
    pub failures: Vec<ImageFailure>,
}

impl BatchReport {
    pub fn status(&self) -> BatchStatus {
        if self.discovered == 0 {
            BatchStatus::NoImagesFound
        } else if self.processed == 0 {
            BatchStatus::AllFailed
        } else {
            BatchStatus::Completed
        }
    }
}

/// バッチ処理本体
///
/// OCRエンジンとチャットモデルは生成済みのものを受け取り、全画像で使い回す。
pub struct BatchProcessor {
    ocr: Box<dyn OcrEngine>,
    chat: Box<dyn ChatModel>,
    schema: FieldSchema,
    ocr_prompt: String,
    progress: ProgressBar,
}

impl BatchProcessor {
    pub fn new(ocr: Box<dyn OcrEngine>, chat: Box<dyn ChatModel>) -> Self {
        Self {
            ocr,
            chat,
            schema: FieldSchema::default(),
            ocr_prompt: OCR_PROMPT.to_string(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_schema(mut self, schema: FieldSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_ocr_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.ocr_prompt = prompt.into();
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// 現在の設定での抽出元（キャッシュの一致判定用）
    pub fn source(&self) -> ExtractionSource {
        ExtractionSource {
            chat_model: self.chat.model().to_string(),
            ocr_model: self.ocr.model().to_string(),
            ocr_prompt: self.ocr_prompt.clone(),
        }
    }

    /// フォルダ内の全画像を処理して一覧表を返す
    pub async fn run(&self, root: &Path) -> Result<BatchReport> {
        self.run_inner(root, None).await
    }

    /// キャッシュを使って処理（ヒットした画像はOCR・要約をスキップ）
    pub async fn run_with_cache(&self, root: &Path, cache: &mut CacheFile) -> Result<BatchReport> {
        self.run_inner(root, Some(cache)).await
    }

    async fn run_inner(&self, root: &Path, mut cache: Option<&mut CacheFile>) -> Result<BatchReport> {
        let images = scan_folder(root)?;
        info!(root = %root.display(), count = images.len(), "画像を検出");

        self.progress.set_length(images.len() as u64);

        let mut rows = Vec::new();
        let mut failures = Vec::new();
        let mut cache_hits = 0;

        for (idx, image) in images.iter().enumerate() {
            self.progress.set_message(image.file_name.clone());
            info!(index = idx + 1, path = %image.path.display(), "処理開始");

            match self.process_image(image, cache.as_deref_mut()).await {
                ImageOutcome::Success { row, cached } => {
                    if cached {
                        cache_hits += 1;
                    }
                    info!(file = %image.file_name, cached, "✓ 処理成功");
                    rows.push(row);
                }
                ImageOutcome::Failure(failure) => {
                    warn!(path = %failure.path.display(), error = %failure.reason, "✗ 処理失敗");
                    failures.push(failure);
                }
            }

            self.progress.inc(1);
        }
        self.progress.finish_and_clear();

        let report = BatchReport {
            discovered: images.len(),
            processed: rows.len(),
            failed: failures.len(),
            cache_hits,
            table: ReportTable::from_rows(&self.schema, rows),
            failures,
        };
        info!(
            processed = report.processed,
            failed = report.failed,
            status = ?report.status(),
            "バッチ処理完了"
        );

        Ok(report)
    }

    async fn process_image(&self, image: &ImageInfo, mut cache: Option<&mut CacheFile>) -> ImageOutcome {
        let hash = if cache.is_some() {
            match compute_file_hash(&image.path) {
                Ok(h) => Some(h),
                Err(e) => {
                    // ハッシュ計算失敗時は未キャッシュとして扱う
                    warn!(file = %image.file_name, error = %e, "ハッシュ計算に失敗");
                    None
                }
            }
        } else {
            None
        };

        if let (Some(cache), Some(hash)) = (cache.as_deref(), hash.as_deref()) {
            if let Some(entry) = cache.lookup(hash, &self.schema, &self.source()) {
                debug!(file = %image.file_name, "キャッシュヒット");
                return ImageOutcome::Success {
                    row: ReportRow::new(entry.record.clone(), image.provenance()),
                    cached: true,
                };
            }
        }

        match self.extract(image).await {
            Ok((summary, record)) => {
                if self.chat.is_placeholder(&summary) {
                    // サーバー側エラーの代替回答は次回に再試行する
                    debug!(file = %image.file_name, "エラー回答のためキャッシュしない");
                } else if let (Some(cache), Some(hash)) = (cache.as_deref_mut(), hash) {
                    let file_size = std::fs::metadata(&image.path).map(|m| m.len()).unwrap_or(0);
                    cache.insert(
                        hash,
                        CacheEntry::new(
                            image.file_name.clone(),
                            file_size,
                            self.source(),
                            summary,
                            record.clone(),
                        ),
                    );
                }
                ImageOutcome::Success {
                    row: ReportRow::new(record, image.provenance()),
                    cached: false,
                }
            }
            Err(e) => ImageOutcome::Failure(ImageFailure {
                path: image.path.clone(),
                file_name: image.file_name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    /// OCR → 要約 → パース。戻り値は (AI回答全文, Record)
    async fn extract(&self, image: &ImageInfo) -> Result<(String, Record)> {
        let ocr_text = self.ocr.infer(&image.path, &self.ocr_prompt).await?;
        debug!(file = %image.file_name, chars = ocr_text.chars().count(), "OCR完了");

        let prompt = build_summary_prompt(&self.schema, &ocr_text);
        let summary = self.chat.complete(&prompt).await?;

        let record = parse_record(&summary, &self.schema);
        let preview: String = summary.chars().take(100).collect();
        info!(file = %image.file_name, filled = record.filled_count(), preview = %preview, "AI解析結果");

        Ok((summary, record))
    }
}
