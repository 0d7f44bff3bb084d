//! 抽出結果キャッシュモジュール
//!
//! 画像のSHA-256をキーにして抽出結果をキャッシュし、
//! 同じ画像のOCR・要約をスキップする。

use crate::error::Result;
use poster_ai_common::{FieldSchema, Record};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::warn;

const CACHE_FILE_NAME: &str = ".poster-cache.json";

/// キャッシュファイルの構造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// バージョン（互換性チェック用）
    version: u32,
    /// ファイルハッシュ → 抽出結果のマップ
    entries: HashMap<String, CacheEntry>,
}

/// 抽出に使ったモデルとOCRプロンプト。どれかが変われば別の結果とみなす
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionSource {
    pub chat_model: String,
    pub ocr_model: String,
    pub ocr_prompt: String,
}

/// キャッシュエントリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    /// 登録日時（RFC3339）
    pub cached_at: String,
    pub source: ExtractionSource,
    /// AIの回答全文
    pub summary: String,
    pub record: Record,
}

impl CacheEntry {
    pub fn new(
        file_name: String,
        file_size: u64,
        source: ExtractionSource,
        summary: String,
        record: Record,
    ) -> Self {
        Self {
            file_name,
            file_size,
            cached_at: chrono::Local::now().to_rfc3339(),
            source,
            summary,
            record,
        }
    }
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 2;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// キャッシュファイルを読み込み（なし・破損・バージョン違いは空）
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, CacheFile>(reader) {
            Ok(cache) => {
                if cache.version != Self::CURRENT_VERSION {
                    warn!(found = cache.version, "キャッシュバージョン不一致、再生成します");
                    return Self::default();
                }
                cache
            }
            Err(e) => {
                warn!(error = %e, "キャッシュを読み込めません、再生成します");
                Self::default()
            }
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// キャッシュファイルを削除（存在しなければ false）
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(cache_path)?;
        Ok(true)
    }

    pub fn get(&self, hash: &str) -> Option<&CacheEntry> {
        self.entries.get(hash)
    }

    /// 項目構成と抽出元（モデル・OCRプロンプト）が一致するエントリのみ返す
    pub fn lookup(
        &self,
        hash: &str,
        schema: &FieldSchema,
        source: &ExtractionSource,
    ) -> Option<&CacheEntry> {
        self.get(hash)
            .filter(|e| e.record.matches_schema(schema) && e.source == *source)
    }

    pub fn insert(&mut self, hash: String, entry: CacheEntry) {
        self.entries.insert(hash, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// 画像ファイルのハッシュ（SHA-256, hex）
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_compute_file_hash() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.jpg");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(
            compute_file_hash(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_compute_file_hash_missing_file() {
        assert!(compute_file_hash(Path::new("/nonexistent/a.jpg")).is_err());
    }

    #[test]
    fn test_version_mismatch_resets() {
        let dir = tempdir().unwrap();
        std::fs::write(
            CacheFile::cache_path(dir.path()),
            r#"{"version": 99, "entries": {}}"#,
        )
        .unwrap();
        let cache = CacheFile::load(dir.path());
        assert!(cache.is_empty());
        assert_eq!(cache.version, CacheFile::CURRENT_VERSION);
    }

    #[test]
    fn test_corrupt_file_resets() {
        let dir = tempdir().unwrap();
        std::fs::write(CacheFile::cache_path(dir.path()), "not json").unwrap();
        assert!(CacheFile::load(dir.path()).is_empty());
    }
}
