use crate::error::{PosterAiError, Result};
use poster_ai_common::Provenance;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

impl ImageInfo {
    pub fn from_path(path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Self { path, file_name }
    }

    pub fn provenance(&self) -> Provenance {
        Provenance::from_path(&self.path)
    }
}

/// 対象の末尾（大文字小文字は区別しない）
const IMAGE_SUFFIXES: &[&str] = &[".jpg", ".jpeg"];

/// ファイル名の末尾で判定する（`.jpg` という名前のファイルも対象）
pub fn is_image_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .is_some_and(|name| IMAGE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)))
}

/// フォルダを再帰的に走査して画像を列挙
///
/// 順序は各ディレクトリ内でファイル名の辞書順（深さ優先）。
/// パスは絶対パスに正規化する。
pub fn scan_folder(folder: &Path) -> Result<Vec<ImageInfo>> {
    if !folder.is_dir() {
        return Err(PosterAiError::FolderNotFound(folder.display().to_string()));
    }
    let root = folder.canonicalize()?;

    let mut images = Vec::new();

    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "走査できないエントリをスキップ");
                continue;
            }
        };
        let path = entry.path();

        if path.is_file() && is_image_file(path) {
            images.push(ImageInfo::from_path(path.to_path_buf()));
        }
    }

    Ok(images)
}
