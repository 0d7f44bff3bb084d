pub mod excel;
pub mod json;

use crate::cli::ExportFormat;
use crate::error::Result;
use poster_ai_common::ReportTable;
use std::path::{Path, PathBuf};

/// 出力先がディレクトリ（または拡張子なし）ならファイル名を付けて返す
fn output_path_for_format(output: &Path, file_name: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(file_name);
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.with_extension(extension)
    }
}

/// 一覧表を出力し、書き出したファイルのパスを返す
pub fn export_report(
    table: &ReportTable,
    format: &ExportFormat,
    output: &Path,
    file_name: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if matches!(format, ExportFormat::Excel | ExportFormat::Both) {
        let path = output_path_for_format(output, file_name, "xlsx");
        excel::generate_excel(table, &path)?;
        written.push(path);
    }

    if matches!(format, ExportFormat::Json | ExportFormat::Both) {
        let path = output_path_for_format(output, file_name, "json");
        json::generate_json(table, &path)?;
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_output_path_for_directory() {
        let dir = tempdir().unwrap();
        let path = output_path_for_format(dir.path(), "医生信息批量汇总.xlsx", "json");
        assert_eq!(path, dir.path().join("医生信息批量汇总.json"));
    }

    #[test]
    fn test_output_path_for_file() {
        let path = output_path_for_format(Path::new("/tmp/out/report.xlsx"), "ignored.xlsx", "xlsx");
        assert_eq!(path, PathBuf::from("/tmp/out/report.xlsx"));

        let path = output_path_for_format(Path::new("/tmp/out/report.xlsx"), "ignored.xlsx", "json");
        assert_eq!(path, PathBuf::from("/tmp/out/report.json"));
    }
}
