//! Excel生成（CLI版）
//!
//! バッファ生成は共通ライブラリ、ここではファイル書き込みのみ

use crate::error::Result;
use poster_ai_common::export::excel_core::generate_report_buffer;
use poster_ai_common::ReportTable;
use std::path::Path;

pub fn generate_excel(table: &ReportTable, output_path: &Path) -> Result<()> {
    let buffer = generate_report_buffer(table)?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(output_path, buffer)?;

    Ok(())
}
