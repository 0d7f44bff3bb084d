use crate::error::Result;
use poster_ai_common::ReportTable;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// 1画像1オブジェクトの配列として出力（キーは列順）
pub fn generate_json(table: &ReportTable, output_path: &Path) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let writer = BufWriter::new(File::create(output_path)?);
    serde_json::to_writer_pretty(writer, table.rows())?;
    Ok(())
}
