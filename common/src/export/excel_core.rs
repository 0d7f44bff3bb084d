//! Excel生成（共通ライブラリ）
//!
//! 一覧表を1シートのExcelにする。1行目が見出し、以降1画像1行。

use crate::error::{Error, Result};
use crate::types::ReportTable;
use rust_xlsxwriter::*;

/// シート名
pub const SHEET_NAME: &str = "医生信息";

/// 列幅（文字数単位）の上限
const MAX_COLUMN_WIDTH: f64 = 60.0;

/// Excelをバッファに生成
pub fn generate_report_buffer(table: &ReportTable) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x333333))
        .set_background_color(Color::RGB(0xF5F5F5))
        .set_align(FormatAlign::Center)
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0xAAAAAA));

    let value_format = Format::new()
        .set_align(FormatAlign::Left)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap();

    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name(SHEET_NAME)
        .map_err(Error::excel("シート名設定"))?;

    for (col, column) in table.columns().iter().enumerate() {
        let col = col as u16;
        worksheet
            .write_string_with_format(0, col, column, &header_format)
            .map_err(Error::excel("見出し書き込み"))?;
        worksheet
            .set_column_width(col, column_width(table, col as usize))
            .map_err(Error::excel("列幅設定"))?;
    }

    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = (idx + 1) as u32;
        for (col, value) in row.values().into_iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string_with_format(row_num, col as u16, value, &value_format)
                .map_err(Error::excel("値書き込み"))?;
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(Error::excel("ウィンドウ枠固定"))?;

    workbook
        .save_to_buffer()
        .map_err(Error::excel("Excel保存"))
}

/// 見出しと値の最大表示幅から列幅を決める（全角は2文字分）
fn column_width(table: &ReportTable, col: usize) -> f64 {
    let header = table.columns().get(col).map(|c| display_width(c)).unwrap_or(0);
    let widest = table
        .rows()
        .iter()
        .filter_map(|row| row.values().get(col).map(|v| display_width(v)))
        .max()
        .unwrap_or(0);

    ((header.max(widest) + 2) as f64).min(MAX_COLUMN_WIDTH)
}

fn display_width(text: &str) -> usize {
    text.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
}
