//! 処理結果の集計表示

use crate::batch::{BatchReport, BatchStatus};

/// 集計メッセージ（1要素1行）
pub fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines = Vec::new();

    match report.status() {
        BatchStatus::NoImagesFound => {
            lines.push("jpg画像が見つかりませんでした".to_string());
            return lines;
        }
        BatchStatus::AllFailed => {
            lines.push(format!("すべての画像の処理に失敗しました ({}件)", report.failed));
        }
        BatchStatus::Completed => {
            lines.push("一括処理完了".to_string());
        }
    }

    lines.push(format!("成功: {} 枚", report.processed));
    lines.push(format!("失敗: {} 枚", report.failed));
    if report.cache_hits > 0 {
        lines.push(format!("キャッシュ使用: {} 枚", report.cache_hits));
    }

    if report.status() == BatchStatus::Completed {
        let (rows, cols) = report.table.shape();
        lines.push(format!("表のサイズ: {} 行 × {} 列", rows, cols));
        lines.push(format!("列名: [{}]", report.table.columns().join(", ")));
        lines.push(String::new());
        lines.push("各項目の充填状況:".to_string());
        for fill in report.table.fill_rates() {
            lines.push(format!("  {}: {}/{}", fill.column, fill.filled, fill.total));
        }
    }

    if !report.failures.is_empty() {
        lines.push(String::new());
        lines.push("失敗した画像:".to_string());
        for failure in &report.failures {
            lines.push(format!("  {}: {}", failure.path.display(), failure.reason));
        }
    }

    lines
}

pub fn print_summary(report: &BatchReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}
