//! プロンプト生成モジュール
//!
//! - OCR_PROMPT: OCRエンジンへの固定指示
//! - NOT_MENTIONED: 情報がない場合にAIへ書かせる値
//! - build_summary_prompt: OCRテキストを項目別に要約させるプロンプト

use crate::schema::FieldSchema;

/// OCRエンジンへの指示
pub const OCR_PROMPT: &str = "<image>\nFree OCR.";

/// 該当情報なしの表記（パーサーでは特別扱いしない）
pub const NOT_MENTIONED: &str = "未提及";

/// 要約プロンプト生成
///
/// # Arguments
/// * `schema` - 抽出項目（`項目名: [ヒント]` の例示ブロックとして埋め込む）
/// * `ocr_text` - OCRで得た生テキスト
///
/// # Returns
/// Chatモデルに送るプロンプト文字列
pub fn build_summary_prompt(schema: &FieldSchema, ocr_text: &str) -> String {
    let field_block = schema
        .fields()
        .iter()
        .map(|f| format!("{}: [{}]", f.name, f.display_hint()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "请严格按照以下格式汇总这位临床医生的信息，每项占一行，使用冒号分隔，格式为：字段名:值。如果某项信息不存在，请填写'{NOT_MENTIONED}'。\n\
需要的字段：\n\
{field_block}\n\n\
以下是这位临床医生的介绍: {ocr_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_summary_prompt_default_schema() {
        let prompt = build_summary_prompt(&FieldSchema::default(), "张三 主任医师");

        assert!(prompt.starts_with("请严格按照以下格式汇总这位临床医生的信息"));
        assert!(prompt.contains("'未提及'"));
        assert!(prompt.contains("需要的字段：\n姓名: [医生姓名]\n学历: [学历信息]\n"));
        assert!(prompt.contains("擅长的临床领域: [擅长领域]\n\n"));
        assert!(prompt.ends_with("以下是这位临床医生的介绍: 张三 主任医师"));
    }

    #[test]
    fn test_build_summary_prompt_uses_name_when_hint_missing() {
        let schema = FieldSchema::from_names(&["Title"]);
        let prompt = build_summary_prompt(&schema, "");
        assert!(prompt.contains("Title: [Title]"));
    }

    #[test]
    fn test_ocr_prompt() {
        assert_eq!(OCR_PROMPT, "<image>\nFree OCR.");
    }
}
