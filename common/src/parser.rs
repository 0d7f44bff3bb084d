//! AI回答パーサー
//!
//! `項目名: 値` 形式のゆるいテキストをスキーマ固定のRecordに変換する

use crate::schema::FieldSchema;
use crate::types::Record;

/// AI回答テキストをRecordに変換
///
/// 照合ルール:
/// 1. 全項目を空文字で初期化
/// 2. `:` を含む行だけを対象に、最初の `:` でラベルと値に分割（両方trim）
/// 3. 項目名がラベルに**部分一致**すれば代入（スキーマ順で最初の一致のみ）
/// 4. 同じ項目に一致する行が複数あれば最後の行が勝つ
///
/// 一致しない行やコロンのない行は無視する。「未提及」などの値も特別扱いしない。
///
/// # Examples
/// ```
/// use poster_ai_common::{parse_record, FieldSchema};
///
/// let schema = FieldSchema::from_names(&["Name", "Title"]);
/// let record = parse_record("Doctor Name: Alice\nTitle: A\nTitle: B", &schema);
/// assert_eq!(record.get("Name"), Some("Alice"));
/// assert_eq!(record.get("Title"), Some("B"));
/// ```
pub fn parse_record(text: &str, schema: &FieldSchema) -> Record {
    let mut record = Record::empty(schema);

    for line in text.trim().lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let label = label.trim();
        let value = value.trim();

        if let Some(index) = schema
            .names()
            .position(|name| label.contains(name))
        {
            record.set(index, value.to_string());
        }
    }

    record
}

/// Recordを `項目名: 値` 形式に戻す（スキーマ順、1行1項目）
pub fn to_canonical_text(record: &Record) -> String {
    record
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_schema() -> FieldSchema {
        FieldSchema::from_names(&["Name", "Title"])
    }

    #[test]
    fn test_parse_default_schema_reply() {
        let reply = "姓名: 张三\n学历: 博士\n科室: 心血管内科\n职称: 主任医师\n职位: 科主任\n开诊时间: 周一上午\n个人学术任职: 未提及\n擅长的临床领域: 冠心病介入治疗";
        let record = parse_record(reply, &FieldSchema::default());

        assert_eq!(record.get("姓名"), Some("张三"));
        assert_eq!(record.get("科室"), Some("心血管内科"));
        assert_eq!(record.get("个人学术任职"), Some("未提及"));
        assert_eq!(record.get("擅长的临床领域"), Some("冠心病介入治疗"));
        assert_eq!(record.filled_count(), 8);
    }

    #[test]
    fn test_last_matching_line_wins() {
        let record = parse_record("Title: A\nTitle: B", &title_schema());
        assert_eq!(record.get("Title"), Some("B"));
    }

    #[test]
    fn test_label_substring_match() {
        let record = parse_record("**Doctor Name**: Alice\n- Title (current): Chief", &title_schema());
        assert_eq!(record.get("Name"), Some("Alice"));
        assert_eq!(record.get("Title"), Some("Chief"));
    }

    #[test]
    fn test_first_field_in_schema_order_wins_per_line() {
        // "Name Title" は両方に一致するがスキーマ順で Name のみ
        let record = parse_record("Name Title: X", &title_schema());
        assert_eq!(record.get("Name"), Some("X"));
        assert_eq!(record.get("Title"), Some(""));
    }

    #[test]
    fn test_split_on_first_colon_only() {
        let record = parse_record("Title: Clinic 08:00-12:00", &title_schema());
        assert_eq!(record.get("Title"), Some("Clinic 08:00-12:00"));
    }

    #[test]
    fn test_missing_fields_are_empty() {
        let record = parse_record("Name: Alice", &title_schema());
        assert_eq!(record.get("Title"), Some(""));

        let record = parse_record("", &title_schema());
        assert_eq!(record.get("Name"), Some(""));
        assert_eq!(record.get("Title"), Some(""));
    }

    #[test]
    fn test_lines_without_colon_or_unknown_label_ignored() {
        let reply = "Here is the summary\nHobby: golf\nName Alice\nName: Alice";
        let record = parse_record(reply, &title_schema());
        assert_eq!(record.get("Name"), Some("Alice"));
        assert_eq!(record.get("Title"), Some(""));
    }

    #[test]
    fn test_fullwidth_colon_is_not_a_separator() {
        let record = parse_record("姓名：张三", &FieldSchema::default());
        assert_eq!(record.get("姓名"), Some(""));
    }

    #[test]
    fn test_crlf_lines() {
        let record = parse_record("Name: Alice\r\nTitle: Chief\r\n", &title_schema());
        assert_eq!(record.get("Name"), Some("Alice"));
        assert_eq!(record.get("Title"), Some("Chief"));
    }

    #[test]
    fn test_reparse_canonical_text_is_identity() {
        let schema = FieldSchema::default();
        let reply = "前置说明\n姓名: 李四\n学历:硕士\n  科室 :  骨科  \n擅长的临床领域: 关节置换: 膝关节";
        let record = parse_record(reply, &schema);

        let reparsed = parse_record(&to_canonical_text(&record), &schema);
        assert_eq!(reparsed, record);
    }

    #[test]
    fn test_canonical_text_format() {
        let record = parse_record("Title: Chief", &title_schema());
        assert_eq!(to_canonical_text(&record), "Name: \nTitle: Chief");
    }
}
