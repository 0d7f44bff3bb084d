//! 抽出結果の型定義
//!
//! CLIとテストで共有される型:
//! - Record: 1画像分の抽出結果（スキーマ項目 → 値）
//! - Provenance: 画像の出所（パス・ファイル名・ディレクトリ）
//! - ReportRow / ReportTable: 最終出力の一覧表

use crate::schema::{FieldSchema, PROVENANCE_COLUMNS};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::path::Path;

/// 項目名と値の組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

/// 1画像分の抽出結果
///
/// スキーマの全項目を必ず持つ。未抽出の項目は空文字。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<FieldValue>,
}

impl Record {
    /// 全項目を空文字で初期化
    pub fn empty(schema: &FieldSchema) -> Self {
        Self {
            fields: schema
                .names()
                .map(|name| FieldValue {
                    name: name.to_string(),
                    value: String::new(),
                })
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|f| (f.name.as_str(), f.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 空でない項目数
    pub fn filled_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.value.trim().is_empty()).count()
    }

    /// スキーマと同じ項目構成か（キャッシュ互換性チェック用）
    pub fn matches_schema(&self, schema: &FieldSchema) -> bool {
        self.fields.len() == schema.len()
            && self.fields.iter().zip(schema.names()).all(|(f, n)| f.name == n)
    }

    pub(crate) fn set(&mut self, index: usize, value: String) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value;
        }
    }
}

/// 画像の出所
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    /// 画像ファイルのパス
    pub image_path: String,
    /// ファイル名のみ
    pub file_name: String,
    /// 画像を含むディレクトリ
    pub directory: String,
}

impl Provenance {
    pub fn from_path(path: &Path) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let directory = path
            .parent()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        Self {
            image_path: path.display().to_string(),
            file_name,
            directory,
        }
    }
}

/// 一覧表の1行（抽出結果 + 出所）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub record: Record,
    pub provenance: Provenance,
}

impl ReportRow {
    pub fn new(record: Record, provenance: Provenance) -> Self {
        Self { record, provenance }
    }

    /// 列順の値
    pub fn values(&self) -> Vec<&str> {
        self.record
            .iter()
            .map(|(_, v)| v)
            .chain([
                self.provenance.image_path.as_str(),
                self.provenance.file_name.as_str(),
                self.provenance.directory.as_str(),
            ])
            .collect()
    }
}

/// 列順を保ったフラットなオブジェクトとして出力
impl Serialize for ReportRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len() + PROVENANCE_COLUMNS.len()))?;
        for (name, value) in self.record.iter() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(PROVENANCE_COLUMNS[0], &self.provenance.image_path)?;
        map.serialize_entry(PROVENANCE_COLUMNS[1], &self.provenance.file_name)?;
        map.serialize_entry(PROVENANCE_COLUMNS[2], &self.provenance.directory)?;
        map.end()
    }
}

/// 列ごとの充填状況
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFill {
    pub column: String,
    pub filled: usize,
    pub total: usize,
}

/// 一覧表
///
/// 処理順に並んだ行の集合。0行も正常な状態。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportTable {
    columns: Vec<String>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn empty(schema: &FieldSchema) -> Self {
        Self::from_rows(schema, Vec::new())
    }

    pub fn from_rows(schema: &FieldSchema, rows: Vec<ReportRow>) -> Self {
        Self {
            columns: schema.columns(),
            rows,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// (行数, 列数)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    /// 列ごとの非空値の件数（前後空白は除いて判定）
    pub fn fill_rates(&self) -> Vec<FieldFill> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, column)| FieldFill {
                column: column.clone(),
                filled: self
                    .rows
                    .iter()
                    .filter(|row| {
                        row.values()
                            .get(idx)
                            .is_some_and(|v| !v.trim().is_empty())
                    })
                    .count(),
                total: self.rows.len(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_record;

    fn schema() -> FieldSchema {
        FieldSchema::from_names(&["Name", "Title"])
    }

    #[test]
    fn test_record_empty_has_all_fields() {
        let record = Record::empty(&schema());
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("Name"), Some(""));
        assert_eq!(record.get("Title"), Some(""));
        assert_eq!(record.get("Unknown"), None);
        assert_eq!(record.filled_count(), 0);
    }

    #[test]
    fn test_provenance_from_path() {
        let provenance = Provenance::from_path(Path::new("/x/y/img.jpg"));
        assert_eq!(provenance.image_path, "/x/y/img.jpg");
        assert_eq!(provenance.file_name, "img.jpg");
        assert_eq!(provenance.directory, "/x/y");
    }

    #[test]
    fn test_row_values_in_column_order() {
        let record = parse_record("Name: Alice\nTitle: Chief", &schema());
        let row = ReportRow::new(record, Provenance::from_path(Path::new("/a/b.jpg")));
        assert_eq!(row.values(), vec!["Alice", "Chief", "/a/b.jpg", "b.jpg", "/a"]);
    }

    #[test]
    fn test_row_serializes_as_flat_object() {
        let record = parse_record("Name: Alice", &schema());
        let row = ReportRow::new(record, Provenance::from_path(Path::new("/a/b.jpg")));
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(
            json,
            r#"{"Name":"Alice","Title":"","图片路径":"/a/b.jpg","文件名":"b.jpg","目录路径":"/a"}"#
        );
    }

    #[test]
    fn test_fill_rates() {
        let schema = schema();
        let rows = vec![
            ReportRow::new(
                parse_record("Name: Alice\nTitle:   ", &schema),
                Provenance::from_path(Path::new("/a/1.jpg")),
            ),
            ReportRow::new(
                parse_record("Name: Bob\nTitle: Chief", &schema),
                Provenance::from_path(Path::new("/a/2.jpg")),
            ),
        ];
        let table = ReportTable::from_rows(&schema, rows);

        assert_eq!(table.shape(), (2, 5));
        let fills = table.fill_rates();
        assert_eq!(fills[0], FieldFill { column: "Name".into(), filled: 2, total: 2 });
        assert_eq!(fills[1], FieldFill { column: "Title".into(), filled: 1, total: 2 });
        assert_eq!(fills[4].filled, 2);
    }

    #[test]
    fn test_empty_table() {
        let table = ReportTable::empty(&schema());
        assert!(table.is_empty());
        assert_eq!(table.shape(), (0, 5));
        assert!(table.fill_rates().iter().all(|f| f.filled == 0 && f.total == 0));
    }

    #[test]
    fn test_matches_schema() {
        let record = Record::empty(&schema());
        assert!(record.matches_schema(&schema()));
        assert!(!record.matches_schema(&FieldSchema::default()));
    }
}
