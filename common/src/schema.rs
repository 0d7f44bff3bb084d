//! フィールドスキーマ
//!
//! ポスターから抽出する医師情報の項目定義:
//! - DEFAULT_FIELDS: 既定の抽出項目（ラベル, プロンプト用ヒント）
//! - PROVENANCE_COLUMNS: 画像の出所を示す追加列
//! - FieldSchema: 1回の実行で固定される項目リスト

use serde::{Deserialize, Serialize};

/// 既定の抽出項目 (ラベル, ヒント)
///
/// ラベルはAIへの出力指示とパース時の照合の両方に使うため、
/// 回答側の言語（中国語）に合わせている。
pub const DEFAULT_FIELDS: &[(&str, &str)] = &[
    ("姓名", "医生姓名"),
    ("学历", "学历信息"),
    ("科室", "科室信息"),
    ("职称", "职称信息"),
    ("职位", "职位信息"),
    ("开诊时间", "开诊时间"),
    ("个人学术任职", "学术任职"),
    ("擅长的临床领域", "擅长领域"),
];

/// 画像パス列
pub const COLUMN_IMAGE_PATH: &str = "图片路径";
/// ファイル名列
pub const COLUMN_FILE_NAME: &str = "文件名";
/// ディレクトリ列
pub const COLUMN_DIRECTORY: &str = "目录路径";

/// 出所列（スキーマ列の後ろに並ぶ）
pub const PROVENANCE_COLUMNS: [&str; 3] = [COLUMN_IMAGE_PATH, COLUMN_FILE_NAME, COLUMN_DIRECTORY];

/// 抽出項目1件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,

    /// プロンプトの `名前: [ヒント]` 部分。空ならラベルをそのまま使う
    #[serde(default)]
    pub hint: String,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }

    /// プロンプト表示用のヒント
    pub fn display_hint(&self) -> &str {
        if self.hint.is_empty() {
            &self.name
        } else {
            &self.hint
        }
    }
}

/// 抽出項目の順序付きリスト
///
/// 並び順は出力列の順序であり、パース時の照合優先順位でもある。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// 空ラベルと重複ラベルは除外する（先勝ち）
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        let mut unique: Vec<FieldSpec> = Vec::with_capacity(fields.len());
        for field in fields {
            let name = field.name.trim();
            if name.is_empty() || unique.iter().any(|f| f.name == name) {
                continue;
            }
            unique.push(FieldSpec::new(name, field.hint.trim()));
        }
        Self { fields: unique }
    }

    /// ラベルのみから生成（ヒントなし）
    pub fn from_names(names: &[&str]) -> Self {
        Self::new(names.iter().map(|n| FieldSpec::new(*n, "")).collect())
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 出力表の列名（スキーマ列 + 出所列）
    pub fn columns(&self) -> Vec<String> {
        self.names()
            .chain(PROVENANCE_COLUMNS.iter().copied())
            .map(str::to_string)
            .collect()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::new(
            DEFAULT_FIELDS
                .iter()
                .map(|(name, hint)| FieldSpec::new(*name, *hint))
                .collect(),
        )
    }
}
