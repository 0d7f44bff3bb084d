//! Poster AI Common Library
//!
//! CLIから使うIO非依存の型とユーティリティ

pub mod error;
pub mod export;
pub mod parser;
pub mod prompts;
pub mod schema;
pub mod types;

pub use error::{Error, Result};
pub use parser::{parse_record, to_canonical_text};
pub use prompts::{build_summary_prompt, NOT_MENTIONED, OCR_PROMPT};
pub use schema::{FieldSchema, FieldSpec, DEFAULT_FIELDS, PROVENANCE_COLUMNS};
pub use types::{FieldFill, FieldValue, Provenance, Record, ReportRow, ReportTable};
