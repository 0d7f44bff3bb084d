//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    /// 一覧表のExcel化に失敗（context は失敗した書き込み段階）
    #[error("Excel生成エラー ({context}): {message}")]
    Excel {
        context: &'static str,
        message: String,
    },
}

impl Error {
    /// `map_err` 用: 下位エラーを段階名付きで包む
    pub fn excel<E: std::fmt::Display>(context: &'static str) -> impl FnOnce(E) -> Self {
        move |e| Error::Excel {
            context,
            message: e.to_string(),
        }
    }
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
