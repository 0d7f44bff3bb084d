//! ローカルLLM（Ollama互換 /api/chat）連携モジュール
//!
//! - 完了モード: 1リクエストで回答全文を取得（非2xxはエラー文字列を返す）
//! - ストリーミングモード: NDJSONの1行ごとに断片を返すStream

mod client;
pub(crate) mod wire;

pub use client::{is_fail_soft_reply, ChatClient, ChatStream, DEFAULT_ENDPOINT, DEFAULT_MODEL};

use crate::error::Result;
use async_trait::async_trait;

/// 要約に使うチャットモデル
///
/// バッチ処理はこのトレイト経由で呼ぶ（テストではフェイクに差し替え）
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// モデル名（キャッシュの一致判定に使う）
    fn model(&self) -> &str;

    /// 回答が非2xx時の代替文字列か（キャッシュしない）
    fn is_placeholder(&self, reply: &str) -> bool {
        is_fail_soft_reply(reply)
    }
}
