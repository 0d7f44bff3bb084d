//! /api/chat のリクエスト・レスポンス型

use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub stream: bool,
}

#[derive(Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
    /// Base64画像（ビジョンモデル用）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
}

impl<'a> ChatRequest<'a> {
    /// userメッセージ1件だけのリクエスト
    pub fn user(model: &'a str, content: &'a str, stream: bool) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content,
                images: None,
            }],
            stream,
        }
    }
}

/// 完了レスポンス、およびストリーミングの1行
#[derive(Deserialize, Debug)]
pub(crate) struct ChatResponse {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_request_body() {
        let request = ChatRequest::user("deepseek-r1:70b", "こんにちは", false);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "model": "deepseek-r1:70b",
                "messages": [{"role": "user", "content": "こんにちは"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let body = r#"{"model":"m","created_at":"t","message":{"role":"assistant","content":"姓名: 张三"},"done":true,"eval_count":12}"#;
        let response: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.message.content, "姓名: 张三");
    }
}
