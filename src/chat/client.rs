use super::wire::{ChatRequest, ChatResponse};
use super::ChatModel;
use crate::config::Config;
use crate::error::{PosterAiError, Result};
use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_MODEL: &str = "deepseek-r1:70b";

/// 非2xx時に返す代替文字列 `Error: {status} - {body}` か
pub fn is_fail_soft_reply(reply: &str) -> bool {
    reply
        .strip_prefix("Error: ")
        .and_then(|rest| rest.split_once(" - "))
        .is_some_and(|(code, _)| code.len() == 3 && code.parse::<u16>().is_ok())
}

/// 回答断片のストリーム（接続終了で終わる。再開不可）
pub type ChatStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
}

impl ChatClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint(),
            model: config.chat_model.clone(),
        })
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 完了モード
    ///
    /// 非2xxのときはエラーにせず `Error: {status} - {body}` を返す。
    /// 接続失敗やレスポンスのパース失敗は `Err`。
    pub async fn chat_complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::user(&self.model, prompt, false);
        debug!(model = %self.model, prompt_chars = prompt.chars().count(), "chat request");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "chat response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "chat request failed");
            return Ok(format!("Error: {} - {}", status.as_u16(), body));
        }

        let body = response.text().await?;
        let data: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            PosterAiError::ApiParse(format!("{}: {}", e, preview))
        })?;

        Ok(data.message.content)
    }

    /// ストリーミングモード
    ///
    /// 1行1JSONのレスポンスを読み、行ごとに `message.content` を返す。
    pub async fn chat_stream(&self, prompt: &str) -> Result<ChatStream> {
        let request = ChatRequest::user(&self.model, prompt, true);
        debug!(model = %self.model, "chat stream request");

        let response = self.http.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PosterAiError::ApiCall(format!(
                "{} - {}",
                status.as_u16(),
                body
            )));
        }

        Ok(Box::pin(ndjson_fragments(response.bytes_stream().boxed())))
    }
}

#[async_trait]
impl ChatModel for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat_complete(prompt).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

struct LineReader<S> {
    bytes: S,
    buffer: Vec<u8>,
    finished: bool,
}

impl<S> LineReader<S> {
    /// バッファから空でない1行を取り出す。終端後は改行なしの残りも返す
    fn take_line(&mut self) -> Option<Vec<u8>> {
        while let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if !is_blank(&line) {
                return Some(line);
            }
        }

        if self.finished && !is_blank(&self.buffer) {
            return Some(std::mem::take(&mut self.buffer));
        }

        None
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

/// バイト列ストリームをNDJSON行単位の回答断片に変換
///
/// チャンク境界で分断された行は結合してからデコードする。
/// 受信エラーは1度だけ返してストリームを終える。
pub(crate) fn ndjson_fragments<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>>
where
    S: Stream<Item = std::result::Result<B, E>> + Unpin,
    B: AsRef<[u8]>,
    E: Into<PosterAiError>,
{
    let reader = LineReader {
        bytes,
        buffer: Vec::new(),
        finished: false,
    };

    stream::unfold(reader, |mut reader| async move {
        loop {
            if let Some(line) = reader.take_line() {
                return Some((decode_fragment(&line), reader));
            }
            if reader.finished {
                return None;
            }

            match reader.bytes.next().await {
                Some(Ok(chunk)) => reader.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    reader.finished = true;
                    reader.buffer.clear();
                    return Some((Err(e.into()), reader));
                }
                None => reader.finished = true,
            }
        }
    })
}

fn decode_fragment(line: &[u8]) -> Result<String> {
    serde_json::from_slice::<ChatResponse>(line)
        .map(|data| data.message.content)
        .map_err(|e| PosterAiError::ApiParse(format!("ストリーム行のJSONパースに失敗: {}", e)))
}
