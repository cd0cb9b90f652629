use async_trait::async_trait;
use eventsource_stream::Eventsource;
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::pin::Pin;
use tokio_stream::Stream;

use crate::llm::{
    error::{LlmError, LlmResult},
    types::{CompletionRequest, StreamChunk},
};

pub type ChunkStream = Pin<Box<dyn Stream<Item = LlmResult<StreamChunk>> + Send>>;

/// 完成服务提供商的统一接口
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// 打开一次流式完成调用；API key 由调用方在请求时解析传入
    async fn open_stream(&self, request: &CompletionRequest, api_key: &str)
        -> LlmResult<ChunkStream>;
}

/// OpenAI 兼容 Provider
///
/// 通过 chat/completions 端点的 SSE 流获取增量文本
pub struct OpenAiCompatibleProvider {
    client: Client,
    api_url: Option<String>,
}

impl OpenAiCompatibleProvider {
    pub fn new(api_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            api_url,
        }
    }

    // --- Private Helper Methods ---

    fn get_endpoint(&self) -> String {
        let base = self.api_url.as_deref().unwrap_or("https://api.openai.com/v1");
        format!("{}/chat/completions", base)
    }

    fn build_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": request.model,
            "messages": request.messages,
            "stream": true,
        });

        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(max_tokens) = request.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }

    fn validate_request(request: &CompletionRequest) -> LlmResult<()> {
        if request.model.is_empty() {
            return Err(LlmError::InvalidRequest {
                reason: "Model identifier cannot be empty".to_string(),
            });
        }
        if request.messages.is_empty() {
            return Err(LlmError::InvalidRequest {
                reason: "Message list cannot be empty".to_string(),
            });
        }
        if let Some(temp) = request.temperature {
            if !(0.0..=2.0).contains(&temp) {
                return Err(LlmError::InvalidRequest {
                    reason: "Temperature must be between 0.0 and 2.0".to_string(),
                });
            }
        }
        Ok(())
    }

    fn handle_error_response(status: u16, body: &str) -> LlmError {
        if let Ok(error_json) = serde_json::from_str::<Value>(body) {
            if let Some(error_obj) = error_json["error"].as_object() {
                let message = error_obj["message"].as_str().unwrap_or("Unknown error");
                return LlmError::Api {
                    status,
                    message: message.to_string(),
                };
            }
        }
        LlmError::Api {
            status,
            message: body.to_string(),
        }
    }

    fn parse_stream_chunk(data: &str) -> Option<LlmResult<StreamChunk>> {
        // 流结束标记，真正的结束以流耗尽为准
        if data == "[DONE]" {
            return None;
        }

        let event_json: Value = match serde_json::from_str(data) {
            Ok(json) => json,
            Err(_) => return None, // 非 JSON 行忽略
        };

        // 流内错误事件
        if let Some(error_obj) = event_json["error"].as_object() {
            let message = error_obj["message"]
                .as_str()
                .unwrap_or("Unknown stream error")
                .to_string();
            return Some(Err(LlmError::Stream { message }));
        }

        let choice = event_json["choices"].as_array().and_then(|arr| arr.first())?;

        // finish_reason 优先于同一数据块内的增量，实测增量在此时总为空
        if let Some(reason) = choice["finish_reason"].as_str() {
            return Some(Ok(StreamChunk::Finish {
                finish_reason: reason.to_string(),
            }));
        }

        let content = choice["delta"]["content"].as_str().map(|s| s.to_string());
        content.map(|text| Ok(StreamChunk::Delta {
            content: Some(text),
        }))
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleProvider {
    async fn open_stream(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> LlmResult<ChunkStream> {
        Self::validate_request(request)?;

        let url = self.get_endpoint();
        let body = self.build_body(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::handle_error_response(status.as_u16(), &text));
        }

        let stream = response
            .bytes_stream()
            .eventsource()
            .filter_map(|event_result| {
                futures::future::ready(match event_result {
                    Ok(event) => Self::parse_stream_chunk(&event.data),
                    Err(e) => Some(Err(LlmError::Stream {
                        message: e.to_string(),
                    })),
                })
            });

        Ok(Box::pin(stream))
    }
}
