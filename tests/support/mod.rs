/*!
 * 测试支撑：脚本化提供商与宿主/面板/密钥存储模拟件
 */

#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use glance::llm::{ChunkStream, CompletionRequest, LlmError, LlmResult, StreamChunk};
use glance::{
    EditorHost, PanelMessage, PanelSurface, SecretStore, SelectionEvent, SummaryConfig,
    SummaryEngine,
};

// --- 提供商模拟 ---

enum Script {
    Open {
        items: Vec<LlmResult<StreamChunk>>,
        delay: Duration,
    },
    OpenError(String),
}

/// 按脚本逐次响应的提供商，记录收到的请求
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<CompletionRequest>>,
    api_keys: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            scripts: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            api_keys: Mutex::new(Vec::new()),
        })
    }

    pub fn push_fragments(&self, fragments: &[&str]) {
        self.push_fragments_with_delay(fragments, Duration::ZERO);
    }

    pub fn push_fragments_with_delay(&self, fragments: &[&str], delay: Duration) {
        let mut items: Vec<LlmResult<StreamChunk>> = fragments
            .iter()
            .map(|f| {
                Ok(StreamChunk::Delta {
                    content: Some(f.to_string()),
                })
            })
            .collect();
        items.push(Ok(StreamChunk::Finish {
            finish_reason: "stop".to_string(),
        }));
        self.scripts.lock().push_back(Script::Open { items, delay });
    }

    /// 先给出片段，随后流内出错
    pub fn push_fragments_then_error(&self, fragments: &[&str], error: &str) {
        let mut items: Vec<LlmResult<StreamChunk>> = fragments
            .iter()
            .map(|f| {
                Ok(StreamChunk::Delta {
                    content: Some(f.to_string()),
                })
            })
            .collect();
        items.push(Err(LlmError::Stream {
            message: error.to_string(),
        }));
        self.scripts.lock().push_back(Script::Open {
            items,
            delay: Duration::ZERO,
        });
    }

    /// 连请求都打不开（非 2xx 等）
    pub fn push_open_error(&self, message: &str) {
        self.scripts
            .lock()
            .push_back(Script::OpenError(message.to_string()));
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }

    pub fn api_keys(&self) -> Vec<String> {
        self.api_keys.lock().clone()
    }
}

#[async_trait]
impl glance::CompletionProvider for ScriptedProvider {
    async fn open_stream(
        &self,
        request: &CompletionRequest,
        api_key: &str,
    ) -> LlmResult<ChunkStream> {
        self.requests.lock().push(request.clone());
        self.api_keys.lock().push(api_key.to_string());

        let script = self.scripts.lock().pop_front();
        match script {
            Some(Script::Open { items, delay }) => {
                let stream = futures::stream::iter(items).then(move |item| async move {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    item
                });
                Ok(Box::pin(stream))
            }
            Some(Script::OpenError(message)) => Err(LlmError::Api {
                status: 500,
                message,
            }),
            None => Err(LlmError::Configuration {
                message: "no scripted response".to_string(),
            }),
        }
    }
}

// --- 宿主模拟 ---

pub struct MockHost {
    loading_history: Mutex<Vec<bool>>,
    notices: Mutex<Vec<String>>,
    clipboard: Mutex<Option<String>>,
}

impl MockHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            loading_history: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
            clipboard: Mutex::new(None),
        })
    }

    pub fn loading_history(&self) -> Vec<bool> {
        self.loading_history.lock().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading_history.lock().last().copied().unwrap_or(false)
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().clone()
    }

    pub fn clipboard(&self) -> Option<String> {
        self.clipboard.lock().clone()
    }
}

impl EditorHost for MockHost {
    fn set_loading(&self, loading: bool) {
        self.loading_history.lock().push(loading);
    }

    fn show_notice(&self, message: &str) {
        self.notices.lock().push(message.to_string());
    }

    fn write_clipboard(&self, text: &str) -> anyhow::Result<()> {
        *self.clipboard.lock() = Some(text.to_string());
        Ok(())
    }
}

// --- 面板模拟 ---

pub struct MockSurface {
    messages: Mutex<Vec<PanelMessage>>,
}

impl MockSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<PanelMessage> {
        self.messages.lock().clone()
    }

    /// 只看 summary 消息的值序列
    pub fn summary_values(&self) -> Vec<String> {
        self.messages
            .lock()
            .iter()
            .filter_map(|m| match m {
                PanelMessage::Summary { value } => Some(value.clone()),
                PanelMessage::Status { .. } => None,
            })
            .collect()
    }
}

impl PanelSurface for MockSurface {
    fn post_message(&self, message: &PanelMessage) {
        self.messages.lock().push(message.clone());
    }
}

// --- 密钥存储模拟 ---

pub struct MemorySecretStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySecretStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            values: Mutex::new(HashMap::new()),
        })
    }

    pub fn with_key(key: &str, value: &str) -> Arc<Self> {
        let store = Self::new();
        store.values.lock().insert(key.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- 装配助手 ---

/// 配置层直接带 key 的测试配置
pub fn test_config() -> SummaryConfig {
    SummaryConfig {
        api_key: Some("cfg-key".to_string()),
        ..Default::default()
    }
}

/// 标准测试装配：脚本化提供商 + 配置层凭证
pub fn test_engine() -> (SummaryEngine, Arc<MockHost>, Arc<ScriptedProvider>) {
    let host = MockHost::new();
    let provider = ScriptedProvider::new();
    let engine = SummaryEngine::with_provider(
        test_config(),
        host.clone(),
        MemorySecretStore::new(),
        provider.clone(),
    );
    (engine, host, provider)
}

pub fn selection(text: &str) -> SelectionEvent {
    SelectionEvent::new(text)
}
