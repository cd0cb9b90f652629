/*!
 * 请求生命周期控制
 *
 * 单槽位取消令牌：每次新请求先取消上一个，再打开流式完成调用，
 * 逐片段转发给摘要汇点。取消是协作式的，在片段边界检查；
 * 已推送的部分文本不回滚。无论成功、取消或出错，
 * 退出前都会清除加载状态。
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::SummaryConfig;
use crate::credentials::{CredentialResolver, API_KEY_ENV};
use crate::host::EditorHost;
use crate::llm::{CompletionMessage, CompletionProvider, CompletionRequest, LlmError, LlmResult, StreamChunk};
use crate::panel::SummarySink;

/// 凭证缺失时的引导信息，列出全部三个可配置位置
pub const MISSING_CREDENTIAL_NOTICE: &str = "No API key found. Register one with the \
\"Glance: Set API Key\" command, set `api_key` in the Glance config file, or export \
the GLANCE_API_KEY environment variable.";

const STATUS_SUMMARIZING: &str = "Summarizing…";

pub struct Summarizer {
    config: SummaryConfig,
    provider: Arc<dyn CompletionProvider>,
    resolver: CredentialResolver,
    sink: Arc<SummarySink>,
    host: Arc<dyn EditorHost>,
    /// 单槽位"当前请求"令牌，新请求开始时整体替换
    current: Mutex<Option<CancellationToken>>,
}

impl Summarizer {
    pub fn new(
        config: SummaryConfig,
        provider: Arc<dyn CompletionProvider>,
        resolver: CredentialResolver,
        sink: Arc<SummarySink>,
        host: Arc<dyn EditorHost>,
    ) -> Self {
        Self {
            config,
            provider,
            resolver,
            sink,
            host,
            current: Mutex::new(None),
        }
    }

    /// 对一段选中文本执行一次完整的摘要生命周期。
    ///
    /// 调用方视角 fire-and-forget：所有失败都通过汇点或宿主通知呈现，
    /// 不向上抛出。
    pub async fn run(&self, text: String) {
        let token = self.begin_request();

        self.sink.clear();
        self.host.set_loading(true);
        self.sink.set_status(STATUS_SUMMARIZING);

        match self.resolver.resolve().await {
            Some(api_key) => {
                if let Err(err) = self.stream_summary(&text, &api_key, &token).await {
                    if token.is_cancelled() {
                        tracing::debug!("Summary request superseded, discarding error: {}", err);
                    } else {
                        tracing::error!("❌ Summarization failed: {}", err);
                        self.sink.set_summary(&format!("Error: {}", err));
                    }
                }
            }
            None => {
                tracing::warn!("No API credential in store, config, or ${}", API_KEY_ENV);
                self.host.show_notice(MISSING_CREDENTIAL_NOTICE);
            }
        }

        // 被取代的请求不再碰状态行，它已归后继请求所有
        if !token.is_cancelled() {
            self.sink.set_status("");
        }
        self.host.set_loading(false);
    }

    /// 取消当前在途请求（宿主停用时调用）
    pub fn cancel_current(&self) {
        if let Some(token) = self.current.lock().take() {
            token.cancel();
        }
    }

    /// 取消上一个请求并安装新的令牌
    fn begin_request(&self) -> CancellationToken {
        let token = CancellationToken::new();
        let mut current = self.current.lock();
        if let Some(previous) = current.replace(token.clone()) {
            previous.cancel();
        }
        token
    }

    fn build_request(&self, text: &str) -> CompletionRequest {
        let (min, max) = self.config.bullet_range;
        let instruction = format!(
            "You are a concise assistant. Summarize the provided text in {}-{} bullet \
             points, preserving key facts and terminology.",
            min, max
        );

        CompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                CompletionMessage::system(instruction),
                CompletionMessage::user(format!("Summarize this selection:\n\n{}", text)),
            ],
            temperature: Some(self.config.temperature),
            max_tokens: Some(self.config.max_tokens),
            stream: true,
        }
    }

    /// 消费流并把累积文本逐步推给汇点
    async fn stream_summary(
        &self,
        text: &str,
        api_key: &str,
        token: &CancellationToken,
    ) -> LlmResult<()> {
        let request = self.build_request(text);

        tracing::info!("🚀 Starting summary stream: model={}", request.model);
        let start = Instant::now();

        let mut stream = self.provider.open_stream(&request, api_key).await?;

        let mut accumulated = String::new();
        let mut fragment_count: u64 = 0;

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::warn!(
                        "⏸️  Summary stream cancelled (fragments={}, elapsed_ms={})",
                        fragment_count,
                        start.elapsed().as_millis()
                    );
                    return Ok(());
                }
                item = stream.next() => {
                    // 片段边界检查：令牌一旦触发就不再推送任何更新
                    if token.is_cancelled() {
                        tracing::warn!(
                            "⏸️  Summary stream cancelled (fragments={}, elapsed_ms={})",
                            fragment_count,
                            start.elapsed().as_millis()
                        );
                        return Ok(());
                    }
                    match item {
                        Some(Ok(StreamChunk::Delta { content })) => {
                            if let Some(fragment) = content {
                                fragment_count += 1;
                                accumulated.push_str(&fragment);
                                self.sink.set_summary(&accumulated);
                            }
                        }
                        Some(Ok(StreamChunk::Finish { finish_reason })) => {
                            tracing::debug!("Summary stream finish event: {}", finish_reason);
                        }
                        Some(Ok(StreamChunk::Error { error })) => {
                            return Err(LlmError::Stream { message: error });
                        }
                        Some(Err(err)) => return Err(err),
                        None => break,
                    }
                }
            }
        }

        if token.is_cancelled() {
            return Ok(());
        }

        tracing::info!(
            "✅ Summary stream completed (fragments={}, elapsed_ms={})",
            fragment_count,
            start.elapsed().as_millis()
        );
        self.sink.set_summary(accumulated.trim());
        Ok(())
    }
}
