/*!
 * 引擎装配与宿主命令面
 *
 * SummaryEngine 把配置、凭证链、提供商、汇点和防抖器接在一起，
 * 并暴露宿主需要的全部操作。
 */

use std::sync::Arc;

use crate::config::SummaryConfig;
use crate::credentials::{CredentialResolver, SecretStore, API_KEY_SECRET};
use crate::host::EditorHost;
use crate::llm::{CompletionProvider, OpenAiCompatibleProvider};
use crate::panel::{PanelSurface, SummarySink};
use crate::selection::{SelectionDebouncer, SelectionEvent};
use crate::summarizer::Summarizer;

pub struct SummaryEngine {
    sink: Arc<SummarySink>,
    summarizer: Arc<Summarizer>,
    debouncer: SelectionDebouncer,
    secret_store: Arc<dyn SecretStore>,
    host: Arc<dyn EditorHost>,
}

impl SummaryEngine {
    /// 以内建的 OpenAI 兼容提供商装配引擎
    pub fn new(
        config: SummaryConfig,
        host: Arc<dyn EditorHost>,
        secret_store: Arc<dyn SecretStore>,
    ) -> Self {
        let provider = Arc::new(OpenAiCompatibleProvider::new(config.api_url.clone()));
        Self::with_provider(config, host, secret_store, provider)
    }

    /// 注入自定义提供商（测试用）
    pub fn with_provider(
        config: SummaryConfig,
        host: Arc<dyn EditorHost>,
        secret_store: Arc<dyn SecretStore>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let sink = Arc::new(SummarySink::new());
        let resolver = CredentialResolver::layered(secret_store.clone(), config.api_key.clone());
        let summarizer = Arc::new(Summarizer::new(
            config.clone(),
            provider,
            resolver,
            sink.clone(),
            host.clone(),
        ));
        let debouncer =
            SelectionDebouncer::new(summarizer.clone(), sink.clone(), config.quiet_interval());

        Self {
            sink,
            summarizer,
            debouncer,
            secret_store,
            host,
        }
    }

    /// 选区变化通知，防抖后触发摘要
    pub fn on_selection_changed(&self, event: SelectionEvent) {
        self.debouncer.on_selection_changed(event);
    }

    /// 手动触发命令，绕过防抖。空白文本是 no-op。
    pub async fn refresh(&self, text: impl Into<String>) {
        let text = text.into();
        if text.trim().is_empty() {
            return;
        }
        self.summarizer.run(text).await;
    }

    /// 把最后一条摘要原样写入宿主剪贴板
    pub fn copy_summary(&self) -> anyhow::Result<()> {
        let value = self.sink.last_summary();
        self.host.write_clipboard(&value)?;
        self.host.show_notice("Summary copied to clipboard");
        Ok(())
    }

    /// 注册面板展示面，回放最后已知摘要
    pub fn attach_panel(&self, surface: Arc<dyn PanelSurface>) {
        self.sink.attach_surface(surface);
    }

    /// 持久化 API key（宿主的密钥录入流程落点）
    pub async fn store_api_key(&self, key: &str) -> anyhow::Result<()> {
        let trimmed = key.trim();
        if trimmed.is_empty() {
            anyhow::bail!("API key cannot be empty");
        }
        self.secret_store.set(API_KEY_SECRET, trimmed).await?;
        tracing::info!("API key stored in host secret store");
        Ok(())
    }

    pub fn last_summary(&self) -> String {
        self.sink.last_summary()
    }

    /// 宿主停用：取消在途请求和待触发的防抖任务
    pub fn shutdown(&self) {
        self.debouncer.cancel_pending();
        self.summarizer.cancel_current();
    }
}
