//! Glance 选区摘要引擎
//!
//! 监听编辑器选区变化，把选中文本发送到远程语言模型，
//! 将摘要流式写回侧边面板。宿主编辑器通过 trait 接入：
//! - 选区事件与手动命令（刷新、复制）
//! - 面板展示面与消息通道
//! - 安全密钥存储与剪贴板

// 模块声明
pub mod config; // 配置系统模块
pub mod credentials; // 凭证解析模块
pub mod engine; // 引擎装配与命令面
pub mod host; // 宿主编辑器协作接口
pub mod llm; // 远程模型流式调用模块
pub mod panel; // 摘要面板模块
pub mod selection; // 选区防抖模块
pub mod summarizer; // 请求生命周期控制模块

pub use config::SummaryConfig;
pub use credentials::{CredentialResolver, CredentialSource, SecretStore};
pub use engine::SummaryEngine;
pub use host::EditorHost;
pub use llm::{CompletionProvider, OpenAiCompatibleProvider};
pub use panel::{PanelMessage, PanelSurface, SummarySink};
pub use selection::{SelectionDebouncer, SelectionEvent};
pub use summarizer::{Summarizer, MISSING_CREDENTIAL_NOTICE};

use tracing_subscriber::EnvFilter;

/// 初始化日志订阅器，宿主或测试可选调用
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        #[cfg(debug_assertions)]
        let default_level = "debug,hyper_util=info,hyper=info,reqwest=info";
        #[cfg(not(debug_assertions))]
        let default_level = "info";

        EnvFilter::new(default_level)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .try_init();
}
