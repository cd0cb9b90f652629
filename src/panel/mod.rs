/*!
 * 摘要面板
 *
 * SummarySink 保存最新一条摘要文本，并在有展示面挂载时以
 * `{type:"summary"|"status", value}` 消息转发给它。
 * 未挂载时文本仍被保留，面板稍后挂载会用最后已知值初始化。
 */

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 宿主 → 面板 消息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PanelMessage {
    Summary { value: String },
    Status { value: String },
}

/// 面板展示面，由宿主注册
pub trait PanelSurface: Send + Sync {
    fn post_message(&self, message: &PanelMessage);
}

struct SinkInner {
    last_summary: String,
    surface: Option<Arc<dyn PanelSurface>>,
}

/// 摘要汇点：单值存储 + 面板转发，独立于请求逻辑
pub struct SummarySink {
    inner: Mutex<SinkInner>,
}

impl SummarySink {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SinkInner {
                last_summary: String::new(),
                surface: None,
            }),
        }
    }

    /// 挂载展示面并用最后已知值初始化
    pub fn attach_surface(&self, surface: Arc<dyn PanelSurface>) {
        let mut inner = self.inner.lock();
        surface.post_message(&PanelMessage::Summary {
            value: inner.last_summary.clone(),
        });
        inner.surface = Some(surface);
    }

    pub fn detach_surface(&self) {
        self.inner.lock().surface = None;
    }

    pub fn set_summary(&self, text: &str) {
        let mut inner = self.inner.lock();
        inner.last_summary = text.to_string();
        if let Some(surface) = &inner.surface {
            surface.post_message(&PanelMessage::Summary {
                value: text.to_string(),
            });
        }
    }

    pub fn clear(&self) {
        self.set_summary("");
    }

    /// 状态行只转发，不保留历史
    pub fn set_status(&self, text: &str) {
        let inner = self.inner.lock();
        if let Some(surface) = &inner.surface {
            surface.post_message(&PanelMessage::Status {
                value: text.to_string(),
            });
        }
    }

    pub fn last_summary(&self) -> String {
        self.inner.lock().last_summary.clone()
    }
}

impl Default for SummarySink {
    fn default() -> Self {
        Self::new()
    }
}
