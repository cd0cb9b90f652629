//! 宿主编辑器协作接口

/// 宿主编辑器提供的能力：加载指示、通知、剪贴板
pub trait EditorHost: Send + Sync {
    /// 切换加载指示（对应宿主的 spinner / context key）
    fn set_loading(&self, loading: bool);

    /// 展示一条用户可见的通知
    fn show_notice(&self, message: &str);

    /// 写入系统剪贴板
    fn write_clipboard(&self, text: &str) -> anyhow::Result<()>;
}
