/*!
 * 配置系统
 *
 * TOML 配置文件，缺省字段回落到 defaults 模块。
 * 文件不存在时直接使用默认配置。
 */

pub mod defaults;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// 远程模型标识
    #[serde(default = "defaults::default_model")]
    pub model: String,

    /// API 基础地址，None 使用提供商默认
    #[serde(default)]
    pub api_url: Option<String>,

    /// 配置层的 API key（优先级低于宿主安全存储）
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "defaults::default_temperature")]
    pub temperature: f32,

    #[serde(default = "defaults::default_max_tokens")]
    pub max_tokens: u32,

    /// 选区静默间隔（毫秒）
    #[serde(default = "defaults::default_quiet_interval_ms")]
    pub quiet_interval_ms: u64,

    /// 摘要条目数范围 (min, max)
    #[serde(default = "defaults::default_bullet_range")]
    pub bullet_range: (u8, u8),
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            model: defaults::default_model(),
            api_url: None,
            api_key: None,
            temperature: defaults::default_temperature(),
            max_tokens: defaults::default_max_tokens(),
            quiet_interval_ms: defaults::default_quiet_interval_ms(),
            bullet_range: defaults::default_bullet_range(),
        }
    }
}

impl SummaryConfig {
    /// 从指定路径加载；None 使用平台默认配置路径
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("无法读取配置文件: {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).with_context(|| format!("配置解析失败: {}", path.display()))?;
        Ok(config)
    }

    pub fn quiet_interval(&self) -> Duration {
        Duration::from_millis(self.quiet_interval_ms)
    }
}

/// 平台默认配置路径: <config_dir>/glance/config.toml
pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let config_dir = dirs::config_dir().context("无法确定平台配置目录")?;
    Ok(config_dir.join("glance").join("config.toml"))
}
