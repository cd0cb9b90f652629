/*!
 * 凭证解析
 *
 * API key 按固定顺序从三个来源解析：宿主安全存储 → 用户配置 → 进程环境变量。
 * 取第一个去除空白后非空的值；全部为空是正常结果而不是错误，
 * 调用方需要据此向用户展示引导信息。
 */

use async_trait::async_trait;
use std::sync::Arc;

/// 宿主安全存储中的固定键名
pub const API_KEY_SECRET: &str = "glance.apiKey";
/// 环境变量名
pub const API_KEY_ENV: &str = "GLANCE_API_KEY";

/// 宿主提供的安全密钥存储
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}

/// 单个凭证来源策略
#[async_trait]
pub trait CredentialSource: Send + Sync {
    async fn try_resolve(&self) -> Option<String>;
}

/// 安全存储来源
pub struct SecretStoreSource {
    store: Arc<dyn SecretStore>,
}

impl SecretStoreSource {
    pub fn new(store: Arc<dyn SecretStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl CredentialSource for SecretStoreSource {
    async fn try_resolve(&self) -> Option<String> {
        self.store.get(API_KEY_SECRET).await
    }
}

/// 用户配置来源
pub struct ConfigSource {
    api_key: Option<String>,
}

impl ConfigSource {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

#[async_trait]
impl CredentialSource for ConfigSource {
    async fn try_resolve(&self) -> Option<String> {
        self.api_key.clone()
    }
}

/// 进程环境变量来源
pub struct EnvSource {
    var: String,
}

impl EnvSource {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

#[async_trait]
impl CredentialSource for EnvSource {
    async fn try_resolve(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

/// 按序查询的凭证解析器
pub struct CredentialResolver {
    sources: Vec<Box<dyn CredentialSource>>,
}

impl CredentialResolver {
    pub fn new(sources: Vec<Box<dyn CredentialSource>>) -> Self {
        Self { sources }
    }

    /// 标准三层链：安全存储 → 配置 → 环境变量
    pub fn layered(store: Arc<dyn SecretStore>, config_api_key: Option<String>) -> Self {
        Self::new(vec![
            Box::new(SecretStoreSource::new(store)),
            Box::new(ConfigSource::new(config_api_key)),
            Box::new(EnvSource::new(API_KEY_ENV)),
        ])
    }

    /// 逐个来源查询，返回第一个非空值；只读，不缓存
    pub async fn resolve(&self) -> Option<String> {
        for source in &self.sources {
            if let Some(value) = source.try_resolve().await {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
        None
    }
}
