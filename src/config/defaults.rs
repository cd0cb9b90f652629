//! 配置默认值

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// 低温度，倾向确定性输出
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

pub const DEFAULT_MAX_TOKENS: u32 = 256;

/// 选区静默间隔（毫秒），间隔内的连续变化会被合并
pub const DEFAULT_QUIET_INTERVAL_MS: u64 = 350;

/// 摘要条目数范围，可通过配置调整
pub const DEFAULT_BULLET_RANGE: (u8, u8) = (2, 4);

pub fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

pub fn default_temperature() -> f32 {
    DEFAULT_TEMPERATURE
}

pub fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

pub fn default_quiet_interval_ms() -> u64 {
    DEFAULT_QUIET_INTERVAL_MS
}

pub fn default_bullet_range() -> (u8, u8) {
    DEFAULT_BULLET_RANGE
}
