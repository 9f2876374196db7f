//! 日志初始化
//!
//! 使用 tracing-subscriber 的 fmt 输出和 `EnvFilter`。设置了 `RUST_LOG`
//! 时以环境变量为准，否则使用配置中的级别。

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// 根据配置构建过滤器
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.as_str()))
}

/// 初始化日志系统
///
/// 只有第一次调用生效，重复调用返回 false。
pub fn init_logging(config: &LoggingConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(config.show_targets)
        .try_init()
        .is_ok()
}
