//! 配置
//!
//! 配置文件可以是 TOML 或 JSON，缺省的段落使用默认值。
//! 读取后再应用 `SKEL_REMAP_*` 环境变量覆盖。

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::impl_default;

pub mod remap;

pub use remap::{HistorySettings, RemapSettings};

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "skel_remap.toml";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.json` 为 JSON，其余按 TOML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            _ => ConfigFormat::Toml,
        }
    }
}

fn env_override<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        tracing::warn!(target: "config", "Ignoring invalid {}={:?}", name, raw);
    }
    parsed
}

fn parse_error(err: impl std::fmt::Display) -> ConfigError {
    ConfigError::ParseError(err.to_string())
}

/// 主配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapConfig {
    pub remap: RemapSettings,
    pub history: HistorySettings,
    pub logging: LoggingConfig,
}

impl RemapConfig {
    pub fn parse(content: &str, format: ConfigFormat) -> ConfigResult<Self> {
        match format {
            ConfigFormat::Toml => toml::from_str(content).map_err(parse_error),
            ConfigFormat::Json => serde_json::from_str(content).map_err(parse_error),
        }
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, ConfigFormat::Toml)
    }

    /// 按扩展名选择格式读取配置文件
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    pub fn to_string_as(&self, format: ConfigFormat) -> ConfigResult<String> {
        match format {
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(parse_error),
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(parse_error),
        }
    }

    /// 按扩展名选择格式写入配置文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        fs::write(path, self.to_string_as(ConfigFormat::from_path(path))?)?;
        Ok(())
    }

    /// 应用 `SKEL_REMAP_FALLBACK`、`SKEL_REMAP_MAX_HISTORY` 和 `SKEL_REMAP_LOG_LEVEL`
    ///
    /// 无法解析的值被忽略。
    pub fn apply_env_overrides(&mut self) {
        if let Some(fallback) = env_override("SKEL_REMAP_FALLBACK") {
            self.remap.fallback = fallback;
        }
        if let Some(max_history) = env_override("SKEL_REMAP_MAX_HISTORY") {
            self.history.max_history = max_history;
        }
        if let Some(level) = env_override("SKEL_REMAP_LOG_LEVEL") {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.history.validate()
    }

    /// 依次查找 `./skel_remap.toml` 和 `<用户配置目录>/skel_remap/skel_remap.toml`
    pub fn find_config_file() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("skel_remap").join(CONFIG_FILE_NAME))
            .filter(|path| path.is_file())
    }

    /// 自动查找并加载配置文件，找不到或解析失败时使用默认配置
    pub fn load_or_default() -> Self {
        let Some(path) = Self::find_config_file() else {
            return Self::default();
        };
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(target: "config", "Ignoring config {:?}: {}", path, err);
                Self::default()
            }
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否输出日志目标
    pub show_targets: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    show_targets: false,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("Unknown log level: {}", other))),
        }
    }
}
