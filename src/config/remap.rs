use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 历史长度上限
pub const MAX_HISTORY_LIMIT: usize = 10_000;

/// 重映射配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemapSettings {
    /// 关节名无法匹配时按位置回退
    pub fallback: bool,

    /// 将网格的 `skel:skeleton` 重新指向捕获骨骼
    pub bind_to_captured_skeleton: bool,

    /// 将引用中嵌套的 SkelRoot 改为 Xform
    pub clear_nested_skel_roots: bool,
}

impl_default!(RemapSettings {
    fallback: false,
    bind_to_captured_skeleton: true,
    clear_nested_skel_roots: true,
});

/// 撤销历史配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// 最多保留的撤销步数
    pub max_history: usize,
}

impl_default!(HistorySettings { max_history: 100 });

impl HistorySettings {
    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_history == 0 || self.max_history > MAX_HISTORY_LIMIT {
            return Err(ConfigError::ValidationError(format!(
                "max_history must be between 1 and {}, got {}",
                MAX_HISTORY_LIMIT, self.max_history
            )));
        }
        Ok(())
    }
}
