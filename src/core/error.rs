//! 统一错误处理模块
//!
//! ## 错误类型分层
//!
//! - **重映射错误** (`skeleton::error`): 场景缺少重映射所需的内容，调用方跳过该 prim
//! - **场景错误** (`scene::SceneError`): 路径、图层、解析和 IO 故障
//! - **命令错误** (`editor::CommandError`): 命令执行或撤销失败
//! - **配置错误** (`config::ConfigError`)
//!
//! `RemapError` 汇总以上所有错误，供工作流和命令行入口使用。

use thiserror::Error;

use crate::config::ConfigError;
use crate::editor::CommandError;
use crate::scene::SceneError;
use crate::skeleton::error::{BindingDefinitionError, JointAutoRemappingError};

/// 重映射错误类型
#[derive(Error, Debug)]
pub enum RemapError {
    #[error("Binding definition error: {0}")]
    BindingDefinition(#[from] BindingDefinitionError),

    #[error("Joint remapping error: {0}")]
    JointAutoRemapping(#[from] JointAutoRemappingError),

    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RemapResult<T> = Result<T, RemapError>;
