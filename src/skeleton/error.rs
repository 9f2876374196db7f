//! 骨骼重映射错误类型
//!
//! 两类错误都表示“场景中缺少重映射所需的内容”，而不是资源或 IO 故障：
//!
//! - `BindingDefinitionError`: SkelRoot、捕获骨骼或绑定缺失，无法构建绑定上下文
//! - `JointAutoRemappingError`: 关节名无法匹配且未启用回退

use thiserror::Error;

use crate::scene::PrimPath;

/// 绑定定义错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingDefinitionError {
    /// 骨骼根不是 SkelRoot
    #[error("Skeleton root is not valid: {0}")]
    InvalidSkelRoot(PrimPath),
    /// 骨骼根下没有名为 `skel` 的 Skeleton
    #[error("Captured skeleton not found: {0}")]
    CapturedSkeletonNotFound(PrimPath),
    /// 绑定 prim 没有骨骼绑定
    #[error("No skel binding found under: {0}")]
    MissingBinding(PrimPath),
}

/// 关节自动重映射错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JointAutoRemappingError {
    /// 存在无法按名称匹配的网格关节
    #[error("No valid remapping found using joint names.")]
    NoNameMatch {
        /// 未匹配的网格关节（完整路径）
        unmatched: Vec<String>,
    },
    /// 捕获骨骼没有关节，回退也无法填充
    #[error("Captured skeleton has no joints to remap onto.")]
    EmptyCapturedSkeleton,
    /// 映射表中的条目没有指向捕获骨骼
    #[error("Joint map entry {index} ({value}) is outside the captured skeleton of {captured_len} joints")]
    InvalidMapEntry {
        index: usize,
        value: i32,
        captured_len: usize,
    },
}

pub type BindingResult<T> = Result<T, BindingDefinitionError>;
pub type JointMapResult<T> = Result<T, JointAutoRemappingError>;
