//! 场景模型
//!
//! 以显式覆盖链表示的分层场景：图层按强弱顺序叠加，引用把其它图层中的
//! prim 映射到当前命名空间。骨骼重映射只通过这里的读写接口访问场景。
//!
//! ## 功能特性
//!
//! - 绝对 prim 路径与前缀映射
//! - 图层、prim 规格、属性和关系
//! - 意见栈组合（本地图层 + 引用）
//! - 单图层临时视图
//! - 编辑目标图层写入
//! - JSON 场景描述
//!
//! ## 使用示例
//!
//! ```rust
//! use skel_remap::scene::{Layer, PrimPath, PrimSpec, Stage};
//!
//! let root = PrimPath::parse("/Root").unwrap();
//! let layer = Layer::new("capture.usda").with_prim(root.clone(), PrimSpec::def(Some("SkelRoot")));
//! let stage = Stage::new(vec![layer], vec![]).unwrap();
//! assert!(stage.is_skel_root(&root));
//! ```

use thiserror::Error;

pub mod layer;
pub mod path;
pub mod skel;
pub mod stage;
pub mod value;

pub use layer::{Layer, LayerRegistry, PrimSpec, Reference, Specifier};
pub use path::PrimPath;
pub use stage::{PrimSite, SceneDescription, Stage};
pub use value::{AttributeDefinition, AttributeSpec, Value, ValueType, Variability};

/// 场景访问错误
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Invalid prim path: {0}")]
    InvalidPath(String),

    #[error("Unknown layer: {0}")]
    UnknownLayer(String),

    #[error("Stage requires at least one layer")]
    EmptyLayerStack,

    #[error("Prim not found: {0}")]
    PrimNotFound(PrimPath),

    #[error("Attribute {attribute} not found on {prim}")]
    AttributeNotFound { prim: PrimPath, attribute: String },

    #[error("Scene parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SceneResult<T> = Result<T, SceneError>;
