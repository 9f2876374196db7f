//! 骨骼关节自动重映射
//!
//! 替换网格绑定在自己的骨骼上，而运行时捕获的骨骼有另一套关节顺序。
//! 本模块把网格的关节索引改写为指向捕获骨骼：
//!
//! - `binding` - 从意见栈中找回替换网格原始的骨骼绑定
//! - `joints` - 按叶子关节名生成映射表，可按位置回退
//! - `apply` - 以可撤销命令写入重映射后的关节列表和关节索引
//! - `cache` - 按 (SkelRoot, 替换 prim) 缓存绑定解析结果
//! - `workflow` - 新增引用后的批量重映射
//!
//! ## 示例
//!
//! ```
//! use skel_remap::skeleton::generate_joint_map;
//!
//! let mesh = ["Root/Hips", "Root/Hips/Spine"];
//! let captured = ["Hips", "Spine", "Head"];
//! assert_eq!(generate_joint_map(&mesh, &captured, false).unwrap(), vec![0, 1]);
//!
//! // 关节名无法匹配时按位置回退，索引不超过捕获骨骼的范围
//! let mesh = ["Root/UnknownA", "Root/UnknownB", "Root/UnknownC"];
//! let captured = ["Hips", "Spine"];
//! assert_eq!(generate_joint_map(&mesh, &captured, true).unwrap(), vec![0, 1, 1]);
//! ```

pub mod apply;
pub mod binding;
pub mod cache;
pub mod error;
pub mod joints;
pub mod workflow;

mod property_tests;

pub use apply::{apply, apply_command, author_binding_to_skel, clear_skel_root_type};
pub use binding::{SkeletonReplacementBinding, CAPTURED_SKELETON_NAME, REMIX_JOINT_ATTR};
pub use cache::CachedReplacementSkeletons;
pub use error::{BindingDefinitionError, JointAutoRemappingError};
pub use joints::{
    cleared_joint_map, generate_joint_map, leaf_name, path_names_only, remap_joints, JointMap,
    UNMAPPED,
};
pub use workflow::{remap_reference, RemapFailure, RemapReport};
