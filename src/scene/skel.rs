//! 骨骼 schema 查询
//!
//! SkelRoot / Skeleton / SkelBindingAPI 在组合场景上的读取接口。

use super::path::PrimPath;
use super::stage::Stage;
use super::value::Value;

/// SkelRoot 类型名
pub const SKEL_ROOT_TYPE: &str = "SkelRoot";
/// Skeleton 类型名
pub const SKELETON_TYPE: &str = "Skeleton";
/// 嵌套 SkelRoot 被清除后的类型
pub const XFORM_TYPE: &str = "Xform";
/// 骨骼绑定 API
pub const SKEL_BINDING_API: &str = "SkelBindingAPI";
/// Skeleton 上的关节列表
pub const SKELETON_JOINTS_ATTR: &str = "joints";
/// 绑定 prim 上的关节列表
pub const BINDING_JOINTS_ATTR: &str = "skel:joints";
/// 绑定 prim 上的逐顶点关节索引
pub const JOINT_INDICES_ATTR: &str = "primvars:skel:jointIndices";
/// 绑定 prim 指向骨骼的关系
pub const SKELETON_REL: &str = "skel:skeleton";

impl Stage {
    pub fn is_skel_root(&self, path: &PrimPath) -> bool {
        self.type_name(path).as_deref() == Some(SKEL_ROOT_TYPE)
    }

    pub fn is_skeleton(&self, path: &PrimPath) -> bool {
        self.type_name(path).as_deref() == Some(SKELETON_TYPE)
    }

    pub fn has_skel_binding(&self, path: &PrimPath) -> bool {
        self.prim_exists(path) && self.has_api_schema(path, SKEL_BINDING_API)
    }

    /// 绑定 prim 直接指向的骨骼（只看自身的 `skel:skeleton`，不继承祖先）
    pub fn bound_skeleton(&self, path: &PrimPath) -> Option<PrimPath> {
        self.relationship_targets(path, SKELETON_REL)?
            .into_iter()
            .next()
            .filter(|target| self.is_skeleton(target))
    }

    /// 读取 token 数组属性，未写入或类型不符时返回 None
    pub fn token_array(&self, path: &PrimPath, name: &str) -> Option<Vec<String>> {
        match self.attribute_value(path, name)? {
            Value::TokenArray(tokens) => Some(tokens),
            _ => None,
        }
    }

    /// 读取整数数组属性，未写入或类型不符时返回 None
    pub fn int_array(&self, path: &PrimPath, name: &str) -> Option<Vec<i32>> {
        match self.attribute_value(path, name)? {
            Value::IntArray(values) => Some(values),
            _ => None,
        }
    }

    /// 骨骼的关节列表
    pub fn skeleton_joints(&self, skeleton: &PrimPath) -> Option<Vec<String>> {
        self.token_array(skeleton, SKELETON_JOINTS_ATTR)
    }

    /// 绑定 prim 的逐顶点关节索引
    pub fn joint_indices(&self, bound_prim: &PrimPath) -> Option<Vec<i32>> {
        self.int_array(bound_prim, JOINT_INDICES_ATTR)
    }
}
