//! 骨骼替换绑定（Binding Resolver）
//!
//! 替换网格通过图层组合覆盖了捕获场景中的网格，最强意见里的骨骼绑定
//! 已经指向捕获骨骼。要重映射关节，需要找回替换资源中原本写入的绑定：
//! 按意见栈从弱到强遍历，在每个站点所在图层的独立视图中检查绑定，
//! 第一个同时具备 `SkelBindingAPI` 和骨骼目标的站点即为原始绑定。
//!
//! 找不到原始绑定时退化为使用捕获骨骼和当前绑定，只记录警告。

use std::cell::OnceCell;

use super::error::{BindingDefinitionError, BindingResult, JointMapResult};
use super::joints::{self, JointMap};
use crate::scene::skel::BINDING_JOINTS_ATTR;
use crate::scene::{PrimPath, Stage};

/// 捕获骨骼在 SkelRoot 下的固定名称
pub const CAPTURED_SKELETON_NAME: &str = "skel";
/// 重映射后驱动网格的捕获关节列表
pub const REMIX_JOINT_ATTR: &str = "skel:remix_joints";

/// 单个绑定 prim 的重映射上下文
#[derive(Debug)]
pub struct SkeletonReplacementBinding {
    skel_root: PrimPath,
    captured_skeleton: PrimPath,
    bound_prim: PrimPath,
    /// 原始绑定所在图层的临时视图；None 表示原始绑定就是当前绑定
    original_view: Option<Stage>,
    original_bound_prim: PrimPath,
    original_skeleton: PrimPath,
    /// 原始关节索引只读取一次
    original_joint_indices: OnceCell<Vec<i32>>,
}

impl SkeletonReplacementBinding {
    /// 解析 `bound_prim` 的原始绑定
    pub fn new(stage: &Stage, skel_root: &PrimPath, bound_prim: &PrimPath) -> BindingResult<Self> {
        if !stage.is_skel_root(skel_root) {
            return Err(BindingDefinitionError::InvalidSkelRoot(skel_root.clone()));
        }
        let captured_skeleton = skel_root
            .append_child(CAPTURED_SKELETON_NAME)
            .map_err(|_| BindingDefinitionError::InvalidSkelRoot(skel_root.clone()))?;
        if !stage.is_skeleton(&captured_skeleton) {
            return Err(BindingDefinitionError::CapturedSkeletonNotFound(
                captured_skeleton,
            ));
        }
        if !stage.has_skel_binding(bound_prim) {
            return Err(BindingDefinitionError::MissingBinding(bound_prim.clone()));
        }

        let mut binding = Self {
            skel_root: skel_root.clone(),
            captured_skeleton: captured_skeleton.clone(),
            bound_prim: bound_prim.clone(),
            original_view: None,
            original_bound_prim: bound_prim.clone(),
            original_skeleton: captured_skeleton,
            original_joint_indices: OnceCell::new(),
        };

        for site in stage.prim_stack(bound_prim).iter().rev() {
            let view = stage.open_layer(&site.layer);
            if !view.has_skel_binding(&site.path) {
                continue;
            }
            let Some(skeleton) = view.bound_skeleton(&site.path) else {
                continue;
            };
            if &site.path == bound_prim {
                tracing::warn!(target: "skeleton", "Only one skel binding found on {}.", bound_prim);
            }
            tracing::debug!(
                target: "skeleton",
                "Original binding of {} found at {}@{}",
                bound_prim,
                site.path,
                site.layer_identifier()
            );
            binding.original_bound_prim = site.path.clone();
            binding.original_skeleton = skeleton;
            binding.original_view = Some(view);
            return Ok(binding);
        }

        tracing::warn!(target: "skeleton", "Only one skel binding found on {}.", bound_prim);
        Ok(binding)
    }

    pub fn skel_root(&self) -> &PrimPath {
        &self.skel_root
    }

    pub fn bound_prim(&self) -> &PrimPath {
        &self.bound_prim
    }

    pub fn captured_skeleton(&self) -> &PrimPath {
        &self.captured_skeleton
    }

    /// 原始骨骼（在原始绑定所在的视图中）
    pub fn original_skeleton(&self) -> &PrimPath {
        &self.original_skeleton
    }

    pub fn original_bound_prim(&self) -> &PrimPath {
        &self.original_bound_prim
    }

    /// 原始骨骼与捕获骨骼是否不同（否则没有可重映射的内容）
    pub fn has_replacement_skeleton(&self) -> bool {
        self.original_skeleton != self.captured_skeleton
    }

    /// 读取原始绑定使用的 Stage：替换图层视图或当前 Stage
    fn original_stage<'a>(&'a self, stage: &'a Stage) -> &'a Stage {
        self.original_view.as_ref().unwrap_or(stage)
    }

    /// 运行时捕获的骨骼关节列表
    pub fn captured_joints(&self, stage: &Stage) -> Vec<String> {
        stage
            .skeleton_joints(&self.captured_skeleton)
            .unwrap_or_default()
    }

    /// 替换网格原本绑定的关节列表
    pub fn mesh_joints(&self, stage: &Stage) -> Vec<String> {
        self.original_stage(stage)
            .skeleton_joints(&self.original_skeleton)
            .unwrap_or_default()
    }

    /// 将驱动各网格关节的捕获关节列表
    ///
    /// 优先读取已写入的 `skel:remix_joints`；首次替换会屏蔽 `skel:joints`，
    /// 因此其次读取原始绑定 prim 上的值。
    pub fn remapped_joints(&self, stage: &Stage) -> Vec<String> {
        if let Some(joints) = stage
            .token_array(&self.bound_prim, REMIX_JOINT_ATTR)
            .filter(|joints| !joints.is_empty())
        {
            return joints;
        }
        self.original_stage(stage)
            .token_array(&self.original_bound_prim, BINDING_JOINTS_ATTR)
            .filter(|joints| !joints.is_empty())
            .unwrap_or_default()
    }

    /// 已写入的映射表
    pub fn joint_map(&self, stage: &Stage) -> JointMap {
        joints::joint_map_from_remapped(&self.remapped_joints(stage), &self.captured_joints(stage))
    }

    /// 替换网格原本的关节索引
    ///
    /// 第一次成功读取后缓存，之后即使当前索引已被重写也返回原始值。
    pub fn original_joint_indices(&self, stage: &Stage) -> Option<&[i32]> {
        if let Some(indices) = self.original_joint_indices.get() {
            return Some(indices);
        }
        let indices = self
            .original_stage(stage)
            .joint_indices(&self.original_bound_prim)?;
        Some(self.original_joint_indices.get_or_init(|| indices))
    }

    /// 替换网格当前的关节索引
    pub fn joint_indices(&self, stage: &Stage) -> Option<Vec<i32>> {
        stage.joint_indices(&self.bound_prim)
    }

    /// 按关节名自动生成映射表
    pub fn auto_joint_map(&self, stage: &Stage, fallback: bool) -> JointMapResult<JointMap> {
        joints::generate_joint_map(
            &self.mesh_joints(stage),
            &self.captured_joints(stage),
            fallback,
        )
    }

    /// 所有影响指向根关节的映射表
    pub fn cleared_joint_map(&self, stage: &Stage) -> JointMap {
        joints::cleared_joint_map(self.mesh_joints(stage).len())
    }
}
