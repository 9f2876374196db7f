//! 关节映射写入（Joint Map Applier）
//!
//! 应用一个映射表分三步，每一步都是独立可撤销的命令：
//!
//! 1. 写入 `skel:remix_joints`（自定义、uniform 的 token 数组）
//! 2. 按映射表重写原始关节索引
//! 3. 屏蔽网格自身的 `skel:joints`，让骨骼解析回落到捕获骨骼
//!
//! 三步组合为一个 `CompositeCommand` 执行，整体撤销。缺少输入的步骤
//! 直接跳过，不会写入不完整的数据。

use super::binding::{SkeletonReplacementBinding, REMIX_JOINT_ATTR};
use super::joints::{remap_joints, validate_joint_map};
use super::error::JointMapResult;
use crate::core::error::RemapResult;
use crate::editor::{
    ChangePropertyCommand, Command, CommandManager, CompositeCommand, SetPrimTypeNameCommand,
    SetRelationshipTargetsCommand,
};
use crate::scene::skel::{BINDING_JOINTS_ATTR, JOINT_INDICES_ATTR, SKELETON_REL, XFORM_TYPE};
use crate::scene::{AttributeDefinition, PrimPath, Stage, Value, ValueType, Variability};

/// 步骤 1：写入重映射后的驱动关节列表
pub fn remapped_joints_command(
    binding: &SkeletonReplacementBinding,
    stage: &Stage,
    joint_map: &[i32],
) -> JointMapResult<ChangePropertyCommand> {
    let remapped = remap_joints(joint_map, &binding.captured_joints(stage))?;
    Ok(ChangePropertyCommand::new(
        binding.bound_prim().clone(),
        REMIX_JOINT_ATTR,
        Value::TokenArray(remapped),
    )
    .create_if_missing(AttributeDefinition {
        value_type: ValueType::TokenArray,
        variability: Variability::Uniform,
        custom: true,
    }))
}

/// 步骤 2：重写关节索引
///
/// 原始索引或映射表为空时返回 None。
pub fn remapped_indices_command(
    binding: &SkeletonReplacementBinding,
    stage: &Stage,
    joint_map: &[i32],
) -> Option<ChangePropertyCommand> {
    let indices = binding
        .original_joint_indices(stage)
        .filter(|indices| !indices.is_empty())?;
    if joint_map.is_empty() {
        return None;
    }

    let mut remapped = Vec::with_capacity(indices.len());
    for &index in indices {
        match usize::try_from(index).ok().and_then(|i| joint_map.get(i)) {
            Some(&target) => remapped.push(target),
            None => {
                tracing::warn!(
                    target: "skeleton",
                    "Joint index {} on {} is outside the joint map of {} entries; indices left unchanged",
                    index,
                    binding.bound_prim(),
                    joint_map.len()
                );
                return None;
            }
        }
    }

    Some(ChangePropertyCommand::new(
        binding.bound_prim().clone(),
        JOINT_INDICES_ATTR,
        Value::IntArray(remapped),
    ))
}

/// 步骤 3：屏蔽网格自身的关节列表
///
/// 任何意见都没有声明 `skel:joints` 时跳过，不为网格新建一个被屏蔽的属性。
pub fn clear_joints_command(
    binding: &SkeletonReplacementBinding,
    stage: &Stage,
) -> Option<ChangePropertyCommand> {
    stage
        .has_attribute(binding.bound_prim(), BINDING_JOINTS_ATTR)
        .then(|| {
            ChangePropertyCommand::new(
                binding.bound_prim().clone(),
                BINDING_JOINTS_ATTR,
                Value::Blocked,
            )
        })
}

/// 组合三个步骤
///
/// 映射表中有任何一项没有指向捕获骨骼时整体失败，不生成命令。
pub fn apply_command(
    binding: &SkeletonReplacementBinding,
    stage: &Stage,
    joint_map: &[i32],
) -> JointMapResult<CompositeCommand> {
    validate_joint_map(joint_map, binding.captured_joints(stage).len())?;

    let mut command = CompositeCommand::new(format!("Remap joints of {}", binding.bound_prim()));
    command.push(Box::new(remapped_joints_command(binding, stage, joint_map)?));
    match remapped_indices_command(binding, stage, joint_map) {
        Some(indices) => command.push(Box::new(indices)),
        None => tracing::debug!(
            target: "skeleton",
            "No joint indices to remap on {}",
            binding.bound_prim()
        ),
    }
    if let Some(clear) = clear_joints_command(binding, stage) {
        command.push(Box::new(clear));
    }
    Ok(command)
}

/// 将映射表应用到绑定 prim，作为一个可撤销的操作记入历史
pub fn apply(
    binding: &SkeletonReplacementBinding,
    stage: &mut Stage,
    history: &mut CommandManager,
    joint_map: &[i32],
) -> RemapResult<()> {
    let command = apply_command(binding, stage, joint_map)?;
    history.execute(Box::new(command), stage)?;
    tracing::info!(
        target: "skeleton",
        "Joint indices successfully remapped for {}",
        binding.bound_prim()
    );
    Ok(())
}

/// 嵌套的 SkelRoot 改为 Xform
///
/// 不是 SkelRoot 时返回 None。
pub fn clear_skel_root_type(stage: &Stage, prim: &PrimPath) -> Option<Box<dyn Command>> {
    if !stage.is_skel_root(prim) {
        return None;
    }
    Some(Box::new(SetPrimTypeNameCommand::new(prim.clone(), XFORM_TYPE)))
}

/// 将绑定 prim 的 `skel:skeleton` 指向捕获骨骼
pub fn author_binding_to_skel(bound_prim: &PrimPath, skeleton: &PrimPath) -> Box<dyn Command> {
    Box::new(SetRelationshipTargetsCommand::new(
        bound_prim.clone(),
        SKELETON_REL,
        vec![skeleton.clone()],
    ))
}
