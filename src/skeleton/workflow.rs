//! 引用重映射工作流
//!
//! 在捕获的 SkelRoot 下新增替换资源引用后，对引用中的每个绑定 prim
//! 执行重映射。单个 prim 失败只记录到报告中，不会中断整批处理；
//! 整批写入作为一个可撤销的组合命令执行。

use std::fmt;

use super::apply::{apply_command, author_binding_to_skel, clear_skel_root_type};
use super::cache::CachedReplacementSkeletons;
use crate::config::RemapSettings;
use crate::core::error::RemapResult;
use crate::editor::{Command, CommandManager, CompositeCommand};
use crate::scene::{PrimPath, SceneError, Stage};

/// 单个 prim 的失败信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemapFailure {
    pub prim: PrimPath,
    pub message: String,
}

impl fmt::Display for RemapFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.prim, self.message)
    }
}

/// 一次引用重映射的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemapReport {
    /// 成功重映射的绑定 prim
    pub remapped: Vec<PrimPath>,
    /// 类型被改为 Xform 的嵌套 SkelRoot
    pub cleared_skel_roots: Vec<PrimPath>,
    /// 跳过的 prim 及原因
    pub failures: Vec<RemapFailure>,
}

impl RemapReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 汇总所有失败信息，没有失败时返回 None
    pub fn failure_summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let details: Vec<String> = self.failures.iter().map(|f| format!(" - {}", f)).collect();
        Some(format!(
            "Skeleton remapping failed for {} prim(s):\n{}",
            self.failures.len(),
            details.join("\n")
        ))
    }

    fn fail(&mut self, prim: &PrimPath, err: impl fmt::Display) {
        tracing::warn!(target: "skeleton", "Skipping skeleton remap of {}: {}", prim, err);
        self.failures.push(RemapFailure {
            prim: prim.clone(),
            message: err.to_string(),
        });
    }
}

/// 对新引用的资源执行骨骼重映射
///
/// `reference_root` 是 `skel_root` 下新添加的引用 prim。绑定解析结果
/// 通过 `cache` 复用，缓存的生命周期由调用方决定。
pub fn remap_reference(
    stage: &mut Stage,
    history: &mut CommandManager,
    cache: &mut CachedReplacementSkeletons,
    settings: &RemapSettings,
    skel_root: &PrimPath,
    reference_root: &PrimPath,
) -> RemapResult<RemapReport> {
    let prims = stage.traverse(reference_root);
    if prims.is_empty() {
        return Err(SceneError::PrimNotFound(reference_root.clone()).into());
    }

    let mut report = RemapReport::default();
    let mut commands: Vec<Box<dyn Command>> = Vec::new();

    if settings.clear_nested_skel_roots {
        for prim in &prims {
            if let Some(command) = clear_skel_root_type(stage, prim) {
                report.cleared_skel_roots.push(prim.clone());
                commands.push(command);
            }
        }
    }

    for prim in prims.iter().filter(|prim| stage.has_skel_binding(prim)) {
        let binding = match cache.try_add(stage, skel_root, prim) {
            Ok(binding) => binding,
            Err(err) => {
                report.fail(prim, err);
                continue;
            }
        };
        let joint_map = match binding.auto_joint_map(stage, settings.fallback) {
            Ok(joint_map) => joint_map,
            Err(err) => {
                report.fail(prim, err);
                continue;
            }
        };
        let apply = match apply_command(&binding, stage, &joint_map) {
            Ok(apply) => apply,
            Err(err) => {
                report.fail(prim, err);
                continue;
            }
        };
        if settings.bind_to_captured_skeleton {
            commands.push(author_binding_to_skel(prim, binding.captured_skeleton()));
        }
        commands.push(Box::new(apply));
        report.remapped.push(prim.clone());
    }

    if !commands.is_empty() {
        let batch = CompositeCommand::from_commands(
            format!("Remap skeleton of {}", reference_root),
            commands,
        );
        history.execute(Box::new(batch), stage)?;
    }

    match report.failure_summary() {
        Some(summary) => tracing::error!(target: "skeleton", "{}", summary),
        None => tracing::info!(
            target: "skeleton",
            "Remapped {} prim(s) under {}",
            report.remapped.len(),
            reference_root
        ),
    }
    Ok(report)
}
