//! 场景编辑命令
//!
//! 所有命令都写入 Stage 的编辑目标图层。执行前记录该 prim 在编辑图层中的
//! 规格快照，撤销时原样恢复（包括删除命令新建的 over 规格）。

use super::undo_redo::{Command, CommandError};
use crate::scene::{AttributeDefinition, PrimPath, PrimSpec, Stage, Value};

/// 编辑图层中单个 prim 规格的快照
#[derive(Debug, Default)]
struct EditSnapshot {
    captured: bool,
    spec: Option<PrimSpec>,
}

impl EditSnapshot {
    fn capture(&mut self, stage: &Stage, path: &PrimPath) {
        self.spec = stage.edit_prim_spec(path);
        self.captured = true;
    }

    fn restore(&mut self, stage: &mut Stage, path: &PrimPath) -> Result<(), CommandError> {
        if !self.captured {
            return Err(CommandError::UndoFailed(format!(
                "Nothing recorded for {}",
                path
            )));
        }
        stage.restore_edit_prim_spec(path, self.spec.take());
        self.captured = false;
        Ok(())
    }
}

// ============================================================================
// 属性变更
// ============================================================================

/// 属性变更命令
///
/// 属性不存在时可按给定定义创建（类型、可变性、是否自定义）。
#[derive(Debug)]
pub struct ChangePropertyCommand {
    prim: PrimPath,
    attribute: String,
    value: Value,
    create: Option<AttributeDefinition>,
    description: String,
    snapshot: EditSnapshot,
}

impl ChangePropertyCommand {
    pub fn new(prim: PrimPath, attribute: &str, value: Value) -> Self {
        let description = format!("Change {}.{}", prim, attribute);
        Self {
            prim,
            attribute: attribute.to_string(),
            value,
            create: None,
            description,
            snapshot: EditSnapshot::default(),
        }
    }

    /// 属性不存在时使用的创建定义
    pub fn create_if_missing(mut self, definition: AttributeDefinition) -> Self {
        self.create = Some(definition);
        self
    }

    pub fn prim(&self) -> &PrimPath {
        &self.prim
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Command for ChangePropertyCommand {
    fn execute(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.capture(stage, &self.prim);
        stage.set_attribute(&self.prim, &self.attribute, self.value.clone(), self.create)?;
        Ok(())
    }

    fn undo(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.restore(stage, &self.prim)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ============================================================================
// 类型名变更
// ============================================================================

/// prim 类型名变更命令
#[derive(Debug)]
pub struct SetPrimTypeNameCommand {
    prim: PrimPath,
    type_name: String,
    description: String,
    snapshot: EditSnapshot,
}

impl SetPrimTypeNameCommand {
    pub fn new(prim: PrimPath, type_name: &str) -> Self {
        let description = format!("Set type of {} to {}", prim, type_name);
        Self {
            prim,
            type_name: type_name.to_string(),
            description,
            snapshot: EditSnapshot::default(),
        }
    }
}

impl Command for SetPrimTypeNameCommand {
    fn execute(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.capture(stage, &self.prim);
        stage.set_type_name(&self.prim, &self.type_name)?;
        Ok(())
    }

    fn undo(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.restore(stage, &self.prim)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// ============================================================================
// 关系目标变更
// ============================================================================

/// 关系目标变更命令
#[derive(Debug)]
pub struct SetRelationshipTargetsCommand {
    prim: PrimPath,
    relationship: String,
    targets: Vec<PrimPath>,
    description: String,
    snapshot: EditSnapshot,
}

impl SetRelationshipTargetsCommand {
    pub fn new(prim: PrimPath, relationship: &str, targets: Vec<PrimPath>) -> Self {
        let description = format!("Set targets of {}.{}", prim, relationship);
        Self {
            prim,
            relationship: relationship.to_string(),
            targets,
            description,
            snapshot: EditSnapshot::default(),
        }
    }
}

impl Command for SetRelationshipTargetsCommand {
    fn execute(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.capture(stage, &self.prim);
        stage.set_relationship_targets(&self.prim, &self.relationship, self.targets.clone())?;
        Ok(())
    }

    fn undo(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        self.snapshot.restore(stage, &self.prim)
    }

    fn description(&self) -> &str {
        &self.description
    }
}
