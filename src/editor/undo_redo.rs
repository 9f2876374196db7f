//! 撤销/重做
//!
//! 所有场景写入都以 [`Command`] 的形式作用于 [`Stage`]，由 [`CommandManager`]
//! 记录历史。一次重映射产生的多个写入用 [`CompositeCommand`] 合成一步。
//!
//! ```
//! use skel_remap::editor::{ChangePropertyCommand, CommandManager};
//! use skel_remap::scene::{Layer, PrimPath, PrimSpec, Stage, Value};
//!
//! let mesh = PrimPath::parse("/Root/Mesh").unwrap();
//! let base = Layer::new("capture.usda").with_prim(mesh.clone(), PrimSpec::def(Some("Mesh")));
//! let mut stage = Stage::new(vec![Layer::new("mod.usda"), base], vec![]).unwrap();
//! let mut history = CommandManager::new(16);
//!
//! let joints = Value::TokenArray(vec!["Hips".to_string()]);
//! let command = ChangePropertyCommand::new(mesh.clone(), "skel:joints", joints);
//! history.execute(Box::new(command), &mut stage).unwrap();
//! assert!(stage.edit_prim_spec(&mesh).is_some());
//!
//! history.undo(&mut stage).unwrap();
//! assert!(stage.edit_prim_spec(&mesh).is_none());
//! ```

use std::collections::VecDeque;
use std::fmt;
use thiserror::Error;

use crate::scene::{SceneError, Stage};

/// 可撤销的场景写入
pub trait Command: fmt::Debug {
    /// 写入编辑目标图层
    fn execute(&mut self, stage: &mut Stage) -> Result<(), CommandError>;

    /// 恢复执行前的状态
    fn undo(&mut self, stage: &mut Stage) -> Result<(), CommandError>;

    /// 历史中显示的描述
    fn description(&self) -> &str;
}

/// 命令错误
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Undo failed: {0}")]
    UndoFailed(String),

    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),
}

/// 命令历史
///
/// 撤销栈超过 `max_history` 时丢弃最早的命令；执行新命令会清空重做栈。
/// 撤销或重做失败时命令留在原来的栈上。
pub struct CommandManager {
    undo_stack: VecDeque<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_history: usize,
}

impl CommandManager {
    pub fn new(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    /// 执行命令并记入历史
    pub fn execute(
        &mut self,
        mut command: Box<dyn Command>,
        stage: &mut Stage,
    ) -> Result<(), CommandError> {
        command.execute(stage)?;
        tracing::debug!(target: "editor", "Executed: {}", command.description());

        self.undo_stack.push_back(command);
        if self.undo_stack.len() > self.max_history {
            if let Some(dropped) = self.undo_stack.pop_front() {
                tracing::trace!(target: "editor", "History full, dropped: {}", dropped.description());
            }
        }
        self.redo_stack.clear();
        Ok(())
    }

    /// 撤销最近的命令，历史为空时返回 `false`
    pub fn undo(&mut self, stage: &mut Stage) -> Result<bool, CommandError> {
        let Some(mut command) = self.undo_stack.pop_back() else {
            return Ok(false);
        };
        if let Err(e) = command.undo(stage) {
            self.undo_stack.push_back(command);
            return Err(e);
        }
        tracing::debug!(target: "editor", "Undid: {}", command.description());
        self.redo_stack.push(command);
        Ok(true)
    }

    /// 重做最近撤销的命令，没有可重做的命令时返回 `false`
    pub fn redo(&mut self, stage: &mut Stage) -> Result<bool, CommandError> {
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };
        if let Err(e) = command.execute(stage) {
            self.redo_stack.push(command);
            return Err(e);
        }
        tracing::debug!(target: "editor", "Redid: {}", command.description());
        self.undo_stack.push_back(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// 下一次撤销的描述
    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|c| c.description())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new(crate::config::HistorySettings::default().max_history)
    }
}

/// 把多个写入合成一步撤销
///
/// 子命令按顺序执行，任一失败时已执行的子命令按逆序撤销。
#[derive(Debug)]
pub struct CompositeCommand {
    commands: Vec<Box<dyn Command>>,
    description: String,
}

impl CompositeCommand {
    pub fn new(description: impl Into<String>) -> Self {
        Self::from_commands(description, Vec::new())
    }

    pub fn from_commands(description: impl Into<String>, commands: Vec<Box<dyn Command>>) -> Self {
        Self {
            commands,
            description: description.into(),
        }
    }

    pub fn push(&mut self, command: Box<dyn Command>) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn child_descriptions(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.description()).collect()
    }
}

impl Command for CompositeCommand {
    fn execute(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        for index in 0..self.commands.len() {
            if let Err(e) = self.commands[index].execute(stage) {
                for done in self.commands[..index].iter_mut().rev() {
                    if let Err(rollback) = done.undo(stage) {
                        tracing::error!(
                            target: "editor",
                            "Rollback of {} failed: {}",
                            done.description(),
                            rollback
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn undo(&mut self, stage: &mut Stage) -> Result<(), CommandError> {
        for command in self.commands.iter_mut().rev() {
            command.undo(stage)?;
        }
        Ok(())
    }

    fn description(&self) -> &str {
        &self.description
    }
}
