//! 编辑器模块
//!
//! 包含场景编辑的命令系统：
//! - `undo_redo` - 命令接口、命令管理器和组合命令
//! - `commands` - 写入 Stage 编辑目标图层的具体命令

pub mod commands;
pub mod undo_redo;

pub use commands::{ChangePropertyCommand, SetPrimTypeNameCommand, SetRelationshipTargetsCommand};
pub use undo_redo::{Command, CommandError, CommandManager, CompositeCommand};
