//! 核心模块
//!
//! 包含跨模块共用的基础设施：
//! - `error` - 统一错误类型
//! - `logging` - 日志初始化
//! - `macros` - 通用宏

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{RemapError, RemapResult};
pub use logging::init_logging;
