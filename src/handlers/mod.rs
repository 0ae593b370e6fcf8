//! 命令处理器模块

pub mod password;

// 重新导出处理器函数
pub use password::*;
