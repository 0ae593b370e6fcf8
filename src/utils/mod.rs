//! 工具模块

pub mod email;

pub use email::validate_email;
