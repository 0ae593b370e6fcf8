//! 认证和授权模块

pub mod password_service;
pub mod user_service;

// 重新导出主要组件
pub use password_service::{Argon2Hasher, LegacyMd5Hasher, PasswordHasher, PasswordService};
pub use user_service::UserService;
