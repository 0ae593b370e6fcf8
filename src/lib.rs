//! 游戏服务器管理机器人的密码插件
//!
//! 为玩家生成易读的密码并保存其哈希，可选地通过SMTP把凭据发送到玩家邮箱：
//! - `setpass <password> [<name>]` 手动设置密码
//! - `generatepass [<email>]` / `resetpass [<email>]` 生成新密码
//! - 兼容旧数据的MD5哈希，可选Argon2
//! - 连接被拒绝后在本进程内永久停止发送邮件

pub mod auth;
pub mod config;
pub mod console;
pub mod database;
pub mod error;
pub mod gen_password;
pub mod handlers;
pub mod host;
pub mod mail;
pub mod plugin;
pub mod types;
pub mod utils;

// 重新导出常用类型
pub use config::PluginConfig;
pub use error::{AppError, MailError, Result};
pub use gen_password::{generate_password, NicePassGenerator};
pub use host::{AdminPlugin, Console, CredentialStore};
pub use mail::{MailTransport, Notifier, OutgoingMail};
pub use plugin::PasswordPlugin;
pub use types::{Command, EmailCheck, HashScheme, Identity};
