//! 插件生命周期与命令表

pub mod commands;
pub mod plugin;

pub use commands::{CommandRegistration, CommandTable};
pub use plugin::{PasswordPlugin, PluginState};
