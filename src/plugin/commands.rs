//! 命令表
//!
//! 配置中的每个键形如 `name` 或 `name-alias`，值为最低权限等级。
//! 启动时一次性建立名字/别名到 `Command` 的映射。

use crate::types::Command;
use std::collections::{BTreeMap, HashMap};

/// 一条已识别的命令注册
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistration {
    pub command: Command,
    pub alias: Option<String>,
    pub min_level: u32,
}

/// 命令名/别名查找表
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
    entries: HashMap<String, Command>,
    registrations: Vec<CommandRegistration>,
}

impl CommandTable {
    /// 从 `commands` 配置小节建立命令表，未知命令被忽略
    pub fn from_config(commands: &BTreeMap<String, u32>) -> Self {
        let mut table = Self::default();

        for (key, &min_level) in commands {
            let (name, alias) = split_command_key(key);
            let Some(command) = Command::from_str(name) else {
                log::debug!("忽略未知命令: {}", key);
                continue;
            };

            table.entries.insert(name.to_string(), command);
            if let Some(alias) = alias {
                table.entries.insert(alias.to_string(), command);
            }
            table.registrations.push(CommandRegistration {
                command,
                alias: alias.map(str::to_string),
                min_level,
            });
        }

        table
    }

    /// 按命令名或别名查找
    pub fn lookup(&self, name: &str) -> Option<Command> {
        self.entries.get(name).copied()
    }

    pub fn registrations(&self) -> &[CommandRegistration] {
        &self.registrations
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

/// `generatepass-genpass` -> (`generatepass`, Some(`genpass`))
///
/// 只有恰好一个 `-` 时才视为别名。
pub fn split_command_key(key: &str) -> (&str, Option<&str>) {
    let mut parts = key.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(alias), None) => (name, Some(alias)),
        _ => (key, None),
    }
}
