//! 标准输入控制台宿主
//!
//! 用于脱离游戏服务器独立运行插件：每行输入 `<玩家ID> <命令> [参数]`，
//! 玩家从 `clients` 表中查找，发给玩家的消息打印到标准输出。

use crate::database::{ClientRepository, Database};
use crate::error::Result;
use crate::host::{AdminPlugin, Console};
use crate::plugin::PasswordPlugin;
use crate::types::Identity;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// 控制台的管理插件：记录命令等级并按ID/名字查找玩家
pub struct ConsoleAdmin {
    database: Database,
    levels: Mutex<HashMap<String, u32>>,
}

impl ConsoleAdmin {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            levels: Mutex::new(HashMap::new()),
        }
    }

    /// 命令（或别名）的最低等级
    pub fn required_level(&self, name: &str) -> Option<u32> {
        self.levels
            .lock()
            .ok()
            .and_then(|levels| levels.get(name).copied())
    }
}

#[async_trait]
impl AdminPlugin for ConsoleAdmin {
    fn register_command(&self, name: &str, min_level: u32, alias: Option<&str>) {
        if let Ok(mut levels) = self.levels.lock() {
            levels.insert(name.to_string(), min_level);
            if let Some(alias) = alias {
                levels.insert(alias.to_string(), min_level);
            }
        }
    }

    async fn find_client_prompt(&self, query: &str, caller: &Identity) -> Option<Identity> {
        let found = match query.strip_prefix('@').and_then(|id| id.parse::<i64>().ok()) {
            Some(id) => ClientRepository::find_by_id(self.database.pool(), id)
                .await
                .map(|client| client.into_iter().collect::<Vec<_>>()),
            None => ClientRepository::find_by_name(self.database.pool(), query).await,
        };

        let mut matches = match found {
            Ok(matches) => matches,
            Err(e) => {
                log::error!("查找玩家 {} 失败: {}", query, e);
                return None;
            }
        };

        match matches.len() {
            0 => {
                print_message(caller, &format!("No players found matching {}", query));
                None
            }
            1 => matches.pop(),
            _ => {
                let names: Vec<String> = matches
                    .iter()
                    .map(|c| format!("{} [@{}]", c.name, c.id))
                    .collect();
                print_message(
                    caller,
                    &format!("Players matching {}: {}", query, names.join(", ")),
                );
                None
            }
        }
    }
}

/// 控制台宿主
pub struct ConsoleHost {
    admin: Arc<ConsoleAdmin>,
    private_messages: bool,
}

impl ConsoleHost {
    pub fn new(admin: Arc<ConsoleAdmin>, private_messages: bool) -> Self {
        Self {
            admin,
            private_messages,
        }
    }
}

#[async_trait]
impl Console for ConsoleHost {
    fn admin_plugin(&self) -> Option<Arc<dyn AdminPlugin>> {
        Some(self.admin.clone())
    }

    fn can_private_message(&self) -> bool {
        self.private_messages
    }

    async fn message(&self, client: &Identity, text: &str) {
        print_message(client, text);
    }
}

fn print_message(client: &Identity, text: &str) {
    println!("[{}] {}", client.name, text);
}

/// 一行控制台输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub caller_id: i64,
    pub command: String,
    pub data: String,
}

/// 解析 `<玩家ID> [!]<命令> [参数]`
pub fn parse_line(line: &str) -> Option<ConsoleLine> {
    let line = line.trim();
    let (caller, rest) = line.split_once(char::is_whitespace)?;
    let caller_id = caller.parse().ok()?;

    let rest = rest.trim_start();
    let (command, data) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    let command = command.trim_start_matches('!');
    if command.is_empty() {
        return None;
    }

    Some(ConsoleLine {
        caller_id,
        command: command.to_lowercase(),
        data: data.trim().to_string(),
    })
}

/// 逐行读取输入并分发命令，直到输入结束
pub async fn run<R>(
    plugin: &PasswordPlugin,
    admin: &ConsoleAdmin,
    database: &Database,
    reader: R,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(input) = parse_line(&line) else {
            println!("usage: <client-id> <command> [args]");
            continue;
        };

        let caller = match ClientRepository::find_by_id(database.pool(), input.caller_id).await {
            Ok(Some(caller)) => caller,
            Ok(None) => {
                println!("unknown client @{}", input.caller_id);
                continue;
            }
            Err(e) => {
                log::error!("查找玩家 @{} 失败: {}", input.caller_id, e);
                continue;
            }
        };

        if let Some(level) = admin.required_level(&input.command) {
            if caller.max_level < level {
                print_message(
                    &caller,
                    &format!("You do not have sufficient access to use !{}", input.command),
                );
                continue;
            }
        }

        match plugin.dispatch(&input.command, &input.data, &caller).await {
            Ok(true) => {}
            Ok(false) => print_message(&caller, &format!("Unrecognized command {}", input.command)),
            Err(e) => log::error!("命令 {} 执行失败: {}", input.command, e),
        }
    }

    Ok(())
}
