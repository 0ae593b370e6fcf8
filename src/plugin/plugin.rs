//! 密码插件主体结构

use crate::auth::{PasswordService, UserService};
use crate::config::PluginConfig;
use crate::error::{AppError, Result};
use crate::host::{AdminPlugin, Console, CredentialStore};
use crate::mail::{MailTransport, Notifier};
use crate::plugin::commands::CommandTable;
use crate::types::{Command, Identity};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 插件状态，命令处理器共享
pub struct PluginState {
    pub config: PluginConfig,
    pub console: Arc<dyn Console>,
    pub admin: Arc<dyn AdminPlugin>,
    pub store: Arc<dyn CredentialStore>,
    pub password_service: PasswordService,
    pub user_service: UserService,
    pub notifier: Notifier,
    enabled: AtomicBool,
}

impl PluginState {
    /// 插件是否启用
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// 既不能发邮件也不能发私信时禁用插件
    pub fn test_availability(&self) {
        if !self.console.can_private_message() && !self.notifier.is_enabled() {
            log::info!("无法给玩家发送邮件或私信，禁用插件");
            self.enabled.store(false, Ordering::SeqCst);
        }
    }
}

/// 密码插件
pub struct PasswordPlugin {
    state: PluginState,
    commands: CommandTable,
}

impl PasswordPlugin {
    /// 启动插件并向管理插件注册命令
    ///
    /// 找不到管理插件时记录错误并返回 `MissingDependency`，宿主不受影响。
    pub fn startup(
        config: PluginConfig,
        console: Arc<dyn Console>,
        store: Arc<dyn CredentialStore>,
        transport: Arc<dyn MailTransport>,
    ) -> Result<Self> {
        let Some(admin) = console.admin_plugin() else {
            log::error!("找不到管理插件，密码插件无法启动");
            return Err(AppError::missing_dependency("admin plugin"));
        };

        let commands = CommandTable::from_config(&config.commands);
        if commands.is_empty() {
            log::warn!("没有配置任何命令，插件不会响应玩家");
        }
        for registration in commands.registrations() {
            admin.register_command(
                registration.command.as_str(),
                registration.min_level,
                registration.alias.as_deref(),
            );
            log::debug!(
                "注册命令 {} (别名: {:?}, 等级: {})",
                registration.command.as_str(),
                registration.alias,
                registration.min_level
            );
        }

        if console.can_private_message() {
            log::debug!("可以给玩家发送私信");
        }

        let state = PluginState {
            password_service: PasswordService::from_settings(&config.settings),
            user_service: UserService::new(config.settings.top_level),
            notifier: Notifier::new(transport, &config.settings),
            config,
            console,
            admin,
            store,
            enabled: AtomicBool::new(true),
        };
        log::debug!("密码哈希方案: {}", state.password_service.scheme().as_str());
        state.test_availability();

        log::debug!("密码插件已启动");
        Ok(Self { state, commands })
    }

    /// 获取插件状态
    pub fn state(&self) -> &PluginState {
        &self.state
    }

    pub fn commands(&self) -> &CommandTable {
        &self.commands
    }

    pub fn is_enabled(&self) -> bool {
        self.state.is_enabled()
    }

    /// 按命令名或别名分发
    ///
    /// 返回 `Ok(false)` 表示命令不属于本插件或插件已禁用。
    pub async fn dispatch(&self, name: &str, data: &str, client: &Identity) -> Result<bool> {
        let Some(command) = self.commands.lookup(name) else {
            return Ok(false);
        };

        if !self.is_enabled() {
            log::debug!("插件已禁用，忽略命令 {}", name);
            return Ok(false);
        }

        handle_command(&self.state, command, data, client).await?;
        Ok(true)
    }
}

/// 统一命令处理分发器
async fn handle_command(
    state: &PluginState,
    command: Command,
    data: &str,
    client: &Identity,
) -> Result<()> {
    match command {
        Command::SetPass => crate::handlers::set_password_command(state, data, client).await,
        Command::GeneratePass | Command::ResetPass => {
            crate::handlers::generate_password_command(state, data, client).await
        }
    }
}
