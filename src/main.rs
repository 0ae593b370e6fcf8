//! 密码插件 - 控制台宿主入口

use anyhow::Context;
use b3_password::{
    console::{self, ConsoleAdmin, ConsoleHost},
    config::PluginConfig,
    database::{Database, SqliteCredentialStore},
    mail::SmtpMailTransport,
    PasswordPlugin,
};
use std::env;
use std::path::Path;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    init_logger();

    log::info!("This is version {} for BigBrotherBot", env!("CARGO_PKG_VERSION"));

    // 获取配置文件路径
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "password.json".to_string());

    let config = if Path::new(&config_path).exists() {
        log::info!("加载配置文件: {}", config_path);
        PluginConfig::from_file(&config_path)
            .with_context(|| format!("无法加载配置文件 {}", config_path))?
    } else {
        log::warn!("配置文件 {} 不存在，使用默认配置", config_path);
        PluginConfig::default()
    };

    if config.settings.from_address.is_empty() {
        log::warn!("settings.from_address 未配置，邮件可能无法发送");
    }

    log::info!("数据库路径: {}", config.database.path);
    let database = Database::new(&config.get_database_url())
        .await
        .context("无法打开数据库")?;

    let admin = Arc::new(ConsoleAdmin::new(database.clone()));
    let host = Arc::new(ConsoleHost::new(admin.clone(), true));
    let store = Arc::new(SqliteCredentialStore::new(database.clone()));
    let transport = Arc::new(SmtpMailTransport::from_settings(&config.settings));

    let plugin = PasswordPlugin::startup(config, host, store, transport)?;
    log::info!("等待输入: <client-id> <command> [args]");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    console::run(&plugin, &admin, &database, stdin).await?;

    database.close().await;
    Ok(())
}

/// 初始化日志记录器
fn init_logger() {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&log_level))
        .format_timestamp_secs()
        .init();
}
