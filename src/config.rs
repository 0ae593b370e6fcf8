//! 配置管理模块

use crate::error::{AppError, Result};
use crate::types::HashScheme;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// 插件配置
///
/// 启动时加载一次，之后以不可变方式传入各组件。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// 命令名（可带 `-别名` 后缀）到最低权限等级的映射
    #[serde(default)]
    pub commands: BTreeMap<String, u32>,
    /// 邮件与密码设置
    #[serde(default)]
    pub settings: Settings,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// `settings` 小节
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 发件人地址（信封与 From 头）
    pub from_address: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub subject: String,
    /// 邮件正文开头
    pub introduction: String,
    /// 邮件正文结尾
    pub tail: String,
    pub alpha_length: usize,
    pub numeric_length: usize,
    /// 达到此等级的管理员可以修改任何人的密码
    pub top_level: u32,
    pub hash_scheme: HashScheme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            from_address: String::new(),
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            subject: "B3 just generated a password for you".to_string(),
            introduction: "Please log in with the following credentials:".to_string(),
            tail: "This is an automagically generated email, do not reply to this mail."
                .to_string(),
            alpha_length: 6,
            numeric_length: 3,
            top_level: 100,
            hash_scheme: HashScheme::LegacyMd5,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "./data/b3.db".to_string(),
        }
    }
}

impl PluginConfig {
    /// 从文件加载配置，格式由扩展名决定（json/toml/ini）
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        let config: PluginConfig = source.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 保存配置到文件（JSON）
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> Result<()> {
        if self.settings.smtp_host.is_empty() {
            return Err(AppError::validation("settings.smtp_host 不能为空"));
        }

        if self.settings.alpha_length + self.settings.numeric_length == 0 {
            return Err(AppError::validation("生成的密码长度不能为0"));
        }

        if self.database.path.is_empty() {
            return Err(AppError::validation("数据库路径不能为空"));
        }

        Ok(())
    }

    /// 获取数据库URL
    pub fn get_database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.database.path)
    }
}

impl Default for PluginConfig {
    fn default() -> Self {
        let commands = [("setpass", 0), ("generatepass-genpass", 0), ("resetpass", 0)]
            .into_iter()
            .map(|(name, level)| (name.to_string(), level))
            .collect();

        Self {
            commands,
            settings: Settings::default(),
            database: DatabaseConfig::default(),
        }
    }
}
