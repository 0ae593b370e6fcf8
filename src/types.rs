//! 系统类型定义

use serde::{Deserialize, Serialize};

/// 宿主系统中的玩家身份
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// 数据库中的数字ID
    pub id: i64,
    /// 玩家名
    pub name: String,
    /// 最高权限等级
    pub max_level: u32,
}

impl Identity {
    pub fn new(id: i64, name: impl Into<String>, max_level: u32) -> Self {
        Self {
            id,
            name: name.into(),
            max_level,
        }
    }
}

/// 密码哈希方案
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum HashScheme {
    /// MD5十六进制摘要，与已有数据兼容
    #[default]
    LegacyMd5,
    /// Argon2 PHC 字符串
    Argon2,
}

impl HashScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            HashScheme::LegacyMd5 => "legacy_md5",
            HashScheme::Argon2 => "argon2",
        }
    }
}

/// 邮箱地址检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailCheck {
    /// 未提供邮箱
    Empty,
    /// 格式无效
    Invalid,
    /// 格式有效
    Valid,
}

/// 插件命令
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    /// `setpass <password> [<name>]`
    SetPass,
    /// `generatepass [<email>]`
    GeneratePass,
    /// `resetpass [<email>]`，与 generatepass 相同
    ResetPass,
}

impl Command {
    pub const ALL: [Command; 3] = [Command::SetPass, Command::GeneratePass, Command::ResetPass];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::SetPass => "setpass",
            Command::GeneratePass => "generatepass",
            Command::ResetPass => "resetpass",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "setpass" => Some(Command::SetPass),
            "generatepass" => Some(Command::GeneratePass),
            "resetpass" => Some(Command::ResetPass),
            _ => None,
        }
    }
}
