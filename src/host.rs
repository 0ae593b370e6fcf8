//! 宿主系统接口
//!
//! 插件本身没有独立的生命周期，命令分发、玩家查找、消息发送和存储都由宿主提供。

use crate::error::Result;
use crate::types::Identity;
use async_trait::async_trait;
use std::sync::Arc;

/// 宿主控制台
#[async_trait]
pub trait Console: Send + Sync {
    /// 获取管理插件，用于注册命令
    fn admin_plugin(&self) -> Option<Arc<dyn AdminPlugin>>;

    /// 是否能给玩家发送私信
    fn can_private_message(&self) -> bool;

    /// 给玩家发送消息
    async fn message(&self, client: &Identity, text: &str);
}

/// 宿主的管理插件
#[async_trait]
pub trait AdminPlugin: Send + Sync {
    /// 注册一条命令
    fn register_command(&self, name: &str, min_level: u32, alias: Option<&str>);

    /// 按名字或ID查找玩家；找不到时由实现负责提示调用者
    async fn find_client_prompt(&self, query: &str, caller: &Identity) -> Option<Identity>;
}

/// 凭据存储：`clients` 表的 `password` 和 `login` 两列
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 写入密码哈希
    async fn store_password(&self, client_id: i64, password_hash: &str) -> Result<()>;

    /// 写入登录邮箱
    async fn store_email(&self, client_id: i64, email: &str) -> Result<()>;
}
