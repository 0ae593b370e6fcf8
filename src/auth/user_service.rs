//! 用户服务模块 - 处理修改密码的权限判断

use crate::error::{AppError, Result};
use crate::types::Identity;

/// 跨身份修改密码被拒绝时发给玩家的提示
pub const PERMISSION_DENIED_MESSAGE: &str =
    "You can only change passwords of yourself or lower level players.";

/// 用户服务
#[derive(Debug, Clone, Copy)]
pub struct UserService {
    top_level: u32,
}

impl UserService {
    /// 创建新的用户服务实例
    ///
    /// `top_level` 及以上的管理员可以修改任何人的密码。
    pub fn new(top_level: u32) -> Self {
        Self { top_level }
    }

    pub fn top_level(&self) -> u32 {
        self.top_level
    }

    /// 检查 `operator` 能否修改 `target` 的密码
    ///
    /// 自己总是可以；修改他人时需要等级严格高于对方，或者达到顶级等级。
    pub fn check_password_change(&self, operator: &Identity, target: &Identity) -> Result<()> {
        if operator.id == target.id {
            return Ok(());
        }

        if operator.max_level <= target.max_level && operator.max_level < self.top_level {
            log::debug!(
                "用户 {}({}) 无权修改 {}({}) 的密码",
                operator.id,
                operator.max_level,
                target.id,
                target.max_level
            );
            return Err(AppError::permission(PERMISSION_DENIED_MESSAGE));
        }

        Ok(())
    }
}

impl Default for UserService {
    fn default() -> Self {
        Self::new(100)
    }
}
