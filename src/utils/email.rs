//! 邮箱地址校验

use crate::types::EmailCheck;

/// 长度不超过该值的输入直接视为无效
pub const MIN_EMAIL_LENGTH: usize = 8;

/// 检查玩家提供的邮箱地址
///
/// 空字符串表示未请求发送邮件，返回 `EmailCheck::Empty`。
pub fn validate_email(candidate: &str) -> EmailCheck {
    if candidate.is_empty() {
        return EmailCheck::Empty;
    }

    if candidate.len() < MIN_EMAIL_LENGTH {
        return EmailCheck::Invalid;
    }

    if validator::validate_email(candidate) {
        EmailCheck::Valid
    } else {
        EmailCheck::Invalid
    }
}
