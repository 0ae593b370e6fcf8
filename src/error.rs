//! 错误处理模块

use thiserror::Error;

/// 应用程序错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("邮件错误: {0}")]
    Mail(#[from] MailError),

    #[error("密码哈希错误: {0}")]
    PasswordHash(String),

    #[error("缺少依赖: {0}")]
    MissingDependency(String),

    #[error("权限不足: {0}")]
    Permission(String),

    #[error("参数无效: {0}")]
    InvalidArgument(String),

    #[error("验证错误: {0}")]
    Validation(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// 创建验证错误
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        Self::Validation(msg.into())
    }

    /// 创建权限错误
    pub fn permission<T: Into<String>>(msg: T) -> Self {
        Self::Permission(msg.into())
    }

    /// 创建参数错误
    pub fn invalid_argument<T: Into<String>>(msg: T) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// 创建缺少依赖错误
    pub fn missing_dependency<T: Into<String>>(msg: T) -> Self {
        Self::MissingDependency(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        Self::PasswordHash(msg.into())
    }
}

/// 邮件发送错误
///
/// `ConnectionRefused` 单独列出，因为它会永久关闭本进程的邮件发送。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("connection refused by {0}")]
    ConnectionRefused(String),

    #[error("{0}")]
    Transport(String),

    #[error("invalid message: {0}")]
    Message(String),

    #[error("sending emails is disabled")]
    Disabled,
}

impl MailError {
    pub fn is_connection_refused(&self) -> bool {
        matches!(self, MailError::ConnectionRefused(_))
    }
}

/// 应用程序Result类型
pub type Result<T> = std::result::Result<T, AppError>;
