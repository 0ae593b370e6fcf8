//! 邮件通知模块

pub mod smtp;

pub use smtp::SmtpMailTransport;

use crate::config::Settings;
use crate::error::MailError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 待发送的纯文本邮件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body: String,
}

/// 邮件传输层
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> std::result::Result<(), MailError>;
}

/// 凭据邮件通知器
///
/// 发送函数始终存在；是否允许发送由独立的 `enabled` 标志决定。
/// 一旦出现连接被拒绝，本进程内不再发送邮件。
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    from_address: String,
    subject: String,
    introduction: String,
    tail: String,
    enabled: AtomicBool,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, settings: &Settings) -> Self {
        Self {
            transport,
            from_address: settings.from_address.clone(),
            subject: settings.subject.clone(),
            introduction: settings.introduction.clone(),
            tail: settings.tail.clone(),
            enabled: AtomicBool::new(true),
        }
    }

    /// 邮件发送是否可用
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// 永久关闭邮件发送
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::SeqCst);
    }

    /// 按固定模板组装邮件
    pub fn compose(&self, recipient: &str, password: &str, identity_id: i64) -> OutgoingMail {
        let body = format!(
            "{}\r\n\r\nID for login: {}\r\nPassword: {}\r\n\r\n{}",
            self.introduction, identity_id, password, self.tail
        );

        OutgoingMail {
            to: recipient.to_string(),
            from: self.from_address.clone(),
            subject: self.subject.clone(),
            body,
        }
    }

    /// 发送凭据邮件
    pub async fn send(
        &self,
        recipient: &str,
        password: &str,
        identity_id: i64,
    ) -> std::result::Result<(), MailError> {
        if !self.is_enabled() {
            return Err(MailError::Disabled);
        }

        let mail = self.compose(recipient, password, identity_id);
        match self.transport.send(&mail).await {
            Ok(()) => {
                log::info!("已向 {} 发送玩家 {} 的凭据邮件", recipient, identity_id);
                Ok(())
            }
            Err(e) => {
                log::error!("邮件发送失败: {}", e);
                if e.is_connection_refused() {
                    log::warn!("SMTP服务器拒绝连接，本进程内不再发送邮件");
                    self.disable();
                }
                Err(e)
            }
        }
    }
}
