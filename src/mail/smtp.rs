//! SMTP传输实现

use super::{MailTransport, OutgoingMail};
use crate::config::Settings;
use crate::error::MailError;
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::error::Error as StdError;

/// 明文SMTP投递到配置的 `host:port`
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    endpoint: String,
}

impl SmtpMailTransport {
    pub fn new(host: &str, port: u16) -> Self {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();

        Self {
            mailer,
            endpoint: format!("{host}:{port}"),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.smtp_host, settings.smtp_port)
    }

    fn build_message(mail: &OutgoingMail) -> Result<Message, MailError> {
        let from: Mailbox = mail
            .from
            .parse()
            .map_err(|e| MailError::Message(format!("from address {:?}: {e}", mail.from)))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| MailError::Message(format!("recipient {:?}: {e}", mail.to)))?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|e| MailError::Message(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = Self::build_message(mail)?;

        log::debug!("通过 {} 发送邮件给 {}", self.endpoint, mail.to);
        self.mailer
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| classify_error(&e, &self.endpoint))
    }
}

/// 把传输错误归类，连接被拒绝单独识别
fn classify_error(err: &lettre::transport::smtp::Error, endpoint: &str) -> MailError {
    if is_connection_refused(err) {
        MailError::ConnectionRefused(endpoint.to_string())
    } else {
        MailError::Transport(err.to_string())
    }
}

fn is_connection_refused(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io) = e.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        current = e.source();
    }
    false
}
