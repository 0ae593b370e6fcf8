//! 密码命令处理器

use crate::auth::user_service::PERMISSION_DENIED_MESSAGE;
use crate::error::{AppError, Result};
use crate::plugin::PluginState;
use crate::types::{EmailCheck, Identity};
use crate::utils::validate_email;

pub const SETPASS_USAGE: &str = "Usage: setpass <password> [<name>]";
pub const INVALID_EMAIL_MESSAGE: &str = "Email address is not valid";
pub const MAIL_DISABLED_MESSAGE: &str = "Sending emails is not enabled!";

/// 处理 setpass 命令 - 手动设置自己或他人的密码
pub async fn set_password_command(state: &PluginState, data: &str, client: &Identity) -> Result<()> {
    let mut args = data.split_whitespace();
    let Some(password) = args.next() else {
        state.console.message(client, SETPASS_USAGE).await;
        return Ok(());
    };

    let target = match args.next() {
        Some(query) => {
            // 查找失败时管理插件已经提示过玩家
            let Some(target) = state.admin.find_client_prompt(query, client).await else {
                return Ok(());
            };

            match state.user_service.check_password_change(client, &target) {
                Ok(()) => target,
                Err(AppError::Permission(_)) => {
                    state.console.message(client, PERMISSION_DENIED_MESSAGE).await;
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
        None => client.clone(),
    };

    let password_hash = state.password_service.hash_password(password)?;
    state.store.store_password(target.id, &password_hash).await?;

    log::info!("玩家 {} 设置了 {} 的密码", client.id, target.id);
    Ok(())
}

/// 处理 generatepass / resetpass 命令 - 生成新密码，可选邮件发送
pub async fn generate_password_command(
    state: &PluginState,
    data: &str,
    client: &Identity,
) -> Result<()> {
    let email = data.trim();
    let check = validate_email(email);

    let password = state.password_service.generate_password();
    if state.console.can_private_message() {
        state
            .console
            .message(client, &format!("Your new password is: {}", password))
            .await;
    }

    match check {
        EmailCheck::Empty => {}
        _ if !state.notifier.is_enabled() => {
            state.console.message(client, MAIL_DISABLED_MESSAGE).await;
        }
        EmailCheck::Valid => {
            send_credentials(state, client, &password, email).await;
            state.store.store_email(client.id, email).await?;
        }
        EmailCheck::Invalid => {
            state.console.message(client, INVALID_EMAIL_MESSAGE).await;
        }
    }

    let password_hash = state.password_service.hash_password(&password)?;
    state.store.store_password(client.id, &password_hash).await?;

    log::info!("玩家 {} 生成了新密码", client.id);
    Ok(())
}

/// 发送凭据邮件并把结果告诉玩家
async fn send_credentials(state: &PluginState, client: &Identity, password: &str, email: &str) {
    match state.notifier.send(email, password, client.id).await {
        Ok(()) => {
            state
                .console
                .message(client, &format!("Password sent to {}", email))
                .await;
        }
        Err(e) => {
            state
                .console
                .message(client, &format!("Sending email failed: {}", e))
                .await;
            if e.is_connection_refused() {
                state.test_availability();
            }
        }
    }
}
