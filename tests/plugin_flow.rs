//! 密码插件命令流程集成测试
//!
//! 宿主控制台、管理插件、凭据存储和邮件传输都替换为内存记录器。

use async_trait::async_trait;
use b3_password::auth::LegacyMd5Hasher;
use b3_password::database::{ClientRepository, Database, SqliteCredentialStore};
use b3_password::gen_password::{CONSONANTS, VOWELS};
use b3_password::{
    AdminPlugin, AppError, Console, CredentialStore, HashScheme, Identity, MailError,
    MailTransport, OutgoingMail, PasswordPlugin, PluginConfig,
};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct MockAdmin {
    clients: Vec<Identity>,
    registered: Mutex<Vec<(String, u32, Option<String>)>>,
}

#[async_trait]
impl AdminPlugin for MockAdmin {
    fn register_command(&self, name: &str, min_level: u32, alias: Option<&str>) {
        self.registered.lock().unwrap().push((
            name.to_string(),
            min_level,
            alias.map(str::to_string),
        ));
    }

    async fn find_client_prompt(&self, query: &str, _caller: &Identity) -> Option<Identity> {
        self.clients.iter().find(|c| c.name == query).cloned()
    }
}

struct MockConsole {
    admin: Option<Arc<MockAdmin>>,
    private_messages: bool,
    messages: Mutex<Vec<(i64, String)>>,
}

impl MockConsole {
    fn messages_for(&self, id: i64) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Console for MockConsole {
    fn admin_plugin(&self) -> Option<Arc<dyn AdminPlugin>> {
        self.admin.clone().map(|admin| admin as Arc<dyn AdminPlugin>)
    }

    fn can_private_message(&self) -> bool {
        self.private_messages
    }

    async fn message(&self, client: &Identity, text: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((client.id, text.to_string()));
    }
}

#[derive(Default)]
struct MockStore {
    passwords: Mutex<Vec<(i64, String)>>,
    emails: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn store_password(&self, client_id: i64, password_hash: &str) -> b3_password::Result<()> {
        self.passwords
            .lock()
            .unwrap()
            .push((client_id, password_hash.to_string()));
        Ok(())
    }

    async fn store_email(&self, client_id: i64, email: &str) -> b3_password::Result<()> {
        self.emails
            .lock()
            .unwrap()
            .push((client_id, email.to_string()));
        Ok(())
    }
}

#[derive(Default)]
struct MockTransport {
    sent: Mutex<Vec<OutgoingMail>>,
    attempts: Mutex<usize>,
    fail_with: Mutex<Option<MailError>>,
}

#[async_trait]
impl MailTransport for MockTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        *self.attempts.lock().unwrap() += 1;
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

struct Harness {
    plugin: PasswordPlugin,
    console: Arc<MockConsole>,
    admin: Arc<MockAdmin>,
    store: Arc<MockStore>,
    transport: Arc<MockTransport>,
}

fn player() -> Identity {
    Identity::new(1, "player", 1)
}

fn moderator() -> Identity {
    Identity::new(2, "moderator", 20)
}

fn senior() -> Identity {
    Identity::new(3, "senior", 80)
}

fn superadmin() -> Identity {
    Identity::new(4, "superadmin", 100)
}

fn other_superadmin() -> Identity {
    Identity::new(5, "owner", 100)
}

fn test_config() -> PluginConfig {
    let mut config = PluginConfig::default();
    config.settings.from_address = "b3@example.com".to_string();
    config
}

fn harness_with(config: PluginConfig, private_messages: bool) -> Harness {
    let admin = Arc::new(MockAdmin {
        clients: vec![player(), moderator(), senior(), superadmin(), other_superadmin()],
        ..Default::default()
    });
    let console = Arc::new(MockConsole {
        admin: Some(admin.clone()),
        private_messages,
        messages: Mutex::new(Vec::new()),
    });
    let store = Arc::new(MockStore::default());
    let transport = Arc::new(MockTransport::default());

    let plugin = PasswordPlugin::startup(
        config,
        console.clone(),
        store.clone(),
        transport.clone(),
    )
    .expect("plugin starts");

    Harness {
        plugin,
        console,
        admin,
        store,
        transport,
    }
}

fn harness() -> Harness {
    harness_with(test_config(), true)
}

/// 从 "Your new password is: ..." 消息中取出明文密码
fn announced_password(messages: &[String]) -> String {
    messages
        .iter()
        .find_map(|m| m.strip_prefix("Your new password is: "))
        .expect("password announced")
        .to_string()
}

fn assert_default_shape(password: &str) {
    let chars: Vec<char> = password.chars().collect();
    assert_eq!(chars.len(), 9, "{password}");
    for i in [0, 2, 6, 8] {
        assert!(CONSONANTS.contains(&chars[i]), "{password}");
    }
    for i in [1, 7] {
        assert!(VOWELS.contains(&chars[i]), "{password}");
    }
    assert!(chars[3..6].iter().all(|c| c.is_ascii_digit()), "{password}");
}

#[test]
fn test_startup_without_admin_plugin_fails() {
    let console = Arc::new(MockConsole {
        admin: None,
        private_messages: true,
        messages: Mutex::new(Vec::new()),
    });

    let result = PasswordPlugin::startup(
        test_config(),
        console,
        Arc::new(MockStore::default()),
        Arc::new(MockTransport::default()),
    );

    assert!(matches!(result, Err(AppError::MissingDependency(_))));
}

#[test]
fn test_startup_registers_configured_commands() {
    let mut config = test_config();
    config.commands.clear();
    config.commands.insert("setpass".to_string(), 100);
    config.commands.insert("generatepass-genpass".to_string(), 1);
    config.commands.insert("resetpass".to_string(), 1);
    config.commands.insert("unknown".to_string(), 1);

    let h = harness_with(config, true);
    let mut registered = h.admin.registered.lock().unwrap().clone();
    registered.sort();

    assert_eq!(
        registered,
        vec![
            ("generatepass".to_string(), 1, Some("genpass".to_string())),
            ("resetpass".to_string(), 1, None),
            ("setpass".to_string(), 100, None),
        ]
    );
    assert!(h.plugin.is_enabled());
}

#[tokio::test]
async fn test_generatepass_without_email() {
    let h = harness();
    let client = player();

    assert!(h.plugin.dispatch("generatepass", "", &client).await.unwrap());

    let messages = h.console.messages_for(client.id);
    assert_eq!(messages.len(), 1);
    let password = announced_password(&messages);
    assert_default_shape(&password);

    let passwords = h.store.passwords.lock().unwrap();
    assert_eq!(
        *passwords,
        vec![(client.id, LegacyMd5Hasher::digest(&password))]
    );
    assert!(h.store.emails.lock().unwrap().is_empty());
    assert_eq!(*h.transport.attempts.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_generatepass_with_valid_email_sends_mail() {
    let h = harness();
    let client = player();

    h.plugin
        .dispatch("genpass", "player@example.com", &client)
        .await
        .unwrap();

    let messages = h.console.messages_for(client.id);
    let password = announced_password(&messages);
    assert!(messages.contains(&"Password sent to player@example.com".to_string()));

    let sent = h.transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "player@example.com");
    assert_eq!(sent[0].from, "b3@example.com");
    assert!(sent[0].body.contains("ID for login: 1\r\n"));
    assert!(sent[0].body.contains(&format!("Password: {}\r\n", password)));

    assert_eq!(
        *h.store.emails.lock().unwrap(),
        vec![(client.id, "player@example.com".to_string())]
    );
    assert_eq!(
        *h.store.passwords.lock().unwrap(),
        vec![(client.id, LegacyMd5Hasher::digest(&password))]
    );
}

#[tokio::test]
async fn test_generatepass_with_invalid_email_still_stores_password() {
    let h = harness();
    let client = player();

    h.plugin
        .dispatch("resetpass", "not-an-email", &client)
        .await
        .unwrap();

    let messages = h.console.messages_for(client.id);
    assert!(messages.contains(&"Email address is not valid".to_string()));
    announced_password(&messages);

    assert_eq!(h.store.passwords.lock().unwrap().len(), 1);
    assert!(h.store.emails.lock().unwrap().is_empty());
    assert_eq!(*h.transport.attempts.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_password_not_announced_without_private_messages() {
    let h = harness_with(test_config(), false);
    let client = player();

    h.plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await
        .unwrap();

    let messages = h.console.messages_for(client.id);
    assert!(!messages.iter().any(|m| m.starts_with("Your new password is")));

    let sent = h.transport.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    let password = sent[0]
        .body
        .lines()
        .find_map(|line| line.strip_prefix("Password: "))
        .unwrap()
        .to_string();
    assert_eq!(
        *h.store.passwords.lock().unwrap(),
        vec![(client.id, LegacyMd5Hasher::digest(&password))]
    );
}

#[tokio::test]
async fn test_connection_refused_disables_mail_for_process() {
    let h = harness();
    let client = player();
    *h.transport.fail_with.lock().unwrap() =
        Some(MailError::ConnectionRefused("localhost:25".into()));

    h.plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await
        .unwrap();

    let messages = h.console.messages_for(client.id);
    assert!(messages
        .iter()
        .any(|m| m.starts_with("Sending email failed:")));
    assert!(!h.plugin.state().notifier.is_enabled());
    // 仍可以私信，插件保持启用
    assert!(h.plugin.is_enabled());

    // 即使服务器恢复也不再尝试发送
    *h.transport.fail_with.lock().unwrap() = None;
    h.plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await
        .unwrap();

    let messages = h.console.messages_for(client.id);
    assert!(messages.contains(&"Sending emails is not enabled!".to_string()));
    assert_eq!(*h.transport.attempts.lock().unwrap(), 1);
    assert_eq!(h.store.passwords.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn test_transport_failure_keeps_mail_enabled() {
    let h = harness();
    let client = player();
    *h.transport.fail_with.lock().unwrap() = Some(MailError::Transport("timed out".into()));

    h.plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await
        .unwrap();

    assert!(h
        .console
        .messages_for(client.id)
        .contains(&"Sending email failed: timed out".to_string()));
    assert!(h.plugin.state().notifier.is_enabled());
}

#[tokio::test]
async fn test_connection_refused_without_private_messages_disables_plugin() {
    let h = harness_with(test_config(), false);
    let client = player();
    *h.transport.fail_with.lock().unwrap() =
        Some(MailError::ConnectionRefused("localhost:25".into()));

    assert!(h
        .plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await
        .unwrap());
    assert!(!h.plugin.is_enabled());

    // 插件已禁用，不再处理命令
    assert!(!h.plugin.dispatch("generatepass", "", &client).await.unwrap());
    assert_eq!(h.store.passwords.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_setpass_for_self() {
    let h = harness();
    let client = player();

    h.plugin.dispatch("setpass", "hunter22", &client).await.unwrap();

    assert_eq!(
        *h.store.passwords.lock().unwrap(),
        vec![(client.id, LegacyMd5Hasher::digest("hunter22"))]
    );
    assert!(h.console.messages_for(client.id).is_empty());
}

#[tokio::test]
async fn test_setpass_for_lower_level_player() {
    let h = harness();

    h.plugin
        .dispatch("setpass", "newpass player", &moderator())
        .await
        .unwrap();

    assert_eq!(
        *h.store.passwords.lock().unwrap(),
        vec![(player().id, LegacyMd5Hasher::digest("newpass"))]
    );
}

#[tokio::test]
async fn test_setpass_for_higher_level_player_rejected() {
    let h = harness();
    let caller = moderator();

    for target in ["senior", "moderator2", "superadmin"] {
        h.plugin
            .dispatch("setpass", &format!("newpass {target}"), &caller)
            .await
            .unwrap();
    }

    assert!(h.store.passwords.lock().unwrap().is_empty());
    assert_eq!(
        h.console.messages_for(caller.id),
        vec![
            "You can only change passwords of yourself or lower level players.".to_string(),
            "You can only change passwords of yourself or lower level players.".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_setpass_by_top_level_admin_on_equal_level() {
    let h = harness();

    h.plugin
        .dispatch("setpass", "ownerpass owner", &superadmin())
        .await
        .unwrap();

    assert_eq!(
        *h.store.passwords.lock().unwrap(),
        vec![(other_superadmin().id, LegacyMd5Hasher::digest("ownerpass"))]
    );
}

#[tokio::test]
async fn test_setpass_unknown_target_aborts_silently() {
    let h = harness();
    let caller = senior();

    h.plugin
        .dispatch("setpass", "newpass nobody", &caller)
        .await
        .unwrap();

    assert!(h.store.passwords.lock().unwrap().is_empty());
    assert!(h.console.messages_for(caller.id).is_empty());
}

#[tokio::test]
async fn test_setpass_without_password_prints_usage() {
    let h = harness();
    let caller = player();

    h.plugin.dispatch("setpass", "   ", &caller).await.unwrap();

    assert!(h.store.passwords.lock().unwrap().is_empty());
    assert_eq!(
        h.console.messages_for(caller.id),
        vec!["Usage: setpass <password> [<name>]".to_string()]
    );
}

#[tokio::test]
async fn test_unknown_command_not_handled() {
    let h = harness();
    assert!(!h.plugin.dispatch("kick", "player", &senior()).await.unwrap());
    assert!(!h.plugin.dispatch("cmd_setpass", "x", &senior()).await.unwrap());
}

#[tokio::test]
async fn test_argon2_scheme_stores_phc_string() {
    let mut config = test_config();
    config.settings.hash_scheme = HashScheme::Argon2;
    let h = harness_with(config, true);

    h.plugin
        .dispatch("setpass", "hunter22", &player())
        .await
        .unwrap();

    let passwords = h.store.passwords.lock().unwrap();
    assert_eq!(passwords.len(), 1);
    assert!(passwords[0].1.starts_with("$argon2"));
}

#[tokio::test]
async fn test_generatepass_with_sqlite_store() -> b3_password::Result<()> {
    let temp_file = tempfile::NamedTempFile::new()?;
    let database = Database::new(&format!("sqlite:{}", temp_file.path().to_str().unwrap())).await?;
    let id = ClientRepository::create(database.pool(), "player", 1).await?;
    let client = Identity::new(id, "player", 1);

    let admin = Arc::new(MockAdmin::default());
    let console = Arc::new(MockConsole {
        admin: Some(admin),
        private_messages: true,
        messages: Mutex::new(Vec::new()),
    });
    let transport = Arc::new(MockTransport::default());
    let plugin = PasswordPlugin::startup(
        test_config(),
        console.clone(),
        Arc::new(SqliteCredentialStore::new(database.clone())),
        transport,
    )?;

    plugin
        .dispatch("generatepass", "player@example.com", &client)
        .await?;

    let password = announced_password(&console.messages_for(id));
    let (hash, login) = ClientRepository::credentials(database.pool(), id)
        .await?
        .expect("client row");
    assert_eq!(hash, Some(LegacyMd5Hasher::digest(&password)));
    assert_eq!(login.as_deref(), Some("player@example.com"));

    database.close().await;
    Ok(())
}
