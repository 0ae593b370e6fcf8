//! 玩家表操作模块

use crate::error::Result;
use crate::host::CredentialStore;
use crate::types::Identity;
use async_trait::async_trait;
use sqlx::{sqlite::SqliteRow, Row, Sqlite};

use super::Database;

/// 玩家数据库操作
pub struct ClientRepository;

impl ClientRepository {
    /// 新增玩家（宿主通常负责，独立运行和测试时使用）
    pub async fn create(pool: &sqlx::Pool<Sqlite>, name: &str, max_level: u32) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO clients (name, max_level)
            VALUES (?, ?)
            "#,
        )
        .bind(name)
        .bind(max_level)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// 通过ID查找玩家
    pub async fn find_by_id(pool: &sqlx::Pool<Sqlite>, id: i64) -> Result<Option<Identity>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, max_level
            FROM clients
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(|row| identity_from_row(&row)))
    }

    /// 通过名字查找玩家（忽略大小写）
    pub async fn find_by_name(pool: &sqlx::Pool<Sqlite>, name: &str) -> Result<Vec<Identity>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, max_level
            FROM clients
            WHERE name = ? COLLATE NOCASE
            ORDER BY id ASC
            "#,
        )
        .bind(name)
        .fetch_all(pool)
        .await?;

        Ok(rows.iter().map(identity_from_row).collect())
    }

    /// 更新密码哈希
    pub async fn update_password(
        pool: &sqlx::Pool<Sqlite>,
        id: i64,
        password_hash: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET password = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 更新登录邮箱
    pub async fn update_login(pool: &sqlx::Pool<Sqlite>, id: i64, login: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE clients
            SET login = ?
            WHERE id = ?
            "#,
        )
        .bind(login)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 读取已保存的密码哈希和登录邮箱
    pub async fn credentials(
        pool: &sqlx::Pool<Sqlite>,
        id: i64,
    ) -> Result<Option<(Option<String>, Option<String>)>> {
        let row = sqlx::query("SELECT password, login FROM clients WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(row.map(|row| (row.get("password"), row.get("login"))))
    }
}

fn identity_from_row(row: &SqliteRow) -> Identity {
    let max_level: i64 = row.get("max_level");
    Identity {
        id: row.get("id"),
        name: row.get("name"),
        max_level: u32::try_from(max_level).unwrap_or(0),
    }
}

/// 基于SQLite的凭据存储
#[derive(Clone)]
pub struct SqliteCredentialStore {
    database: Database,
}

impl SqliteCredentialStore {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn store_password(&self, client_id: i64, password_hash: &str) -> Result<()> {
        if !ClientRepository::update_password(self.database.pool(), client_id, password_hash).await? {
            log::warn!("玩家 {} 不存在，密码未保存", client_id);
        }
        Ok(())
    }

    async fn store_email(&self, client_id: i64, email: &str) -> Result<()> {
        if !ClientRepository::update_login(self.database.pool(), client_id, email).await? {
            log::warn!("玩家 {} 不存在，邮箱未保存", client_id);
        }
        Ok(())
    }
}
