//! 数据库模块

pub mod client;

// 重新导出数据库操作
pub use client::{ClientRepository, SqliteCredentialStore};

use crate::error::Result;
use sqlx::{sqlite::SqlitePool, Pool, Sqlite};
use std::path::Path;

/// 数据库连接池类型
pub type DbPool = Pool<Sqlite>;

/// 数据库管理器
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// 初始化数据库连接
    pub async fn new(database_url: &str) -> Result<Self> {
        // 确保数据库文件所在目录存在
        if let Some(rest) = database_url.strip_prefix("sqlite:") {
            let path = rest.split('?').next().unwrap_or(rest);
            if let Some(parent) = Path::new(path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // 创建连接池
        let pool = SqlitePool::connect(database_url).await?;

        let database = Self { pool };

        // 初始化数据库表结构
        database.init_tables().await?;

        Ok(database)
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// 初始化数据库表结构
    ///
    /// `clients` 表通常由宿主创建，这里只在独立运行时补建。
    async fn init_tables(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL DEFAULT '',
                max_level INTEGER NOT NULL DEFAULT 0,
                password TEXT,
                login TEXT
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        log::info!("数据库表结构初始化完成");
        Ok(())
    }

    /// 检查数据库连接
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// 关闭数据库连接
    pub async fn close(self) {
        self.pool.close().await;
    }
}
