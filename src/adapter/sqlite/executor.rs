//! SQLite执行器核心

use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use rat_logger::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use super::data_conversion::row_to_data_map;
use super::schema::create_table_sql;
use crate::adapter::{returns_rows, QueryExecutor, QueryOutcome};
use crate::error::{EntityDbError, EntityDbResult};
use crate::model::Entity;
use crate::types::{ConnectionConfig, DatabaseConfig, DatabaseType};

/// SQLite查询执行器
pub struct SqliteExecutor {
    pool: SqlitePool,
    last_insert_id: AtomicI64,
}

fn connection_error(e: impl std::fmt::Display) -> EntityDbError {
    EntityDbError::Storage {
        message: crate::i18n::tf("error.sqlite_connection", &[("message", e.to_string().as_str())]),
    }
}

impl SqliteExecutor {
    /// 由已有连接池创建执行器
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            last_insert_id: AtomicI64::new(0),
        }
    }

    /// 按数据库配置连接
    pub async fn connect(config: &DatabaseConfig) -> EntityDbResult<Self> {
        let (path, create_if_missing) = match &config.connection {
            ConnectionConfig::SQLite {
                path,
                create_if_missing,
            } => (path.clone(), *create_if_missing),
        };

        // 内存数据库：单连接且不回收，否则每个新连接都是一个空库
        if config.connection.is_memory() {
            info!("连接SQLite内存数据库: 别名={}", config.alias);
            return Self::memory().await;
        }

        let file_exists = Path::new(&path).exists();
        if !file_exists && !create_if_missing {
            return Err(EntityDbError::Storage {
                message: crate::i18n::tf("error.sqlite_file_not_found", &[("path", path.as_str())]),
            });
        }

        if create_if_missing && !file_exists {
            if let Some(parent) = Path::new(&path).parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await.map_err(|e| EntityDbError::Storage {
                        message: crate::i18n::tf(
                            "error.sqlite_dir_create",
                            &[("message", e.to_string().as_str())],
                        ),
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(create_if_missing);
        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(connection_error)?;

        info!("连接SQLite数据库: 别名={}, 路径={}", config.alias, path);
        Ok(Self::from_pool(pool))
    }

    /// 连接一个独立的内存数据库
    pub async fn memory() -> EntityDbResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect("sqlite::memory:")
            .await
            .map_err(connection_error)?;
        Ok(Self::from_pool(pool))
    }

    /// 为实体类型建表（表已存在时不做任何事）
    pub async fn create_table_for<E: Entity>(&self) -> EntityDbResult<()> {
        let sql = create_table_sql::<E>()?;
        self.execute(&sql).await?;
        debug!("已确保表存在: {}", E::schema()?.table());
        Ok(())
    }

    /// 关闭连接池
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl QueryExecutor for SqliteExecutor {
    async fn execute(&self, sql: &str) -> EntityDbResult<QueryOutcome> {
        crate::debug_log!("执行SQLite语句: {}", sql);

        if returns_rows(sql) {
            let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
            let mut results = Vec::with_capacity(rows.len());
            for row in &rows {
                results.push(row_to_data_map(row)?);
            }
            return Ok(QueryOutcome::Rows(results));
        }

        let result = sqlx::query(sql).execute(&self.pool).await?;
        if sql.trim_start().get(..6).is_some_and(|head| head.eq_ignore_ascii_case("INSERT")) {
            self.last_insert_id
                .store(result.last_insert_rowid(), Ordering::SeqCst);
        }
        Ok(QueryOutcome::Affected(result.rows_affected()))
    }

    fn last_insert_id(&self) -> i64 {
        self.last_insert_id.load(Ordering::SeqCst)
    }

    fn escape(&self, text: &str) -> String {
        // SQLite 字符串字面量中只有单引号需要转义，NUL 会截断语句
        text.replace('\0', "").replace('\'', "''")
    }

    fn database_type(&self) -> DatabaseType {
        DatabaseType::SQLite
    }
}
