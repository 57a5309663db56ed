//! 查询执行器模块
//!
//! 实体层只依赖这里定义的最小接口：执行一条SQL、取回最近插入的ID、转义文本。
//! 具体后端（目前为SQLite）在子模块中实现

use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;

use crate::error::EntityDbResult;
use crate::types::*;

pub mod query_builder;
#[cfg(feature = "sqlite-support")]
mod sqlite;

pub use query_builder::{SqlQueryBuilder, ACTIVE_COLUMN, ID_COLUMN};
#[cfg(feature = "sqlite-support")]
pub use sqlite::{create_table_sql, SqliteExecutor};

/// 查询结果中的一行：列名到值的有序映射
pub type Row = IndexMap<String, DataValue>;

/// 执行结果
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// 写语句影响的行数
    Affected(u64),
    /// 读语句返回的行
    Rows(Vec<Row>),
}

impl QueryOutcome {
    /// 取出结果行，写语句的结果视为零行
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Affected(_) => Vec::new(),
        }
    }

    /// 影响或返回的行数
    pub fn row_count(&self) -> u64 {
        match self {
            QueryOutcome::Affected(n) => *n,
            QueryOutcome::Rows(rows) => rows.len() as u64,
        }
    }
}

/// 查询执行器trait
///
/// 执行器在一次请求的范围内被共享，`last_insert_id` 返回本执行器上最近一次插入的自增ID
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// 执行一条SQL语句
    async fn execute(&self, sql: &str) -> EntityDbResult<QueryOutcome>;

    /// 最近一次插入生成的自增ID
    fn last_insert_id(&self) -> i64;

    /// 按后端规则转义字符串内容，不包含外层引号
    fn escape(&self, text: &str) -> String;

    /// 后端数据库类型
    fn database_type(&self) -> DatabaseType;
}

/// 判断语句是否返回结果行
pub(crate) fn returns_rows(sql: &str) -> bool {
    let head = sql.trim_start();
    let keyword: String = head
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_uppercase();
    matches!(keyword.as_str(), "SELECT" | "PRAGMA" | "WITH" | "VALUES")
}

/// 根据数据库配置创建执行器
pub async fn create_executor(config: &DatabaseConfig) -> EntityDbResult<Arc<dyn QueryExecutor>> {
    match config.db_type {
        #[cfg(feature = "sqlite-support")]
        DatabaseType::SQLite => {
            let executor = SqliteExecutor::connect(config).await?;
            Ok(Arc::new(executor))
        }
        #[cfg(not(feature = "sqlite-support"))]
        DatabaseType::SQLite => Err(crate::entity_error!(
            config,
            "SQLite支持未启用，请启用 sqlite-support 特性"
        )),
    }
}
