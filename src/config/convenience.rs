//! # 便利配置函数模块
//!
//! 提供常用数据库配置的便利函数，简化配置过程

use crate::error::EntityDbResult;
use crate::types::*;

/// 创建SQLite文件数据库配置
///
/// # 参数
///
/// * `alias` - 数据库别名
/// * `path` - 数据库文件路径
/// * `create_if_missing` - 文件不存在时是否创建
pub fn sqlite_config<S: Into<String>, P: Into<String>>(
    alias: S,
    path: P,
    create_if_missing: bool,
) -> EntityDbResult<DatabaseConfig> {
    DatabaseConfig::builder()
        .db_type(DatabaseType::SQLite)
        .connection(ConnectionConfig::SQLite {
            path: path.into(),
            create_if_missing,
        })
        .max_connections(5)
        .alias(alias)
        .build()
}

/// 创建SQLite内存数据库配置
pub fn memory_sqlite_config<S: Into<String>>(alias: S) -> EntityDbResult<DatabaseConfig> {
    DatabaseConfig::builder()
        .db_type(DatabaseType::SQLite)
        .connection(ConnectionConfig::SQLite {
            path: ":memory:".to_string(),
            create_if_missing: true,
        })
        .max_connections(1)
        .alias(alias)
        .build()
}
