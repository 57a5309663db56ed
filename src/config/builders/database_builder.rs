//! # 数据库配置构建器模块
//!
//! 提供数据库配置的构建器实现，支持链式调用和严格验证

use crate::error::EntityDbResult;
use crate::types::*;
use rat_logger::info;

/// 数据库配置构建器
///
/// 严格要求所有配置项必须显式设置
#[derive(Debug)]
pub struct DatabaseConfigBuilder {
    db_type: Option<DatabaseType>,
    connection: Option<ConnectionConfig>,
    max_connections: Option<u32>,
    alias: Option<String>,
}
impl DatabaseConfig {
    /// 创建数据库配置构建器
    pub fn builder() -> DatabaseConfigBuilder {
        DatabaseConfigBuilder::new()
    }
}

impl DatabaseConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            db_type: None,
            connection: None,
            max_connections: None,
            alias: None,
        }
    }

    /// 设置数据库类型
    ///
    /// # 参数
    ///
    /// * `db_type` - 数据库类型
    pub fn db_type(mut self, db_type: DatabaseType) -> Self {
        self.db_type = Some(db_type);
        self
    }

    /// 设置连接配置
    ///
    /// # 参数
    ///
    /// * `connection` - 连接配置
    pub fn connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = Some(connection);
        self
    }

    /// 设置最大连接数
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = Some(max_connections);
        self
    }

    /// 设置数据库别名
    ///
    /// # 参数
    ///
    /// * `alias` - 数据库别名
    pub fn alias<S: Into<String>>(mut self, alias: S) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// 构建数据库配置
    ///
    /// # 错误
    ///
    /// 如果任何必需的配置项未设置，将返回错误
    pub fn build(self) -> EntityDbResult<DatabaseConfig> {
        let db_type = self
            .db_type
            .ok_or_else(|| crate::entity_error!(config, "数据库类型必须设置"))?;

        let connection = self
            .connection
            .ok_or_else(|| crate::entity_error!(config, "连接配置必须设置"))?;

        let max_connections = self
            .max_connections
            .ok_or_else(|| crate::entity_error!(config, "最大连接数必须设置"))?;

        let alias = self
            .alias
            .ok_or_else(|| crate::entity_error!(config, "数据库别名必须设置"))?;

        if max_connections == 0 {
            return Err(crate::entity_error!(config, "最大连接数不能为零"));
        }

        // 内存数据库的每个连接都是独立的库
        if connection.is_memory() && max_connections != 1 {
            return Err(crate::entity_error!(config, "内存数据库只能使用一个连接"));
        }

        info!("创建数据库配置: 别名={}, 类型={:?}", alias, db_type);

        Ok(DatabaseConfig {
            db_type,
            connection,
            max_connections,
            alias,
        })
    }
}
impl Default for DatabaseConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_requires_single_connection() {
        let result = DatabaseConfig::builder()
            .db_type(DatabaseType::SQLite)
            .connection(ConnectionConfig::SQLite {
                path: ":memory:".to_string(),
                create_if_missing: true,
            })
            .max_connections(4)
            .alias("default")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_alias() {
        let result = DatabaseConfig::builder()
            .db_type(DatabaseType::SQLite)
            .connection(ConnectionConfig::SQLite {
                path: "./data/app.db".to_string(),
                create_if_missing: true,
            })
            .max_connections(4)
            .build();
        assert!(result.is_err());
    }
}
