use serde::{Deserialize, Serialize};

/// 支持的数据库类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DatabaseType {
    /// SQLite 数据库
    SQLite,
}

impl DatabaseType {
    /// 获取数据库类型的字符串表示
    pub fn as_str(&self) -> &'static str {
        match self {
            DatabaseType::SQLite => "sqlite",
        }
    }

    /// 从字符串解析数据库类型
    pub fn parse(s: &str) -> Result<Self, crate::error::EntityDbError> {
        match s.to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(DatabaseType::SQLite),
            _ => Err(crate::entity_error!(config, format!("不支持的数据库类型: {}", s))),
        }
    }
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库类型
    pub db_type: DatabaseType,
    /// 连接配置
    pub connection: ConnectionConfig,
    /// 最大连接数
    pub max_connections: u32,
    /// 数据库别名
    pub alias: String,
}

/// 连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConnectionConfig {
    /// SQLite 文件路径
    SQLite {
        /// 数据库文件路径，`:memory:` 表示内存数据库
        path: String,
        /// 是否创建数据库文件（如果不存在）
        create_if_missing: bool,
    },
}

impl ConnectionConfig {
    /// 是否为内存数据库
    pub fn is_memory(&self) -> bool {
        match self {
            ConnectionConfig::SQLite { path, .. } => path == ":memory:" || path.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_type_parse() {
        assert_eq!(DatabaseType::parse("SQLite").unwrap(), DatabaseType::SQLite);
        assert_eq!(DatabaseType::SQLite.as_str(), "sqlite");
        assert!(DatabaseType::parse("oracle").is_err());
    }

    #[test]
    fn test_memory_detection() {
        let memory = ConnectionConfig::SQLite {
            path: ":memory:".to_string(),
            create_if_missing: true,
        };
        let file = ConnectionConfig::SQLite {
            path: "./data/app.db".to_string(),
            create_if_missing: true,
        };
        assert!(memory.is_memory());
        assert!(!file.is_memory());
    }
}
