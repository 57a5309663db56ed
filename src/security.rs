//! 标识符安全验证工具
//!
//! 实体描述符中的表名和字段名会直接拼接进SQL，
//! 因此在描述符构建阶段和语句生成阶段都要经过这里的检查

use crate::error::{EntityDbError, EntityDbResult};
use crate::types::DatabaseType;

/// 标识符最大长度
const MAX_IDENTIFIER_LEN: usize = 64;

const FIELD_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP",
    "ALTER", "TABLE", "INDEX", "AND", "OR", "NOT", "NULL", "IS", "IN", "EXISTS",
    "BETWEEN", "LIKE", "REGEXP", "UNION", "JOIN", "INNER", "LEFT", "RIGHT", "OUTER",
    "GROUP", "BY", "HAVING", "ORDER", "LIMIT", "OFFSET", "DISTINCT", "AS", "ON",
    "PRIMARY", "KEY", "FOREIGN", "REFERENCES", "CASE", "WHEN", "THEN", "ELSE", "END",
];

const TABLE_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "INSERT", "UPDATE", "DELETE", "CREATE", "DROP",
    "ALTER", "TABLE", "INDEX", "DATABASE", "SCHEMA", "USER", "VIEW", "TRIGGER",
    "TRANSACTION", "PRIMARY", "FOREIGN", "REFERENCES", "CONSTRAINT",
];

/// 标识符验证器
#[derive(Debug, Clone, Copy)]
pub struct IdentifierValidator {
    db_type: DatabaseType,
}

impl IdentifierValidator {
    /// 创建新的验证器
    pub fn new(db_type: DatabaseType) -> Self {
        Self { db_type }
    }

    /// 验证字段名
    ///
    /// 只允许ASCII字母、数字和下划线，不能以数字开头，不能是SQL关键字
    pub fn validate_field_name(&self, field_name: &str) -> EntityDbResult<()> {
        Self::validate_identifier(field_name, "字段名", FIELD_KEYWORDS)
    }

    /// 验证表名
    pub fn validate_table_name(&self, table_name: &str) -> EntityDbResult<()> {
        Self::validate_identifier(table_name, "表名", TABLE_KEYWORDS)
    }

    /// 验证并返回带引号的字段标识符
    pub fn quote_field(&self, field_name: &str) -> EntityDbResult<String> {
        self.validate_field_name(field_name)?;
        Ok(self.quote(field_name))
    }

    /// 验证并返回带引号的表标识符
    pub fn quote_table(&self, table_name: &str) -> EntityDbResult<String> {
        self.validate_table_name(table_name)?;
        Ok(self.quote(table_name))
    }

    fn quote(&self, identifier: &str) -> String {
        match self.db_type {
            DatabaseType::SQLite => format!("\"{}\"", identifier),
        }
    }

    fn validate_identifier(name: &str, kind: &str, keywords: &[&str]) -> EntityDbResult<()> {
        if name.is_empty() {
            return Err(EntityDbError::Validation {
                field: kind.to_string(),
                message: format!("{}不能为空", kind),
            });
        }

        if name.len() > MAX_IDENTIFIER_LEN {
            return Err(EntityDbError::Validation {
                field: name.to_string(),
                message: format!("{}长度不能超过{}个字符", kind, MAX_IDENTIFIER_LEN),
            });
        }

        if name.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(EntityDbError::Validation {
                field: name.to_string(),
                message: format!("{}不能以数字开头", kind),
            });
        }

        if let Some((i, ch)) = name
            .chars()
            .enumerate()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
        {
            return Err(EntityDbError::Validation {
                field: name.to_string(),
                message: format!("{}包含非法字符 '{}' 在位置 {}", kind, ch, i),
            });
        }

        let upper_name = name.to_uppercase();
        if keywords.contains(&upper_name.as_str()) {
            return Err(EntityDbError::Validation {
                field: name.to_string(),
                message: format!("{}不能使用SQL关键字: {}", kind, name),
            });
        }

        Ok(())
    }
}
