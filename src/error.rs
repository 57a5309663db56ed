//! 错误处理模块
//!
//! 统一定义实体引擎的错误类型。错误分为两类：
//! - 调用方前置条件错误（字段访问、参数数量、无效ID、实体描述符），调用方应当修正代码
//! - 数据错误（记录不存在或不唯一、存储失败），由批量操作器转换为空结果并记录日志

use thiserror::Error;

/// 实体引擎错误类型
#[derive(Error, Debug)]
pub enum EntityDbError {
    /// 访问了实体类型未声明的字段，或者字段值的形态与声明不符
    #[error("字段访问失败: {entity}.{field} - {message}")]
    FieldAccess {
        entity: String,
        field: String,
        message: String,
    },

    /// 按位置填充时字段值数量与声明的字段数量不一致
    #[error("字段数量不匹配: {entity} 需要 {expected} 个值，实际收到 {actual} 个")]
    Arity {
        entity: String,
        expected: usize,
        actual: usize,
    },

    /// 需要持久化ID的操作收到了零或缺失的ID
    #[error("无效的记录ID: {entity} id={id}")]
    InvalidId { entity: String, id: i64 },

    /// 按条件查询记录时命中的行数不是恰好一行
    #[error("记录查询结果不唯一: 表 {table} 条件 {key} 命中 {found} 行")]
    AmbiguousRecord {
        table: String,
        key: String,
        found: usize,
    },

    /// 存储后端执行失败
    #[error("存储操作失败: {message}")]
    Storage { message: String },

    /// 实体描述符声明不合法
    #[error("实体描述符无效: {entity} - {message}")]
    Descriptor { entity: String, message: String },

    /// 标识符或数据验证失败
    #[error("数据验证失败: {field} - {message}")]
    Validation { field: String, message: String },

    /// 配置错误
    #[error("配置错误: {message}")]
    Config { message: String },

    /// 序列化错误
    #[error("数据序列化失败: {message}")]
    Serialization { message: String },

    /// IO错误
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 实体引擎结果类型
pub type EntityDbResult<T> = Result<T, EntityDbError>;

impl EntityDbError {
    /// 是否为“记录不存在”（按条件命中零行）
    pub fn is_not_found(&self) -> bool {
        matches!(self, EntityDbError::AmbiguousRecord { found: 0, .. })
    }

    /// 是否为数据错误
    ///
    /// 数据错误在批量操作器中被吸收为空结果，其余错误继续向上传播
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            EntityDbError::AmbiguousRecord { .. } | EntityDbError::Storage { .. }
        )
    }

    /// 是否为调用方前置条件错误
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            EntityDbError::FieldAccess { .. }
                | EntityDbError::Arity { .. }
                | EntityDbError::InvalidId { .. }
                | EntityDbError::Descriptor { .. }
        )
    }

    /// 按当前语言渲染错误消息
    pub fn localized(&self) -> String {
        use crate::i18n::tf;
        match self {
            EntityDbError::FieldAccess { entity, field, message } => tf(
                "error.field_access",
                &[
                    ("entity", entity.as_str()),
                    ("field", field.as_str()),
                    ("message", message.as_str()),
                ],
            ),
            EntityDbError::Arity { entity, expected, actual } => tf(
                "error.arity",
                &[
                    ("entity", entity.as_str()),
                    ("expected", expected.to_string().as_str()),
                    ("actual", actual.to_string().as_str()),
                ],
            ),
            EntityDbError::InvalidId { entity, id } => tf(
                "error.invalid_id",
                &[("entity", entity.as_str()), ("id", id.to_string().as_str())],
            ),
            EntityDbError::AmbiguousRecord { table, key, found: 0 } => tf(
                "error.record_not_found",
                &[("table", table.as_str()), ("key", key.as_str())],
            ),
            EntityDbError::AmbiguousRecord { table, key, found } => tf(
                "error.ambiguous_record",
                &[
                    ("table", table.as_str()),
                    ("key", key.as_str()),
                    ("found", found.to_string().as_str()),
                ],
            ),
            EntityDbError::Storage { message } => {
                tf("error.storage", &[("message", message.as_str())])
            }
            EntityDbError::Descriptor { entity, message } => tf(
                "error.descriptor",
                &[("entity", entity.as_str()), ("message", message.as_str())],
            ),
            EntityDbError::Validation { field, message } => tf(
                "error.validation",
                &[("field", field.as_str()), ("message", message.as_str())],
            ),
            EntityDbError::Config { message } => {
                tf("error.config", &[("message", message.as_str())])
            }
            EntityDbError::Serialization { message } => {
                tf("error.serialization", &[("message", message.as_str())])
            }
            EntityDbError::Io(e) => tf("error.io", &[("message", e.to_string().as_str())]),
        }
    }
}

impl From<serde_json::Error> for EntityDbError {
    fn from(err: serde_json::Error) -> Self {
        EntityDbError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(feature = "sqlite-support")]
impl From<sqlx::Error> for EntityDbError {
    fn from(err: sqlx::Error) -> Self {
        EntityDbError::Storage {
            message: err.to_string(),
        }
    }
}

/// 快速构造错误的宏
#[macro_export]
macro_rules! entity_error {
    (storage, $msg:expr) => {
        $crate::error::EntityDbError::Storage {
            message: $msg.to_string(),
        }
    };
    (config, $msg:expr) => {
        $crate::error::EntityDbError::Config {
            message: $msg.to_string(),
        }
    };
    (serialization, $msg:expr) => {
        $crate::error::EntityDbError::Serialization {
            message: $msg.to_string(),
        }
    };
    (validation, $field:expr, $msg:expr) => {
        $crate::error::EntityDbError::Validation {
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
    (descriptor, $entity:expr, $msg:expr) => {
        $crate::error::EntityDbError::Descriptor {
            entity: $entity.to_string(),
            message: $msg.to_string(),
        }
    };
    (field_access, $entity:expr, $field:expr, $msg:expr) => {
        $crate::error::EntityDbError::FieldAccess {
            entity: $entity.to_string(),
            field: $field.to_string(),
            message: $msg.to_string(),
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let missing = EntityDbError::AmbiguousRecord {
            table: "users".to_string(),
            key: "id=3".to_string(),
            found: 0,
        };
        assert!(missing.is_not_found());
        assert!(missing.is_data_error());
        assert!(!missing.is_precondition());

        let duplicated = EntityDbError::AmbiguousRecord {
            table: "users".to_string(),
            key: "email=a@b.c".to_string(),
            found: 2,
        };
        assert!(!duplicated.is_not_found());
        assert!(duplicated.is_data_error());

        let invalid = EntityDbError::InvalidId {
            entity: "User".to_string(),
            id: 0,
        };
        assert!(invalid.is_precondition());
        assert!(!invalid.is_data_error());
    }

    #[test]
    fn test_error_macro() {
        let err = crate::entity_error!(field_access, "User", "nickname", "字段未声明");
        match err {
            EntityDbError::FieldAccess { entity, field, .. } => {
                assert_eq!(entity, "User");
                assert_eq!(field, "nickname");
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let err = crate::entity_error!(storage, "disk full");
        assert_eq!(err.to_string(), "存储操作失败: disk full");
    }
}
