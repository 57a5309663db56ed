//! SQL语句构建器
//!
//! 所有值都以字面量形式拼接，字符串内容在渲染时经执行器转义；
//! 表名和列名经过标识符验证后加引号

use crate::adapter::QueryExecutor;
use crate::error::EntityDbResult;
use crate::security::IdentifierValidator;
use crate::types::{DataValue, FilterCondition};

/// 主键列名
pub const ID_COLUMN: &str = "id";
/// 活跃标记列名
pub const ACTIVE_COLUMN: &str = "active";

/// SQL语句构建器
pub struct SqlQueryBuilder<'a> {
    table: String,
    validator: IdentifierValidator,
    executor: &'a dyn QueryExecutor,
}

impl<'a> SqlQueryBuilder<'a> {
    /// 为指定表创建构建器
    pub fn new(table: &str, executor: &'a dyn QueryExecutor) -> EntityDbResult<Self> {
        let validator = IdentifierValidator::new(executor.database_type());
        let table = validator.quote_table(table)?;
        Ok(Self {
            table,
            validator,
            executor,
        })
    }

    /// 渲染值字面量
    ///
    /// 空值渲染为不带引号的 `NULL`，其余一律为带引号的转义文本
    pub fn literal(&self, value: &DataValue) -> String {
        match value {
            DataValue::Null => "NULL".to_string(),
            other => format!("'{}'", self.executor.escape(&other.to_storage_text())),
        }
    }

    fn id_literal(&self, id: i64) -> String {
        self.literal(&DataValue::Int(id))
    }

    fn column(&self, name: &str) -> EntityDbResult<String> {
        self.validator.quote_field(name)
    }

    /// 插入语句
    pub fn insert(&self, columns: &[(&str, DataValue)]) -> EntityDbResult<String> {
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, value) in columns {
            names.push(self.column(name)?);
            values.push(self.literal(value));
        }
        Ok(format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            names.join(", "),
            values.join(", ")
        ))
    }

    /// 按ID更新若干列
    pub fn update(&self, columns: &[(&str, DataValue)], id: i64) -> EntityDbResult<String> {
        let mut assignments = Vec::with_capacity(columns.len());
        for (name, value) in columns {
            assignments.push(format!("{}={}", self.column(name)?, self.literal(value)));
        }
        Ok(format!(
            "UPDATE {} SET {} WHERE {}={}",
            self.table,
            assignments.join(", "),
            self.column(ID_COLUMN)?,
            self.id_literal(id)
        ))
    }

    /// 按ID读取活跃记录
    pub fn select_active_by_id(&self, id: i64) -> EntityDbResult<String> {
        Ok(format!(
            "SELECT * FROM {} WHERE {}={} AND {}={}",
            self.table,
            self.column(ID_COLUMN)?,
            self.id_literal(id),
            self.column(ACTIVE_COLUMN)?,
            self.literal(&DataValue::Bool(true))
        ))
    }

    /// 读取满足全部条件的活跃记录ID，按ID升序
    pub fn select_active_ids(
        &self,
        conditions: &[(&str, &FilterCondition)],
    ) -> EntityDbResult<String> {
        let mut clauses = vec![format!(
            "{}={}",
            self.column(ACTIVE_COLUMN)?,
            self.literal(&DataValue::Bool(true))
        )];
        for (field, condition) in conditions {
            clauses.push(format!(
                "{} {} {}",
                self.column(field)?,
                condition.operator.as_sql(),
                self.literal(&condition.value)
            ));
        }
        Ok(format!(
            "SELECT {} FROM {} WHERE {} ORDER BY {}",
            self.column(ID_COLUMN)?,
            self.table,
            clauses.join(" AND "),
            self.column(ID_COLUMN)?
        ))
    }

    /// 修改活跃标记
    pub fn set_active(&self, active: bool, id: i64) -> EntityDbResult<String> {
        self.update(&[(ACTIVE_COLUMN, DataValue::Bool(active))], id)
    }

    /// 按ID物理删除
    pub fn delete_by_id(&self, id: i64) -> EntityDbResult<String> {
        Ok(format!(
            "DELETE FROM {} WHERE {}={}",
            self.table,
            self.column(ID_COLUMN)?,
            self.id_literal(id)
        ))
    }
}
