use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::data_value::DataValue;

/// 查询操作符
///
/// 常用比较符为类型化变体，其余比较符文本以 `Raw` 原样写入SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum QueryOperator {
    /// 等于
    Eq,
    /// 不等于
    Ne,
    /// 大于
    Gt,
    /// 大于等于
    Gte,
    /// 小于
    Lt,
    /// 小于等于
    Lte,
    /// 模式匹配
    Like,
    /// 原样传递的比较符
    Raw(String),
}

impl QueryOperator {
    /// 渲染为SQL比较符
    pub fn as_sql(&self) -> &str {
        match self {
            QueryOperator::Eq => "=",
            QueryOperator::Ne => "!=",
            QueryOperator::Gt => ">",
            QueryOperator::Gte => ">=",
            QueryOperator::Lt => "<",
            QueryOperator::Lte => "<=",
            QueryOperator::Like => "LIKE",
            QueryOperator::Raw(op) => op.as_str(),
        }
    }
}

impl From<&str> for QueryOperator {
    fn from(value: &str) -> Self {
        match value.trim().to_uppercase().as_str() {
            "=" | "==" => QueryOperator::Eq,
            "!=" | "<>" => QueryOperator::Ne,
            ">" => QueryOperator::Gt,
            ">=" => QueryOperator::Gte,
            "<" => QueryOperator::Lt,
            "<=" => QueryOperator::Lte,
            "LIKE" => QueryOperator::Like,
            _ => QueryOperator::Raw(value.trim().to_string()),
        }
    }
}

/// 单个字段的过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    /// 操作符
    pub operator: QueryOperator,
    /// 比较值
    pub value: DataValue,
}

/// 实体过滤器：字段名到过滤条件的映射
///
/// 同一字段重复设置时后者覆盖前者，条件之间以 AND 连接
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityFilter {
    conditions: IndexMap<String, FilterCondition>,
}

impl EntityFilter {
    /// 创建空过滤器
    pub fn new() -> Self {
        Self::default()
    }

    /// 链式添加条件
    pub fn with<F, O, V>(mut self, field: F, operator: O, value: V) -> Self
    where
        F: Into<String>,
        O: Into<QueryOperator>,
        V: Into<DataValue>,
    {
        self.insert(field, operator, value);
        self
    }

    /// 链式添加相等条件
    pub fn eq<F: Into<String>, V: Into<DataValue>>(self, field: F, value: V) -> Self {
        self.with(field, QueryOperator::Eq, value)
    }

    /// 添加条件
    pub fn insert<F, O, V>(&mut self, field: F, operator: O, value: V)
    where
        F: Into<String>,
        O: Into<QueryOperator>,
        V: Into<DataValue>,
    {
        self.conditions.insert(
            field.into(),
            FilterCondition {
                operator: operator.into(),
                value: value.into(),
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn get(&self, field: &str) -> Option<&FilterCondition> {
        self.conditions.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterCondition)> {
        self.conditions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parsing() {
        assert_eq!(QueryOperator::from("="), QueryOperator::Eq);
        assert_eq!(QueryOperator::from("<>"), QueryOperator::Ne);
        assert_eq!(QueryOperator::from("like"), QueryOperator::Like);
        assert_eq!(
            QueryOperator::from("IS NOT"),
            QueryOperator::Raw("IS NOT".to_string())
        );
        assert_eq!(QueryOperator::Gte.as_sql(), ">=");
    }

    #[test]
    fn test_filter_replaces_same_field() {
        let filter = EntityFilter::new()
            .eq("teamId", 1)
            .with("email", "LIKE", "%@example.com")
            .with("teamId", ">", 5);

        assert_eq!(filter.len(), 2);
        let team = filter.get("teamId").unwrap();
        assert_eq!(team.operator, QueryOperator::Gt);
        assert_eq!(team.value, DataValue::Int(5));
        let keys: Vec<&String> = filter.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["teamId", "email"]);
    }
}
