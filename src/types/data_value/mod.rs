use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{EntityDbError, EntityDbResult};

/// 按字段声明顺序排列的传输映射
pub type TransferMap = IndexMap<String, DataValue>;

/// 通用数据值类型
///
/// 字段取值、存储格式和传输格式都以它为载体
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub enum DataValue {
    /// 空值
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 数组
    Array(Vec<DataValue>),
    /// 对象（保持键的插入顺序）
    Object(IndexMap<String, DataValue>),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Array(_) | DataValue::Object(_) => write!(f, "{}", self.to_json_value()),
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // 与 Display 保持一致，字符串额外加引号以便区分数字文本
        match self {
            DataValue::String(s) => write!(f, "{:?}", s),
            other => write!(f, "{}", other),
        }
    }
}

fn type_mismatch(expected: &str, actual: &DataValue) -> EntityDbError {
    crate::entity_error!(
        validation,
        "data_type",
        format!("期望 {}，实际为 {} ({})", expected, actual.type_name(), actual)
    )
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::Array(_) => "array",
            DataValue::Object(_) => "object",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 借用字符串内容
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DataValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// 读取整数，数字文本同样被接受
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            DataValue::Int(i) => Some(*i),
            DataValue::Bool(b) => Some(*b as i64),
            DataValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// 读取布尔值
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            DataValue::Int(i) => Some(*i != 0),
            DataValue::String(s) => match s.trim().to_lowercase().as_str() {
                "1" | "true" => Some(true),
                "0" | "false" | "" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// 转换为文本，空值视为空字符串
    pub fn into_text(self) -> EntityDbResult<String> {
        match self {
            DataValue::String(s) => Ok(s),
            DataValue::Null => Ok(String::new()),
            DataValue::Int(i) => Ok(i.to_string()),
            DataValue::Float(f) => Ok(f.to_string()),
            DataValue::Bool(b) => Ok((if b { "1" } else { "0" }).to_string()),
            other => Err(type_mismatch("string", &other)),
        }
    }

    /// 转换为整数，空值视为0
    pub fn into_int(self) -> EntityDbResult<i64> {
        match self {
            DataValue::Null => Ok(0),
            DataValue::Float(f) if f.fract() == 0.0 => Ok(f as i64),
            other => other.as_i64().ok_or_else(|| type_mismatch("integer", &other)),
        }
    }

    /// 转换为浮点数，空值视为0.0
    pub fn into_float(self) -> EntityDbResult<f64> {
        match self {
            DataValue::Float(f) => Ok(f),
            DataValue::Int(i) => Ok(i as f64),
            DataValue::Null => Ok(0.0),
            DataValue::String(ref s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| type_mismatch("float", &self)),
            other => Err(type_mismatch("float", &other)),
        }
    }

    /// 转换为布尔值，空值视为false
    pub fn into_bool(self) -> EntityDbResult<bool> {
        match self {
            DataValue::Null => Ok(false),
            other => other.as_bool().ok_or_else(|| type_mismatch("boolean", &other)),
        }
    }

    /// 转换为数组，空值视为空数组
    pub fn into_list(self) -> EntityDbResult<Vec<DataValue>> {
        match self {
            DataValue::Array(items) => Ok(items),
            DataValue::Null => Ok(Vec::new()),
            other => Err(type_mismatch("array", &other)),
        }
    }

    /// 转换为文本数组
    pub fn into_text_list(self) -> EntityDbResult<Vec<String>> {
        self.into_list()?.into_iter().map(DataValue::into_text).collect()
    }

    /// 转换为整数数组
    pub fn into_int_list(self) -> EntityDbResult<Vec<i64>> {
        self.into_list()?.into_iter().map(DataValue::into_int).collect()
    }

    /// 转换为 JSON 值
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            DataValue::Array(items) => {
                serde_json::Value::Array(items.iter().map(DataValue::to_json_value).collect())
            }
            DataValue::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect(),
            ),
        }
    }

    /// 从 JSON 值转换
    pub fn from_json_value(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => DataValue::Null,
            serde_json::Value::Bool(b) => DataValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => DataValue::Int(i),
                None => n.as_f64().map(DataValue::Float).unwrap_or(DataValue::Null),
            },
            serde_json::Value::String(s) => DataValue::String(s),
            serde_json::Value::Array(items) => {
                DataValue::Array(items.into_iter().map(DataValue::from_json_value).collect())
            }
            serde_json::Value::Object(map) => DataValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, DataValue::from_json_value(v)))
                    .collect(),
            ),
        }
    }

    /// 转换为 JSON 字符串
    pub fn to_json_string(&self) -> EntityDbResult<String> {
        serde_json::to_string(&self.to_json_value()).map_err(|e| {
            crate::entity_error!(serialization, format!("DataValue 转换为 JSON 失败: {}", e))
        })
    }

    /// 渲染为存储文本
    ///
    /// 布尔值写作 `1`/`0`，空值写作空串，数组与对象写作 JSON
    pub fn to_storage_text(&self) -> String {
        match self {
            DataValue::Null => String::new(),
            DataValue::Bool(b) => (if *b { "1" } else { "0" }).to_string(),
            other => other.to_string(),
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<u32> for DataValue {
    fn from(value: u32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<&String> for DataValue {
    fn from(value: &String) -> Self {
        DataValue::String(value.clone())
    }
}

impl<T: Into<DataValue>> From<Vec<T>> for DataValue {
    fn from(value: Vec<T>) -> Self {
        DataValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DataValue>> From<Option<T>> for DataValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

impl From<IndexMap<String, DataValue>> for DataValue {
    fn from(value: IndexMap<String, DataValue>) -> Self {
        DataValue::Object(value)
    }
}

impl From<serde_json::Value> for DataValue {
    fn from(value: serde_json::Value) -> Self {
        DataValue::from_json_value(value)
    }
}
