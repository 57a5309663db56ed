//! 字段解析协议
//!
//! 实体字段的读、写、存储格式化、存储读取和传输序列化都经过这里。
//! 每个环节先查字段描述符上的覆盖函数，没有覆盖时按字段种类执行默认规则

use std::sync::Arc;

use crate::adapter::QueryExecutor;
use crate::error::EntityDbResult;
use crate::model::field_types::{
    field_access_error, Accessor, FieldDescriptor, FieldKind, FieldValue, ScalarKind,
};
use crate::model::traits::Entity;
use crate::types::DataValue;
use crate::utils::{is_digit_string, join_with_delimiter, split_with_delimiter};

/// 读取字段当前值
pub(crate) fn get_field<E: Entity>(field: &FieldDescriptor<E>, entity: &E) -> FieldValue {
    match &field.accessor {
        Accessor::Value { get, .. } => FieldValue::Data(get(entity)),
        Accessor::Nested(slot) => FieldValue::Record(slot.get(entity).map(|r| r.clone_record())),
    }
}

/// 写入字段
///
/// 普通字段的值先按声明种类转换再交给写入函数；
/// 嵌套字段接受实体记录，或者表示“无”的空值/0
pub(crate) fn set_field<E: Entity>(
    field: &FieldDescriptor<E>,
    entity: &mut E,
    value: FieldValue,
) -> EntityDbResult<()> {
    let name = field.name();
    let access_error = |message: String| {
        crate::entity_error!(field_access, E::TYPE_NAME, name, message)
    };

    match (&field.accessor, value) {
        (Accessor::Value { set, .. }, FieldValue::Data(data)) => {
            let typed = coerce_to_kind(field.kind(), data)
                .map_err(|e| field_access_error(E::TYPE_NAME, name, e))?;
            set(entity, typed).map_err(|e| field_access_error(E::TYPE_NAME, name, e))
        }
        (Accessor::Value { .. }, FieldValue::Record(_)) => {
            Err(access_error("普通字段不能接收实体记录".to_string()))
        }
        (Accessor::Nested(slot), FieldValue::Record(record)) => slot.set(name, entity, record),
        (Accessor::Nested(slot), FieldValue::Data(data)) => match data {
            DataValue::Null | DataValue::Int(0) => slot.set(name, entity, None),
            other => Err(access_error(format!(
                "嵌套字段需要实体记录，实际为 {}",
                other.type_name()
            ))),
        },
    }
}

fn coerce_to_kind(kind: &FieldKind, value: DataValue) -> EntityDbResult<DataValue> {
    match kind {
        FieldKind::Scalar(scalar) => scalar.coerce(value),
        FieldKind::Array(item) => {
            let items = value.into_list()?;
            items
                .into_iter()
                .map(|v| item.coerce(v))
                .collect::<EntityDbResult<Vec<_>>>()
                .map(DataValue::Array)
        }
        FieldKind::Nested { .. } => Ok(value),
    }
}

/// 默认存储格式
///
/// 布尔值写作 1/0，规范的纯数字文本写作整数，数组以分隔符连接
pub(crate) fn default_storage_format(value: DataValue, delimiter: &str) -> DataValue {
    match value {
        DataValue::Bool(b) => DataValue::Int(b as i64),
        DataValue::String(s) if is_digit_string(&s) => match s.parse::<i64>() {
            // 前导零或溢出时保留原文本
            Ok(n) if n.to_string() == s => DataValue::Int(n),
            _ => DataValue::String(s),
        },
        DataValue::Array(items) => DataValue::String(join_with_delimiter(&items, delimiter)),
        other => other,
    }
}

/// 生成字段的存储值
///
/// 嵌套字段会先保存嵌套记录，再以其ID作为存储值；没有嵌套记录时存0
pub(crate) async fn format_for_storage<E: Entity>(
    field: &FieldDescriptor<E>,
    entity: &mut E,
    delimiter: &str,
) -> EntityDbResult<DataValue> {
    if let Some(hook) = field.db_format {
        return Ok(hook(entity));
    }

    match &field.accessor {
        Accessor::Value { get, .. } => Ok(default_storage_format(get(entity), delimiter)),
        Accessor::Nested(slot) => match slot.get_mut(entity) {
            None => Ok(DataValue::Int(0)),
            Some(record) => {
                record.persist().await?;
                Ok(DataValue::Int(record.record_id()))
            }
        },
    }
}

/// 把存储值还原为字段值
pub(crate) async fn read_from_storage<E: Entity>(
    field: &FieldDescriptor<E>,
    raw: DataValue,
    executor: &Arc<dyn QueryExecutor>,
    delimiter: &str,
) -> EntityDbResult<FieldValue> {
    if let Some(hook) = field.db_read {
        return hook(raw)
            .map(FieldValue::Data)
            .map_err(|e| field_access_error(E::TYPE_NAME, field.name(), e));
    }

    match &field.accessor {
        Accessor::Value { .. } => match field.kind() {
            FieldKind::Array(item) => read_array(*item, raw, delimiter)
                .map(FieldValue::Data)
                .map_err(|e| field_access_error(E::TYPE_NAME, field.name(), e)),
            _ => Ok(FieldValue::Data(raw)),
        },
        Accessor::Nested(slot) => {
            let id = raw.as_i64().unwrap_or(0);
            if id <= 0 {
                return Ok(FieldValue::Record(None));
            }
            let record = slot.load(executor.clone(), id).await?;
            Ok(FieldValue::Record(Some(record)))
        }
    }
}

fn read_array(item: ScalarKind, raw: DataValue, delimiter: &str) -> EntityDbResult<DataValue> {
    let items = match raw {
        DataValue::Null => Vec::new(),
        DataValue::Array(items) => items,
        other => split_with_delimiter(&other.to_storage_text(), delimiter),
    };
    items
        .into_iter()
        .map(|v| item.coerce(v))
        .collect::<EntityDbResult<Vec<_>>>()
        .map(DataValue::Array)
}

/// 生成字段的传输值
///
/// 嵌套记录展开为它自己的传输映射
pub(crate) fn transfer_value<E: Entity>(
    field: &FieldDescriptor<E>,
    entity: &E,
) -> EntityDbResult<DataValue> {
    if let Some(hook) = field.transfer {
        return Ok(hook(entity));
    }

    match &field.accessor {
        Accessor::Value { get, .. } => Ok(get(entity)),
        Accessor::Nested(slot) => match slot.get(entity) {
            None => Ok(DataValue::Null),
            Some(record) => record.to_transfer_map().map(DataValue::Object),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_storage_format() {
        assert_eq!(default_storage_format(DataValue::Bool(true), ","), DataValue::Int(1));
        assert_eq!(default_storage_format(DataValue::from("42"), ","), DataValue::Int(42));
        assert_eq!(
            default_storage_format(DataValue::from("007"), ","),
            DataValue::from("007")
        );
        assert_eq!(
            default_storage_format(DataValue::from("12ab"), ","),
            DataValue::from("12ab")
        );
        assert_eq!(
            default_storage_format(DataValue::from(vec![1i64, 2, 3]), ","),
            DataValue::from("1,2,3")
        );
        assert_eq!(default_storage_format(DataValue::Null, ","), DataValue::Null);
    }

    #[test]
    fn test_read_array() {
        assert_eq!(
            read_array(ScalarKind::Integer, DataValue::from("4|5"), "|").unwrap(),
            DataValue::from(vec![4i64, 5])
        );
        assert_eq!(
            read_array(ScalarKind::Text, DataValue::from(""), ",").unwrap(),
            DataValue::Array(Vec::new())
        );
        assert_eq!(
            read_array(ScalarKind::Text, DataValue::Null, ",").unwrap(),
            DataValue::Array(Vec::new())
        );
        assert!(read_array(ScalarKind::Integer, DataValue::from("1,x"), ",").is_err());
    }
}
