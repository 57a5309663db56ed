//! SQLite行数据转换

use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _};

use crate::adapter::Row;
use crate::error::EntityDbResult;
use crate::types::DataValue;

/// 将sqlx的行转换为DataValue映射
///
/// SQLite按值记录存储类型，依次尝试文本、整数、浮点和二进制
pub(crate) fn row_to_data_map(row: &SqliteRow) -> EntityDbResult<Row> {
    let mut map = Row::new();

    for column in row.columns() {
        let ordinal = column.ordinal();

        let data_value = if let Ok(value) = row.try_get::<Option<String>, _>(ordinal) {
            value.map(DataValue::String).unwrap_or(DataValue::Null)
        } else if let Ok(value) = row.try_get::<Option<i64>, _>(ordinal) {
            value.map(DataValue::Int).unwrap_or(DataValue::Null)
        } else if let Ok(value) = row.try_get::<Option<f64>, _>(ordinal) {
            value.map(DataValue::Float).unwrap_or(DataValue::Null)
        } else if let Ok(value) = row.try_get::<Option<Vec<u8>>, _>(ordinal) {
            value
                .map(|bytes| DataValue::String(String::from_utf8_lossy(&bytes).into_owned()))
                .unwrap_or(DataValue::Null)
        } else {
            DataValue::Null
        };

        map.insert(column.name().to_string(), data_value);
    }

    Ok(map)
}
