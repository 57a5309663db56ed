//! SQLite表结构生成

use crate::adapter::query_builder::{ACTIVE_COLUMN, ID_COLUMN};
use crate::error::EntityDbResult;
use crate::model::{Entity, FieldKind, ScalarKind};
use crate::security::IdentifierValidator;
use crate::types::DatabaseType;

fn column_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Scalar(ScalarKind::Text) | FieldKind::Array(_) => "TEXT",
        FieldKind::Scalar(ScalarKind::Float) => "REAL",
        FieldKind::Scalar(ScalarKind::Integer)
        | FieldKind::Scalar(ScalarKind::Boolean)
        | FieldKind::Nested { .. } => "INTEGER",
    }
}

/// 生成实体类型对应的建表语句
///
/// 除声明字段外，总是包含自增主键 `id` 和默认为1的 `active` 列
pub fn create_table_sql<E: Entity>() -> EntityDbResult<String> {
    let schema = E::schema()?;
    let validator = IdentifierValidator::new(DatabaseType::SQLite);

    let mut columns = vec![format!(
        "{} INTEGER PRIMARY KEY AUTOINCREMENT",
        validator.quote_field(ID_COLUMN)?
    )];
    for field in schema.fields() {
        columns.push(format!(
            "{} {}",
            validator.quote_field(field.name())?,
            column_type(field.kind())
        ));
    }
    columns.push(format!(
        "{} INTEGER NOT NULL DEFAULT 1",
        validator.quote_field(ACTIVE_COLUMN)?
    ));

    Ok(format!(
        "CREATE TABLE IF NOT EXISTS {} ({})",
        validator.quote_table(schema.table())?,
        columns.join(", ")
    ))
}
