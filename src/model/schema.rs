//! 实体描述模块
//!
//! [`EntitySchema`] 记录实体类型的表名、字段描述符（按声明顺序）和数组分隔符。
//! 构建时一次性校验，之后只读共享

use std::any::TypeId;
use std::collections::HashSet;

use rat_logger::info;

use crate::adapter::query_builder::{ACTIVE_COLUMN, ID_COLUMN};
use crate::error::{EntityDbError, EntityDbResult};
use crate::model::field_types::FieldDescriptor;
use crate::model::traits::Entity;
use crate::security::IdentifierValidator;
use crate::types::DatabaseType;

/// 默认数组分隔符
pub const DEFAULT_DELIMITER: &str = ",";
/// 二级数组分隔符，供需要在元素内部再次拆分的字段使用
pub const DELIMITER_L2: &str = "|";

/// 实体描述
pub struct EntitySchema<E> {
    type_name: &'static str,
    table: &'static str,
    delimiter: &'static str,
    fields: Vec<FieldDescriptor<E>>,
}

impl<E: Entity> EntitySchema<E> {
    /// 创建描述构建器
    pub fn builder() -> EntitySchemaBuilder<E> {
        EntitySchemaBuilder::new()
    }
}

impl<E> EntitySchema<E> {
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 存储表名
    pub fn table(&self) -> &'static str {
        self.table
    }

    /// 数组字段分隔符
    pub fn delimiter(&self) -> &'static str {
        self.delimiter
    }

    /// 按声明顺序排列的字段描述符
    pub fn fields(&self) -> &[FieldDescriptor<E>] {
        &self.fields
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// 按声明顺序排列的字段名
    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(FieldDescriptor::name).collect()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<E>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// 查找字段，未声明时返回字段访问错误
    pub fn require_field(&self, name: &str) -> EntityDbResult<&FieldDescriptor<E>> {
        self.field(name).ok_or_else(|| EntityDbError::FieldAccess {
            entity: self.type_name.to_string(),
            field: name.to_string(),
            message: "字段未在实体描述中声明".to_string(),
        })
    }
}

impl<E> std::fmt::Debug for EntitySchema<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntitySchema")
            .field("type_name", &self.type_name)
            .field("table", &self.table)
            .field("delimiter", &self.delimiter)
            .field("fields", &self.fields)
            .finish()
    }
}

/// 实体描述构建器
pub struct EntitySchemaBuilder<E> {
    table: Option<&'static str>,
    delimiter: &'static str,
    fields: Vec<FieldDescriptor<E>>,
}

impl<E: Entity> EntitySchemaBuilder<E> {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            table: None,
            delimiter: DEFAULT_DELIMITER,
            fields: Vec::new(),
        }
    }

    /// 设置存储表名
    pub fn table(mut self, table: &'static str) -> Self {
        self.table = Some(table);
        self
    }

    /// 设置数组分隔符
    pub fn delimiter(mut self, delimiter: &'static str) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// 追加字段（声明顺序即位置填充顺序）
    pub fn field(mut self, field: FieldDescriptor<E>) -> Self {
        self.fields.push(field);
        self
    }

    /// 构建并校验实体描述
    ///
    /// # 错误
    ///
    /// 表名缺失或不安全、字段名重复或不安全、使用保留列名、
    /// 嵌套自身类型、在嵌套字段上设置读取覆盖，都会返回描述符错误
    pub fn build(self) -> EntityDbResult<EntitySchema<E>> {
        let descriptor_error = |message: String| EntityDbError::Descriptor {
            entity: E::TYPE_NAME.to_string(),
            message,
        };

        let table = self
            .table
            .ok_or_else(|| descriptor_error("表名必须设置".to_string()))?;

        let validator = IdentifierValidator::new(DatabaseType::SQLite);
        validator
            .validate_table_name(table)
            .map_err(|e| descriptor_error(e.to_string()))?;

        if self.fields.is_empty() {
            return Err(descriptor_error("至少需要声明一个字段".to_string()));
        }

        if self.delimiter.is_empty() {
            return Err(descriptor_error("数组分隔符不能为空".to_string()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            let name = field.name();
            validator
                .validate_field_name(name)
                .map_err(|e| descriptor_error(e.to_string()))?;

            if name.eq_ignore_ascii_case(ID_COLUMN) || name.eq_ignore_ascii_case(ACTIVE_COLUMN) {
                return Err(descriptor_error(format!("字段名 {} 为引擎保留列", name)));
            }

            if !seen.insert(name.to_lowercase()) {
                return Err(descriptor_error(format!("字段 {} 重复声明", name)));
            }

            if let Some(target) = field.nested_target() {
                if target == TypeId::of::<E>() {
                    return Err(descriptor_error(format!("字段 {} 不能嵌套实体自身的类型", name)));
                }
                if field.db_read.is_some() {
                    return Err(descriptor_error(format!("嵌套字段 {} 不支持读取覆盖", name)));
                }
            }
        }

        info!(
            "注册实体描述: {} -> 表 {}，{} 个字段",
            E::TYPE_NAME,
            table,
            self.fields.len()
        );

        Ok(EntitySchema {
            type_name: E::TYPE_NAME,
            table,
            delimiter: self.delimiter,
            fields: self.fields,
        })
    }
}

impl<E: Entity> Default for EntitySchemaBuilder<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::OnceCell;

    use super::*;
    use crate::account::Team;
    use crate::model::convenience::{nested_field, text_field};
    use crate::types::DataValue;

    #[derive(Debug, Clone, Default)]
    struct Node {
        label: String,
    }

    fn label_field(name: &'static str) -> FieldDescriptor<Node> {
        text_field(
            name,
            |n: &Node| DataValue::from(&n.label),
            |n: &mut Node, v: DataValue| -> EntityDbResult<()> {
                n.label = v.into_text()?;
                Ok(())
            },
        )
    }

    impl Entity for Node {
        const TYPE_NAME: &'static str = "Node";

        fn schema() -> EntityDbResult<&'static EntitySchema<Self>> {
            static SCHEMA: OnceCell<EntitySchema<Node>> = OnceCell::new();
            SCHEMA.get_or_try_init(|| {
                EntitySchema::builder()
                    .table("nodes")
                    .field(label_field("label"))
                    .build()
            })
        }
    }

    fn assert_rejected(builder: EntitySchemaBuilder<Node>, fragment: &str) {
        match builder.build() {
            Err(EntityDbError::Descriptor { entity, message }) => {
                assert_eq!(entity, "Node");
                assert!(message.contains(fragment), "错误信息不符: {}", message);
            }
            other => panic!("应拒绝该实体描述，实际为 {:?}", other),
        }
    }

    #[test]
    fn test_valid_schema() {
        let schema = Node::schema().unwrap();
        assert_eq!(schema.table(), "nodes");
        assert_eq!(schema.delimiter(), DEFAULT_DELIMITER);
        assert_eq!(schema.field_names(), vec!["label"]);
        assert!(schema.require_field("missing").is_err());
    }

    #[test]
    fn test_rejects_missing_or_unsafe_table() {
        assert_rejected(EntitySchema::builder().field(label_field("label")), "表名");
        assert!(matches!(
            EntitySchema::builder()
                .table("nodes; DROP TABLE users")
                .field(label_field("label"))
                .build(),
            Err(EntityDbError::Descriptor { .. })
        ));
    }

    #[test]
    fn test_rejects_empty_fields_and_delimiter() {
        assert_rejected(EntitySchema::builder().table("nodes"), "至少需要");
        assert_rejected(
            EntitySchema::builder()
                .table("nodes")
                .delimiter("")
                .field(label_field("label")),
            "分隔符",
        );
    }

    #[test]
    fn test_rejects_reserved_columns() {
        for reserved in ["id", "active", "ID"] {
            assert_rejected(
                EntitySchema::builder()
                    .table("nodes")
                    .field(label_field(reserved)),
                "保留列",
            );
        }
    }

    #[test]
    fn test_rejects_duplicate_fields() {
        assert_rejected(
            EntitySchema::builder()
                .table("nodes")
                .field(label_field("label"))
                .field(label_field("Label")),
            "重复",
        );
    }

    #[test]
    fn test_rejects_self_nesting() {
        assert_rejected(
            EntitySchema::builder()
                .table("nodes")
                .field(label_field("label"))
                .field(nested_field::<Node, Node>(
                    "parent",
                    |_| None,
                    |_| None,
                    |_, _| {},
                )),
            "自身",
        );
    }

    #[test]
    fn test_rejects_read_hook_on_nested_field() {
        assert_rejected(
            EntitySchema::builder()
                .table("nodes")
                .field(
                    nested_field::<Node, Team>("team", |_| None, |_| None, |_, _| {})
                        .with_db_read(Ok),
                ),
            "读取覆盖",
        );

        let schema = EntitySchema::<Node>::builder()
            .table("nodes")
            .field(nested_field::<Node, Team>("team", |_| None, |_| None, |_, _| {}))
            .build()
            .unwrap();
        assert!(schema.fields()[0].is_nested());
    }
}
