//! 实体模型模块
//!
//! 实体类型通过字段描述符声明自己的持久化形态，
//! [`Record`] 基于描述符完成载入、保存和传输

pub mod convenience;
pub mod field_types;
pub mod record;
pub(crate) mod resolver;
pub mod schema;
pub mod traits;

pub use convenience::*;
pub use field_types::{
    FieldDescriptor, FieldKind, FieldValue, FormatHook, ReadHook, ScalarKind, TransferHook,
    ValueGetter, ValueSetter,
};
pub use record::Record;
pub use schema::{EntitySchema, EntitySchemaBuilder, DEFAULT_DELIMITER, DELIMITER_L2};
pub use traits::{AnyRecord, Entity};
