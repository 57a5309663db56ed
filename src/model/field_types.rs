//! 字段类型定义模块
//!
//! 定义实体字段的种类、取值载体和字段描述符

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::adapter::QueryExecutor;
use crate::error::{EntityDbError, EntityDbResult};
use crate::model::record::Record;
use crate::model::traits::{AnyRecord, Entity};
use crate::types::DataValue;

/// 标量种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// 文本
    Text,
    /// 整数
    Integer,
    /// 浮点数
    Float,
    /// 布尔值
    Boolean,
}

impl ScalarKind {
    /// 种类名称
    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Text => "text",
            ScalarKind::Integer => "integer",
            ScalarKind::Float => "float",
            ScalarKind::Boolean => "boolean",
        }
    }

    /// 将任意值转换为本种类，空值保持为空
    pub fn coerce(self, value: DataValue) -> EntityDbResult<DataValue> {
        if value.is_null() {
            return Ok(DataValue::Null);
        }
        match self {
            ScalarKind::Text => value.into_text().map(DataValue::String),
            ScalarKind::Integer => value.into_int().map(DataValue::Int),
            ScalarKind::Float => value.into_float().map(DataValue::Float),
            ScalarKind::Boolean => value.into_bool().map(DataValue::Bool),
        }
    }
}

/// 字段种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// 标量
    Scalar(ScalarKind),
    /// 标量数组，存储时以分隔符连接
    Array(ScalarKind),
    /// 嵌套实体，存储时只保存其ID
    Nested {
        /// 嵌套实体的类型名
        type_name: &'static str,
    },
}

impl FieldKind {
    pub fn is_nested(&self) -> bool {
        matches!(self, FieldKind::Nested { .. })
    }
}

/// 字段取值
///
/// 普通字段的值为 [`DataValue`]，嵌套字段的值为另一实体的记录（或无）
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// 普通数据
    Data(DataValue),
    /// 嵌套实体记录
    Record(Option<Box<dyn AnyRecord>>),
}

impl FieldValue {
    /// 包装一条嵌套记录
    pub fn record<N: Entity>(record: Record<N>) -> Self {
        FieldValue::Record(Some(Box::new(record)))
    }

    /// 空的嵌套值
    pub fn no_record() -> Self {
        FieldValue::Record(None)
    }

    pub fn as_data(&self) -> Option<&DataValue> {
        match self {
            FieldValue::Data(value) => Some(value),
            FieldValue::Record(_) => None,
        }
    }

    pub fn into_data(self) -> Option<DataValue> {
        match self {
            FieldValue::Data(value) => Some(value),
            FieldValue::Record(_) => None,
        }
    }

    /// 借用嵌套记录
    pub fn as_record(&self) -> Option<&dyn AnyRecord> {
        match self {
            FieldValue::Record(Some(record)) => Some(record.as_ref()),
            _ => None,
        }
    }
}

macro_rules! impl_field_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(value: $ty) -> Self {
                    FieldValue::Data(DataValue::from(value))
                }
            }
        )*
    };
}

impl_field_value_from!(
    bool,
    i32,
    i64,
    u32,
    f64,
    String,
    &str,
    Vec<String>,
    Vec<&str>,
    Vec<i64>,
    Vec<DataValue>,
);

impl From<DataValue> for FieldValue {
    fn from(value: DataValue) -> Self {
        FieldValue::Data(value)
    }
}

impl<N: Entity> From<Record<N>> for FieldValue {
    fn from(record: Record<N>) -> Self {
        FieldValue::record(record)
    }
}

impl<N: Entity> From<Option<Record<N>>> for FieldValue {
    fn from(record: Option<Record<N>>) -> Self {
        FieldValue::Record(record.map(|r| Box::new(r) as Box<dyn AnyRecord>))
    }
}

/// 普通字段读取函数
pub type ValueGetter<E> = fn(&E) -> DataValue;
/// 普通字段写入函数
pub type ValueSetter<E> = fn(&mut E, DataValue) -> EntityDbResult<()>;
/// 存储格式覆盖：返回写入存储的值
pub type FormatHook<E> = fn(&E) -> DataValue;
/// 读取覆盖：把存储值转换为写入实体前的值
pub type ReadHook = fn(DataValue) -> EntityDbResult<DataValue>;
/// 传输格式覆盖
pub type TransferHook<E> = fn(&E) -> DataValue;

/// 嵌套字段的类型擦除访问接口
pub(crate) trait NestedSlot<E>: Send + Sync {
    /// 嵌套实体的类型
    fn target_type(&self) -> TypeId;

    fn get<'a>(&self, entity: &'a E) -> Option<&'a dyn AnyRecord>;

    fn get_mut<'a>(&self, entity: &'a mut E) -> Option<&'a mut dyn AnyRecord>;

    fn set(
        &self,
        field: &str,
        entity: &mut E,
        value: Option<Box<dyn AnyRecord>>,
    ) -> EntityDbResult<()>;

    /// 按ID载入嵌套实体
    fn load(
        &self,
        executor: Arc<dyn QueryExecutor>,
        id: i64,
    ) -> BoxFuture<'static, EntityDbResult<Box<dyn AnyRecord>>>;
}

struct TypedSlot<E, N: Entity> {
    get: fn(&E) -> Option<&Record<N>>,
    get_mut: fn(&mut E) -> Option<&mut Record<N>>,
    set: fn(&mut E, Option<Record<N>>),
}

impl<E: Entity, N: Entity> NestedSlot<E> for TypedSlot<E, N> {
    fn target_type(&self) -> TypeId {
        TypeId::of::<N>()
    }

    fn get<'a>(&self, entity: &'a E) -> Option<&'a dyn AnyRecord> {
        (self.get)(entity).map(|record| record as &dyn AnyRecord)
    }

    fn get_mut<'a>(&self, entity: &'a mut E) -> Option<&'a mut dyn AnyRecord> {
        (self.get_mut)(entity).map(|record| record as &mut dyn AnyRecord)
    }

    fn set(
        &self,
        field: &str,
        entity: &mut E,
        value: Option<Box<dyn AnyRecord>>,
    ) -> EntityDbResult<()> {
        let record = match value {
            None => None,
            Some(boxed) => {
                let actual = boxed.record_type();
                let typed = boxed.into_any().downcast::<Record<N>>().map_err(|_| {
                    crate::entity_error!(
                        field_access,
                        E::TYPE_NAME,
                        field,
                        format!("需要 {} 实体，实际为 {}", N::TYPE_NAME, actual)
                    )
                })?;
                Some(*typed)
            }
        };
        (self.set)(entity, record);
        Ok(())
    }

    fn load(
        &self,
        executor: Arc<dyn QueryExecutor>,
        id: i64,
    ) -> BoxFuture<'static, EntityDbResult<Box<dyn AnyRecord>>> {
        Box::pin(async move {
            let record = Record::<N>::load(executor, id).await?;
            Ok(Box::new(record) as Box<dyn AnyRecord>)
        })
    }
}

pub(crate) enum Accessor<E> {
    Value { get: ValueGetter<E>, set: ValueSetter<E> },
    Nested(Box<dyn NestedSlot<E>>),
}

/// 字段描述符
///
/// 一个字段由名称、种类、读写函数和可选的格式覆盖组成
pub struct FieldDescriptor<E> {
    name: &'static str,
    kind: FieldKind,
    pub(crate) accessor: Accessor<E>,
    pub(crate) db_format: Option<FormatHook<E>>,
    pub(crate) db_read: Option<ReadHook>,
    pub(crate) transfer: Option<TransferHook<E>>,
}

impl<E: Entity> FieldDescriptor<E> {
    /// 创建普通字段描述符
    pub fn value(
        name: &'static str,
        kind: FieldKind,
        get: ValueGetter<E>,
        set: ValueSetter<E>,
    ) -> Self {
        Self {
            name,
            kind,
            accessor: Accessor::Value { get, set },
            db_format: None,
            db_read: None,
            transfer: None,
        }
    }

    /// 创建嵌套字段描述符
    pub fn nested<N: Entity>(
        name: &'static str,
        get: fn(&E) -> Option<&Record<N>>,
        get_mut: fn(&mut E) -> Option<&mut Record<N>>,
        set: fn(&mut E, Option<Record<N>>),
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Nested {
                type_name: N::TYPE_NAME,
            },
            accessor: Accessor::Nested(Box::new(TypedSlot::<E, N> { get, get_mut, set })),
            db_format: None,
            db_read: None,
            transfer: None,
        }
    }

    /// 设置存储格式覆盖
    pub fn with_db_format(mut self, hook: FormatHook<E>) -> Self {
        self.db_format = Some(hook);
        self
    }

    /// 设置读取覆盖（嵌套字段不允许）
    pub fn with_db_read(mut self, hook: ReadHook) -> Self {
        self.db_read = Some(hook);
        self
    }

    /// 设置传输格式覆盖
    pub fn with_transfer(mut self, hook: TransferHook<E>) -> Self {
        self.transfer = Some(hook);
        self
    }
}

impl<E> FieldDescriptor<E> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_nested(&self) -> bool {
        self.kind.is_nested()
    }

    pub(crate) fn nested_target(&self) -> Option<TypeId> {
        match &self.accessor {
            Accessor::Nested(slot) => Some(slot.target_type()),
            Accessor::Value { .. } => None,
        }
    }
}

impl<E> fmt::Debug for FieldDescriptor<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("db_format", &self.db_format.is_some())
            .field("db_read", &self.db_read.is_some())
            .field("transfer", &self.transfer.is_some())
            .finish()
    }
}

/// 把取值函数返回的错误归为字段访问错误
pub(crate) fn field_access_error(entity: &str, field: &str, err: EntityDbError) -> EntityDbError {
    match err {
        EntityDbError::Validation { message, .. } => EntityDbError::FieldAccess {
            entity: entity.to_string(),
            field: field.to_string(),
            message,
        },
        other => other,
    }
}
