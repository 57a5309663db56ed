//! 实体trait定义模块
//!
//! 定义实体类型需要实现的接口，以及嵌套实体使用的类型擦除记录接口

use std::any::Any;
use std::fmt;

use async_trait::async_trait;

use crate::error::EntityDbResult;
use crate::model::schema::EntitySchema;
use crate::types::TransferMap;

/// 实体特征
///
/// 实体类型本身只是一个普通结构体，字段的读写方式全部由 [`EntitySchema`] 描述。
/// 描述符在首次访问时构建并校验，之后一直复用
///
/// ```ignore
/// impl Entity for Team {
///     const TYPE_NAME: &'static str = "Team";
///
///     fn schema() -> EntityDbResult<&'static EntitySchema<Self>> {
///         static SCHEMA: OnceCell<EntitySchema<Team>> = OnceCell::new();
///         SCHEMA.get_or_try_init(|| {
///             EntitySchema::builder()
///                 .table("teams")
///                 .field(text_field("name", |t: &Team| t.name.as_str().into(), |t, v| { t.name = v.into_text()?; Ok(()) }))
///                 .build()
///         })
///     }
/// }
/// ```
pub trait Entity: Default + Clone + fmt::Debug + Send + Sync + 'static {
    /// 实体类型名
    const TYPE_NAME: &'static str;

    /// 获取实体描述符
    fn schema() -> EntityDbResult<&'static EntitySchema<Self>>;

    /// 在启动时校验描述符
    fn validate_schema() -> EntityDbResult<()> {
        Self::schema().map(|_| ())
    }
}

/// 类型擦除的实体记录
///
/// 嵌套字段通过它保存、传输和复制另一种实体的记录
#[async_trait]
pub trait AnyRecord: Send + Sync + fmt::Debug {
    /// 实体类型名
    fn record_type(&self) -> &'static str;

    /// 持久化ID，未持久化时为0
    fn record_id(&self) -> i64;

    fn record_active(&self) -> bool;

    /// 保存记录（插入或更新）
    async fn persist(&mut self) -> EntityDbResult<()>;

    /// 转换为传输映射
    fn to_transfer_map(&self) -> EntityDbResult<TransferMap>;

    fn clone_record(&self) -> Box<dyn AnyRecord>;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl Clone for Box<dyn AnyRecord> {
    fn clone(&self) -> Self {
        self.clone_record()
    }
}
