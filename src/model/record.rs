//! 实体记录模块
//!
//! [`Record`] 把一个实体值和它的持久化状态（ID、活跃标记、执行器）绑在一起，
//! 提供载入、填充、保存、软删除和传输映射等操作

use std::any::Any;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use async_trait::async_trait;
use rat_logger::{debug, info, warn};

use crate::adapter::query_builder::{ACTIVE_COLUMN, ID_COLUMN};
use crate::adapter::{QueryExecutor, Row, SqlQueryBuilder};
use crate::error::{EntityDbError, EntityDbResult};
use crate::model::field_types::FieldValue;
use crate::model::resolver;
use crate::model::schema::EntitySchema;
use crate::model::traits::{AnyRecord, Entity};
use crate::types::{DataValue, EntityFilter, FilterCondition, TransferMap};
use crate::utils::parse_unsafe_id;

/// 实体记录
///
/// ID为0表示尚未持久化；ID一经分配不再改变
#[derive(Clone)]
pub struct Record<E: Entity> {
    entity: E,
    id: i64,
    active: bool,
    executor: Arc<dyn QueryExecutor>,
}

impl<E: Entity> Record<E> {
    /// 创建未持久化的空白记录
    pub fn blank(executor: Arc<dyn QueryExecutor>) -> Self {
        Self::from_entity(executor, E::default())
    }

    /// 用已有实体值创建未持久化的记录
    pub fn from_entity(executor: Arc<dyn QueryExecutor>, entity: E) -> Self {
        Self {
            entity,
            id: 0,
            active: true,
            executor,
        }
    }

    /// 只带ID的记录引用，用于不需要读取字段的按ID操作
    pub(crate) fn reference(executor: Arc<dyn QueryExecutor>, id: i64) -> Self {
        Self {
            entity: E::default(),
            id,
            active: true,
            executor,
        }
    }

    /// 按ID载入活跃记录
    ///
    /// # 错误
    ///
    /// ID不为正时返回 `InvalidId`；命中行数不是恰好一行时返回 `AmbiguousRecord`
    pub async fn load(executor: Arc<dyn QueryExecutor>, id: i64) -> EntityDbResult<Self> {
        let schema = E::schema()?;
        if id <= 0 {
            return Err(EntityDbError::InvalidId {
                entity: E::TYPE_NAME.to_string(),
                id,
            });
        }

        let sql = SqlQueryBuilder::new(schema.table(), executor.as_ref())?.select_active_by_id(id)?;
        let rows = executor.execute(&sql).await?.into_rows();
        let found = rows.len();
        let row = match (found, rows.into_iter().next()) {
            (1, Some(row)) => row,
            _ => {
                return Err(EntityDbError::AmbiguousRecord {
                    table: schema.table().to_string(),
                    key: format!("{}={}", ID_COLUMN, id),
                    found,
                });
            }
        };

        let mut record = Self::blank(executor);
        record.apply_row(schema, row).await?;
        debug!("载入 {} 记录: id={}", E::TYPE_NAME, id);
        Ok(record)
    }

    /// 按ID查找活跃记录，不存在时返回 `None`
    pub async fn find(executor: Arc<dyn QueryExecutor>, id: i64) -> EntityDbResult<Option<Self>> {
        if id <= 0 {
            E::validate_schema()?;
            return Ok(None);
        }
        match Self::load(executor, id).await {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// 按外部输入的ID文本查找
    ///
    /// 文本先被转换为正整数，无法转换时视为0，结果为 `None`
    pub async fn open(
        executor: Arc<dyn QueryExecutor>,
        unsafe_id: &str,
    ) -> EntityDbResult<Option<Self>> {
        Self::find(executor, parse_unsafe_id(unsafe_id)).await
    }

    /// 按唯一字段值查找活跃记录
    ///
    /// 命中多行时返回 `AmbiguousRecord`
    pub async fn find_by_unique(
        executor: Arc<dyn QueryExecutor>,
        field: &str,
        value: impl Into<DataValue> + Send,
    ) -> EntityDbResult<Option<Self>> {
        let schema = E::schema()?;
        schema.require_field(field)?;
        let value = value.into();

        let filter = EntityFilter::new().eq(field, value.clone());
        let ids = Self::filtered_ids(executor.as_ref(), &filter).await?;
        match ids.as_slice() {
            [] => Ok(None),
            [id] => Self::load(executor, *id).await.map(Some),
            _ => Err(EntityDbError::AmbiguousRecord {
                table: schema.table().to_string(),
                key: format!("{}={}", field, value),
                found: ids.len(),
            }),
        }
    }

    async fn apply_row(&mut self, schema: &EntitySchema<E>, mut row: Row) -> EntityDbResult<()> {
        let id = row
            .get(ID_COLUMN)
            .and_then(DataValue::as_i64)
            .ok_or_else(|| crate::entity_error!(storage, format!("{} 记录缺少 id 列", schema.table())))?;
        let active = row
            .get(ACTIVE_COLUMN)
            .and_then(DataValue::as_bool)
            .unwrap_or(true);

        let mut staged = E::default();
        for field in schema.fields() {
            let raw = row.shift_remove(field.name()).ok_or_else(|| {
                crate::entity_error!(
                    storage,
                    format!("{}.{} 没有对应的数据库列", schema.table(), field.name())
                )
            })?;
            let value =
                resolver::read_from_storage(field, raw, &self.executor, schema.delimiter())
                    .await?;
            resolver::set_field(field, &mut staged, value)?;
        }

        self.entity = staged;
        self.id = id;
        self.active = active;
        Ok(())
    }

    /// 持久化ID，未持久化时为0
    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn into_entity(self) -> E {
        self.entity
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    /// 按声明顺序填充全部字段
    ///
    /// 值的数量必须与声明的字段数量一致；任一字段失败时实体保持不变
    pub fn fill(&mut self, values: Vec<FieldValue>) -> EntityDbResult<()> {
        let schema = E::schema()?;
        if values.len() != schema.field_count() {
            return Err(EntityDbError::Arity {
                entity: E::TYPE_NAME.to_string(),
                expected: schema.field_count(),
                actual: values.len(),
            });
        }

        let mut staged = self.entity.clone();
        for (field, value) in schema.fields().iter().zip(values) {
            resolver::set_field(field, &mut staged, value)?;
        }
        self.entity = staged;
        Ok(())
    }

    /// 按字段名填充部分字段
    ///
    /// 出现未声明的字段名时返回字段访问错误，实体保持不变
    pub fn partial_fill<I, K>(&mut self, values: I) -> EntityDbResult<()>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let schema = E::schema()?;
        let mut staged = self.entity.clone();
        for (name, value) in values {
            let field = schema.require_field(name.as_ref())?;
            resolver::set_field(field, &mut staged, value)?;
        }
        self.entity = staged;
        Ok(())
    }

    /// 读取单个字段
    pub fn get_field(&self, name: &str) -> EntityDbResult<FieldValue> {
        let field = E::schema()?.require_field(name)?;
        Ok(resolver::get_field(field, &self.entity))
    }

    /// 写入单个字段
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> EntityDbResult<()> {
        let field = E::schema()?.require_field(name)?;
        resolver::set_field(field, &mut self.entity, value.into())
    }

    async fn storage_columns(
        &mut self,
        schema: &EntitySchema<E>,
    ) -> EntityDbResult<Vec<(&'static str, DataValue)>> {
        let mut columns = Vec::with_capacity(schema.field_count() + 1);
        for field in schema.fields() {
            let value =
                resolver::format_for_storage(field, &mut self.entity, schema.delimiter()).await?;
            columns.push((field.name(), value));
        }
        Ok(columns)
    }

    /// 保存记录：未持久化时插入，否则更新
    ///
    /// 嵌套记录会先于本记录保存
    pub async fn save(&mut self) -> EntityDbResult<()> {
        if self.id == 0 {
            self.insert().await
        } else {
            self.update().await.map(|_| ())
        }
    }

    async fn insert(&mut self) -> EntityDbResult<()> {
        let schema = E::schema()?;
        let mut columns = self.storage_columns(schema).await?;
        columns.push((ACTIVE_COLUMN, DataValue::Bool(self.active)));

        let sql = SqlQueryBuilder::new(schema.table(), self.executor.as_ref())?.insert(&columns)?;
        self.executor.execute(&sql).await?;

        let id = self.executor.last_insert_id();
        if id <= 0 {
            return Err(crate::entity_error!(
                storage,
                format!("插入 {} 后未获得自增ID", schema.table())
            ));
        }
        self.id = id;
        info!("新建 {} 记录: id={}", E::TYPE_NAME, id);
        Ok(())
    }

    /// 把全部字段写回已持久化的记录
    ///
    /// 未持久化时不写入并返回 `false`
    ///
    /// # 错误
    ///
    /// 对应行已不存在时返回记录不存在
    pub async fn update(&mut self) -> EntityDbResult<bool> {
        let schema = E::schema()?;
        if self.id == 0 {
            return Ok(false);
        }

        let columns = self.storage_columns(schema).await?;
        let sql = SqlQueryBuilder::new(schema.table(), self.executor.as_ref())?
            .update(&columns, self.id)?;
        let outcome = self.executor.execute(&sql).await?;
        if outcome.row_count() == 0 {
            return Err(self.missing_row(schema));
        }
        debug!("更新 {} 记录: id={}", E::TYPE_NAME, self.id);
        Ok(true)
    }

    /// 只写回单个字段，写入的是格式化后的存储值
    ///
    /// 未持久化时返回 `false`
    pub async fn update_field(&mut self, name: &str) -> EntityDbResult<bool> {
        let schema = E::schema()?;
        let field = schema.require_field(name)?;
        if self.id == 0 {
            return Ok(false);
        }

        let value =
            resolver::format_for_storage(field, &mut self.entity, schema.delimiter()).await?;
        let sql = SqlQueryBuilder::new(schema.table(), self.executor.as_ref())?
            .update(&[(field.name(), value)], self.id)?;
        let outcome = self.executor.execute(&sql).await?;
        Ok(outcome.row_count() > 0)
    }

    /// 物理删除对应的行
    ///
    /// 未持久化时返回 `false`
    pub async fn destroy(&self) -> EntityDbResult<bool> {
        let schema = E::schema()?;
        if self.id == 0 {
            return Ok(false);
        }
        let sql = SqlQueryBuilder::new(schema.table(), self.executor.as_ref())?
            .delete_by_id(self.id)?;
        let outcome = self.executor.execute(&sql).await?;
        info!("删除 {} 记录: id={}", E::TYPE_NAME, self.id);
        Ok(outcome.row_count() > 0)
    }

    /// 软删除：把活跃标记置为0
    pub async fn deactivate(&mut self) -> EntityDbResult<bool> {
        self.set_active(false).await
    }

    /// 恢复软删除的记录
    pub async fn reactivate(&mut self) -> EntityDbResult<bool> {
        self.set_active(true).await
    }

    async fn set_active(&mut self, active: bool) -> EntityDbResult<bool> {
        let schema = E::schema()?;
        if self.id == 0 {
            return Ok(false);
        }
        let sql = SqlQueryBuilder::new(schema.table(), self.executor.as_ref())?
            .set_active(active, self.id)?;
        let outcome = self.executor.execute(&sql).await?;
        let changed = outcome.row_count() > 0;
        if changed {
            self.active = active;
        }
        Ok(changed)
    }

    /// 转换为传输映射
    ///
    /// 键依次为 `id`、按声明顺序的各字段、`active`
    pub fn as_map(&self) -> EntityDbResult<TransferMap> {
        let schema = E::schema()?;
        let mut map = TransferMap::with_capacity(schema.field_count() + 2);
        map.insert(ID_COLUMN.to_string(), DataValue::Int(self.id));
        for field in schema.fields() {
            map.insert(
                field.name().to_string(),
                resolver::transfer_value(field, &self.entity)?,
            );
        }
        map.insert(ACTIVE_COLUMN.to_string(), DataValue::Bool(self.active));
        Ok(map)
    }

    /// 全部活跃记录的ID
    pub async fn all_ids(executor: &dyn QueryExecutor) -> EntityDbResult<Vec<i64>> {
        Self::filtered_ids(executor, &EntityFilter::new()).await
    }

    /// 满足全部过滤条件的活跃记录ID
    ///
    /// 过滤器中未声明的字段被忽略
    pub async fn filtered_ids(
        executor: &dyn QueryExecutor,
        filter: &EntityFilter,
    ) -> EntityDbResult<Vec<i64>> {
        let schema = E::schema()?;
        let mut conditions: Vec<(&str, &FilterCondition)> = Vec::with_capacity(filter.len());
        for (name, condition) in filter.iter() {
            match schema.field(name) {
                Some(field) => conditions.push((field.name(), condition)),
                None => warn!("{} 过滤条件中的字段 {} 未声明，已忽略", E::TYPE_NAME, name),
            }
        }

        let sql = SqlQueryBuilder::new(schema.table(), executor)?.select_active_ids(&conditions)?;
        let rows = executor.execute(&sql).await?.into_rows();
        rows.iter()
            .map(|row| {
                row.get(ID_COLUMN).and_then(DataValue::as_i64).ok_or_else(|| {
                    crate::entity_error!(storage, format!("{} 查询结果缺少 id 列", schema.table()))
                })
            })
            .collect()
    }

    fn missing_row(&self, schema: &EntitySchema<E>) -> EntityDbError {
        EntityDbError::AmbiguousRecord {
            table: schema.table().to_string(),
            key: format!("{}={}", ID_COLUMN, self.id),
            found: 0,
        }
    }
}

impl<E: Entity> Deref for Record<E> {
    type Target = E;

    fn deref(&self) -> &E {
        &self.entity
    }
}

impl<E: Entity> DerefMut for Record<E> {
    fn deref_mut(&mut self) -> &mut E {
        &mut self.entity
    }
}

impl<E: Entity> fmt::Debug for Record<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type", &E::TYPE_NAME)
            .field("id", &self.id)
            .field("active", &self.active)
            .field("entity", &self.entity)
            .finish()
    }
}

#[async_trait]
impl<E: Entity> AnyRecord for Record<E> {
    fn record_type(&self) -> &'static str {
        E::TYPE_NAME
    }

    fn record_id(&self) -> i64 {
        self.id
    }

    fn record_active(&self) -> bool {
        self.active
    }

    async fn persist(&mut self) -> EntityDbResult<()> {
        self.save().await
    }

    fn to_transfer_map(&self) -> EntityDbResult<TransferMap> {
        self.as_map()
    }

    fn clone_record(&self) -> Box<dyn AnyRecord> {
        Box::new(self.clone())
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}
