//! 批量操作器模块
//!
//! [`Operator`] 针对单一实体类型提供新增、编辑、列表、批量载入和软删除。
//! 记录不存在、不唯一和存储失败在这里被转换为空结果并记录日志，
//! 字段访问、参数数量和无效ID等前置条件错误照常返回
//!
//! 物理删除只能通过 [`Operator::into_destructive`] 得到的 [`DestructiveOperator`] 执行

use std::ops::Deref;
use std::sync::Arc;

use rat_logger::{debug, error, info, warn};

use crate::adapter::QueryExecutor;
use crate::error::{EntityDbError, EntityDbResult};
use crate::model::{Entity, EntitySchema, FieldValue, Record};
use crate::types::{EntityFilter, TransferMap};

/// 单实体类型的批量操作器
pub struct Operator<E: Entity> {
    executor: Arc<dyn QueryExecutor>,
    schema: &'static EntitySchema<E>,
}

impl<E: Entity> Operator<E> {
    /// 创建操作器，实体描述在此时完成校验
    pub fn new(executor: Arc<dyn QueryExecutor>) -> EntityDbResult<Self> {
        let schema = E::schema()?;
        debug!("创建 {} 操作器: 表 {}", E::TYPE_NAME, schema.table());
        Ok(Self { executor, schema })
    }

    /// 存储表名
    pub fn table_name(&self) -> &'static str {
        self.schema.table()
    }

    /// 按声明顺序排列的字段名
    pub fn fields(&self) -> Vec<&'static str> {
        self.schema.field_names()
    }

    pub fn executor(&self) -> &Arc<dyn QueryExecutor> {
        &self.executor
    }

    /// 把数据错误吸收为 `None`，其余错误继续返回
    fn absorb<T>(&self, action: &str, result: EntityDbResult<T>) -> EntityDbResult<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_data_error() => {
                error!("{} {}失败: {}", E::TYPE_NAME, action, e);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn require_id(&self, id: i64) -> EntityDbResult<()> {
        if id <= 0 {
            return Err(EntityDbError::InvalidId {
                entity: E::TYPE_NAME.to_string(),
                id,
            });
        }
        Ok(())
    }

    async fn insert(&self, mut record: Record<E>) -> EntityDbResult<Option<Record<E>>> {
        let saved = record.save().await;
        Ok(self.absorb("新增", saved)?.map(|_| record))
    }

    /// 按声明顺序填充全部字段并新增记录
    ///
    /// 值的数量不符时返回 `Arity`；保存失败时返回 `Ok(None)`
    pub async fn add(&self, values: Vec<FieldValue>) -> EntityDbResult<Option<Record<E>>> {
        let mut record = Record::<E>::blank(self.executor.clone());
        record.fill(values)?;
        self.insert(record).await
    }

    /// 按字段名填充部分字段并新增记录，未给出的字段保持默认值
    pub async fn partial_add<I, K>(&self, values: I) -> EntityDbResult<Option<Record<E>>>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let mut record = Record::<E>::blank(self.executor.clone());
        record.partial_fill(values)?;
        self.insert(record).await
    }

    async fn load_for_edit(&self, id: i64) -> EntityDbResult<Option<Record<E>>> {
        self.require_id(id)?;
        let loaded = Record::<E>::load(self.executor.clone(), id).await;
        self.absorb("载入", loaded)
    }

    async fn store_edit(&self, mut record: Record<E>) -> EntityDbResult<Option<Record<E>>> {
        let saved = record.save().await;
        Ok(self.absorb("编辑", saved)?.map(|_| record))
    }

    /// 载入记录，按声明顺序替换全部字段后保存
    ///
    /// # 错误
    ///
    /// ID不为正时返回 `InvalidId` 且不访问存储；值的数量不符时返回 `Arity`
    pub async fn edit(
        &self,
        id: i64,
        values: Vec<FieldValue>,
    ) -> EntityDbResult<Option<Record<E>>> {
        let Some(mut record) = self.load_for_edit(id).await? else {
            return Ok(None);
        };
        record.fill(values)?;
        self.store_edit(record).await
    }

    /// 载入记录，只替换给出的字段后保存
    pub async fn partial_edit<I, K>(&self, values: I, id: i64) -> EntityDbResult<Option<Record<E>>>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: AsRef<str>,
    {
        let Some(mut record) = self.load_for_edit(id).await? else {
            return Ok(None);
        };
        record.partial_fill(values)?;
        self.store_edit(record).await
    }

    /// 按ID载入单条活跃记录
    pub async fn get(&self, id: i64) -> EntityDbResult<Option<Record<E>>> {
        self.require_id(id)?;
        let loaded = Record::<E>::load(self.executor.clone(), id).await;
        self.absorb("载入", loaded)
    }

    /// 活跃记录的ID列表，给出过滤器时只返回满足条件的记录
    ///
    /// 存储失败时返回空列表
    pub async fn list(&self, filter: Option<&EntityFilter>) -> EntityDbResult<Vec<i64>> {
        let ids = match filter {
            Some(filter) => Record::<E>::filtered_ids(self.executor.as_ref(), filter).await,
            None => Record::<E>::all_ids(self.executor.as_ref()).await,
        };
        Ok(self.absorb("列表查询", ids)?.unwrap_or_default())
    }

    /// 批量载入记录，未给出ID时载入全部活跃记录
    ///
    /// 载入失败的ID被跳过并记录警告
    pub async fn objects(&self, ids: Option<Vec<i64>>) -> EntityDbResult<Vec<Record<E>>> {
        let ids = match ids {
            Some(ids) => ids,
            None => self.list(None).await?,
        };

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match Record::<E>::load(self.executor.clone(), id).await {
                Ok(record) => records.push(record),
                Err(e) if e.is_data_error() => {
                    warn!("跳过无法载入的 {} 记录 id={}: {}", E::TYPE_NAME, id, e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(records)
    }

    /// 批量载入并转换为传输映射
    pub async fn as_maps(&self, ids: Option<Vec<i64>>) -> EntityDbResult<Vec<TransferMap>> {
        self.objects(ids)
            .await?
            .iter()
            .map(Record::as_map)
            .collect()
    }

    /// 软删除记录
    ///
    /// 记录不存在或写入失败时返回 `false`
    pub async fn remove(&self, id: i64) -> EntityDbResult<bool> {
        let Some(mut record) = self.get(id).await? else {
            return Ok(false);
        };
        let removed = record.deactivate().await;
        let removed = self.absorb("软删除", removed)?.unwrap_or(false);
        if removed {
            info!("软删除 {} 记录: id={}", E::TYPE_NAME, id);
        }
        Ok(removed)
    }

    /// 转换为允许物理删除的操作器
    pub fn into_destructive(self) -> DestructiveOperator<E> {
        warn!("{} 操作器已开启物理删除", E::TYPE_NAME);
        DestructiveOperator { inner: self }
    }
}

/// 允许物理删除的批量操作器
///
/// 其余操作与 [`Operator`] 相同
pub struct DestructiveOperator<E: Entity> {
    inner: Operator<E>,
}

impl<E: Entity> DestructiveOperator<E> {
    /// 按ID物理删除记录，软删除的记录也会被删除
    ///
    /// 行不存在或删除失败时返回 `false`
    pub async fn destroy(&self, id: i64) -> EntityDbResult<bool> {
        self.inner.require_id(id)?;
        let record = Record::<E>::reference(self.inner.executor.clone(), id);
        let destroyed = record.destroy().await;
        Ok(self.inner.absorb("物理删除", destroyed)?.unwrap_or(false))
    }

    /// 退回普通操作器
    pub fn into_inner(self) -> Operator<E> {
        self.inner
    }
}

impl<E: Entity> Deref for DestructiveOperator<E> {
    type Target = Operator<E>;

    fn deref(&self) -> &Operator<E> {
        &self.inner
    }
}
