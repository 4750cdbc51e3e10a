//! 类型化模型集合模块
//!
//! 元素类型固定的有序可变序列：每次变更操作前校验元素类型，
//! 批量操作整体校验后一次提交，失败时不产生部分变更

use std::hash::Hasher;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::DomainResult;
use crate::model::instance::ModelInstance;
use crate::model::schema::ModelSchema;
use crate::types::DataValue;

/// 类型化模型集合
///
/// 共享句柄语义与 [`ModelInstance`] 一致：`clone` 得到同一
/// 序列的别名。元素类型在构造时固定，所有写入路径都校验
/// 元素属于声明的模型结构。
#[derive(Clone)]
pub struct ModelCollection {
    inner: Arc<CollectionInner>,
}

struct CollectionInner {
    schema: Arc<ModelSchema>,
    items: RwLock<Vec<ModelInstance>>,
}

impl ModelCollection {
    /// 创建空集合
    pub fn new(schema: Arc<ModelSchema>) -> Self {
        ModelCollection {
            inner: Arc::new(CollectionInner {
                schema,
                items: RwLock::new(Vec::new()),
            }),
        }
    }

    /// 从实例序列构造集合
    ///
    /// 逐个校验元素类型，任一元素不合法则构造失败且不产生集合
    pub fn from_instances(
        schema: Arc<ModelSchema>,
        instances: Vec<ModelInstance>,
    ) -> DomainResult<Self> {
        for instance in &instances {
            ensure_element(&schema, instance)?;
        }
        Ok(ModelCollection {
            inner: Arc::new(CollectionInner {
                schema,
                items: RwLock::new(instances),
            }),
        })
    }

    /// 元素模型结构
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.inner.schema
    }

    /// 元素模型名
    pub fn element_name(&self) -> &str {
        self.inner.schema.name()
    }

    /// 元素数量
    pub fn len(&self) -> usize {
        self.inner.items.read().len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.inner.items.read().is_empty()
    }

    /// 按索引读取元素
    pub fn get(&self, index: usize) -> Option<ModelInstance> {
        self.inner.items.read().get(index).cloned()
    }

    /// 返回全部元素的快照
    pub fn items(&self) -> Vec<ModelInstance> {
        self.inner.items.read().clone()
    }

    /// 追加元素
    pub fn append(&self, instance: ModelInstance) -> DomainResult<()> {
        ensure_element(&self.inner.schema, &instance)?;
        self.inner.items.write().push(instance);
        Ok(())
    }

    /// 批量追加元素
    ///
    /// 整批校验通过后才提交，任一元素不合法则集合保持不变
    pub fn extend(&self, instances: Vec<ModelInstance>) -> DomainResult<()> {
        for instance in &instances {
            ensure_element(&self.inner.schema, instance)?;
        }
        self.inner.items.write().extend(instances);
        Ok(())
    }

    /// 在指定位置插入元素（越界位置插入到末尾）
    pub fn insert(&self, index: usize, instance: ModelInstance) -> DomainResult<()> {
        ensure_element(&self.inner.schema, &instance)?;
        let mut items = self.inner.items.write();
        let position = index.min(items.len());
        items.insert(position, instance);
        Ok(())
    }

    /// 按索引替换元素
    pub fn set(&self, index: usize, instance: ModelInstance) -> DomainResult<()> {
        ensure_element(&self.inner.schema, &instance)?;
        let mut items = self.inner.items.write();
        match items.get_mut(index) {
            Some(slot) => {
                *slot = instance;
                Ok(())
            }
            None => Err(crate::domain_error!(
                value,
                self.element_name(),
                format!("索引 {} 超出集合范围 (长度 {})", index, items.len())
            )),
        }
    }

    /// 按索引移除并返回元素
    pub fn remove(&self, index: usize) -> Option<ModelInstance> {
        let mut items = self.inner.items.write();
        if index < items.len() {
            Some(items.remove(index))
        } else {
            None
        }
    }

    /// 清空集合
    pub fn clear(&self) {
        self.inner.items.write().clear();
    }

    /// 读取切片
    ///
    /// 返回同元素类型的新集合（已存储元素无需重新校验），
    /// 保证链式切片仍是类型化集合
    pub fn slice(&self, range: Range<usize>) -> DomainResult<ModelCollection> {
        let items = self.inner.items.read();
        if range.start > range.end || range.end > items.len() {
            return Err(crate::domain_error!(
                value,
                self.element_name(),
                format!(
                    "切片范围 {}..{} 超出集合范围 (长度 {})",
                    range.start,
                    range.end,
                    items.len()
                )
            ));
        }
        let selected = items[range].to_vec();
        drop(items);
        Ok(ModelCollection {
            inner: Arc::new(CollectionInner {
                schema: self.inner.schema.clone(),
                items: RwLock::new(selected),
            }),
        })
    }

    /// 切片赋值（替换区间，长度可变）
    ///
    /// 整批校验通过后一次性替换，任一元素不合法则集合保持不变
    pub fn set_slice(
        &self,
        range: Range<usize>,
        instances: Vec<ModelInstance>,
    ) -> DomainResult<()> {
        for instance in &instances {
            ensure_element(&self.inner.schema, instance)?;
        }
        let mut items = self.inner.items.write();
        if range.start > range.end || range.end > items.len() {
            return Err(crate::domain_error!(
                value,
                self.element_name(),
                format!(
                    "切片范围 {}..{} 超出集合范围 (长度 {})",
                    range.start,
                    range.end,
                    items.len()
                )
            ));
        }
        items.splice(range, instances);
        Ok(())
    }

    /// 判断给定值是否为本集合的合法元素
    pub fn accepts(&self, value: &DataValue) -> bool {
        matches!(value, DataValue::Model(instance)
            if Arc::ptr_eq(instance.schema(), &self.inner.schema))
    }

    /// 导出结构化数据（每个元素展开为结构化映射）
    pub fn to_data(&self) -> Vec<DataValue> {
        self.inner
            .items
            .read()
            .iter()
            .map(|instance| DataValue::Object(instance.get_data()))
            .collect()
    }

    /// 哈希辅助：按元素顺序组合哈希
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        use std::hash::Hash;
        for instance in self.items() {
            instance.hash(state);
        }
    }
}

/// 校验元素属于集合声明的模型结构
fn ensure_element(schema: &Arc<ModelSchema>, instance: &ModelInstance) -> DomainResult<()> {
    if !Arc::ptr_eq(instance.schema(), schema) {
        return Err(crate::domain_error!(
            type_mismatch,
            schema.name(),
            format!(
                "{} 不是有效的集合元素，需要 {} 的实例",
                instance.model_name(),
                schema.name()
            )
        ));
    }
    Ok(())
}

impl PartialEq for ModelCollection {
    /// 按元素顺序逐个比较
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        let left = self.items();
        let right = other.items();
        left == right
    }
}

impl Eq for ModelCollection {}

impl IntoIterator for &ModelCollection {
    type Item = ModelInstance;
    type IntoIter = std::vec::IntoIter<ModelInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.items().into_iter()
    }
}

impl std::fmt::Display for ModelCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (pos, instance) in self.items().iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", instance)?;
        }
        write!(f, "]")
    }
}

impl std::fmt::Debug for ModelCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
