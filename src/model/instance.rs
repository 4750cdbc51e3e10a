//! 模型实例模块
//!
//! 基于共享句柄的模型值容器：克隆即别名，与声明式模型的引用语义一致

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::RwLock;
use rat_logger::debug;

use crate::error::DomainResult;
use crate::model::schema::ModelSchema;
use crate::types::DataValue;

/// 模型实例
///
/// 每个声明字段对应一个存储槽位，槽位保存 `Null`（未设置）
/// 或已按字段规则转换的值。实例是共享句柄：`clone` 得到的
/// 是同一记录的别名而非拷贝。
///
/// 相等性与哈希由唯一键派生；未声明唯一键时回退为句柄身份。
/// 多线程并发写同一实例的行为未定义，由调用方自行同步。
#[derive(Clone)]
pub struct ModelInstance {
    inner: Arc<InstanceInner>,
}

struct InstanceInner {
    schema: Arc<ModelSchema>,
    slots: RwLock<Vec<DataValue>>,
}

impl ModelInstance {
    /// 从字段名->原始值映射构造实例
    ///
    /// 映射可以是任意子集：缺失字段应用默认值，多余键被忽略。
    /// 任一字段初始化失败则整个构造失败。
    pub fn with_data(
        schema: Arc<ModelSchema>,
        mut data: HashMap<String, DataValue>,
    ) -> DomainResult<Self> {
        let instance = ModelInstance {
            inner: Arc::new(InstanceInner {
                slots: RwLock::new(vec![DataValue::Null; schema.field_count()]),
                schema,
            }),
        };

        let schema = instance.inner.schema.clone();
        for field in schema.fields() {
            let raw = field
                .name()
                .and_then(|name| data.remove(name))
                .unwrap_or(DataValue::Null);
            field.init_model(&instance, raw)?;
        }

        Ok(instance)
    }

    /// 构造空实例（全部字段应用默认值）
    pub fn new(schema: Arc<ModelSchema>) -> DomainResult<Self> {
        Self::with_data(schema, HashMap::new())
    }

    /// 所属模型结构
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.inner.schema
    }

    /// 所属模型名
    pub fn model_name(&self) -> &str {
        self.inner.schema.name()
    }

    /// 判断两个句柄是否指向同一记录
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// 读取字段值
    ///
    /// 字段不存在返回 AttributeError；槽位为空时返回按字段规则
    /// 转换后的候补值（形态错误的候补值照常报错）
    pub fn get(&self, field_name: &str, default: Option<DataValue>) -> DomainResult<DataValue> {
        let field = self
            .inner
            .schema
            .field(field_name)
            .ok_or_else(|| crate::domain_error!(attribute, field_name))?;
        field.get_value(self, default)
    }

    /// 设置字段值
    pub fn set(&self, field_name: &str, value: impl Into<DataValue>) -> DomainResult<()> {
        let field = self
            .inner
            .schema
            .field(field_name)
            .ok_or_else(|| crate::domain_error!(attribute, field_name))?;
        field.set_value(self, value.into())
    }

    /// 导出结构化数据
    ///
    /// 标量字段返回存储值；模型引用递归展开为结构化映射，
    /// 集合引用展开为结构化序列
    pub fn get_data(&self) -> HashMap<String, DataValue> {
        let mut data = HashMap::with_capacity(self.inner.schema.field_count());
        for (index, field) in self.inner.schema.fields().enumerate() {
            if let Some(name) = field.name() {
                let value = match self.load_slot(index) {
                    DataValue::Model(model) => DataValue::Object(model.get_data()),
                    DataValue::Collection(collection) => DataValue::Array(collection.to_data()),
                    other => other,
                };
                data.insert(name.to_string(), value);
            }
        }
        data
    }

    /// 批量设置结构化数据
    ///
    /// 对每个声明字段重新执行构造期初始化：缺失键重置为默认值
    /// 而不是保持原值。任一字段失败时回滚全部槽位。
    pub fn set_data(&self, data: &HashMap<String, DataValue>) -> DomainResult<()> {
        let snapshot = self.inner.slots.read().clone();

        for field in self.inner.schema.fields() {
            let raw = field
                .name()
                .and_then(|name| data.get(name).cloned())
                .unwrap_or(DataValue::Null);
            if let Err(e) = field.init_model(self, raw) {
                debug!("批量设置失败，回滚实例 {}: {}", self.model_name(), e);
                *self.inner.slots.write() = snapshot;
                return Err(e);
            }
        }

        Ok(())
    }

    /// 读取槽位（内部使用）
    pub(crate) fn load_slot(&self, index: usize) -> DataValue {
        self.inner
            .slots
            .read()
            .get(index)
            .cloned()
            .unwrap_or(DataValue::Null)
    }

    /// 写入槽位（内部使用，值已经过字段转换）
    pub(crate) fn store_slot(&self, index: usize, value: DataValue) {
        let mut slots = self.inner.slots.write();
        if let Some(slot) = slots.get_mut(index) {
            *slot = value;
        }
    }
}

impl PartialEq for ModelInstance {
    /// 基于唯一键的相等比较
    ///
    /// 同一句柄恒等；不同模型结构恒不等；未声明唯一键时
    /// 回退为句柄身份（即不同记录恒不等）
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.inner, &other.inner) {
            return true;
        }
        if !Arc::ptr_eq(&self.inner.schema, &other.inner.schema) {
            return false;
        }
        let key = self.inner.schema.unique_key_indices();
        if key.is_empty() {
            return false;
        }
        key.iter().all(|&i| self.load_slot(i) == other.load_slot(i))
    }
}

impl Eq for ModelInstance {}

impl Hash for ModelInstance {
    /// 与相等性一致的哈希
    ///
    /// 声明唯一键时按键字段值哈希（相等实例哈希必然相等），
    /// 否则按句柄地址哈希
    fn hash<H: Hasher>(&self, state: &mut H) {
        let key = self.inner.schema.unique_key_indices();
        if key.is_empty() {
            (Arc::as_ptr(&self.inner) as usize).hash(state);
        } else {
            self.inner.schema.name().hash(state);
            for &i in key {
                self.load_slot(i).hash_into(state);
            }
        }
    }
}

impl std::fmt::Debug for ModelInstance {
    /// 完整表示：列出全部字段名=值
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}(", self.model_name())?;
        let mut first = true;
        for (index, field) in self.inner.schema.fields().enumerate() {
            if let Some(name) = field.name() {
                if !first {
                    write!(f, ", ")?;
                }
                first = false;
                write!(f, "{}={}", name, self.load_slot(index))?;
            }
        }
        write!(f, ")")
    }
}

impl std::fmt::Display for ModelInstance {
    /// 受限表示：仅使用视图键字段，未声明视图键时回退为完整表示
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = self.inner.schema.view_key_indices();
        if view.is_empty() {
            return write!(f, "{:?}", self);
        }
        write!(f, "{}(", self.model_name())?;
        for (pos, &index) in view.iter().enumerate() {
            if pos > 0 {
                write!(f, ", ")?;
            }
            let name = self
                .inner
                .schema
                .fields()
                .nth(index)
                .and_then(|field| field.name())
                .unwrap_or("unknown");
            write!(f, "{}={}", name, self.load_slot(index))?;
        }
        write!(f, ")")
    }
}
