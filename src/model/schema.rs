//! 模型结构定义模块
//!
//! 在模型声明期将字段定义装配为有序、冻结的字段注册表

use std::collections::HashMap;
use std::sync::Arc;

use rat_logger::debug;

use crate::error::DomainResult;
use crate::model::collection::ModelCollection;
use crate::model::field_types::FieldDefinition;
use crate::model::instance::ModelInstance;
use crate::types::DataValue;

/// 模型结构
///
/// 声明期构建一次，此后字段注册表与键声明全部冻结。
/// 实例通过 `Arc<ModelSchema>` 共享结构；结构身份即指针身份，
/// 两次独立声明产生两个互不相等的模型类型。
pub struct ModelSchema {
    /// 模型名
    name: String,
    /// 字段注册表（声明顺序）
    fields: Vec<FieldDefinition>,
    /// 字段名 -> 槽位索引
    index: HashMap<String, usize>,
    /// 唯一键字段槽位（可为空）
    unique_key: Vec<usize>,
    /// 视图键字段槽位（可为空）
    view_key: Vec<usize>,
    /// 模型描述
    description: Option<String>,
}

impl ModelSchema {
    /// 创建模型结构构建器
    pub fn builder(name: &str) -> ModelSchemaBuilder {
        ModelSchemaBuilder::new(name)
    }

    /// 模型名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 模型描述
    pub fn model_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 按声明顺序遍历字段注册表
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter()
    }

    /// 按声明顺序返回字段名
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().filter_map(|f| f.name()).collect()
    }

    /// 字段数量
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// 按名称查找字段
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// 是否声明了指定字段
    pub fn has_field(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// 字段槽位索引
    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// 唯一键字段（可为空）
    pub fn unique_key(&self) -> Vec<&FieldDefinition> {
        self.unique_key.iter().map(|&i| &self.fields[i]).collect()
    }

    /// 是否声明了唯一键
    pub fn has_unique_key(&self) -> bool {
        !self.unique_key.is_empty()
    }

    /// 视图键字段（可为空）
    pub fn view_key(&self) -> Vec<&FieldDefinition> {
        self.view_key.iter().map(|&i| &self.fields[i]).collect()
    }

    pub(crate) fn unique_key_indices(&self) -> &[usize] {
        &self.unique_key
    }

    pub(crate) fn view_key_indices(&self) -> &[usize] {
        &self.view_key
    }

    /// 创建模型实例
    ///
    /// 未提供的字段应用默认值
    pub fn create(
        self: &Arc<Self>,
        data: HashMap<String, DataValue>,
    ) -> DomainResult<ModelInstance> {
        ModelInstance::with_data(self.clone(), data)
    }

    /// 创建空实例（全部字段应用默认值）
    pub fn create_empty(self: &Arc<Self>) -> DomainResult<ModelInstance> {
        ModelInstance::with_data(self.clone(), HashMap::new())
    }

    /// 创建本模型的类型化集合
    pub fn collection(
        self: &Arc<Self>,
        instances: Vec<ModelInstance>,
    ) -> DomainResult<ModelCollection> {
        ModelCollection::from_instances(self.clone(), instances)
    }

    /// 创建本模型的空集合
    pub fn empty_collection(self: &Arc<Self>) -> ModelCollection {
        ModelCollection::new(self.clone())
    }

    /// 判断给定值是否为本模型集合的合法元素
    ///
    /// 供外部组合代码在插入前做校验
    pub fn accepts_element(self: &Arc<Self>, value: &DataValue) -> bool {
        matches!(value, DataValue::Model(instance) if Arc::ptr_eq(instance.schema(), self))
    }
}

impl std::fmt::Debug for ModelSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ModelSchema({}: [{}])", self.name, self.field_names().join(", "))
    }
}

/// 模型结构构建器
///
/// 声明期执行一次：收集字段定义，逐个完成一次性绑定，
/// 归一化唯一键/视图键声明，产出冻结的模型结构
#[derive(Debug)]
pub struct ModelSchemaBuilder {
    name: String,
    fields: Vec<(String, FieldDefinition)>,
    unique_key: Vec<String>,
    view_key: Vec<String>,
    description: Option<String>,
}

impl ModelSchemaBuilder {
    /// 创建新的构建器
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            unique_key: Vec::new(),
            view_key: Vec::new(),
            description: None,
        }
    }

    /// 声明字段
    pub fn field(mut self, name: &str, definition: FieldDefinition) -> Self {
        self.fields.push((name.to_string(), definition));
        self
    }

    /// 继承父模型的字段声明
    ///
    /// 复制父模型字段定义（清除绑定状态），子模型可在其上重新声明键
    pub fn inherit(mut self, base: &ModelSchema) -> Self {
        for field in base.fields() {
            if let Some(name) = field.name() {
                self.fields.push((name.to_string(), field.unbound_copy()));
            }
        }
        self
    }

    /// 声明唯一键（单字段或多字段）
    pub fn unique_key(mut self, names: &[&str]) -> Self {
        self.unique_key = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// 声明视图键（单字段或多字段）
    pub fn view_key(mut self, names: &[&str]) -> Self {
        self.view_key = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// 设置模型描述
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// 构建模型结构
    ///
    /// 绑定失败（字段对象复用）与键声明错误在此处失败，
    /// 而不是推迟到实例使用期
    pub fn build(self) -> DomainResult<Arc<ModelSchema>> {
        let mut fields: Vec<FieldDefinition> = Vec::with_capacity(self.fields.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(self.fields.len());

        for (name, mut field) in self.fields {
            if index.contains_key(&name) {
                return Err(crate::domain_error!(
                    config,
                    format!("模型 {} 重复声明字段 \"{}\"", self.name, name)
                ));
            }
            field.bind_name(&name)?;
            field.bind_model_cls(&self.name)?;
            index.insert(name, fields.len());
            fields.push(field);
        }

        let unique_key = resolve_key(&self.name, "unique_key", &self.unique_key, &index)?;
        let view_key = resolve_key(&self.name, "view_key", &self.view_key, &index)?;

        debug!(
            "模型结构构建完成: {} (字段数={}, 唯一键={:?})",
            self.name,
            fields.len(),
            self.unique_key
        );

        Ok(Arc::new(ModelSchema {
            name: self.name,
            fields,
            index,
            unique_key,
            view_key,
            description: self.description,
        }))
    }
}

/// 归一化键声明：每个键名必须引用已声明字段
fn resolve_key(
    model: &str,
    attribute: &str,
    names: &[String],
    index: &HashMap<String, usize>,
) -> DomainResult<Vec<usize>> {
    let mut resolved = Vec::with_capacity(names.len());
    for name in names {
        match index.get(name) {
            Some(&i) => resolved.push(i),
            None => {
                return Err(crate::domain_error!(
                    config,
                    format!(
                        "{}.{} 引用了未声明字段 \"{}\"，键声明必须由本模型字段组成",
                        model, attribute, name
                    )
                ));
            }
        }
    }
    Ok(resolved)
}
