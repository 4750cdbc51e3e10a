//! 字段类型定义模块
//!
//! 定义模型字段的类型、绑定协议、默认值和转换规则

use std::sync::Arc;

use rat_logger::debug;

use crate::error::DomainResult;
use crate::model::collection::ModelCollection;
use crate::model::instance::ModelInstance;
use crate::model::schema::ModelSchema;
use crate::types::DataValue;

/// 字段类型枚举
///
/// 封闭集合：除 `Any` 外每种类型都有确定的转换规则
#[derive(Clone)]
pub enum FieldKind {
    /// 无类型透传
    Any,
    /// 布尔类型（按真值规则转换）
    Bool,
    /// 整数类型
    Int,
    /// 浮点数类型
    Float,
    /// 字符串类型
    String,
    /// 二进制类型
    Binary,
    /// 日期类型
    Date,
    /// 日期时间类型
    DateTime,
    /// 模型引用类型
    Model {
        related: Arc<ModelSchema>,
    },
    /// 模型集合引用类型
    Collection {
        related: Arc<ModelSchema>,
    },
}

impl FieldKind {
    /// 获取类型名称
    pub fn kind_name(&self) -> &'static str {
        match self {
            FieldKind::Any => "any",
            FieldKind::Bool => "boolean",
            FieldKind::Int => "integer",
            FieldKind::Float => "float",
            FieldKind::String => "string",
            FieldKind::Binary => "binary",
            FieldKind::Date => "date",
            FieldKind::DateTime => "datetime",
            FieldKind::Model { .. } => "model",
            FieldKind::Collection { .. } => "collection",
        }
    }

    /// 获取关联模型结构（仅模型/集合引用类型）
    pub fn related(&self) -> Option<&Arc<ModelSchema>> {
        match self {
            FieldKind::Model { related } | FieldKind::Collection { related } => Some(related),
            _ => None,
        }
    }
}

impl std::fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldKind::Model { related } => write!(f, "model<{}>", related.name()),
            FieldKind::Collection { related } => write!(f, "collection<{}>", related.name()),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

/// 字段默认值
///
/// 字面值在每次初始化时克隆；生成函数在每次初始化时调用，
/// 因此不同实例得到各自新计算的默认值
#[derive(Clone)]
pub enum FieldDefault {
    /// 字面默认值
    Value(DataValue),
    /// 零参数生成函数
    Producer(Arc<dyn Fn() -> DataValue + Send + Sync>),
}

impl FieldDefault {
    /// 解析默认值（生成函数每次调用重新计算）
    pub fn resolve(&self) -> DataValue {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Producer(producer) => producer(),
        }
    }
}

impl std::fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldDefault::Value(value) => write!(f, "{:?}", value),
            FieldDefault::Producer(_) => write!(f, "<producer>"),
        }
    }
}

/// 字段定义
///
/// 声明期通过 `bind_name`/`bind_model_cls` 完成一次性绑定，
/// 绑定后进入模型结构的只读字段注册表
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// 字段类型
    kind: FieldKind,
    /// 公开字段名（绑定后有值）
    name: Option<String>,
    /// 内部存储键，与公开名区分避免访问器递归
    storage_key: Option<String>,
    /// 所属模型名（绑定后有值）
    model_name: Option<String>,
    /// 默认值
    default: Option<FieldDefault>,
    /// 是否必填
    required: bool,
    /// 字段描述
    description: Option<String>,
}

impl FieldDefinition {
    /// 创建新的字段定义
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            name: None,
            storage_key: None,
            model_name: None,
            default: None,
            required: false,
            description: None,
        }
    }

    /// 设置为必填字段
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// 设置默认值
    pub fn with_default(mut self, value: impl Into<DataValue>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// 设置默认值生成函数（每个实例独立计算）
    pub fn with_default_fn(
        mut self,
        producer: impl Fn() -> DataValue + Send + Sync + 'static,
    ) -> Self {
        self.default = Some(FieldDefault::Producer(Arc::new(producer)));
        self
    }

    /// 设置字段描述
    pub fn description(mut self, desc: &str) -> Self {
        self.description = Some(desc.to_string());
        self
    }

    /// 字段类型
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// 公开字段名（未绑定时为 None）
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 内部存储键
    pub fn storage_key(&self) -> Option<&str> {
        self.storage_key.as_deref()
    }

    /// 所属模型名（未绑定时为 None）
    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    /// 是否必填
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// 默认值声明
    pub fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    /// 字段描述
    pub fn field_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// 错误消息中使用的字段标签
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unknown")
    }

    /// 绑定字段名
    ///
    /// 每个字段定义只能绑定一次名称，重复绑定（即使同名）返回绑定错误
    pub fn bind_name(&mut self, name: &str) -> DomainResult<()> {
        if let Some(existing) = &self.name {
            return Err(crate::domain_error!(
                binding,
                name,
                format!("字段已绑定名称 \"{}\"，不可重复绑定", existing)
            ));
        }
        self.name = Some(name.to_string());
        self.storage_key = Some(format!("_{}", name));
        Ok(())
    }

    /// 绑定所属模型
    ///
    /// 重复绑定（包括绑定到同一模型）返回绑定错误，
    /// 以此捕获字段对象在多个模型声明间的意外复用
    pub fn bind_model_cls(&mut self, model_name: &str) -> DomainResult<()> {
        if let Some(existing) = self.model_name.clone() {
            return Err(crate::domain_error!(
                binding,
                self.display_name(),
                format!(
                    "字段已绑定模型 \"{}\"，不可重新绑定到 \"{}\"",
                    existing, model_name
                )
            ));
        }
        self.model_name = Some(model_name.to_string());
        Ok(())
    }

    /// 复制字段声明（清除绑定状态）
    ///
    /// 用于子模型继承父模型的字段声明
    pub(crate) fn unbound_copy(&self) -> FieldDefinition {
        FieldDefinition {
            kind: self.kind.clone(),
            name: None,
            storage_key: None,
            model_name: None,
            default: self.default.clone(),
            required: self.required,
            description: self.description.clone(),
        }
    }

    /// 实例构造时初始化字段槽位
    ///
    /// 原始值为空时应用默认值（生成函数重新计算后走转换规则）；
    /// 解析后仍为空且字段必填时返回必填错误，否则委托给设置路径
    pub fn init_model(&self, instance: &ModelInstance, raw: DataValue) -> DomainResult<()> {
        let mut value = raw;
        if value.is_null() {
            if let Some(default) = &self.default {
                value = match default.resolve() {
                    DataValue::Null => DataValue::Null,
                    resolved => self.convert(resolved)?,
                };
            }
        }

        if value.is_null() && self.required {
            return Err(crate::domain_error!(requirement, self.display_name()));
        }

        self.set_value(instance, value)
    }

    /// 读取字段值
    ///
    /// 槽位为空时返回经过本字段转换规则的候补值，
    /// 形态错误的候补值照常触发转换错误而不会静默透传
    pub fn get_value(
        &self,
        instance: &ModelInstance,
        fallback: Option<DataValue>,
    ) -> DomainResult<DataValue> {
        let stored = instance.load_slot(self.slot_of(instance)?);
        if !stored.is_null() {
            return Ok(stored);
        }
        match fallback {
            None | Some(DataValue::Null) => Ok(DataValue::Null),
            Some(value) => self.convert(value),
        }
    }

    /// 设置字段值
    ///
    /// 空值写入必填字段返回必填错误；非空值经转换规则后入槽
    pub fn set_value(&self, instance: &ModelInstance, raw: DataValue) -> DomainResult<()> {
        let slot = self.slot_of(instance)?;
        if raw.is_null() {
            if self.required {
                return Err(crate::domain_error!(requirement, self.display_name()));
            }
            instance.store_slot(slot, DataValue::Null);
            return Ok(());
        }
        let converted = self.convert(raw)?;
        instance.store_slot(slot, converted);
        Ok(())
    }

    /// 读取字段的结构化表示
    ///
    /// 模型引用递归展开为结构化映射，集合展开为结构化序列
    pub fn get_builtin(&self, instance: &ModelInstance) -> DomainResult<DataValue> {
        Ok(match self.get_value(instance, None)? {
            DataValue::Model(model) => DataValue::Object(model.get_data()),
            DataValue::Collection(collection) => DataValue::Array(collection.to_data()),
            other => other,
        })
    }

    /// 按字段类型转换原始值
    ///
    /// 形态错误返回 TypeError，形态正确但内容不可转换返回 ValueError
    pub fn convert(&self, value: DataValue) -> DomainResult<DataValue> {
        let field = self.display_name();
        match &self.kind {
            FieldKind::Any => Ok(value),
            FieldKind::Bool => Ok(DataValue::Bool(value.is_truthy())),
            FieldKind::Int => convert_int(field, value),
            FieldKind::Float => convert_float(field, value),
            FieldKind::String => convert_string(field, value),
            FieldKind::Binary => convert_binary(field, value),
            FieldKind::Date => convert_date(field, value),
            FieldKind::DateTime => convert_datetime(field, value),
            FieldKind::Model { related } => convert_model(related, field, value),
            FieldKind::Collection { related } => convert_collection(related, field, value),
        }
    }

    /// 解析字段在实例中的槽位
    fn slot_of(&self, instance: &ModelInstance) -> DomainResult<usize> {
        let name = self.name.as_deref().ok_or_else(|| {
            crate::domain_error!(binding, "unknown", "字段尚未绑定名称，无法访问实例槽位")
        })?;
        instance
            .schema()
            .index_of(name)
            .ok_or_else(|| crate::domain_error!(attribute, name))
    }
}

fn convert_int(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::Int(i) => Ok(DataValue::Int(i)),
        DataValue::Bool(b) => Ok(DataValue::Int(b as i64)),
        DataValue::Float(f) => Ok(DataValue::Int(f.trunc() as i64)),
        DataValue::String(s) => s.trim().parse::<i64>().map(DataValue::Int).map_err(|_| {
            crate::domain_error!(value, field, format!("\"{}\" 不能转换为整数", s))
        }),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("期望整数类型，实际收到: {}", other.type_name())
        )),
    }
}

fn convert_float(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::Float(f) => Ok(DataValue::Float(f)),
        DataValue::Int(i) => Ok(DataValue::Float(i as f64)),
        DataValue::Bool(b) => Ok(DataValue::Float(if b { 1.0 } else { 0.0 })),
        DataValue::String(s) => s.trim().parse::<f64>().map(DataValue::Float).map_err(|_| {
            crate::domain_error!(value, field, format!("\"{}\" 不能转换为浮点数", s))
        }),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("期望浮点数类型，实际收到: {}", other.type_name())
        )),
    }
}

fn convert_string(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::String(s) => Ok(DataValue::String(s)),
        DataValue::Bool(b) => Ok(DataValue::String(b.to_string())),
        DataValue::Int(i) => Ok(DataValue::String(i.to_string())),
        DataValue::Float(f) => Ok(DataValue::String(f.to_string())),
        DataValue::Date(d) => Ok(DataValue::String(d.format("%Y-%m-%d").to_string())),
        DataValue::DateTime(dt) => Ok(DataValue::String(dt.to_rfc3339())),
        DataValue::Bytes(b) => Ok(DataValue::String(String::from_utf8_lossy(&b).into_owned())),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("期望可转换为字符串的标量，实际收到: {}", other.type_name())
        )),
    }
}

fn convert_binary(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::Bytes(b) => Ok(DataValue::Bytes(b)),
        DataValue::String(s) => Ok(DataValue::Bytes(s.into_bytes())),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("期望二进制数据，实际收到: {}", other.type_name())
        )),
    }
}

fn convert_date(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::Date(d) => Ok(DataValue::Date(d)),
        // 日期时间值取其日期部分
        DataValue::DateTime(dt) => Ok(DataValue::Date(dt.date_naive())),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("{} 不是有效日期", other.type_name())
        )),
    }
}

fn convert_datetime(field: &str, value: DataValue) -> DomainResult<DataValue> {
    match value {
        DataValue::DateTime(dt) => Ok(DataValue::DateTime(dt)),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!("{} 不是有效日期时间", other.type_name())
        )),
    }
}

fn convert_model(
    related: &Arc<ModelSchema>,
    field: &str,
    value: DataValue,
) -> DomainResult<DataValue> {
    coerce_model_element(related, field, value).map(DataValue::Model)
}

fn convert_collection(
    related: &Arc<ModelSchema>,
    field: &str,
    value: DataValue,
) -> DomainResult<DataValue> {
    match value {
        // 同类型集合直接共享
        DataValue::Collection(collection) if Arc::ptr_eq(collection.schema(), related) => {
            Ok(DataValue::Collection(collection))
        }
        DataValue::Collection(collection) => {
            debug!(
                "集合字段 {} 收到异类集合 {}，按元素重新校验",
                field,
                collection.element_name()
            );
            let mut instances = Vec::with_capacity(collection.len());
            for item in collection.items() {
                instances.push(coerce_model_element(related, field, DataValue::Model(item))?);
            }
            Ok(DataValue::Collection(ModelCollection::from_instances(
                related.clone(),
                instances,
            )?))
        }
        DataValue::Array(values) => {
            let mut instances = Vec::with_capacity(values.len());
            for item in values {
                instances.push(coerce_model_element(related, field, item)?);
            }
            Ok(DataValue::Collection(ModelCollection::from_instances(
                related.clone(),
                instances,
            )?))
        }
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!(
                "期望 {} 的集合或序列，实际收到: {}",
                related.name(),
                other.type_name()
            )
        )),
    }
}

/// 按模型引用规则强制转换集合元素
fn coerce_model_element(
    related: &Arc<ModelSchema>,
    field: &str,
    value: DataValue,
) -> DomainResult<ModelInstance> {
    match value {
        DataValue::Model(instance) => {
            if Arc::ptr_eq(instance.schema(), related) {
                Ok(instance)
            } else {
                Err(crate::domain_error!(
                    type_mismatch,
                    field,
                    format!(
                        "{} 不是有效的模型实例，需要 {} 的实例",
                        instance.model_name(),
                        related.name()
                    )
                ))
            }
        }
        DataValue::Object(map) => ModelInstance::with_data(related.clone(), map),
        other => Err(crate::domain_error!(
            type_mismatch,
            field,
            format!(
                "{} 不能作为 {} 的关联值，需要模型实例或结构化映射",
                other.type_name(),
                related.name()
            )
        )),
    }
}
