//! 上下文视图模块
//!
//! 将模型数据投影为面向特定受众的受限形态（如公开/私有表示）。
//! 视图只消费核心的公开读取接口（字段注册表与 `get_data`），
//! 不触碰实例内部存储。

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::DomainResult;
use crate::model::{ModelInstance, ModelSchema};
use crate::types::DataValue;

/// 视图投影方式
#[derive(Debug, Clone)]
enum Projection {
    /// 包含全部字段
    All,
    /// 仅包含指定字段
    Include(Vec<String>),
    /// 排除指定字段
    Exclude(Vec<String>),
}

/// 上下文视图规格
///
/// 声明期完成校验：include/exclude 互斥，引用的字段必须存在。
/// 校验失败在视图定义处报错，而不是推迟到投影时
#[derive(Debug, Clone)]
pub struct ContextViewSpec {
    schema: Arc<ModelSchema>,
    projection: Projection,
}

impl ContextViewSpec {
    /// 创建包含全部字段的视图规格
    pub fn all(schema: Arc<ModelSchema>) -> Self {
        ContextViewSpec {
            schema,
            projection: Projection::All,
        }
    }

    /// 创建视图规格
    ///
    /// 同时给出 include 与 exclude 是禁止的
    pub fn new(
        schema: Arc<ModelSchema>,
        include: Option<&[&str]>,
        exclude: Option<&[&str]>,
    ) -> DomainResult<Self> {
        match (include, exclude) {
            (Some(_), Some(_)) => Err(crate::domain_error!(
                config,
                "不允许同时使用 include 与 exclude 声明视图"
            )),
            (Some(names), None) => Self::with_projection(schema, names, true),
            (None, Some(names)) => Self::with_projection(schema, names, false),
            (None, None) => Ok(Self::all(schema)),
        }
    }

    /// 创建仅包含指定字段的视图规格
    pub fn include(schema: Arc<ModelSchema>, names: &[&str]) -> DomainResult<Self> {
        Self::new(schema, Some(names), None)
    }

    /// 创建排除指定字段的视图规格
    pub fn exclude(schema: Arc<ModelSchema>, names: &[&str]) -> DomainResult<Self> {
        Self::new(schema, None, Some(names))
    }

    fn with_projection(
        schema: Arc<ModelSchema>,
        names: &[&str],
        is_include: bool,
    ) -> DomainResult<Self> {
        let mut unknown = Vec::new();
        for name in names {
            if !schema.has_field(name) {
                unknown.push(name.to_string());
            }
        }
        if !unknown.is_empty() {
            return Err(crate::domain_error!(
                config,
                format!("视图引用了不存在的字段: {}", unknown.join(", "))
            ));
        }

        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        Ok(ContextViewSpec {
            schema,
            projection: if is_include {
                Projection::Include(names)
            } else {
                Projection::Exclude(names)
            },
        })
    }

    /// 视图基于的模型结构
    pub fn schema(&self) -> &Arc<ModelSchema> {
        &self.schema
    }

    /// 视图包含的字段名（声明顺序）
    pub fn field_names(&self) -> Vec<&str> {
        match &self.projection {
            Projection::All => self.schema.field_names(),
            Projection::Include(names) => self
                .schema
                .field_names()
                .into_iter()
                .filter(|n| names.iter().any(|i| i == n))
                .collect(),
            Projection::Exclude(names) => self
                .schema
                .field_names()
                .into_iter()
                .filter(|n| !names.iter().any(|e| e == n))
                .collect(),
        }
    }

    /// 将模型实例投影为视图
    ///
    /// 实例必须属于视图声明的模型结构
    pub fn project(&self, instance: &ModelInstance) -> DomainResult<ContextView> {
        if !Arc::ptr_eq(instance.schema(), &self.schema) {
            return Err(crate::domain_error!(
                type_mismatch,
                self.schema.name(),
                format!(
                    "{} 不是 {} 的实例，无法投影",
                    instance.model_name(),
                    self.schema.name()
                )
            ));
        }

        let mut full = instance.get_data();
        let mut data = HashMap::new();
        let mut names = Vec::new();
        for name in self.field_names() {
            if let Some(value) = full.remove(name) {
                names.push(name.to_string());
                data.insert(name.to_string(), value);
            }
        }

        Ok(ContextView { names, data })
    }
}

/// 上下文视图
///
/// 投影结果的只读快照
#[derive(Debug, Clone)]
pub struct ContextView {
    names: Vec<String>,
    data: HashMap<String, DataValue>,
}

impl ContextView {
    /// 视图包含的字段名（声明顺序）
    pub fn field_names(&self) -> Vec<&str> {
        self.names.iter().map(|n| n.as_str()).collect()
    }

    /// 读取视图字段值
    pub fn get(&self, field_name: &str) -> DomainResult<&DataValue> {
        self.data
            .get(field_name)
            .ok_or_else(|| crate::domain_error!(attribute, field_name))
    }

    /// 当前上下文下的字段/值映射
    pub fn get_data(&self) -> &HashMap<String, DataValue> {
        &self.data
    }
}
