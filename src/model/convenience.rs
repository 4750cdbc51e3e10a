//! 模型便捷函数模块
//!
//! 提供创建各种字段类型的便捷函数

use std::sync::Arc;

use crate::model::field_types::{FieldDefinition, FieldKind};
use crate::model::schema::ModelSchema;

/// 便捷函数：创建无类型透传字段
pub fn any_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Any)
}

/// 便捷函数：创建布尔字段
pub fn bool_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Bool)
}

/// 便捷函数：创建整数字段
pub fn integer_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Int)
}

/// 便捷函数：创建浮点数字段
pub fn float_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Float)
}

/// 便捷函数：创建字符串字段
pub fn string_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::String)
}

/// 便捷函数：创建二进制字段
pub fn binary_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Binary)
}

/// 便捷函数：创建日期字段
pub fn date_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::Date)
}

/// 便捷函数：创建日期时间字段
pub fn datetime_field() -> FieldDefinition {
    FieldDefinition::new(FieldKind::DateTime)
}

/// 便捷函数：创建模型引用字段
pub fn model_field(related: Arc<ModelSchema>) -> FieldDefinition {
    FieldDefinition::new(FieldKind::Model { related })
}

/// 便捷函数：创建模型集合引用字段
pub fn collection_field(related: Arc<ModelSchema>) -> FieldDefinition {
    FieldDefinition::new(FieldKind::Collection { related })
}
