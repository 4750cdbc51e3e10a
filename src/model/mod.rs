//! 模型定义系统模块
//!
//! 参考mongoengine的设计，通过字段描述符声明模型结构
//! 提供一次性绑定、类型转换、唯一键标识和类型安全集合

pub mod collection;
pub mod convenience;
pub mod field_types;
pub mod instance;
pub mod macros;
pub mod schema;

// 重新导出核心类型（保持向后兼容）
pub use collection::ModelCollection;
pub use convenience::*;
pub use field_types::{FieldDefault, FieldDefinition, FieldKind};
pub use instance::ModelInstance;
pub use schema::{ModelSchema, ModelSchemaBuilder};
