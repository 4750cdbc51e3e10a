//! 全局模型管理器模块
//!
//! 提供模型结构的全局注册与查询，模型声明期注册一次，
//! 此后注册表仅作只读查询使用

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rat_logger::debug;

use crate::error::DomainResult;
use crate::model::ModelSchema;

/// 全局模型注册表
static GLOBAL_MODEL_REGISTRY: Lazy<RwLock<HashMap<String, Arc<ModelSchema>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 注册模型结构
///
/// 同名模型重复注册时更新注册表（`define_model!` 的 OnceLock
/// 保证宏声明的模型只注册一次）
pub fn register_model(schema: Arc<ModelSchema>) -> DomainResult<()> {
    let name = schema.name().to_string();
    let mut registry = GLOBAL_MODEL_REGISTRY.write();

    if registry.contains_key(&name) {
        debug!("模型已存在，将更新注册: {}", name);
    }

    registry.insert(name.clone(), schema);
    debug!("注册模型结构: {}", name);

    Ok(())
}

/// 获取模型结构
pub fn get_model(name: &str) -> Option<Arc<ModelSchema>> {
    GLOBAL_MODEL_REGISTRY.read().get(name).cloned()
}

/// 检查模型是否已注册
pub fn has_model(name: &str) -> bool {
    GLOBAL_MODEL_REGISTRY.read().contains_key(name)
}

/// 获取所有已注册的模型名
pub fn registered_models() -> Vec<String> {
    GLOBAL_MODEL_REGISTRY.read().keys().cloned().collect()
}

/// 已注册模型数量
pub fn model_count() -> usize {
    GLOBAL_MODEL_REGISTRY.read().len()
}

/// 清空模型注册表（测试辅助）
pub fn clear_models() {
    GLOBAL_MODEL_REGISTRY.write().clear();
}
