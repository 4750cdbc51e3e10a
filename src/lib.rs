//! rat_domain - 声明式领域模型库
//!
//! 参考mongoengine的设计，通过字段描述符声明结构化记录类型
//! 提供一次性字段绑定、写入时类型转换、基于唯一键的相等性/哈希
//! 以及类型安全的模型集合

// 导出所有公共模块
pub mod config;
pub mod error;
pub mod i18n;
pub mod manager;
pub mod model;
pub mod types;
pub mod views;

// 重新导出常用类型和函数
pub use error::{DomainError, DomainResult};
pub use types::{DataValue, json_value_to_data_value};
pub use manager::{
    register_model, get_model, has_model, registered_models, model_count, clear_models,
};
pub use model::{
    FieldDefault, FieldDefinition, FieldKind, ModelCollection, ModelInstance, ModelSchema,
    ModelSchemaBuilder,
    any_field, binary_field, bool_field, collection_field, date_field, datetime_field,
    float_field, integer_field, model_field, string_field,
};
pub use config::{
    AppConfig, AppConfigBuilder, Environment, LogLevel, LoggingConfig, LoggingConfigBuilder,
};
pub use views::{ContextView, ContextViewSpec};

// 宏展开需要的依赖重导出
#[doc(hidden)]
pub use rat_logger;

// 条件编译调试宏 - 只有在 debug 模式下才输出调试信息
#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::rat_logger::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        // 在 release 模式下不输出调试信息
    };
}

/// 初始化rat_domain库
///
/// 这个函数会初始化多语言错误消息系统
///
/// 注意：日志系统由调用者自行初始化，本库不自动初始化日志
pub fn init() {
    // 初始化多语言错误消息系统
    i18n::ErrorMessageI18n::init();
}

/// 按应用配置初始化rat_domain库
///
/// 注册错误消息翻译并应用配置中的语言设置；
/// 未指定语言时退回环境变量检测
pub fn init_with_config(config: &config::AppConfig) {
    match &config.language {
        Some(language) => {
            i18n::ErrorMessageI18n::register_all_translations();
            i18n::set_language(language);
        }
        None => i18n::ErrorMessageI18n::init(),
    }
}

/// 库版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 库名称
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// 获取库信息
pub fn get_info() -> String {
    format!("{} v{}", NAME, VERSION)
}
