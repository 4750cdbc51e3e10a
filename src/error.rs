//! 错误类型定义模块
//!
//! 定义领域模型库的统一错误类型、结果别名和便捷宏

use thiserror::Error;

/// rat_domain 统一错误类型
///
/// 错误分类与模型生命周期对应：
/// - 声明期：`ConfigError` / `BindingError`
/// - 使用期：`AttributeError` / `RequirementError` / `TypeError` / `ValueError`
/// - 数据桥接：`SerializationError`
#[derive(Error, Debug)]
pub enum DomainError {
    /// 模型声明配置错误（唯一键/视图键引用了未声明字段等）
    #[error("配置错误: {message}")]
    ConfigError {
        message: String,
    },

    /// 字段绑定错误（字段名或所属模型重复绑定）
    #[error("字段绑定失败: {field} - {message}")]
    BindingError {
        field: String,
        message: String,
    },

    /// 字段不存在
    #[error("字段不存在: {field}")]
    AttributeError {
        field: String,
    },

    /// 必填字段缺失
    #[error("必填字段不能为空: {field}")]
    RequirementError {
        field: String,
    },

    /// 值形态错误（无法按字段类型转换，如对象赋给数值字段）
    #[error("字段类型不匹配: {field} - {message}")]
    TypeError {
        field: String,
        message: String,
    },

    /// 值内容错误（形态正确但内容不可转换，如空字符串转整数）
    #[error("字段值无效: {field} - {message}")]
    ValueError {
        field: String,
        message: String,
    },

    /// 序列化/反序列化错误
    #[error("序列化失败: {message}")]
    SerializationError {
        message: String,
    },
}

impl DomainError {
    /// 返回错误对应的多语言消息键
    ///
    /// 与 `i18n::ErrorMessageI18n` 注册的翻译键一一对应
    pub fn i18n_key(&self) -> &'static str {
        match self {
            DomainError::ConfigError { .. } => "error.config",
            DomainError::BindingError { .. } => "error.binding",
            DomainError::AttributeError { .. } => "error.attribute",
            DomainError::RequirementError { .. } => "error.requirement",
            DomainError::TypeError { .. } => "error.type_mismatch",
            DomainError::ValueError { .. } => "error.value",
            DomainError::SerializationError { .. } => "error.serialization",
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError {
            message: err.to_string(),
        }
    }
}

/// 统一结果类型
pub type DomainResult<T> = Result<T, DomainError>;

/// 便捷宏：快速构造 DomainError
///
/// # 示例
///
/// ```ignore
/// return Err(crate::domain_error!(config, "唯一键必须引用已声明字段"));
/// return Err(crate::domain_error!(type_mismatch, "age", "期望整数类型"));
/// ```
#[macro_export]
macro_rules! domain_error {
    (config, $message:expr) => {
        $crate::error::DomainError::ConfigError {
            message: $message.to_string(),
        }
    };
    (binding, $field:expr, $message:expr) => {
        $crate::error::DomainError::BindingError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
    (attribute, $field:expr) => {
        $crate::error::DomainError::AttributeError {
            field: $field.to_string(),
        }
    };
    (requirement, $field:expr) => {
        $crate::error::DomainError::RequirementError {
            field: $field.to_string(),
        }
    };
    (type_mismatch, $field:expr, $message:expr) => {
        $crate::error::DomainError::TypeError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
    (value, $field:expr, $message:expr) => {
        $crate::error::DomainError::ValueError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
    (serialization, $message:expr) => {
        $crate::error::DomainError::SerializationError {
            message: $message.to_string(),
        }
    };
}
