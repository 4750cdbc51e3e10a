//! 多语言错误消息模块
//!
//! 使用rat_embed_lang框架提供统一的错误消息多语言支持

use std::collections::HashMap;
use rat_embed_lang::register_translations;

/// 错误消息翻译注册器
pub struct ErrorMessageI18n;

impl ErrorMessageI18n {
    /// 注册所有错误消息翻译
    pub fn register_all_translations() {
        let mut translations = HashMap::new();

        // 模型声明配置错误
        let mut config_errors = HashMap::new();
        config_errors.insert("zh-CN".to_string(), "配置错误: {message}".to_string());
        config_errors.insert("en-US".to_string(), "Configuration error: {message}".to_string());
        config_errors.insert("ja-JP".to_string(), "設定エラー: {message}".to_string());
        translations.insert("error.config".to_string(), config_errors);

        // 字段绑定错误
        let mut binding_errors = HashMap::new();
        binding_errors.insert("zh-CN".to_string(), "字段绑定失败: {field} - {message}".to_string());
        binding_errors.insert("en-US".to_string(), "Field binding failed: {field} - {message}".to_string());
        binding_errors.insert("ja-JP".to_string(), "フィールドバインディング失敗: {field} - {message}".to_string());
        translations.insert("error.binding".to_string(), binding_errors);

        // 字段不存在
        let mut attribute_errors = HashMap::new();
        attribute_errors.insert("zh-CN".to_string(), "字段不存在: {field}".to_string());
        attribute_errors.insert("en-US".to_string(), "Field does not exist: {field}".to_string());
        attribute_errors.insert("ja-JP".to_string(), "フィールドが存在しません: {field}".to_string());
        translations.insert("error.attribute".to_string(), attribute_errors);

        // 必填字段缺失
        let mut requirement_errors = HashMap::new();
        requirement_errors.insert("zh-CN".to_string(), "必填字段不能为空: {field}".to_string());
        requirement_errors.insert("en-US".to_string(), "Required field cannot be empty: {field}".to_string());
        requirement_errors.insert("ja-JP".to_string(), "必須フィールドは空にできません: {field}".to_string());
        translations.insert("error.requirement".to_string(), requirement_errors);

        // 值形态错误
        let mut type_errors = HashMap::new();
        type_errors.insert("zh-CN".to_string(), "字段类型不匹配: {field} - {message}".to_string());
        type_errors.insert("en-US".to_string(), "Field type mismatch: {field} - {message}".to_string());
        type_errors.insert("ja-JP".to_string(), "フィールドタイプが一致しません: {field} - {message}".to_string());
        translations.insert("error.type_mismatch".to_string(), type_errors);

        // 值内容错误
        let mut value_errors = HashMap::new();
        value_errors.insert("zh-CN".to_string(), "字段值无效: {field} - {message}".to_string());
        value_errors.insert("en-US".to_string(), "Invalid field value: {field} - {message}".to_string());
        value_errors.insert("ja-JP".to_string(), "フィールド値が無効です: {field} - {message}".to_string());
        translations.insert("error.value".to_string(), value_errors);

        // 序列化相关错误
        let mut serialization_errors = HashMap::new();
        serialization_errors.insert("zh-CN".to_string(), "序列化失败: {message}".to_string());
        serialization_errors.insert("en-US".to_string(), "Serialization failed: {message}".to_string());
        serialization_errors.insert("ja-JP".to_string(), "シリアライズ失敗: {message}".to_string());
        translations.insert("error.serialization".to_string(), serialization_errors);

        // JSON桥接错误
        let mut json_parse_failed = HashMap::new();
        json_parse_failed.insert("zh-CN".to_string(), "解析JSON字符串失败: {message}".to_string());
        json_parse_failed.insert("en-US".to_string(), "Failed to parse JSON string: {message}".to_string());
        json_parse_failed.insert("ja-JP".to_string(), "JSON文字列の解析失敗: {message}".to_string());
        translations.insert("error.json_parse".to_string(), json_parse_failed);

        // 注册所有翻译
        register_translations(translations);
    }

    /// 初始化错误消息多语言支持
    pub fn init() {
        Self::register_all_translations();

        // 从环境变量获取语言设置，默认为zh-CN
        let lang = std::env::var("RAT_LANG")
            .or_else(|_| std::env::var("LANG"))
            .unwrap_or_else(|_| "zh-CN".to_string());

        // 标准化语言代码
        use rat_embed_lang::normalize_language_code;
        let normalized_lang = normalize_language_code(&lang);
        set_language(&normalized_lang);
    }
}

/// 重新导出rat_embed_lang的核心函数
pub use rat_embed_lang::{t, tf, set_language, current_language};
