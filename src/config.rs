//! # 配置管理模块
//!
//! 提供统一的配置管理系统，支持构建器模式和链式配置
//! 严格遵循项目规范：必要配置项必须显式设置，严禁使用隐式默认值

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::DomainResult;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 应用名称
    pub name: String,
    /// 环境类型
    pub environment: Environment,
    /// 是否启用调试模式
    pub debug: bool,
    /// 错误消息语言（缺省时从环境变量检测）
    pub language: Option<String>,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 环境类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 预发布环境
    Staging,
    /// 生产环境
    Production,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,
    /// 是否输出到控制台
    pub console: bool,
}

/// 日志级别
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    /// 错误级别
    Error,
    /// 警告级别
    Warn,
    /// 信息级别
    Info,
    /// 调试级别
    Debug,
    /// 跟踪级别
    Trace,
}

impl LogLevel {
    /// 转换为rat_logger的级别过滤器
    pub fn to_level_filter(&self) -> rat_logger::LevelFilter {
        match self {
            LogLevel::Error => rat_logger::LevelFilter::Error,
            LogLevel::Warn => rat_logger::LevelFilter::Warn,
            LogLevel::Info => rat_logger::LevelFilter::Info,
            LogLevel::Debug => rat_logger::LevelFilter::Debug,
            LogLevel::Trace => rat_logger::LevelFilter::Trace,
        }
    }
}

/// 应用配置构建器
///
/// 名称与环境必须显式设置
#[derive(Debug)]
pub struct AppConfigBuilder {
    name: Option<String>,
    environment: Option<Environment>,
    debug: Option<bool>,
    language: Option<String>,
    logging: Option<LoggingConfig>,
}

/// 日志配置构建器
#[derive(Debug)]
pub struct LoggingConfigBuilder {
    level: Option<LogLevel>,
    console: Option<bool>,
}

impl AppConfig {
    /// 创建应用配置构建器
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::new()
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> DomainResult<Self> {
        toml::from_str(content)
            .map_err(|e| crate::domain_error!(config, format!("TOML配置解析失败: {}", e)))
    }

    /// 从TOML文件加载配置
    pub fn from_toml_file(path: impl AsRef<Path>) -> DomainResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            crate::domain_error!(
                config,
                format!("读取配置文件 {} 失败: {}", path.as_ref().display(), e)
            )
        })?;
        Self::from_toml_str(&content)
    }
}

impl AppConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            name: None,
            environment: None,
            debug: None,
            language: None,
            logging: None,
        }
    }

    /// 设置应用名称
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// 设置环境类型
    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = Some(environment);
        self
    }

    /// 设置调试模式
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// 设置错误消息语言
    pub fn language(mut self, language: &str) -> Self {
        self.language = Some(language.to_string());
        self
    }

    /// 设置日志配置
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// 构建应用配置
    pub fn build(self) -> DomainResult<AppConfig> {
        let name = self
            .name
            .ok_or_else(|| crate::domain_error!(config, "应用名称必须设置"))?;
        let environment = self
            .environment
            .ok_or_else(|| crate::domain_error!(config, "环境类型必须设置"))?;
        let logging = self
            .logging
            .ok_or_else(|| crate::domain_error!(config, "日志配置必须设置"))?;

        Ok(AppConfig {
            name,
            environment,
            debug: self.debug.unwrap_or(false),
            language: self.language,
            logging,
        })
    }
}

impl Default for AppConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingConfig {
    /// 创建日志配置构建器
    pub fn builder() -> LoggingConfigBuilder {
        LoggingConfigBuilder::new()
    }
}

impl LoggingConfigBuilder {
    /// 创建新的构建器
    pub fn new() -> Self {
        Self {
            level: None,
            console: None,
        }
    }

    /// 设置日志级别
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    /// 设置控制台输出
    pub fn console(mut self, console: bool) -> Self {
        self.console = Some(console);
        self
    }

    /// 构建日志配置
    pub fn build(self) -> DomainResult<LoggingConfig> {
        let level = self
            .level
            .ok_or_else(|| crate::domain_error!(config, "日志级别必须设置"))?;

        Ok(LoggingConfig {
            level,
            console: self.console.unwrap_or(true),
        })
    }
}

impl Default for LoggingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_name() {
        let result = AppConfig::builder()
            .environment(Environment::Testing)
            .logging(LoggingConfig {
                level: LogLevel::Debug,
                console: true,
            })
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_chain() {
        let config = AppConfig::builder()
            .name("demo")
            .environment(Environment::Development)
            .debug(true)
            .language("en-US")
            .logging(
                LoggingConfig::builder()
                    .level(LogLevel::Debug)
                    .console(false)
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        assert_eq!(config.name, "demo");
        assert_eq!(config.environment, Environment::Development);
        assert!(config.debug);
        assert_eq!(config.language.as_deref(), Some("en-US"));
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(!config.logging.console);
    }

    #[test]
    fn test_from_toml_str() {
        let config = AppConfig::from_toml_str(
            r#"
            name = "demo"
            environment = "Testing"
            debug = false

            [logging]
            level = "Info"
            console = true
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Testing);
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.language.is_none());
    }
}
