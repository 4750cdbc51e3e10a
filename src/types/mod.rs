//! 通用数据类型定义
//!
//! 定义贯穿整个领域模型引擎的统一数据值类型

pub mod data_value;

// 重新导出所有公共类型以保持API兼容性
pub use data_value::{DataValue, json_value_to_data_value};
