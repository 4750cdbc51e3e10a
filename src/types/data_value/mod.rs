use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::model::{ModelCollection, ModelInstance};

/// 通用数据值类型 - 领域模型引擎的统一数据表示
///
/// 结构化变体（Null/Bool/Int/Float/String/Bytes/Date/DateTime/Array/Object）
/// 构成 `get_data` 导出的纯数据形态；`Model`/`Collection` 变体携带活动引用，
/// 字段读取返回共享句柄而非拷贝。
#[derive(Clone, PartialEq)]
pub enum DataValue {
    /// 空值（字段未设置）
    Null,
    /// 布尔值
    Bool(bool),
    /// 整数
    Int(i64),
    /// 浮点数
    Float(f64),
    /// 字符串
    String(String),
    /// 字节数组
    Bytes(Vec<u8>),
    /// 日期
    Date(NaiveDate),
    /// 日期时间
    DateTime(DateTime<FixedOffset>),
    /// 数组
    Array(Vec<DataValue>),
    /// 对象/结构化映射
    Object(HashMap<String, DataValue>),
    /// 模型实例引用
    Model(ModelInstance),
    /// 模型集合引用
    Collection(ModelCollection),
}

impl std::fmt::Display for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DataValue::Null => write!(f, "null"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Int(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::String(s) => write!(f, "{}", s),
            DataValue::Bytes(bytes) => write!(f, "[{} bytes]", bytes.len()),
            DataValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            DataValue::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            DataValue::Array(_) | DataValue::Object(_) => {
                write!(f, "{}", self.to_json_value())
            }
            DataValue::Model(model) => write!(f, "{}", model),
            DataValue::Collection(collection) => write!(f, "{}", collection),
        }
    }
}

impl std::fmt::Debug for DataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Debug trait 和 Display 保持一致，显示实际值而不是类型构造函数
        write!(f, "{}", self)
    }
}

impl Serialize for DataValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl DataValue {
    /// 获取数据类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            DataValue::Null => "null",
            DataValue::Bool(_) => "boolean",
            DataValue::Int(_) => "integer",
            DataValue::Float(_) => "float",
            DataValue::String(_) => "string",
            DataValue::Bytes(_) => "bytes",
            DataValue::Date(_) => "date",
            DataValue::DateTime(_) => "datetime",
            DataValue::Array(_) => "array",
            DataValue::Object(_) => "object",
            DataValue::Model(_) => "model",
            DataValue::Collection(_) => "collection",
        }
    }

    /// 判断是否为空值
    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// 按真值规则判定（空值/零值/空容器为假）
    pub fn is_truthy(&self) -> bool {
        match self {
            DataValue::Null => false,
            DataValue::Bool(b) => *b,
            DataValue::Int(i) => *i != 0,
            DataValue::Float(f) => *f != 0.0,
            DataValue::String(s) => !s.is_empty(),
            DataValue::Bytes(b) => !b.is_empty(),
            DataValue::Date(_) | DataValue::DateTime(_) => true,
            DataValue::Array(arr) => !arr.is_empty(),
            DataValue::Object(obj) => !obj.is_empty(),
            DataValue::Model(_) => true,
            DataValue::Collection(c) => !c.is_empty(),
        }
    }

    /// 转换为 JSON 值
    ///
    /// 模型引用展开为其结构化数据，字节数组转为base64字符串，
    /// 日期/日期时间转为ISO-8601字符串
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            DataValue::Null => serde_json::Value::Null,
            DataValue::Bool(b) => serde_json::Value::Bool(*b),
            DataValue::Int(i) => serde_json::Value::Number(serde_json::Number::from(*i)),
            DataValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            DataValue::String(s) => serde_json::Value::String(s.clone()),
            DataValue::Bytes(b) => serde_json::Value::String(BASE64_STANDARD.encode(b)),
            DataValue::Date(d) => serde_json::Value::String(d.format("%Y-%m-%d").to_string()),
            DataValue::DateTime(dt) => serde_json::Value::String(dt.to_rfc3339()),
            DataValue::Array(arr) => {
                serde_json::Value::Array(arr.iter().map(|item| item.to_json_value()).collect())
            }
            DataValue::Object(obj) => {
                let json_object: serde_json::Map<String, serde_json::Value> = obj
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json_value()))
                    .collect();
                serde_json::Value::Object(json_object)
            }
            DataValue::Model(model) => DataValue::Object(model.get_data()).to_json_value(),
            DataValue::Collection(collection) => {
                DataValue::Array(collection.to_data()).to_json_value()
            }
        }
    }

    /// 从 JSON 值解析（仅产生结构化变体）
    pub fn from_json_value(value: serde_json::Value) -> Self {
        json_value_to_data_value(value)
    }

    /// 转换为 JSON 字符串
    pub fn to_json_string(&self) -> crate::error::DomainResult<String> {
        serde_json::to_string(&self.to_json_value()).map_err(|e| {
            crate::domain_error!(serialization, format!("DataValue 转换为 JSON 失败: {}", e))
        })
    }

    /// 从 JSON 字符串解析
    pub fn from_json_string(json: &str) -> crate::error::DomainResult<Self> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            crate::domain_error!(serialization, format!("JSON 解析为 DataValue 失败: {}", e))
        })?;
        Ok(json_value_to_data_value(value))
    }

    /// 期望Object类型，如果不是则返回错误
    pub fn expect_object(self) -> crate::error::DomainResult<HashMap<String, DataValue>> {
        match self {
            DataValue::Object(map) => Ok(map),
            other => Err(crate::domain_error!(
                type_mismatch,
                "data_type",
                format!("期望Object类型，但收到: {}", other.type_name())
            )),
        }
    }

    /// 哈希辅助：与相等性一致的稳定哈希
    ///
    /// 浮点数按位哈希并归一化 ±0.0，Object 使用顺序无关组合
    pub(crate) fn hash_into<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            DataValue::Null => {}
            DataValue::Bool(b) => b.hash(state),
            DataValue::Int(i) => i.hash(state),
            DataValue::Float(f) => {
                let bits = if *f == 0.0 { 0u64 } else { f.to_bits() };
                bits.hash(state);
            }
            DataValue::String(s) => s.hash(state),
            DataValue::Bytes(b) => b.hash(state),
            DataValue::Date(d) => d.hash(state),
            DataValue::DateTime(dt) => dt.hash(state),
            DataValue::Array(arr) => {
                for item in arr {
                    item.hash_into(state);
                }
            }
            DataValue::Object(obj) => {
                let mut acc: u64 = 0;
                for (key, value) in obj {
                    let mut entry_hasher = std::collections::hash_map::DefaultHasher::new();
                    key.hash(&mut entry_hasher);
                    value.hash_into(&mut entry_hasher);
                    acc ^= entry_hasher.finish();
                }
                acc.hash(state);
            }
            DataValue::Model(model) => model.hash(state),
            DataValue::Collection(collection) => collection.hash_into(state),
        }
    }
}

/// 将 serde_json::Value 正确转换为对应的 DataValue 类型
pub fn json_value_to_data_value(value: serde_json::Value) -> DataValue {
    match value {
        serde_json::Value::Null => DataValue::Null,
        serde_json::Value::Bool(b) => DataValue::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                DataValue::Int(i)
            } else if let Some(f) = n.as_f64() {
                DataValue::Float(f)
            } else {
                DataValue::Null
            }
        }
        serde_json::Value::String(s) => DataValue::String(s),
        serde_json::Value::Array(arr) => {
            // 递归转换数组元素为DataValue
            let data_array: Vec<DataValue> =
                arr.into_iter().map(json_value_to_data_value).collect();
            DataValue::Array(data_array)
        }
        serde_json::Value::Object(obj) => {
            // 递归转换对象为HashMap<String, DataValue>
            let data_object: HashMap<String, DataValue> = obj
                .into_iter()
                .map(|(k, v)| (k, json_value_to_data_value(v)))
                .collect();
            DataValue::Object(data_object)
        }
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i32> for DataValue {
    fn from(value: i32) -> Self {
        DataValue::Int(value as i64)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<f32> for DataValue {
    fn from(value: f32) -> Self {
        DataValue::Float(value as f64)
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Float(value)
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::String(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for DataValue {
    fn from(value: Vec<u8>) -> Self {
        DataValue::Bytes(value)
    }
}

impl From<NaiveDate> for DataValue {
    fn from(value: NaiveDate) -> Self {
        DataValue::Date(value)
    }
}

impl From<DateTime<FixedOffset>> for DataValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        DataValue::DateTime(value)
    }
}

impl From<DateTime<Utc>> for DataValue {
    fn from(value: DateTime<Utc>) -> Self {
        DataValue::DateTime(value.fixed_offset())
    }
}

impl From<Vec<DataValue>> for DataValue {
    fn from(value: Vec<DataValue>) -> Self {
        DataValue::Array(value)
    }
}

impl From<HashMap<String, DataValue>> for DataValue {
    fn from(value: HashMap<String, DataValue>) -> Self {
        DataValue::Object(value)
    }
}

impl From<ModelInstance> for DataValue {
    fn from(value: ModelInstance) -> Self {
        DataValue::Model(value)
    }
}

impl From<ModelCollection> for DataValue {
    fn from(value: ModelCollection) -> Self {
        DataValue::Collection(value)
    }
}

impl<T> From<Option<T>> for DataValue
where
    T: Into<DataValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => DataValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!DataValue::Null.is_truthy());
        assert!(!DataValue::Bool(false).is_truthy());
        assert!(!DataValue::Int(0).is_truthy());
        assert!(!DataValue::Float(0.0).is_truthy());
        assert!(!DataValue::String(String::new()).is_truthy());
        assert!(DataValue::Bool(true).is_truthy());
        assert!(DataValue::Int(-1).is_truthy());
        assert!(DataValue::String("1".to_string()).is_truthy());
    }

    #[test]
    fn test_json_round_trip() {
        let mut obj = HashMap::new();
        obj.insert("id".to_string(), DataValue::Int(1));
        obj.insert("name".to_string(), DataValue::String("John".to_string()));
        obj.insert(
            "tags".to_string(),
            DataValue::Array(vec![DataValue::String("a".to_string()), DataValue::Int(2)]),
        );
        let value = DataValue::Object(obj);

        let json = value.to_json_string().unwrap();
        let parsed = DataValue::from_json_string(&json).unwrap();
        assert_eq!(value, parsed);
    }

    #[test]
    fn test_bytes_to_json_is_base64() {
        let value = DataValue::Bytes(vec![1, 2, 3]);
        let json = value.to_json_value();
        assert_eq!(json, serde_json::json!("AQID"));
    }

    #[test]
    fn test_date_display() {
        let d = NaiveDate::from_ymd_opt(1986, 4, 26).unwrap();
        assert_eq!(format!("{}", DataValue::Date(d)), "1986-04-26");
        assert_eq!(DataValue::Date(d).type_name(), "date");
    }

    #[test]
    fn test_float_zero_hash_consistency() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::Hasher;

        let mut pos = DefaultHasher::new();
        DataValue::Float(0.0).hash_into(&mut pos);
        let mut neg = DefaultHasher::new();
        DataValue::Float(-0.0).hash_into(&mut neg);
        assert_eq!(pos.finish(), neg.finish());
        assert_eq!(DataValue::Float(0.0), DataValue::Float(-0.0));
    }
}
