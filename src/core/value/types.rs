use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::types::DataType;

/// 标量值
///
/// NULL 按 SQL 三值逻辑参与运算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// 一行数据，按行类型的字段顺序排列
pub type Row = Vec<Value>;

impl Value {
    /// 获取值对应的数据类型
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Null => DataType::Null,
            Value::Bool(_) => DataType::Bool,
            Value::Int(_) => DataType::Int,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 作为过滤条件时是否通过：只有 TRUE 通过，FALSE 和 NULL 都拒绝
    pub fn is_true(&self) -> bool {
        matches!(self, Value::Bool(true))
    }

    /// 检查值能否存入给定类型的字段
    pub fn conforms_to(&self, data_type: DataType) -> bool {
        match self {
            Value::Null => true,
            Value::Int(_) => data_type.is_numeric(),
            other => other.data_type() == data_type,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(v) => write!(f, "{:?}", v),
            Value::String(s) => write!(f, "'{}'", s),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
