// 核心类型系统模块
//
// 包含重写核心使用的类型定义：数据类型、字段与行类型、表达式、操作符

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod expression;
pub mod operators;

/// 数据类型枚举
///
/// 关系表达式中字段和标量表达式的类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// NULL 字面量的类型，可与任意类型兼容
    Null,
    Bool,
    Int,
    Float,
    String,
}

impl DataType {
    /// 获取类型名称
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Null => "NULL",
            DataType::Bool => "BOOLEAN",
            DataType::Int => "INTEGER",
            DataType::Float => "DOUBLE",
            DataType::String => "VARCHAR",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Int | DataType::Float)
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, DataType::Bool)
    }

    /// 能否作为过滤条件：布尔类型或 NULL 字面量（恒为 UNKNOWN）
    pub fn is_condition(&self) -> bool {
        matches!(self, DataType::Bool | DataType::Null)
    }

    /// 检查两个类型能否出现在同一个比较或算术运算的两侧
    pub fn is_compatible(&self, other: &DataType) -> bool {
        self == other
            || *self == DataType::Null
            || *other == DataType::Null
            || (self.is_numeric() && other.is_numeric())
    }

    /// 两个数值类型运算后的结果类型
    pub fn numeric_result(&self, other: &DataType) -> DataType {
        match (self, other) {
            (DataType::Null, t) | (t, DataType::Null) => *t,
            (DataType::Int, DataType::Int) => DataType::Int,
            _ => DataType::Float,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 行类型中的单个字段
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelField {
    pub name: String,
    pub data_type: DataType,
}

impl RelField {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// 字段引用解析器
///
/// 将字段名或位置映射到字段类型，构建器据此校验条件表达式的类型。
pub trait FieldResolver {
    /// 按位置获取字段类型
    fn field_type(&self, index: usize) -> Option<DataType>;

    /// 按名称获取字段位置
    fn field_index(&self, name: &str) -> Option<usize>;

    /// 字段数量
    fn field_count(&self) -> usize;
}

/// 行类型
///
/// 描述关系表达式产生（或程序消费）的行的有序字段。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RowType {
    fields: Vec<RelField>,
}

impl RowType {
    pub fn new(fields: Vec<RelField>) -> Self {
        Self { fields }
    }

    /// 由 (名称, 类型) 列表创建行类型
    pub fn of(fields: &[(&str, DataType)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, data_type)| RelField::new(*name, *data_type))
                .collect(),
        }
    }

    pub fn fields(&self) -> &[RelField] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&RelField> {
        self.fields.get(index)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn field_types(&self) -> Vec<DataType> {
        self.fields.iter().map(|f| f.data_type).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 按名称生成字段引用表达式
    pub fn field_ref(&self, name: &str) -> Option<expression::Expression> {
        self.field_index(name).map(expression::Expression::input_ref)
    }

    /// 比较两个行类型的形状（字段数量、顺序和类型），忽略字段名
    pub fn same_shape(&self, other: &RowType) -> bool {
        self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .zip(other.fields.iter())
                .all(|(a, b)| a.data_type == b.data_type)
    }

    /// 连接两个行类型，用于连接节点的输出
    pub fn join(left: &RowType, right: &RowType) -> RowType {
        let mut fields = left.fields.clone();
        fields.extend(right.fields.iter().cloned());
        RowType { fields }
    }
}

impl FieldResolver for RowType {
    fn field_type(&self, index: usize) -> Option<DataType> {
        self.fields.get(index).map(|f| f.data_type)
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn field_count(&self) -> usize {
        self.fields.len()
    }
}

impl fmt::Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = self
            .fields
            .iter()
            .map(|field| format!("{} {}", field.data_type, field.name))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "RecordType({})", fields)
    }
}

pub use expression::Expression;
pub use operators::{BinaryOperator, UnaryOperator};
