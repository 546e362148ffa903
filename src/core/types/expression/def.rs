//! 表达式类型定义

use crate::core::types::operators::{BinaryOperator, UnaryOperator};
use crate::core::Value;
use serde::{Deserialize, Serialize};

/// 标量表达式
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// 输入字段引用
    InputRef(usize),

    /// 程序内局部表达式引用
    LocalRef(usize),

    /// 字面量值
    Literal(Value),

    /// 二元运算
    Binary {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },

    /// 一元运算
    Unary {
        op: UnaryOperator,
        operand: Box<Expression>,
    },
}
