//! 表达式字符串表示
//!
//! 生成的字符串同时作为表达式的摘要（digest），程序构建器据此去重，
//! 因此不同的表达式必须得到不同的字符串。

use crate::core::types::expression::Expression;
use std::fmt;

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::InputRef(index) => write!(f, "${}", index),
            Expression::LocalRef(index) => write!(f, "$t{}", index),
            Expression::Literal(value) => write!(f, "{}", value),
            Expression::Binary { left, op, right } => write!(f, "{}({}, {})", op, left, right),
            Expression::Unary { op, operand } => write!(f, "{}({})", op, operand),
        }
    }
}
