/// 算术和比较运算模块
///
/// 负责表达式求值中的算术运算、比较运算和一元运算。
/// 逻辑运算需要短路求值，由 `ExpressionEvaluator` 直接处理。
use std::cmp::Ordering;

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::operators::{BinaryOperator, UnaryOperator};
use crate::core::Value;

/// 二元运算求值器
pub struct BinaryOperationEvaluator;

impl BinaryOperationEvaluator {
    /// 求值二元运算（逻辑运算除外）
    pub fn evaluate(left: &Value, op: BinaryOperator, right: &Value) -> ProgramResult<Value> {
        let result = match op {
            BinaryOperator::Add => left.add(right),
            BinaryOperator::Subtract => left.sub(right),
            BinaryOperator::Multiply => left.mul(right),
            BinaryOperator::Divide => left.div(right),
            BinaryOperator::Modulo => left.rem(right),
            BinaryOperator::StringConcat => left.concat(right),

            BinaryOperator::Equal => Ok(Self::compare(left, right, |o| o == Ordering::Equal)),
            BinaryOperator::NotEqual => Ok(Self::compare(left, right, |o| o != Ordering::Equal)),
            BinaryOperator::LessThan => Ok(Self::compare(left, right, |o| o == Ordering::Less)),
            BinaryOperator::LessThanOrEqual => {
                Ok(Self::compare(left, right, |o| o != Ordering::Greater))
            }
            BinaryOperator::GreaterThan => {
                Ok(Self::compare(left, right, |o| o == Ordering::Greater))
            }
            BinaryOperator::GreaterThanOrEqual => {
                Ok(Self::compare(left, right, |o| o != Ordering::Less))
            }

            BinaryOperator::And | BinaryOperator::Or => {
                return Err(ProgramError::evaluation(format!(
                    "逻辑运算 {} 需要短路求值",
                    op
                )))
            }
        };
        result.map_err(ProgramError::evaluation)
    }

    /// 比较运算，任一侧为 NULL 或不可比较时结果为 NULL
    fn compare(left: &Value, right: &Value, f: impl Fn(Ordering) -> bool) -> Value {
        match left.sql_cmp(right) {
            Some(ordering) => Value::Bool(f(ordering)),
            None => Value::Null,
        }
    }
}

/// 一元运算求值器
pub struct UnaryOperationEvaluator;

impl UnaryOperationEvaluator {
    pub fn evaluate(op: UnaryOperator, operand: &Value) -> ProgramResult<Value> {
        match op {
            UnaryOperator::Minus => operand.neg().map_err(ProgramError::evaluation),
            UnaryOperator::Not => match operand {
                Value::Null => Ok(Value::Null),
                Value::Bool(b) => Ok(Value::Bool(!b)),
                other => Err(ProgramError::evaluation(format!("NOT 不能作用于 {}", other))),
            },
            UnaryOperator::IsNull => Ok(Value::Bool(operand.is_null())),
            UnaryOperator::IsNotNull => Ok(Value::Bool(!operand.is_null())),
            UnaryOperator::IsTrue => match operand {
                Value::Null | Value::Bool(_) => Ok(Value::Bool(operand.is_true())),
                other => Err(ProgramError::evaluation(format!("IS TRUE 不能作用于 {}", other))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_with_null() {
        let result =
            BinaryOperationEvaluator::evaluate(&Value::Null, BinaryOperator::Equal, &Value::Int(1));
        assert_eq!(result, Ok(Value::Null));
    }

    #[test]
    fn test_comparison() {
        let result = BinaryOperationEvaluator::evaluate(
            &Value::Int(5),
            BinaryOperator::GreaterThan,
            &Value::Int(3),
        );
        assert_eq!(result, Ok(Value::Bool(true)));
    }

    #[test]
    fn test_logical_operator_rejected() {
        let result = BinaryOperationEvaluator::evaluate(
            &Value::Bool(true),
            BinaryOperator::And,
            &Value::Bool(true),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_unary() {
        assert_eq!(
            UnaryOperationEvaluator::evaluate(UnaryOperator::Not, &Value::Null),
            Ok(Value::Null)
        );
        assert_eq!(
            UnaryOperationEvaluator::evaluate(UnaryOperator::IsNull, &Value::Null),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn test_is_true_folds_null_to_false() {
        let is_true = |v: &Value| UnaryOperationEvaluator::evaluate(UnaryOperator::IsTrue, v);
        assert_eq!(is_true(&Value::Bool(true)), Ok(Value::Bool(true)));
        assert_eq!(is_true(&Value::Bool(false)), Ok(Value::Bool(false)));
        assert_eq!(is_true(&Value::Null), Ok(Value::Bool(false)));
        assert!(is_true(&Value::Int(1)).is_err());
    }
}
