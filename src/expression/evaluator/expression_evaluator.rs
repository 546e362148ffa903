//! 表达式求值器实现
//!
//! AND/OR 按 SQL 三值逻辑短路求值：左侧已经决定结果时不再求值右侧，
//! 因此被条件保护的表达式（如 `b <> 0 AND a / b > 1`）不会产生求值错误。

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::expression::Expression;
use crate::core::types::operators::BinaryOperator;
use crate::core::Value;
use crate::expression::evaluator::operations::{BinaryOperationEvaluator, UnaryOperationEvaluator};
use crate::expression::evaluator::traits::ExpressionContext;

/// 表达式求值器实现（unit struct，零开销）
#[derive(Debug)]
pub struct ExpressionEvaluator;

impl ExpressionEvaluator {
    /// 在给定上下文中求值表达式
    pub fn evaluate<C: ExpressionContext + ?Sized>(
        expression: &Expression,
        context: &mut C,
    ) -> ProgramResult<Value> {
        match expression {
            Expression::InputRef(index) => context.input_value(*index),
            Expression::LocalRef(index) => context.local_value(*index),
            Expression::Literal(value) => Ok(value.clone()),
            Expression::Binary { left, op, right } => match op {
                BinaryOperator::And => Self::evaluate_and(left, right, context),
                BinaryOperator::Or => Self::evaluate_or(left, right, context),
                _ => {
                    let left = Self::evaluate(left, context)?;
                    let right = Self::evaluate(right, context)?;
                    BinaryOperationEvaluator::evaluate(&left, *op, &right)
                }
            },
            Expression::Unary { op, operand } => {
                let operand = Self::evaluate(operand, context)?;
                UnaryOperationEvaluator::evaluate(*op, &operand)
            }
        }
    }

    /// 批量求值表达式列表
    pub fn evaluate_batch<C: ExpressionContext + ?Sized>(
        expressions: &[Expression],
        context: &mut C,
    ) -> ProgramResult<Vec<Value>> {
        let mut results = Vec::with_capacity(expressions.len());
        for expression in expressions {
            results.push(Self::evaluate(expression, context)?);
        }
        Ok(results)
    }

    fn evaluate_and<C: ExpressionContext + ?Sized>(
        left: &Expression,
        right: &Expression,
        context: &mut C,
    ) -> ProgramResult<Value> {
        let left = Self::as_logical(Self::evaluate(left, context)?)?;
        if left == Some(false) {
            return Ok(Value::Bool(false));
        }
        let right = Self::as_logical(Self::evaluate(right, context)?)?;
        Ok(match (left, right) {
            (_, Some(false)) => Value::Bool(false),
            (Some(true), Some(true)) => Value::Bool(true),
            _ => Value::Null,
        })
    }

    fn evaluate_or<C: ExpressionContext + ?Sized>(
        left: &Expression,
        right: &Expression,
        context: &mut C,
    ) -> ProgramResult<Value> {
        let left = Self::as_logical(Self::evaluate(left, context)?)?;
        if left == Some(true) {
            return Ok(Value::Bool(true));
        }
        let right = Self::as_logical(Self::evaluate(right, context)?)?;
        Ok(match (left, right) {
            (_, Some(true)) => Value::Bool(true),
            (Some(false), Some(false)) => Value::Bool(false),
            _ => Value::Null,
        })
    }

    /// 逻辑运算的操作数：布尔值或 NULL
    fn as_logical(value: Value) -> ProgramResult<Option<bool>> {
        match value {
            Value::Null => Ok(None),
            Value::Bool(b) => Ok(Some(b)),
            other => Err(ProgramError::evaluation(format!(
                "逻辑运算的操作数必须是布尔值，实际为 {}",
                other
            ))),
        }
    }
}
