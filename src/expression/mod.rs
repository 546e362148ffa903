//! 表达式求值模块
//!
//! 在给定的输入行（以及程序的局部表达式）上计算标量表达式的值，
//! 供程序求值和参考计划求值器使用。

pub mod evaluator;

pub use evaluator::{ExpressionContext, ExpressionEvaluator, RowContext};
