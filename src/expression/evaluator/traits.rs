//! 表达式上下文特征定义

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::Value;

/// 表达式上下文特征
///
/// 为表达式求值提供输入字段和局部表达式的值
pub trait ExpressionContext {
    /// 获取输入字段的值
    fn input_value(&self, index: usize) -> ProgramResult<Value>;

    /// 获取局部表达式的值
    ///
    /// 使用可变引用，允许实现按需求值并缓存结果
    fn local_value(&mut self, index: usize) -> ProgramResult<Value>;
}

/// 单行上下文
///
/// 只提供输入行，不支持局部表达式引用
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    row: &'a [Value],
}

impl<'a> RowContext<'a> {
    pub fn new(row: &'a [Value]) -> Self {
        Self { row }
    }
}

impl ExpressionContext for RowContext<'_> {
    fn input_value(&self, index: usize) -> ProgramResult<Value> {
        self.row.get(index).cloned().ok_or_else(|| {
            ProgramError::evaluation(format!(
                "输入字段 ${} 越界，输入行只有 {} 个字段",
                index,
                self.row.len()
            ))
        })
    }

    fn local_value(&mut self, index: usize) -> ProgramResult<Value> {
        Err(ProgramError::evaluation(format!(
            "单行上下文不支持局部表达式引用 $t{}",
            index
        )))
    }
}
