//! 表达式程序错误类型

use thiserror::Error;

/// 表达式程序错误
///
/// `InvalidProgram` 表示构建器的不变量被破坏，属于规则实现缺陷，
/// 不会被静默修正。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProgramError {
    #[error("无效的程序: {0}")]
    InvalidProgram(String),

    #[error("表达式求值错误: {0}")]
    Evaluation(String),
}

impl ProgramError {
    pub fn invalid_program(msg: impl Into<String>) -> Self {
        Self::InvalidProgram(msg.into())
    }

    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    pub fn is_invalid_program(&self) -> bool {
        matches!(self, Self::InvalidProgram(_))
    }
}

/// 程序结果类型
pub type ProgramResult<T> = Result<T, ProgramError>;
