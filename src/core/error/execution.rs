//! 参考求值器错误类型

use thiserror::Error;

use super::plan::PlanError;
use super::program::ProgramError;

/// 计划求值错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error("表不存在: {0}")]
    TableNotFound(String),

    #[error("计划错误: {0}")]
    Plan(#[from] PlanError),

    #[error("程序错误: {0}")]
    Program(#[from] ProgramError),
}

/// 求值结果类型
pub type ExecutionResult<T> = Result<T, ExecutionError>;
