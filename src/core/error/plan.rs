//! 计划构建错误类型

use thiserror::Error;

use super::program::ProgramError;

/// 计划错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("无效的计划节点: {0}")]
    InvalidNode(String),

    #[error("节点不存在: #{0}")]
    NodeNotFound(usize),

    #[error("循环检测: 节点 #{0}")]
    CycleDetected(usize),

    #[error("行类型不匹配: 期望 {expected}, 实际 {actual}")]
    RowTypeMismatch { expected: String, actual: String },

    #[error("程序错误: {0}")]
    Program(#[from] ProgramError),
}

impl PlanError {
    pub fn invalid_node(msg: impl Into<String>) -> Self {
        Self::InvalidNode(msg.into())
    }

    pub fn row_type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::RowTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// 计划结果类型
pub type PlanResult<T> = Result<T, PlanError>;
