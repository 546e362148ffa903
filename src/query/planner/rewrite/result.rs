//! 重写结果定义
//!
//! 定义重写规则的错误类型、匹配结果和触发结果。

use crate::core::error::{PlanError, ProgramError};
use crate::query::planner::plan::{NodeId, PlanNodeEnum};

/// 重写错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RewriteError {
    #[error("无效的计划节点: {0}")]
    InvalidNode(String),

    #[error("无效的规则: {0}")]
    InvalidRule(String),

    #[error("规则 {0} 在一次触发中重复提交替换")]
    AlreadyTransformed(String),

    #[error("替换节点的行类型不匹配: 期望 {expected}, 实际 {actual}")]
    RowTypeMismatch { expected: String, actual: String },

    #[error("计划错误: {0}")]
    Plan(#[from] PlanError),

    #[error("程序错误: {0}")]
    Program(#[from] ProgramError),
}

impl RewriteError {
    pub fn invalid_node(msg: impl Into<String>) -> Self {
        Self::InvalidNode(msg.into())
    }

    pub fn invalid_rule(msg: impl Into<String>) -> Self {
        Self::InvalidRule(msg.into())
    }

    pub fn row_type_mismatch(expected: impl ToString, actual: impl ToString) -> Self {
        Self::RowTypeMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

/// 重写结果类型
pub type RewriteResult<T> = std::result::Result<T, RewriteError>;

/// 匹配结果
///
/// 记录模式每个位置匹配到的节点，按模式先序排列，第一个为根节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedResult {
    nodes: Vec<NodeId>,
}

impl MatchedResult {
    pub(crate) fn new(nodes: Vec<NodeId>) -> Self {
        Self { nodes }
    }

    /// 根节点
    pub fn root(&self) -> NodeId {
        self.nodes[0]
    }

    /// 全部匹配节点
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// 第 `position` 个模式位置的节点
    pub fn node(&self, position: usize) -> Option<NodeId> {
        self.nodes.get(position).copied()
    }
}

/// 规则提议的替换
#[derive(Debug, Clone, PartialEq)]
pub enum Replacement {
    /// 新建节点，由调用方加入计划区
    New(PlanNodeEnum),
    /// 已在计划区中的节点
    Existing(NodeId),
}

/// 一次触发的结果
#[derive(Debug, Clone, PartialEq)]
pub enum FiringOutcome {
    /// 规则放弃，没有提议
    Declined,
    /// 规则提议用替换节点取代匹配的根节点
    Replaced {
        root: NodeId,
        replacement: Replacement,
    },
}

impl FiringOutcome {
    pub fn is_declined(&self) -> bool {
        matches!(self, FiringOutcome::Declined)
    }

    pub fn replacement(&self) -> Option<&Replacement> {
        match self {
            FiringOutcome::Declined => None,
            FiringOutcome::Replaced { replacement, .. } => Some(replacement),
        }
    }
}
