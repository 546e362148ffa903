//! 连接节点实现

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{Expression, RowType};
use crate::query::planner::plan::{NodeId, PlanArena};

/// 连接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinType {
    Inner,
    Left,
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "inner"),
            JoinType::Left => write!(f, "left"),
        }
    }
}

/// 连接节点
///
/// 输出为左右输入字段的拼接。条件引用拼接后的字段，没有条件时为笛卡尔积。
/// 左连接中右侧字段可能为 NULL，输出类型中右侧字段保持原类型。
#[derive(Debug, Clone, PartialEq)]
pub struct JoinNode {
    left: NodeId,
    right: NodeId,
    join_type: JoinType,
    condition: Option<Expression>,
    row_type: RowType,
}

impl JoinNode {
    pub fn new(
        arena: &PlanArena,
        left: NodeId,
        right: NodeId,
        join_type: JoinType,
        condition: Option<Expression>,
    ) -> PlanResult<Self> {
        let row_type = RowType::join(arena.row_type(left)?, arena.row_type(right)?);
        if let Some(condition) = &condition {
            let data_type = condition.deduce_type(&row_type, &[])?;
            if !data_type.is_condition() {
                return Err(PlanError::invalid_node(format!(
                    "连接条件必须是布尔类型，实际为 {}",
                    data_type
                )));
            }
        }
        Ok(Self {
            left,
            right,
            join_type,
            condition,
            row_type,
        })
    }

    pub fn left(&self) -> NodeId {
        self.left
    }

    pub fn right(&self) -> NodeId {
        self.right
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }

    /// 左侧输入的字段数量
    pub fn left_width(&self, arena: &PlanArena) -> PlanResult<usize> {
        Ok(arena.row_type(self.left)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataType;
    use crate::query::planner::plan::nodes::ScanNode;

    #[test]
    fn test_join_row_type() {
        let mut arena = PlanArena::new();
        let left = arena.add(ScanNode::new("l", RowType::of(&[("id", DataType::Int)])));
        let right = arena.add(ScanNode::new(
            "r",
            RowType::of(&[("id", DataType::Int), ("name", DataType::String)]),
        ));
        let join = JoinNode::new(
            &arena,
            left,
            right,
            JoinType::Inner,
            Some(Expression::equals(Expression::input_ref(0), Expression::input_ref(1))),
        )
        .expect("连接节点应该创建成功");
        assert_eq!(join.row_type().len(), 3);
        assert_eq!(join.left_width(&arena), Ok(1));

        let bad = JoinNode::new(&arena, left, right, JoinType::Left, Some(Expression::input_ref(2)));
        assert!(bad.is_err());
    }
}
