//! 过滤节点实现
//!
//! FilterNode 按布尔条件过滤输入行，只有条件为 TRUE 的行被保留

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{Expression, RowType};
use crate::query::planner::plan::{NodeId, PlanArena};

#[derive(Debug, Clone, PartialEq)]
pub struct FilterNode {
    input: NodeId,
    condition: Expression,
    row_type: RowType,
}

impl FilterNode {
    /// 创建新的过滤节点
    ///
    /// 条件引用输入的字段，必须是布尔类型或 NULL；输出行类型与输入相同
    pub fn new(arena: &PlanArena, input: NodeId, condition: Expression) -> PlanResult<Self> {
        let row_type = arena.row_type(input)?.clone();
        let data_type = condition.deduce_type(&row_type, &[])?;
        if !data_type.is_condition() {
            return Err(PlanError::invalid_node(format!(
                "过滤条件必须是布尔类型，实际为 {}: {}",
                data_type, condition
            )));
        }
        Ok(Self {
            input,
            condition,
            row_type,
        })
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    /// 获取过滤条件
    pub fn condition(&self) -> &Expression {
        &self.condition
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }
}
