//! 计算节点实现
//!
//! CalcNode 携带一个表达式程序，同时完成过滤和投影

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::RowType;
use crate::query::planner::plan::{NodeId, PlanArena};
use crate::query::planner::program::Program;

#[derive(Debug, Clone, PartialEq)]
pub struct CalcNode {
    input: NodeId,
    program: Program,
}

impl CalcNode {
    /// 创建计算节点，程序的输入形状必须与输入节点的行类型一致
    pub fn new(arena: &PlanArena, input: NodeId, program: Program) -> PlanResult<Self> {
        let input_row_type = arena.row_type(input)?;
        if !program.input_row_type().same_shape(input_row_type) {
            return Err(PlanError::row_type_mismatch(
                input_row_type,
                program.input_row_type(),
            ));
        }
        Ok(Self { input, program })
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn row_type(&self) -> &RowType {
        self.program.output_row_type()
    }
}
