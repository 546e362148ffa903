//! 投影节点实现

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::{Expression, RelField, RowType};
use crate::query::planner::plan::{NodeId, PlanArena};

/// 投影节点
///
/// 每个输出字段是一个引用输入字段的表达式
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectNode {
    input: NodeId,
    exprs: Vec<Expression>,
    names: Vec<String>,
    row_type: RowType,
}

impl ProjectNode {
    pub fn new(
        arena: &PlanArena,
        input: NodeId,
        exprs: Vec<Expression>,
        names: Vec<String>,
    ) -> PlanResult<Self> {
        if exprs.len() != names.len() {
            return Err(PlanError::invalid_node(format!(
                "投影表达式数量 {} 与名称数量 {} 不一致",
                exprs.len(),
                names.len()
            )));
        }
        let input_row_type = arena.row_type(input)?;
        let mut fields = Vec::with_capacity(exprs.len());
        for (expr, name) in exprs.iter().zip(names.iter()) {
            fields.push(RelField::new(name.clone(), expr.deduce_type(input_row_type, &[])?));
        }
        Ok(Self {
            input,
            exprs,
            names,
            row_type: RowType::new(fields),
        })
    }

    /// 按名称投影输入字段
    pub fn with_fields(arena: &PlanArena, input: NodeId, fields: &[&str]) -> PlanResult<Self> {
        let input_row_type = arena.row_type(input)?;
        let exprs = fields
            .iter()
            .map(|name| {
                input_row_type.field_ref(name).ok_or_else(|| {
                    PlanError::invalid_node(format!("字段 {} 不在 {} 中", name, input_row_type))
                })
            })
            .collect::<PlanResult<Vec<_>>>()?;
        let names = fields.iter().map(|name| name.to_string()).collect();
        Self::new(arena, input, exprs, names)
    }

    pub fn input(&self) -> NodeId {
        self.input
    }

    pub fn exprs(&self) -> &[Expression] {
        &self.exprs
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DataType;
    use crate::query::planner::plan::nodes::ScanNode;

    #[test]
    fn test_project_row_type() {
        let mut arena = PlanArena::new();
        let scan = arena.add(ScanNode::new(
            "t",
            RowType::of(&[("a", DataType::Int), ("b", DataType::Float)]),
        ));
        let project = ProjectNode::new(
            &arena,
            scan,
            vec![
                Expression::input_ref(1),
                Expression::add(Expression::input_ref(0), Expression::input_ref(1)),
            ],
            vec!["b".to_string(), "s".to_string()],
        )
        .expect("投影节点应该创建成功");
        assert_eq!(
            project.row_type(),
            &RowType::of(&[("b", DataType::Float), ("s", DataType::Float)])
        );
    }

    #[test]
    fn test_with_fields() {
        let mut arena = PlanArena::new();
        let scan = arena.add(ScanNode::new(
            "t",
            RowType::of(&[("a", DataType::Int), ("b", DataType::Float)]),
        ));
        let project = ProjectNode::with_fields(&arena, scan, &["b"]).expect("投影节点应该创建成功");
        assert_eq!(project.exprs(), &[Expression::input_ref(1)]);
        assert!(ProjectNode::with_fields(&arena, scan, &["z"]).is_err());
    }
}
