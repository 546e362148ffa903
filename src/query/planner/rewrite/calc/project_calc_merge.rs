//! 合并投影节点与下方计算节点的规则

use crate::query::planner::plan::{CalcNode, PlanNodeEnum, PlanNodeKind};
use crate::query::planner::program::Program;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::{MergeRule, RewriteRule};

/// 合并投影节点与下方计算节点的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Project(s=[+($0, $1)])
///       |
///   Calc(program)
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Calc(program 的输出再计算 s)
///       |
///   Scan
/// ```
///
/// # 适用条件
///
/// - 当前节点为 Project 节点
/// - 子节点为 Calc 节点
#[derive(Debug)]
pub struct ProjectCalcMergeRule;

impl ProjectCalcMergeRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProjectCalcMergeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for ProjectCalcMergeRule {
    fn name(&self) -> &'static str {
        "ProjectCalcMergeRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Project).with_dependency_kind(PlanNodeKind::Calc)
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let (parent, child) = (call.node(0)?, call.node(1)?);
        if !self.can_merge(parent, child) {
            return Ok(());
        }
        let (project, calc) = match (parent, child) {
            (PlanNodeEnum::Project(project), PlanNodeEnum::Calc(calc)) => (project, calc),
            _ => return Ok(()),
        };

        let mut builder = call.program_builder(1)?;
        for (expr, name) in project.exprs().iter().zip(project.names()) {
            builder.add_project_expr(expr, name.clone());
        }
        let top = builder.get_program()?;
        let merged = Program::merge(&top, calc.program())?;

        log::debug!(
            "{}: Project {} 合并入 Calc {}",
            self.name(),
            call.root(),
            call.node_id(1)?
        );
        let input = call.arena().resolve(calc.input());
        let merged = CalcNode::new(call.arena(), input, merged)?;
        call.transform_to(merged)
    }
}

impl MergeRule for ProjectCalcMergeRule {
    fn can_merge(&self, parent: &PlanNodeEnum, child: &PlanNodeEnum) -> bool {
        parent.is_project() && child.is_calc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Expression;
    use crate::core::Value;
    use crate::query::planner::plan::{PlanArena, ProjectNode};
    use crate::query::planner::program::ProgramBuilder;
    use crate::query::planner::rewrite::calc::test_support::{row_type, sample_rows, scan};
    use crate::query::planner::rewrite::result::Replacement;

    #[test]
    fn test_merge_project_into_calc() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);

        let mut builder = ProgramBuilder::new(row_type());
        builder.add_identity();
        builder
            .add_condition(&Expression::not_equals(
                Expression::input_ref(1),
                Expression::literal(Value::Int(0)),
            ))
            .expect("条件应该有效");
        let bottom = builder.get_program().expect("程序应该有效");
        let calc = CalcNode::new(&arena, scan, bottom.clone()).expect("计算节点应该创建成功");
        let calc = arena.add(calc);

        let quotient = Expression::binary(
            Expression::input_ref(0),
            crate::core::types::BinaryOperator::Divide,
            Expression::input_ref(1),
        );
        let project = ProjectNode::new(&arena, calc, vec![quotient], vec!["q".to_string()])
            .expect("投影节点应该创建成功");
        let project = arena.add(project);

        let outcome = ProjectCalcMergeRule::new().fire(&arena, project).expect("规则触发失败");
        let merged = match outcome.replacement() {
            Some(Replacement::New(PlanNodeEnum::Calc(merged))) => merged.clone(),
            other => panic!("期望 Calc 替换，实际为 {:?}", other),
        };
        assert_eq!(merged.row_type().field_names(), vec!["q"]);

        // (4, 0) 被下层条件拒绝，除法不会被求值
        let expected = [
            Some(vec![Value::Int(1)]),
            Some(vec![Value::Int(0)]),
            Some(vec![Value::Null]),
            None,
        ];
        for (row, expected) in sample_rows().into_iter().zip(expected) {
            assert_eq!(merged.program().evaluate(&row), Ok(expected));
        }
    }
}
