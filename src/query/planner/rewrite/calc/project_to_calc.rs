//! 将投影节点转换为计算节点的规则

use crate::query::planner::plan::{CalcNode, PlanNodeEnum, PlanNodeKind};
use crate::query::planner::rewrite::calc::non_compute_input;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::RewriteRule;

/// 将投影节点转换为计算节点的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Project(s=[+($0, $1)])
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Calc(expr#0=[$0], expr#1=[$1], expr#2=[+($t0, $t1)], s=[$t2])
///       |
///   Scan
/// ```
///
/// # 适用条件
///
/// - 当前节点为 Project 节点
/// - 子节点不是 Filter、Project 或 Calc 节点
#[derive(Debug)]
pub struct ProjectToCalcRule;

impl ProjectToCalcRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProjectToCalcRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for ProjectToCalcRule {
    fn name(&self) -> &'static str {
        "ProjectToCalcRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Project).with_dependency(non_compute_input())
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let project = match call.node(0)? {
            PlanNodeEnum::Project(n) => n,
            _ => return Ok(()),
        };
        let input = call.node_id(1)?;

        let mut builder = call.program_builder(1)?;
        for (expr, name) in project.exprs().iter().zip(project.names()) {
            builder.add_project_expr(expr, name.clone());
        }
        let program = builder.get_program()?;

        log::debug!(
            "{}: Project {} 转换为 Calc({})",
            self.name(),
            call.root(),
            program
        );
        let calc = CalcNode::new(call.arena(), input, program)?;
        call.transform_to(calc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Expression;
    use crate::core::Value;
    use crate::query::planner::plan::{PlanArena, ProjectNode};
    use crate::query::planner::rewrite::calc::test_support::scan;
    use crate::query::planner::rewrite::result::{FiringOutcome, Replacement};

    #[test]
    fn test_project_to_calc() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);
        let project = ProjectNode::new(
            &arena,
            scan,
            vec![
                Expression::add(Expression::input_ref(0), Expression::input_ref(1)),
                Expression::input_ref(0),
            ],
            vec!["s".to_string(), "a".to_string()],
        )
        .expect("投影节点应该创建成功");
        let project = arena.add(project);

        let outcome = ProjectToCalcRule::new().fire(&arena, project).expect("规则触发失败");
        match outcome.replacement() {
            Some(Replacement::New(PlanNodeEnum::Calc(calc))) => {
                let program = calc.program();
                assert_eq!(program.condition(), None);
                assert_eq!(program.output_row_type().field_names(), vec!["s", "a"]);
                assert_eq!(
                    program.to_string(),
                    "expr#0=[$0], expr#1=[$1], expr#2=[+($t0, $t1)], s=[$t2], a=[$t0]"
                );
                assert_eq!(
                    program.evaluate(&[Value::Int(2), Value::Int(3)]),
                    Ok(Some(vec![Value::Int(5), Value::Int(2)]))
                );
            }
            other => panic!("期望 Calc 替换，实际为 {:?}", other),
        }
    }

    #[test]
    fn test_does_not_fire_over_project() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);
        let inner = ProjectNode::with_fields(&arena, scan, &["b", "a"]).expect("投影节点应该创建成功");
        let inner = arena.add(inner);
        let outer = ProjectNode::with_fields(&arena, inner, &["a"]).expect("投影节点应该创建成功");
        let outer = arena.add(outer);

        let rule = ProjectToCalcRule::new();
        assert_eq!(rule.fire(&arena, outer), Ok(FiringOutcome::Declined));
        assert!(!rule.fire(&arena, inner).expect("规则触发失败").is_declined());
    }
}
