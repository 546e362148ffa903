//! 移除平凡计算节点的规则

use crate::query::planner::plan::{PlanNodeEnum, PlanNodeKind};
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::{EliminationRule, RewriteRule};

/// 移除平凡计算节点的规则
///
/// 没有条件、按顺序输出全部输入字段且不改字段名的 Calc 直接由其输入取代。
///
/// # 转换示例
///
/// Before:
/// ```text
///   Calc(expr#0=[$0], a=[$t0])
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Scan
/// ```
#[derive(Debug)]
pub struct CalcRemoveRule;

impl CalcRemoveRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalcRemoveRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for CalcRemoveRule {
    fn name(&self) -> &'static str {
        "CalcRemoveRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Calc)
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let node = call.node(0)?;
        if !self.can_eliminate(node) {
            return Ok(());
        }
        let calc = match node {
            PlanNodeEnum::Calc(calc) => calc,
            _ => return Ok(()),
        };

        let input = call.arena().resolve(calc.input());
        // 只做重命名的 Calc 不能移除
        if call.arena().row_type(input)? != calc.row_type() {
            log::trace!("{}: Calc {} 改变了字段名，保留", self.name(), call.root());
            return Ok(());
        }
        log::debug!("{}: 移除平凡 Calc {}", self.name(), call.root());
        call.transform_to_existing(input)
    }
}

impl EliminationRule for CalcRemoveRule {
    fn can_eliminate(&self, node: &PlanNodeEnum) -> bool {
        node.as_calc()
            .map(|calc| calc.program().is_trivial())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Expression;
    use crate::query::planner::plan::{CalcNode, PlanArena};
    use crate::query::planner::program::ProgramBuilder;
    use crate::query::planner::rewrite::calc::test_support::{row_type, scan};
    use crate::query::planner::rewrite::result::{FiringOutcome, Replacement};

    #[test]
    fn test_remove_trivial_calc() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);
        let mut builder = ProgramBuilder::new(row_type());
        builder.add_identity();
        let calc = CalcNode::new(&arena, scan, builder.get_program().expect("程序应该有效"))
            .expect("计算节点应该创建成功");
        let calc = arena.add(calc);

        let outcome = CalcRemoveRule::new().fire(&arena, calc).expect("规则触发失败");
        assert_eq!(
            outcome,
            FiringOutcome::Replaced {
                root: calc,
                replacement: Replacement::Existing(scan),
            }
        );
    }

    #[test]
    fn test_keep_renaming_calc() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);
        let mut builder = ProgramBuilder::new(row_type());
        builder.add_project_expr(&Expression::input_ref(0), "x");
        builder.add_project_expr(&Expression::input_ref(1), "y");
        let program = builder.get_program().expect("程序应该有效");
        assert!(program.is_trivial());
        let calc = CalcNode::new(&arena, scan, program).expect("计算节点应该创建成功");
        let calc = arena.add(calc);

        let outcome = CalcRemoveRule::new().fire(&arena, calc).expect("规则触发失败");
        assert_eq!(outcome, FiringOutcome::Declined);
    }

    #[test]
    fn test_keep_calc_with_condition() {
        let mut arena = PlanArena::new();
        let scan = scan(&mut arena);
        let mut builder = ProgramBuilder::new(row_type());
        builder.add_identity();
        builder
            .add_condition(&Expression::is_null(Expression::input_ref(0)))
            .expect("条件应该有效");
        let calc = CalcNode::new(&arena, scan, builder.get_program().expect("程序应该有效"))
            .expect("计算节点应该创建成功");
        let calc = arena.add(calc);

        let rule = CalcRemoveRule::new();
        assert!(!rule.can_eliminate(arena.get(calc).expect("节点应该存在")));
        assert_eq!(rule.fire(&arena, calc), Ok(FiringOutcome::Declined));
    }
}
