//! 合并过滤节点与下方计算节点的规则

use crate::query::planner::plan::{CalcNode, PlanNodeEnum, PlanNodeKind};
use crate::query::planner::program::Program;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::{MergeRule, RewriteRule};

/// 合并过滤节点与下方计算节点的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Filter(a > 0)
///       |
///   Calc(program)
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Calc(program 与 a > 0 组合)
///       |
///   Scan
/// ```
///
/// # 适用条件
///
/// - 当前节点为 Filter 节点
/// - 子节点为 Calc 节点
#[derive(Debug)]
pub struct FilterCalcMergeRule;

impl FilterCalcMergeRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilterCalcMergeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for FilterCalcMergeRule {
    fn name(&self) -> &'static str {
        "FilterCalcMergeRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Filter).with_dependency_kind(PlanNodeKind::Calc)
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let (parent, child) = (call.node(0)?, call.node(1)?);
        if !self.can_merge(parent, child) {
            return Ok(());
        }
        let (filter, calc) = match (parent, child) {
            (PlanNodeEnum::Filter(filter), PlanNodeEnum::Calc(calc)) => (filter, calc),
            _ => return Ok(()),
        };

        let mut builder = call.program_builder(1)?;
        builder.add_identity();
        builder.add_condition(filter.condition())?;
        let top = builder.get_program()?;
        let merged = Program::merge(&top, calc.program())?;

        log::debug!(
            "{}: Filter {} 合并入 Calc {}",
            self.name(),
            call.root(),
            call.node_id(1)?
        );
        let input = call.arena().resolve(calc.input());
        let merged = CalcNode::new(call.arena(), input, merged)?;
        call.transform_to(merged)
    }
}

impl MergeRule for FilterCalcMergeRule {
    fn can_merge(&self, parent: &PlanNodeEnum, child: &PlanNodeEnum) -> bool {
        parent.is_filter() && child.is_calc()
    }
}
