//! 合并相邻计算节点的规则

use crate::query::planner::plan::{CalcNode, PlanNodeEnum, PlanNodeKind};
use crate::query::planner::program::Program;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::{MergeRule, RewriteRule};

/// 合并相邻计算节点的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Calc(top)
///       |
///   Calc(bottom)
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Calc(top 与 bottom 组合)
///       |
///   Scan
/// ```
///
/// # 适用条件
///
/// - 当前节点和子节点都是 Calc 节点
#[derive(Debug)]
pub struct CalcMergeRule;

impl CalcMergeRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for CalcMergeRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for CalcMergeRule {
    fn name(&self) -> &'static str {
        "CalcMergeRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Calc).with_dependency_kind(PlanNodeKind::Calc)
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let (parent, child) = (call.node(0)?, call.node(1)?);
        if !self.can_merge(parent, child) {
            return Ok(());
        }
        let (top, bottom) = match (parent, child) {
            (PlanNodeEnum::Calc(top), PlanNodeEnum::Calc(bottom)) => (top, bottom),
            _ => return Ok(()),
        };

        let merged = Program::merge(top.program(), bottom.program())?;
        log::debug!(
            "{}: Calc {} 与 Calc {} 合并",
            self.name(),
            call.root(),
            call.node_id(1)?
        );
        let input = call.arena().resolve(bottom.input());
        let merged = CalcNode::new(call.arena(), input, merged)?;
        call.transform_to(merged)
    }
}

impl MergeRule for CalcMergeRule {
    fn can_merge(&self, parent: &PlanNodeEnum, child: &PlanNodeEnum) -> bool {
        parent.is_calc() && child.is_calc()
    }
}
