//! 将过滤节点转换为计算节点的规则

use crate::query::planner::plan::{CalcNode, PlanNodeEnum, PlanNodeKind};
use crate::query::planner::rewrite::calc::non_compute_input;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::RewriteResult;
use crate::query::planner::rewrite::rule::RewriteRule;

/// 将过滤节点转换为计算节点的规则
///
/// # 转换示例
///
/// Before:
/// ```text
///   Filter(a > b)
///       |
///   Scan
/// ```
///
/// After:
/// ```text
///   Calc(expr#0=[$0], expr#1=[$1], expr#2=[>($t0, $t1)], a=[$t0], b=[$t1], $condition=[$t2])
///       |
///   Scan
/// ```
///
/// # 适用条件
///
/// - 当前节点为 Filter 节点
/// - 子节点不是 Filter、Project 或 Calc 节点
#[derive(Debug)]
pub struct FilterToCalcRule;

impl FilterToCalcRule {
    /// 创建规则实例
    pub fn new() -> Self {
        Self
    }
}

impl Default for FilterToCalcRule {
    fn default() -> Self {
        Self::new()
    }
}

impl RewriteRule for FilterToCalcRule {
    fn name(&self) -> &'static str {
        "FilterToCalcRule"
    }

    fn pattern(&self) -> Pattern {
        Pattern::kind(PlanNodeKind::Filter).with_dependency(non_compute_input())
    }

    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
        let filter = match call.node(0)? {
            PlanNodeEnum::Filter(n) => n,
            _ => return Ok(()),
        };
        let input = call.node_id(1)?;

        // 输出输入的全部字段，只保留满足条件的行
        let mut builder = call.program_builder(1)?;
        builder.add_identity();
        builder.add_condition(filter.condition())?;
        let program = builder.get_program()?;

        log::debug!(
            "{}: Filter {} 转换为 Calc({})",
            self.name(),
            call.root(),
            program
        );
        let calc = CalcNode::new(call.arena(), input, program)?;
        call.transform_to(calc)
    }
}
