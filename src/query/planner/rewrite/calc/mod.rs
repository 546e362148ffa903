//! 计算节点规则
//!
//! 把过滤和投影统一为携带表达式程序的计算节点（Calc），并合并相邻的计算节点。
//!
//! - `FilterToCalcRule`: Filter → Calc（恒等投影 + 条件）
//! - `ProjectToCalcRule`: Project → Calc（投影表达式，无条件）
//! - `FilterCalcMergeRule`: Filter over Calc → Calc
//! - `ProjectCalcMergeRule`: Project over Calc → Calc
//! - `CalcMergeRule`: Calc over Calc → Calc
//! - `CalcRemoveRule`: 平凡的 Calc → 其输入
//!
//! 两个转换规则不会在 Filter、Project、Calc 之上触发，这些情况由合并规则处理，
//! 因此同一片段只会被一个规则改写。

pub mod calc_merge;
pub mod calc_remove;
pub mod filter_calc_merge;
pub mod filter_to_calc;
pub mod project_calc_merge;
pub mod project_to_calc;

pub use calc_merge::CalcMergeRule;
pub use calc_remove::CalcRemoveRule;
pub use filter_calc_merge::FilterCalcMergeRule;
pub use filter_to_calc::FilterToCalcRule;
pub use project_calc_merge::ProjectCalcMergeRule;
pub use project_to_calc::ProjectToCalcRule;

use crate::query::planner::plan::PlanNodeKind;
use crate::query::planner::rewrite::pattern::Pattern;

/// 匹配 Filter、Project、Calc 以外的任意输入
pub(crate) fn non_compute_input() -> Pattern {
    Pattern::except(vec![
        PlanNodeKind::Filter,
        PlanNodeKind::Project,
        PlanNodeKind::Calc,
    ])
}
