//! 重写规则 trait 定义
//!
//! 规则由一个根模式和一个转换过程组成。规则从不修改计划，
//! 只通过 `RewriteCall` 提议替换或者放弃。每个规则的模式都排除了
//! 它自身产生的形状，重写后的片段再次匹配时不会重复触发。
//!
//! 触发过程：
//!
//! ```text
//! 提议中 ──on_match──> 放弃 (FiringOutcome::Declined)
//!        └───────────> 替换 (FiringOutcome::Replaced)
//! ```

use crate::query::planner::plan::{NodeId, PlanArena, PlanNodeEnum};
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{FiringOutcome, MatchedResult, RewriteResult};

/// 重写规则 trait
///
/// # 示例
/// ```ignore
/// #[derive(Debug)]
/// struct MyRule;
///
/// impl RewriteRule for MyRule {
///     fn name(&self) -> &'static str { "MyRule" }
///
///     fn pattern(&self) -> Pattern {
///         Pattern::kind(PlanNodeKind::Filter)
///     }
///
///     fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
///         // 不提议替换即为放弃
///         Ok(())
///     }
/// }
/// ```
pub trait RewriteRule: std::fmt::Debug + Send + Sync {
    /// 规则名称
    fn name(&self) -> &'static str;

    /// 返回规则的模式
    fn pattern(&self) -> Pattern;

    /// 模式匹配成功后调用
    ///
    /// 通过 `call.transform_to` 提议替换；不提议即为放弃。
    /// 返回错误时本次触发不提交任何修改。
    fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()>;

    /// 匹配模式，返回各模式位置对应的节点
    fn match_pattern(&self, arena: &PlanArena, node: NodeId) -> Option<MatchedResult> {
        self.pattern().bind(arena, node)
    }

    /// 检查规则是否匹配
    fn matches(&self, arena: &PlanArena, node: NodeId) -> bool {
        self.match_pattern(arena, node).is_some()
    }

    /// 对已匹配的节点调用规则
    fn fire_matched(
        &self,
        arena: &PlanArena,
        matched: MatchedResult,
    ) -> RewriteResult<FiringOutcome> {
        let mut call = RewriteCall::new(arena, self.name(), matched);
        self.on_match(&mut call)?;
        Ok(call.into_outcome())
    }

    /// 匹配并触发规则
    fn fire(&self, arena: &PlanArena, node: NodeId) -> RewriteResult<FiringOutcome> {
        match self.match_pattern(arena, node) {
            Some(matched) => self.fire_matched(arena, matched),
            None => Ok(FiringOutcome::Declined),
        }
    }
}

/// 合并规则 trait
///
/// 用于合并两个连续操作的规则
pub trait MergeRule: RewriteRule {
    /// 检查是否可以合并
    fn can_merge(&self, parent: &PlanNodeEnum, child: &PlanNodeEnum) -> bool;
}

/// 消除规则 trait
///
/// 用于消除冗余操作的规则
pub trait EliminationRule: RewriteRule {
    /// 检查是否可以消除
    fn can_eliminate(&self, node: &PlanNodeEnum) -> bool;
}
