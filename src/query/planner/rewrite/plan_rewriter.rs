//! 计划重写器实现
//!
//! 启发式驱动器：自底向上（输入先于父节点）反复遍历可达节点，
//! 对每个节点按注册顺序尝试其种类的候选规则，提交第一个替换。
//! 一轮没有任何替换即到达不动点；超过最大轮数时停止并告警。

use std::collections::BTreeMap;

use crate::config::RewriteConfig;
use crate::query::planner::plan::{NodeId, PlanArena};
use crate::query::planner::rewrite::result::{FiringOutcome, Replacement, RewriteResult};
use crate::query::planner::rewrite::rule_enum::{RegisteredRule, RewriteRule, RuleRegistry};

/// 一次重写的统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RewriteStats {
    /// 遍历轮数，包括最后一轮没有替换的遍历
    pub passes: usize,
    /// 提交的替换总数
    pub firings: usize,
    /// 每个规则提交的替换数
    pub rule_firings: BTreeMap<&'static str, usize>,
    /// 出错后被跳过的触发数，只在关闭 fail_fast 时非零
    pub failures: usize,
    /// 是否到达不动点
    pub reached_fixpoint: bool,
}

impl RewriteStats {
    /// 某个规则提交的替换数
    pub fn fired(&self, rule: &str) -> usize {
        self.rule_firings.get(rule).copied().unwrap_or(0)
    }

    fn record(&mut self, rule: &'static str) {
        self.firings += 1;
        *self.rule_firings.entry(rule).or_insert(0) += 1;
    }
}

/// 计划重写器
#[derive(Debug)]
pub struct PlanRewriter {
    registry: RuleRegistry,
    max_iterations: usize,
    fail_fast: bool,
}

impl PlanRewriter {
    /// 使用给定的注册表和默认配置创建重写器
    pub fn new(registry: RuleRegistry) -> Self {
        let config = RewriteConfig::default();
        Self {
            registry,
            max_iterations: config.max_iterations,
            fail_fast: config.fail_fast,
        }
    }

    /// 按配置注册内置规则并创建重写器
    pub fn from_config(config: &RewriteConfig) -> RewriteResult<Self> {
        let registry = RuleRegistry::builtin(&config.disabled_rules)?;
        Ok(Self {
            registry,
            max_iterations: config.max_iterations.max(1),
            fail_fast: config.fail_fast,
        })
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// 注册额外的规则
    pub fn add_rule(&mut self, rule: RewriteRule) -> RewriteResult<()> {
        self.registry.register(rule)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// 重写以 `root` 为根的计划
    ///
    /// 返回重写后的根节点（已解析转发）和统计信息
    pub fn rewrite(
        &self,
        arena: &mut PlanArena,
        root: NodeId,
    ) -> RewriteResult<(NodeId, RewriteStats)> {
        let mut stats = RewriteStats::default();

        while stats.passes < self.max_iterations {
            stats.passes += 1;
            if !self.rewrite_pass(arena, root, &mut stats)? {
                stats.reached_fixpoint = true;
                break;
            }
        }

        if !stats.reached_fixpoint {
            log::warn!(
                "计划重写在 {} 轮后仍未到达不动点，停止重写",
                self.max_iterations
            );
        }
        log::info!(
            "计划重写完成: {} 轮, {} 次替换, {} 次失败",
            stats.passes,
            stats.firings,
            stats.failures
        );
        Ok((arena.resolve(root), stats))
    }

    /// 一轮遍历，返回是否提交了替换
    fn rewrite_pass(
        &self,
        arena: &mut PlanArena,
        root: NodeId,
        stats: &mut RewriteStats,
    ) -> RewriteResult<bool> {
        let mut changed = false;
        for node in arena.reachable(root)? {
            // 本轮之前的替换可能已经取代了该节点
            if arena.is_replaced(node) {
                continue;
            }
            let kind = arena.get(node)?.kind();
            for rule in self.registry.candidates(kind) {
                if self.try_fire(rule, arena, node, stats)? {
                    changed = true;
                    break;
                }
            }
        }
        Ok(changed)
    }

    /// 触发规则并提交替换
    ///
    /// 触发失败和提交失败同样处理：`fail_fast` 时返回错误，否则记录后跳过
    fn try_fire(
        &self,
        rule: &RegisteredRule,
        arena: &mut PlanArena,
        node: NodeId,
        stats: &mut RewriteStats,
    ) -> RewriteResult<bool> {
        let committed = rule
            .fire(arena, node)
            .and_then(|outcome| Self::commit(arena, outcome));
        match committed {
            Ok(Some((root, new))) => {
                log::debug!("规则 {} 将节点 {} 替换为 {}", rule.name(), root, new);
                stats.record(rule.name());
                Ok(true)
            }
            Ok(None) => {
                log::trace!("规则 {} 在节点 {} 上放弃", rule.name(), node);
                Ok(false)
            }
            Err(e) if self.fail_fast => Err(e),
            Err(e) => {
                log::error!("规则 {} 在节点 {} 上触发失败，已跳过: {}", rule.name(), node, e);
                stats.failures += 1;
                Ok(false)
            }
        }
    }

    /// 把提议写入计划，返回 (被替换的节点, 替换后的节点)
    fn commit(
        arena: &mut PlanArena,
        outcome: FiringOutcome,
    ) -> RewriteResult<Option<(NodeId, NodeId)>> {
        match outcome {
            FiringOutcome::Declined => Ok(None),
            FiringOutcome::Replaced { root, replacement } => {
                let new = match replacement {
                    Replacement::New(plan_node) => arena.replace_with(root, plan_node)?,
                    Replacement::Existing(id) => {
                        arena.replace(root, id)?;
                        arena.resolve(id)
                    }
                };
                Ok(Some((root, new)))
            }
        }
    }
}

impl Default for PlanRewriter {
    fn default() -> Self {
        Self::new(RuleRegistry::default())
    }
}

/// 使用默认重写器重写计划，返回新的根节点
pub fn rewrite_plan(arena: &mut PlanArena, root: NodeId) -> RewriteResult<NodeId> {
    let (root, _) = PlanRewriter::default().rewrite(arena, root)?;
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression, RowType};
    use crate::core::Value;
    use crate::query::planner::plan::{FilterNode, PlanNodeKind, ProjectNode, ScanNode};
    use crate::query::planner::rewrite::context::RewriteCall;
    use crate::query::planner::rewrite::pattern::Pattern;
    use crate::core::error::PlanError;
    use crate::query::planner::rewrite::result::RewriteError;
    use crate::query::planner::rewrite::rule::RewriteRule as RewriteRuleTrait;

    fn stacked_plan(arena: &mut PlanArena) -> (NodeId, NodeId) {
        let scan = arena.add(ScanNode::new(
            "t",
            RowType::of(&[("a", DataType::Int), ("b", DataType::Int)]),
        ));
        let filter = FilterNode::new(
            arena,
            scan,
            Expression::gt(Expression::input_ref(0), Expression::literal(Value::Int(0))),
        )
        .expect("过滤节点应该创建成功");
        let filter = arena.add(filter);
        let filter = FilterNode::new(
            arena,
            filter,
            Expression::lt(Expression::input_ref(1), Expression::literal(Value::Int(10))),
        )
        .expect("过滤节点应该创建成功");
        let filter = arena.add(filter);
        let project = ProjectNode::with_fields(arena, filter, &["b"]).expect("投影节点应该创建成功");
        (scan, arena.add(project))
    }

    #[test]
    fn test_rewrite_to_single_calc() {
        let mut arena = PlanArena::new();
        let (scan, root) = stacked_plan(&mut arena);

        let (new_root, stats) = PlanRewriter::default()
            .rewrite(&mut arena, root)
            .expect("重写失败");
        assert!(stats.reached_fixpoint);
        assert_eq!(stats.fired("FilterToCalcRule"), 1);
        assert_eq!(stats.fired("FilterCalcMergeRule"), 1);
        assert_eq!(stats.fired("ProjectCalcMergeRule"), 1);
        assert_eq!(stats.firings, 3);

        let calc = arena.get(new_root).expect("节点应该存在");
        assert!(calc.is_calc());
        assert_eq!(arena.inputs(new_root), Ok(vec![scan]));
        assert_eq!(calc.row_type().field_names(), vec!["b"]);
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let mut arena = PlanArena::new();
        let (_, root) = stacked_plan(&mut arena);
        let rewriter = PlanRewriter::default();
        let (root, _) = rewriter.rewrite(&mut arena, root).expect("重写失败");
        let (again, stats) = rewriter.rewrite(&mut arena, root).expect("重写失败");
        assert_eq!(again, root);
        assert_eq!(stats.firings, 0);
        assert_eq!(stats.passes, 1);
    }

    #[test]
    fn test_iteration_limit() {
        let mut arena = PlanArena::new();
        let (_, root) = stacked_plan(&mut arena);
        let (_, stats) = PlanRewriter::default()
            .with_max_iterations(1)
            .rewrite(&mut arena, root)
            .expect("重写失败");
        assert_eq!(stats.passes, 1);
        assert!(!stats.reached_fixpoint);
    }

    #[test]
    fn test_disabled_rule_from_config() {
        let config = RewriteConfig {
            disabled_rules: vec!["FilterToCalcRule".to_string()],
            ..RewriteConfig::default()
        };
        let mut arena = PlanArena::new();
        let (_, root) = stacked_plan(&mut arena);
        let (root, stats) = PlanRewriter::from_config(&config)
            .expect("创建重写器失败")
            .rewrite(&mut arena, root)
            .expect("重写失败");
        assert_eq!(stats.firings, 0);
        assert_eq!(arena.get(root).map(|n| n.kind()), Ok(PlanNodeKind::Project));
    }

    #[derive(Debug)]
    struct FailingRule;

    impl RewriteRuleTrait for FailingRule {
        fn name(&self) -> &'static str {
            "FailingRule"
        }

        fn pattern(&self) -> Pattern {
            Pattern::kind(PlanNodeKind::Scan)
        }

        fn on_match(&self, _call: &mut RewriteCall<'_>) -> RewriteResult<()> {
            Err(RewriteError::invalid_node("总是失败"))
        }
    }

    #[test]
    fn test_fail_fast() {
        let mut arena = PlanArena::new();
        let (_, root) = stacked_plan(&mut arena);
        let before = arena.len();
        let mut rewriter = PlanRewriter::default();
        rewriter
            .add_rule(RewriteRule::custom(FailingRule))
            .expect("注册失败");

        let result = rewriter.rewrite(&mut arena, root);
        assert_eq!(result, Err(RewriteError::invalid_node("总是失败")));
        // 扫描节点最先被访问，失败时还没有任何提交
        assert_eq!(arena.len(), before);
        assert!(!arena.is_replaced(root));
    }

    #[test]
    fn test_skip_failures_when_not_fail_fast() {
        let mut arena = PlanArena::new();
        let (_, root) = stacked_plan(&mut arena);
        let mut rewriter = PlanRewriter::default().with_fail_fast(false);
        rewriter
            .add_rule(RewriteRule::custom(FailingRule))
            .expect("注册失败");

        let (root, stats) = rewriter.rewrite(&mut arena, root).expect("重写失败");
        assert!(stats.failures > 0);
        assert!(stats.reached_fixpoint);
        assert!(arena.get(root).expect("节点应该存在").is_calc());
    }

    /// 把扫描节点替换为它上方的过滤节点，提交时必然成环
    #[derive(Debug)]
    struct CyclicRule {
        parent: NodeId,
    }

    impl RewriteRuleTrait for CyclicRule {
        fn name(&self) -> &'static str {
            "CyclicRule"
        }

        fn pattern(&self) -> Pattern {
            Pattern::kind(PlanNodeKind::Scan)
        }

        fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
            let parent = call.arena().resolve(self.parent);
            call.transform_to_existing(parent)
        }
    }

    fn filter_over_scan(arena: &mut PlanArena) -> (NodeId, NodeId) {
        let scan = arena.add(ScanNode::new(
            "t",
            RowType::of(&[("a", DataType::Int), ("b", DataType::Int)]),
        ));
        let filter = FilterNode::new(
            arena,
            scan,
            Expression::gt(Expression::input_ref(0), Expression::literal(Value::Int(0))),
        )
        .expect("过滤节点应该创建成功");
        (scan, arena.add(filter))
    }

    #[test]
    fn test_commit_failure_fails_fast() {
        let mut arena = PlanArena::new();
        let (scan, filter) = filter_over_scan(&mut arena);
        let mut rewriter = PlanRewriter::new(RuleRegistry::new());
        rewriter
            .add_rule(RewriteRule::custom(CyclicRule { parent: filter }))
            .expect("注册失败");

        let result = rewriter.rewrite(&mut arena, filter);
        assert_eq!(
            result,
            Err(RewriteError::Plan(PlanError::CycleDetected(scan.index())))
        );
        assert!(!arena.is_replaced(scan));
    }

    #[test]
    fn test_skip_commit_failures_when_not_fail_fast() {
        let mut arena = PlanArena::new();
        let (scan, filter) = filter_over_scan(&mut arena);
        let mut rewriter = PlanRewriter::new(RuleRegistry::new()).with_fail_fast(false);
        rewriter
            .add_rule(RewriteRule::custom(CyclicRule { parent: filter }))
            .expect("注册失败");

        let before = arena.len();
        let (root, stats) = rewriter.rewrite(&mut arena, filter).expect("重写失败");
        assert_eq!(root, filter);
        assert_eq!(stats.failures, 1);
        assert_eq!(stats.firings, 0);
        assert!(stats.reached_fixpoint);
        assert!(!arena.is_replaced(scan));
        assert_eq!(arena.len(), before);
    }

    #[test]
    fn test_skip_commit_failures_with_builtin_rules() {
        let mut arena = PlanArena::new();
        let (scan, filter) = filter_over_scan(&mut arena);
        let mut rewriter = PlanRewriter::default().with_fail_fast(false);
        rewriter
            .add_rule(RewriteRule::custom(CyclicRule { parent: filter }))
            .expect("注册失败");

        let (root, stats) = rewriter.rewrite(&mut arena, filter).expect("重写失败");
        assert!(stats.failures > 0);
        assert_eq!(stats.fired("FilterToCalcRule"), 1);
        assert!(arena.get(root).expect("节点应该存在").is_calc());
        assert_eq!(arena.inputs(root), Ok(vec![scan]));
    }
}
