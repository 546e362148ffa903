//! 重写规则枚举 - 静态分发实现
//!
//! 内置规则作为枚举变体，通过 match 进行分发，避免动态分发的开销。
//! 外部规则通过 `Custom` 变体接入，只有这一个变体使用 trait 对象。
//!
//! # 使用示例
//!
//! ```ignore
//! let registry = RuleRegistry::default();
//! for rule in registry.candidates(PlanNodeKind::Filter) {
//!     let outcome = rule.fire(&arena, node)?;
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::query::planner::plan::{NodeId, PlanArena, PlanNodeKind};
use crate::query::planner::rewrite::calc;
use crate::query::planner::rewrite::context::RewriteCall;
use crate::query::planner::rewrite::pattern::Pattern;
use crate::query::planner::rewrite::result::{FiringOutcome, RewriteError, RewriteResult};
use crate::query::planner::rewrite::rule::RewriteRule as RewriteRuleTrait;

macro_rules! define_rewrite_rules {
    (
        $(#[$enum_meta:meta])*
        pub enum $enum_name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant_name:ident($rule_type:ty)
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Debug)]
        pub enum $enum_name {
            $(
                $(#[$variant_meta])*
                $variant_name($rule_type),
            )+
            /// 外部定义的规则
            Custom(Arc<dyn RewriteRuleTrait>),
        }

        impl $enum_name {
            /// 全部内置规则，按注册顺序
            pub fn builtin() -> Vec<$enum_name> {
                vec![$($enum_name::$variant_name(<$rule_type>::new()),)+]
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $(
                        $enum_name::$variant_name(rule) => rule.name(),
                    )+
                    $enum_name::Custom(rule) => rule.name(),
                }
            }

            pub fn pattern(&self) -> Pattern {
                match self {
                    $(
                        $enum_name::$variant_name(rule) => rule.pattern(),
                    )+
                    $enum_name::Custom(rule) => rule.pattern(),
                }
            }

            pub fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
                match self {
                    $(
                        $enum_name::$variant_name(rule) => rule.on_match(call),
                    )+
                    $enum_name::Custom(rule) => rule.on_match(call),
                }
            }
        }

        impl RewriteRuleTrait for $enum_name {
            fn name(&self) -> &'static str {
                self.name()
            }

            fn pattern(&self) -> Pattern {
                self.pattern()
            }

            fn on_match(&self, call: &mut RewriteCall<'_>) -> RewriteResult<()> {
                self.on_match(call)
            }
        }
    };
}

define_rewrite_rules! {
    pub enum RewriteRule {
        // ==================== 转换规则 ====================
        FilterToCalc(calc::FilterToCalcRule),
        ProjectToCalc(calc::ProjectToCalcRule),

        // ==================== 合并规则 ====================
        FilterCalcMerge(calc::FilterCalcMergeRule),
        ProjectCalcMerge(calc::ProjectCalcMergeRule),
        CalcMerge(calc::CalcMergeRule),

        // ==================== 消除规则 ====================
        CalcRemove(calc::CalcRemoveRule),
    }
}

impl RewriteRule {
    /// 包装外部规则
    pub fn custom(rule: impl RewriteRuleTrait + 'static) -> Self {
        RewriteRule::Custom(Arc::new(rule))
    }
}

/// 已注册的规则，缓存其模式
#[derive(Debug)]
pub struct RegisteredRule {
    rule: RewriteRule,
    pattern: Pattern,
}

impl RegisteredRule {
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn rule(&self) -> &RewriteRule {
        &self.rule
    }

    /// 用缓存的模式匹配并触发规则
    pub fn fire(&self, arena: &PlanArena, node: NodeId) -> RewriteResult<FiringOutcome> {
        match self.pattern.bind(arena, node) {
            Some(matched) => self.rule.fire_matched(arena, matched),
            None => Ok(FiringOutcome::Declined),
        }
    }
}

/// 规则注册表
///
/// 按根节点种类索引规则，同一种类的候选规则保持注册顺序
#[derive(Debug)]
pub struct RuleRegistry {
    rules: Vec<RegisteredRule>,
    by_kind: HashMap<PlanNodeKind, Vec<usize>>,
}

impl RuleRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            by_kind: HashMap::new(),
        }
    }

    /// 注册全部内置规则，跳过 `disabled` 中列出的规则名
    pub fn builtin(disabled: &[String]) -> RewriteResult<Self> {
        let mut registry = Self::new();
        for rule in RewriteRule::builtin() {
            if disabled.iter().any(|name| name == rule.name()) {
                log::info!("规则 {} 已禁用", rule.name());
                continue;
            }
            registry.register(rule)?;
        }
        Ok(registry)
    }

    /// 注册规则
    ///
    /// 模式不合法或规则名重复时返回 `InvalidRule`
    pub fn register(&mut self, rule: RewriteRule) -> RewriteResult<()> {
        let name = rule.name();
        if self.get(name).is_some() {
            return Err(RewriteError::invalid_rule(format!("规则 {} 重复注册", name)));
        }
        let pattern = rule.pattern();
        pattern
            .validate()
            .map_err(|e| RewriteError::invalid_rule(format!("{}: {}", name, e)))?;

        let index = self.rules.len();
        for kind in pattern.root_kinds() {
            self.by_kind.entry(kind).or_default().push(index);
        }
        self.rules.push(RegisteredRule { rule, pattern });
        Ok(())
    }

    /// 根节点为 `kind` 时的候选规则
    pub fn candidates(&self, kind: PlanNodeKind) -> impl Iterator<Item = &RegisteredRule> {
        self.by_kind
            .get(&kind)
            .into_iter()
            .flatten()
            .filter_map(move |&index| self.rules.get(index))
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredRule> {
        self.rules.iter().find(|rule| rule.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredRule> {
        self.rules.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(RegisteredRule::name).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    /// 注册全部内置规则
    fn default() -> Self {
        Self::builtin(&[]).unwrap_or_else(|e| {
            log::error!("内置规则注册失败: {}", e);
            Self::new()
        })
    }
}
