//! 计划重写模块
//!
//! 基于规则的重写核心：规则在计划树片段上匹配操作数模式，
//! 并以保持语义的局部变换改写匹配的片段。
//!
//! # 模块结构
//!
//! - `pattern`: 操作数模式与匹配
//! - `context`: 重写调用上下文 `RewriteCall`
//! - `result`: 重写错误、匹配结果与触发结果
//! - `rule`: 重写规则 trait 定义
//! - `rule_enum`: 规则枚举（静态分发）与规则注册表
//! - `plan_rewriter`: 自底向上的不动点驱动器
//! - `calc`: 计算节点相关规则
//!
//! # 使用示例
//!
//! ```ignore
//! let mut rewriter = PlanRewriter::from_config(&config.rewrite)?;
//! rewriter.add_rule(RewriteRule::custom(MyCustomRule))?;
//! let (root, stats) = rewriter.rewrite(&mut arena, root)?;
//! ```

pub mod calc;
pub mod context;
pub mod pattern;
pub mod plan_rewriter;
pub mod result;
pub mod rule;
pub mod rule_enum;

pub use context::RewriteCall;
pub use pattern::{MatchNode, Pattern};
pub use plan_rewriter::{rewrite_plan, PlanRewriter, RewriteStats};
pub use result::{FiringOutcome, MatchedResult, Replacement, RewriteError, RewriteResult};
pub use rule::{EliminationRule, MergeRule, RewriteRule as RewriteRuleTrait};
pub use rule_enum::{RegisteredRule, RewriteRule, RuleRegistry};
