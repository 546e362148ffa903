//! 计划执行模块
//!
//! 提供在内存表上解释执行计划的参考求值器

pub mod plan_evaluator;

pub use plan_evaluator::PlanEvaluator;
