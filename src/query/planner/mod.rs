//! 规划器模块
//!
//! - `program`: 表达式程序及其构建器
//! - `plan`: 计划区与计划节点
//! - `rewrite`: 基于规则的计划重写

pub mod plan;
pub mod program;
pub mod rewrite;

pub use plan::{NodeId, PlanArena, PlanNodeEnum, PlanNodeKind};
pub use program::{Program, ProgramBuilder};
