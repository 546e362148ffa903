// Query module for the rewrite core
//
// - planner: plan arena, calculator programs and rewrite rules
// - executor: reference evaluator used to check rewritten plans

pub mod executor;
pub mod planner;

pub use executor::PlanEvaluator;
pub use planner::{NodeId, PlanArena, Program, ProgramBuilder};
