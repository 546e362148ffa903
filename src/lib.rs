//! relrewrite - A rule-based rewrite core for relational plans
//!
//! This crate converts filters and projections into calculator nodes that
//! carry a flattened expression program, merges stacked calculators, and
//! drives registered rewrite rules to a fixpoint over an arena-backed plan.

pub mod config;
pub mod core;
pub mod expression;
pub mod query;
pub mod utils;
