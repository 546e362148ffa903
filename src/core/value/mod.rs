//! Value 模块 - 标量值类型系统
//!
//! 此模块提供重写核心与参考求值器使用的值类型，包括：
//! - 核心类型定义 (`types.rs`)
//! - 比较逻辑 (`comparison.rs`)
//! - 算术运算 (`operations.rs`)

pub mod comparison;
pub mod operations;
pub mod types;

pub use types::*;
