//! 统一错误处理系统
//!
//! ## 设计理念
//!
//! 1. **按层划分**：程序构建、计划构建、参考求值各自拥有错误枚举，
//!    规则层的 `RewriteError` 定义在 `rewrite::result` 中
//!
//! 2. **分层转换**：下层错误使用 `#[from]` 注解自动转换，保留完整错误信息
//!
//! 3. **统一接口**：每种错误提供 `XxxResult<T>` 别名，简化错误传播
//!
//! 模式不匹配和规则放弃触发都不是错误，分别用 `bool`/`Option`
//! 和 `FiringOutcome::Declined` 表示。

pub mod execution;
pub mod plan;
pub mod program;

pub use execution::{ExecutionError, ExecutionResult};
pub use plan::{PlanError, PlanResult};
pub use program::{ProgramError, ProgramResult};
