pub mod error;
pub mod types;
pub mod value;

// 错误和结果类型
pub use error::{
    ExecutionError, ExecutionResult, PlanError, PlanResult, ProgramError, ProgramResult,
};

// 核心数据类型
pub use value::{Row, Value};

// 表达式系统类型
pub use types::expression::Expression;
pub use types::operators::{BinaryOperator, UnaryOperator};
pub use types::{DataType, FieldResolver, RelField, RowType};
