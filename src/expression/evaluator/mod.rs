pub mod expression_evaluator;
pub mod operations;
pub mod traits;

pub use expression_evaluator::ExpressionEvaluator;
pub use traits::{ExpressionContext, RowContext};
