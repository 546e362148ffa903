//! 表达式类型推导
//!
//! 根据输入行类型和已定义的局部表达式类型推导表达式的返回类型，
//! 并检查操作数类型是否合法。

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::expression::Expression;
use crate::core::types::operators::{BinaryOperator, UnaryOperator};
use crate::core::types::{DataType, FieldResolver};

impl Expression {
    /// 推导表达式的数据类型
    ///
    /// # 参数
    /// - `inputs`: 输入字段解析器，解析 `InputRef`
    /// - `locals`: 已定义局部表达式的类型，解析 `LocalRef`
    ///
    /// # 返回
    /// - `Err(InvalidProgram)`: 引用越界或操作数类型不合法
    pub fn deduce_type<R>(&self, inputs: &R, locals: &[DataType]) -> ProgramResult<DataType>
    where
        R: FieldResolver + ?Sized,
    {
        match self {
            Expression::InputRef(index) => inputs.field_type(*index).ok_or_else(|| {
                ProgramError::invalid_program(format!(
                    "输入字段引用 ${} 越界，输入只有 {} 个字段",
                    index,
                    inputs.field_count()
                ))
            }),
            Expression::LocalRef(index) => locals.get(*index).copied().ok_or_else(|| {
                ProgramError::invalid_program(format!("引用了未定义的表达式 $t{}", index))
            }),
            Expression::Literal(value) => Ok(value.data_type()),
            Expression::Binary { left, op, right } => {
                let left_type = left.deduce_type(inputs, locals)?;
                let right_type = right.deduce_type(inputs, locals)?;
                Self::deduce_binary_type(*op, left_type, right_type)
            }
            Expression::Unary { op, operand } => {
                let operand_type = operand.deduce_type(inputs, locals)?;
                Self::deduce_unary_type(*op, operand_type)
            }
        }
    }

    fn deduce_binary_type(
        op: BinaryOperator,
        left: DataType,
        right: DataType,
    ) -> ProgramResult<DataType> {
        let mismatch = || {
            ProgramError::invalid_program(format!(
                "操作符 {} 不能作用于 {} 和 {}",
                op, left, right
            ))
        };

        if op.is_arithmetic() {
            let numeric = |t: DataType| t.is_numeric() || t == DataType::Null;
            if numeric(left) && numeric(right) {
                return Ok(left.numeric_result(&right));
            }
            return Err(mismatch());
        }

        if op.is_comparison() {
            if left.is_compatible(&right) {
                return Ok(DataType::Bool);
            }
            return Err(mismatch());
        }

        if op.is_logical() {
            let boolean = |t: DataType| t == DataType::Bool || t == DataType::Null;
            if boolean(left) && boolean(right) {
                return Ok(DataType::Bool);
            }
            return Err(mismatch());
        }

        // 字符串连接
        let string = |t: DataType| t == DataType::String || t == DataType::Null;
        if string(left) && string(right) {
            Ok(DataType::String)
        } else {
            Err(mismatch())
        }
    }

    fn deduce_unary_type(op: UnaryOperator, operand: DataType) -> ProgramResult<DataType> {
        match op {
            UnaryOperator::Minus if operand.is_numeric() || operand == DataType::Null => {
                Ok(operand)
            }
            UnaryOperator::Not | UnaryOperator::IsTrue
                if operand == DataType::Bool || operand == DataType::Null =>
            {
                Ok(DataType::Bool)
            }
            UnaryOperator::IsNull | UnaryOperator::IsNotNull => Ok(DataType::Bool),
            _ => Err(ProgramError::invalid_program(format!(
                "操作符 {} 不能作用于 {}",
                op, operand
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RowType;
    use crate::core::Value;

    fn row_type() -> RowType {
        RowType::of(&[
            ("a", DataType::Int),
            ("b", DataType::Float),
            ("c", DataType::String),
            ("d", DataType::Bool),
        ])
    }

    #[test]
    fn test_comparison_is_boolean() {
        let expr = Expression::gt(Expression::input_ref(0), Expression::input_ref(1));
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Bool));
    }

    #[test]
    fn test_arithmetic_widening() {
        let expr = Expression::add(Expression::input_ref(0), Expression::input_ref(1));
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Float));
        let expr = Expression::add(Expression::input_ref(0), Expression::literal(Value::Int(1)));
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Int));
    }

    #[test]
    fn test_type_mismatch() {
        let expr = Expression::add(Expression::input_ref(0), Expression::input_ref(2));
        let err = expr.deduce_type(&row_type(), &[]).unwrap_err();
        assert!(err.is_invalid_program());

        let expr = Expression::and(Expression::input_ref(3), Expression::input_ref(0));
        assert!(expr.deduce_type(&row_type(), &[]).is_err());
    }

    #[test]
    fn test_out_of_range_refs() {
        assert!(Expression::input_ref(9).deduce_type(&row_type(), &[]).is_err());
        assert!(Expression::local_ref(0).deduce_type(&row_type(), &[]).is_err());
        assert_eq!(
            Expression::local_ref(0).deduce_type(&row_type(), &[DataType::Bool]),
            Ok(DataType::Bool)
        );
    }

    #[test]
    fn test_null_is_compatible() {
        let expr = Expression::equals(Expression::input_ref(2), Expression::null());
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Bool));
        let expr = Expression::is_null(Expression::input_ref(2));
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Bool));
    }

    #[test]
    fn test_is_true_requires_boolean() {
        let expr = Expression::is_true(Expression::input_ref(3));
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Bool));
        let expr = Expression::is_true(Expression::null());
        assert_eq!(expr.deduce_type(&row_type(), &[]), Ok(DataType::Bool));
        assert!(Expression::is_true(Expression::input_ref(0))
            .deduce_type(&row_type(), &[])
            .is_err());
    }
}
