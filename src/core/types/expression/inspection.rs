//! 表达式检查方法
//!
//! 提供检查表达式属性和遍历子表达式的方法。

use crate::core::types::expression::Expression;

impl Expression {
    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    pub fn is_input_ref(&self) -> bool {
        matches!(self, Expression::InputRef(_))
    }

    pub fn as_input_ref(&self) -> Option<usize> {
        match self {
            Expression::InputRef(index) => Some(*index),
            _ => None,
        }
    }

    pub fn as_local_ref(&self) -> Option<usize> {
        match self {
            Expression::LocalRef(index) => Some(*index),
            _ => None,
        }
    }

    /// 获取直接子表达式
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::InputRef(_) | Expression::LocalRef(_) | Expression::Literal(_) => {
                Vec::new()
            }
            Expression::Binary { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
        }
    }

    /// 收集表达式中引用的所有局部表达式下标
    pub fn local_refs(&self) -> Vec<usize> {
        let mut refs = Vec::new();
        self.collect_local_refs(&mut refs);
        refs
    }

    fn collect_local_refs(&self, refs: &mut Vec<usize>) {
        match self {
            Expression::LocalRef(index) => refs.push(*index),
            _ => {
                for child in self.children() {
                    child.collect_local_refs(refs);
                }
            }
        }
    }

    /// 引用的最大输入字段下标，不引用输入字段时返回 None
    pub fn max_input_ref(&self) -> Option<usize> {
        match self {
            Expression::InputRef(index) => Some(*index),
            _ => self
                .children()
                .into_iter()
                .filter_map(|child| child.max_input_ref())
                .max(),
        }
    }

    /// 将表达式中的引用替换为函数返回的表达式
    ///
    /// 自底向上替换，只有 `InputRef` 和 `LocalRef` 会传给 `f`。
    pub fn map_refs<F>(&self, f: &mut F) -> Expression
    where
        F: FnMut(&Expression) -> Expression,
    {
        match self {
            Expression::InputRef(_) | Expression::LocalRef(_) => f(self),
            Expression::Literal(_) => self.clone(),
            Expression::Binary { left, op, right } => {
                Expression::binary(left.map_refs(f), *op, right.map_refs(f))
            }
            Expression::Unary { op, operand } => Expression::unary(*op, operand.map_refs(f)),
        }
    }
}
