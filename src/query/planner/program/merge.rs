//! 程序组合与规范化

use std::collections::HashSet;

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::{BinaryOperator, Expression};
use crate::query::planner::program::{Program, ProgramBuilder};

impl Program {
    /// 组合两个程序
    ///
    /// 结果消费 `bottom` 的输入，产生 `top` 的输出，相当于先执行 `bottom`
    /// 再对其输出执行 `top`。组合条件为 `IS TRUE(bottom) AND top`：
    /// `bottom` 条件为 FALSE 或 NULL 时 AND 短路，`top` 的条件只对通过
    /// `bottom` 条件的行求值。
    ///
    /// `top` 的输入形状必须与 `bottom` 的输出形状一致。
    pub fn merge(top: &Program, bottom: &Program) -> ProgramResult<Program> {
        if !top.input_row_type().same_shape(bottom.output_row_type()) {
            return Err(ProgramError::invalid_program(format!(
                "无法组合程序: 上层输入 {} 与下层输出 {} 不一致",
                top.input_row_type(),
                bottom.output_row_type()
            )));
        }

        let mut builder = ProgramBuilder::new(bottom.input_row_type().clone());

        let bottom_map = copy_exprs(&mut builder, bottom.exprs(), |e| e.clone())?;

        // 上层的输入字段 i 对应下层的第 i 个投影
        let bottom_projects: Vec<usize> = bottom
            .projects()
            .iter()
            .map(|&p| lookup(&bottom_map, p))
            .collect::<ProgramResult<_>>()?;
        let top_map = copy_exprs(&mut builder, top.exprs(), |e| match e {
            Expression::InputRef(i) => match bottom_projects.get(*i) {
                Some(&index) => Expression::local_ref(index),
                None => e.clone(),
            },
            other => other.clone(),
        })?;

        let bottom_condition = bottom
            .condition()
            .map(|c| lookup(&bottom_map, c))
            .transpose()?;
        let top_condition = top.condition().map(|c| lookup(&top_map, c)).transpose()?;
        let condition = match (bottom_condition, top_condition) {
            (Some(b), Some(t)) if b != t => {
                let guard = builder.register(Expression::is_true(Expression::local_ref(b)));
                Some(builder.register(Expression::binary(
                    Expression::local_ref(guard),
                    BinaryOperator::And,
                    Expression::local_ref(t),
                )))
            }
            (Some(c), _) | (None, Some(c)) => Some(c),
            (None, None) => None,
        };

        for (&index, name) in top.projects().iter().zip(top.project_names()) {
            builder.add_project(lookup(&top_map, index)?, name.clone());
        }
        if let Some(condition) = condition {
            builder.set_condition(condition);
        }

        builder.get_program()?.normalize()
    }

    /// 规范化
    ///
    /// 删除投影和条件都用不到的条目，并对剩余条目重新去重。
    pub fn normalize(&self) -> ProgramResult<Program> {
        let mut reachable = HashSet::new();
        let mut pending: Vec<usize> = self.projects().to_vec();
        pending.extend(self.condition());
        while let Some(index) = pending.pop() {
            if reachable.insert(index) {
                if let Some(expr) = self.exprs().get(index) {
                    pending.extend(expr.local_refs());
                }
            }
        }

        let mut builder = ProgramBuilder::new(self.input_row_type().clone());
        let mut map = Vec::with_capacity(self.exprs().len());
        for (position, expr) in self.exprs().iter().enumerate() {
            if reachable.contains(&position) {
                let mapped = remap(expr, &map)?;
                map.push(Some(builder.register(mapped)));
            } else {
                map.push(None);
            }
        }

        for (&index, name) in self.projects().iter().zip(self.project_names()) {
            builder.add_project(lookup(&map, index)?, name.clone());
        }
        if let Some(condition) = self.condition() {
            builder.set_condition(lookup(&map, condition)?);
        }
        builder.get_program()
    }
}

/// 按顺序把条目复制进构建器，返回旧下标到新下标的映射
///
/// `leaf` 用于改写叶子条目（输入字段引用和字面量）。
fn copy_exprs<F>(
    builder: &mut ProgramBuilder,
    exprs: &[Expression],
    leaf: F,
) -> ProgramResult<Vec<Option<usize>>>
where
    F: Fn(&Expression) -> Expression,
{
    let mut map = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let index = match expr {
            Expression::InputRef(_) | Expression::Literal(_) => match leaf(expr) {
                Expression::LocalRef(index) => index,
                other => builder.register(other),
            },
            _ => builder.register(remap(expr, &map)?),
        };
        map.push(Some(index));
    }
    Ok(map)
}

/// 按映射改写条目的局部引用
fn remap(expr: &Expression, map: &[Option<usize>]) -> ProgramResult<Expression> {
    let mut failure = None;
    let mapped = expr.map_refs(&mut |r| match r {
        Expression::LocalRef(j) => match lookup(map, *j) {
            Ok(index) => Expression::local_ref(index),
            Err(e) => {
                failure.get_or_insert(e);
                r.clone()
            }
        },
        other => other.clone(),
    });
    match failure {
        Some(e) => Err(e),
        None => Ok(mapped),
    }
}

fn lookup(map: &[Option<usize>], index: usize) -> ProgramResult<usize> {
    map.get(index).copied().flatten().ok_or_else(|| {
        ProgramError::invalid_program(format!("表达式 $t{} 不可达", index))
    })
}
