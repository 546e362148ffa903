//! 参考计划求值器
//!
//! 在内存表上逐节点解释计划，用于验证重写前后的计划语义一致。
//! 只追求结果正确：连接使用嵌套循环，不做任何物理优化。

use std::collections::HashMap;

use crate::core::error::{ExecutionError, ExecutionResult, PlanError};
use crate::core::{Row, Value};
use crate::expression::{ExpressionEvaluator, RowContext};
use crate::query::planner::plan::{JoinNode, JoinType, NodeId, PlanArena, PlanNodeEnum};

/// 参考计划求值器
#[derive(Debug, Clone, Default)]
pub struct PlanEvaluator {
    tables: HashMap<String, Vec<Row>>,
}

impl PlanEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加一张表
    pub fn with_table(mut self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        self.insert_table(name, rows);
        self
    }

    pub fn insert_table(&mut self, name: impl Into<String>, rows: Vec<Row>) {
        self.tables.insert(name.into(), rows);
    }

    /// 求值以 `root` 为根的计划，返回全部输出行
    pub fn evaluate(&self, arena: &PlanArena, root: NodeId) -> ExecutionResult<Vec<Row>> {
        let node = arena.get(root)?;
        let inputs = arena.inputs(root)?;
        let input = |position: usize| -> ExecutionResult<Vec<Row>> {
            let id = inputs.get(position).copied().ok_or_else(|| {
                PlanError::invalid_node(format!("{} 缺少第 {} 个输入", node.name(), position))
            })?;
            self.evaluate(arena, id)
        };

        match node {
            PlanNodeEnum::Scan(scan) => {
                let rows = self
                    .tables
                    .get(scan.table())
                    .ok_or_else(|| ExecutionError::TableNotFound(scan.table().to_string()))?;
                if let Some(row) = rows.iter().find(|row| row.len() != scan.row_type().len()) {
                    return Err(PlanError::row_type_mismatch(
                        scan.row_type(),
                        format!("{} 个字段的行", row.len()),
                    )
                    .into());
                }
                Ok(rows.clone())
            }
            PlanNodeEnum::Values(values) => Ok(values.rows().to_vec()),
            PlanNodeEnum::Filter(filter) => {
                let mut output = Vec::new();
                for row in input(0)? {
                    let passed = ExpressionEvaluator::evaluate(
                        filter.condition(),
                        &mut RowContext::new(&row),
                    )?;
                    if passed.is_true() {
                        output.push(row);
                    }
                }
                Ok(output)
            }
            PlanNodeEnum::Project(project) => input(0)?
                .iter()
                .map(|row| {
                    ExpressionEvaluator::evaluate_batch(project.exprs(), &mut RowContext::new(row))
                        .map_err(ExecutionError::from)
                })
                .collect(),
            PlanNodeEnum::Calc(calc) => {
                let mut output = Vec::new();
                for row in input(0)? {
                    if let Some(out) = calc.program().evaluate(&row)? {
                        output.push(out);
                    }
                }
                Ok(output)
            }
            PlanNodeEnum::Join(join) => self.evaluate_join(arena, join, input(0)?, input(1)?),
        }
    }

    fn evaluate_join(
        &self,
        arena: &PlanArena,
        join: &JoinNode,
        left: Vec<Row>,
        right: Vec<Row>,
    ) -> ExecutionResult<Vec<Row>> {
        let right_width = arena.row_type(join.right())?.len();
        let mut output = Vec::new();
        for l in &left {
            let mut matched = false;
            for r in &right {
                let mut combined = l.clone();
                combined.extend(r.iter().cloned());
                let passed = match join.condition() {
                    Some(condition) => ExpressionEvaluator::evaluate(
                        condition,
                        &mut RowContext::new(&combined),
                    )?
                    .is_true(),
                    None => true,
                };
                if passed {
                    matched = true;
                    output.push(combined);
                }
            }
            if !matched && join.join_type() == JoinType::Left {
                let mut padded = l.clone();
                padded.extend(std::iter::repeat(Value::Null).take(right_width));
                output.push(padded);
            }
        }
        Ok(output)
    }
}
