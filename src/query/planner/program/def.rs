//! 表达式程序定义

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::{DataType, Expression, RelField, RowType};
use crate::core::{Row, Value};
use crate::expression::{ExpressionContext, ExpressionEvaluator};

/// 表达式程序
///
/// 构建完成后不可变。所有不变量在构建时检查：
/// - 运算的操作数只能引用更早的条目，不存在前向引用和自引用
/// - 输入字段引用不越界
/// - 投影下标不越界
/// - 条件（如果存在）是布尔类型
/// - 运算的操作数类型兼容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    input_row_type: RowType,
    exprs: Vec<Expression>,
    projects: Vec<usize>,
    project_names: Vec<String>,
    condition: Option<usize>,
    #[serde(skip)]
    output_row_type: RowType,
}

impl Program {
    /// 由各部分创建程序并校验全部不变量
    pub(crate) fn from_parts(
        input_row_type: RowType,
        exprs: Vec<Expression>,
        projects: Vec<usize>,
        project_names: Vec<String>,
        condition: Option<usize>,
    ) -> ProgramResult<Self> {
        let types = Self::deduce_types(&input_row_type, &exprs)?;

        if projects.len() != project_names.len() {
            return Err(ProgramError::invalid_program(format!(
                "投影数量 {} 与名称数量 {} 不一致",
                projects.len(),
                project_names.len()
            )));
        }

        let mut fields = Vec::with_capacity(projects.len());
        for (&index, name) in projects.iter().zip(project_names.iter()) {
            let data_type = types.get(index).copied().ok_or_else(|| {
                ProgramError::invalid_program(format!(
                    "投影 {} 引用了不存在的表达式 $t{}",
                    name, index
                ))
            })?;
            fields.push(RelField::new(name.clone(), data_type));
        }

        if let Some(index) = condition {
            match types.get(index) {
                Some(data_type) if data_type.is_condition() => {}
                Some(other) => {
                    return Err(ProgramError::invalid_program(format!(
                        "条件必须是布尔类型，实际为 {}",
                        other
                    )))
                }
                None => {
                    return Err(ProgramError::invalid_program(format!(
                        "条件引用了不存在的表达式 $t{}",
                        index
                    )))
                }
            }
        }

        Ok(Self {
            input_row_type,
            exprs,
            projects,
            project_names,
            condition,
            output_row_type: RowType::new(fields),
        })
    }

    /// 逐条推导表达式类型，同时检查扁平化形式
    fn deduce_types(input_row_type: &RowType, exprs: &[Expression]) -> ProgramResult<Vec<DataType>> {
        let mut types = Vec::with_capacity(exprs.len());
        for (position, expr) in exprs.iter().enumerate() {
            match expr {
                Expression::LocalRef(index) => {
                    return Err(ProgramError::invalid_program(format!(
                        "expr#{} 不能直接是局部引用 $t{}",
                        position, index
                    )))
                }
                Expression::Binary { .. } | Expression::Unary { .. } => {
                    if expr.children().iter().any(|c| c.as_local_ref().is_none()) {
                        return Err(ProgramError::invalid_program(format!(
                            "expr#{} 的操作数必须是局部引用: {}",
                            position, expr
                        )));
                    }
                    if let Some(index) = expr.local_refs().into_iter().find(|&i| i >= position) {
                        return Err(ProgramError::invalid_program(format!(
                            "expr#{} 引用了 $t{}，只能引用之前的表达式",
                            position, index
                        )));
                    }
                }
                Expression::InputRef(_) | Expression::Literal(_) => {}
            }
            types.push(expr.deduce_type(input_row_type, &types)?);
        }
        Ok(types)
    }

    /// 从 JSON 恢复程序，恢复后重新校验
    pub fn from_json(json: &str) -> ProgramResult<Self> {
        let raw: Program = serde_json::from_str(json)
            .map_err(|e| ProgramError::invalid_program(format!("程序 JSON 解析失败: {}", e)))?;
        Self::from_parts(
            raw.input_row_type,
            raw.exprs,
            raw.projects,
            raw.project_names,
            raw.condition,
        )
    }

    /// 导出为 JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn input_row_type(&self) -> &RowType {
        &self.input_row_type
    }

    pub fn output_row_type(&self) -> &RowType {
        &self.output_row_type
    }

    pub fn exprs(&self) -> &[Expression] {
        &self.exprs
    }

    pub fn projects(&self) -> &[usize] {
        &self.projects
    }

    pub fn project_names(&self) -> &[String] {
        &self.project_names
    }

    pub fn condition(&self) -> Option<usize> {
        self.condition
    }

    /// 投影是否恰好按顺序输出全部输入字段
    pub fn projects_identity(&self) -> bool {
        self.projects.len() == self.input_row_type.len()
            && self
                .projects
                .iter()
                .enumerate()
                .all(|(i, &p)| self.exprs.get(p) == Some(&Expression::InputRef(i)))
    }

    /// 没有条件且投影为恒等投影
    pub fn is_trivial(&self) -> bool {
        self.condition.is_none() && self.projects_identity()
    }

    /// 将条目展开为只引用输入字段的表达式树
    pub fn expand_local_ref(&self, index: usize) -> ProgramResult<Expression> {
        let expr = self.exprs.get(index).ok_or_else(|| {
            ProgramError::invalid_program(format!("表达式 $t{} 不存在", index))
        })?;
        let mut failure = None;
        let expanded = expr.map_refs(&mut |r| match r {
            Expression::LocalRef(j) => match self.expand_local_ref(*j) {
                Ok(e) => e,
                Err(e) => {
                    failure.get_or_insert(e);
                    r.clone()
                }
            },
            other => other.clone(),
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(expanded),
        }
    }

    /// 展开后的条件表达式
    pub fn expanded_condition(&self) -> ProgramResult<Option<Expression>> {
        self.condition
            .map(|index| self.expand_local_ref(index))
            .transpose()
    }

    /// 展开后的投影表达式及其名称
    pub fn expanded_projects(&self) -> ProgramResult<Vec<(Expression, String)>> {
        self.projects
            .iter()
            .zip(self.project_names.iter())
            .map(|(&index, name)| Ok((self.expand_local_ref(index)?, name.clone())))
            .collect()
    }

    /// 对一行输入求值
    ///
    /// 先求值条件，条件不为 TRUE 时返回 `None`；否则返回投影结果。
    /// 每个条目按需求值并缓存，未被用到的条目不会求值。
    pub fn evaluate(&self, row: &[Value]) -> ProgramResult<Option<Row>> {
        if row.len() != self.input_row_type.len() {
            return Err(ProgramError::evaluation(format!(
                "输入行有 {} 个字段，程序期望 {} 个",
                row.len(),
                self.input_row_type.len()
            )));
        }

        let mut context = ProgramContext::new(self, row);
        if let Some(condition) = self.condition {
            if !context.local_value(condition)?.is_true() {
                return Ok(None);
            }
        }

        let mut output = Vec::with_capacity(self.projects.len());
        for &index in &self.projects {
            output.push(context.local_value(index)?);
        }
        Ok(Some(output))
    }

    /// 生成程序的文本表示
    pub fn explain(&self) -> String {
        let mut parts: Vec<String> = self
            .exprs
            .iter()
            .enumerate()
            .map(|(i, expr)| format!("expr#{}=[{}]", i, expr))
            .collect();
        for (&index, name) in self.projects.iter().zip(self.project_names.iter()) {
            parts.push(format!("{}=[$t{}]", name, index));
        }
        if let Some(condition) = self.condition {
            parts.push(format!("$condition=[$t{}]", condition));
        }
        parts.join(", ")
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.explain())
    }
}

/// 程序求值上下文，按需求值并缓存每个条目
struct ProgramContext<'a> {
    program: &'a Program,
    row: &'a [Value],
    cache: Vec<Option<Value>>,
}

impl<'a> ProgramContext<'a> {
    fn new(program: &'a Program, row: &'a [Value]) -> Self {
        Self {
            program,
            row,
            cache: vec![None; program.exprs.len()],
        }
    }
}

impl ExpressionContext for ProgramContext<'_> {
    fn input_value(&self, index: usize) -> ProgramResult<Value> {
        self.row.get(index).cloned().ok_or_else(|| {
            ProgramError::evaluation(format!("输入字段 ${} 越界", index))
        })
    }

    fn local_value(&mut self, index: usize) -> ProgramResult<Value> {
        if let Some(Some(value)) = self.cache.get(index) {
            return Ok(value.clone());
        }
        let program = self.program;
        let expr = program.exprs.get(index).ok_or_else(|| {
            ProgramError::evaluation(format!("表达式 $t{} 不存在", index))
        })?;
        let value = ExpressionEvaluator::evaluate(expr, self)?;
        self.cache[index] = Some(value.clone());
        Ok(value)
    }
}
