//! 表达式程序构建器
//!
//! 构建器按输入行类型增量登记表达式。登记时把表达式树扁平化（操作数优先），
//! 并按摘要（表达式的文本形式）去重，结构相同的子表达式只保存一次。
//! 除 `add_condition` 的布尔类型检查外，所有不变量都推迟到 `get_program` 统一校验。

use std::collections::HashMap;

use crate::core::error::{ProgramError, ProgramResult};
use crate::core::types::{BinaryOperator, DataType, Expression, FieldResolver, RowType};
use crate::query::planner::program::Program;

/// 表达式程序构建器
#[derive(Debug, Clone)]
pub struct ProgramBuilder {
    input_row_type: RowType,
    exprs: Vec<Expression>,
    digests: HashMap<String, usize>,
    projects: Vec<usize>,
    project_names: Vec<String>,
    condition: Option<usize>,
}

impl ProgramBuilder {
    /// 创建以给定行类型为输入的空构建器
    pub fn new(input_row_type: RowType) -> Self {
        Self {
            input_row_type,
            exprs: Vec::new(),
            digests: HashMap::new(),
            projects: Vec::new(),
            project_names: Vec::new(),
            condition: None,
        }
    }

    /// 以已有程序为起点创建构建器
    pub fn for_program(program: &Program) -> Self {
        let mut builder = Self::new(program.input_row_type().clone());
        for expr in program.exprs() {
            let index = builder.exprs.len();
            builder.digests.entry(expr.to_string()).or_insert(index);
            builder.exprs.push(expr.clone());
        }
        builder.projects = program.projects().to_vec();
        builder.project_names = program.project_names().to_vec();
        builder.condition = program.condition();
        builder
    }

    pub fn input_row_type(&self) -> &RowType {
        &self.input_row_type
    }

    /// 已登记的表达式
    pub fn exprs(&self) -> &[Expression] {
        &self.exprs
    }

    pub fn condition(&self) -> Option<usize> {
        self.condition
    }

    /// 恒等投影：每个输入字段一个引用，按输入顺序输出，沿用输入字段名
    pub fn add_identity(&mut self) {
        self.clear_projects();
        let names: Vec<String> = self
            .input_row_type
            .field_names()
            .into_iter()
            .map(String::from)
            .collect();
        for (i, name) in names.into_iter().enumerate() {
            let index = self.register(Expression::input_ref(i));
            self.add_project(index, name);
        }
    }

    /// 登记表达式树，返回根表达式的下标
    ///
    /// 表达式中的 `InputRef` 引用输入字段，`LocalRef` 引用已登记的表达式。
    pub fn add_expr(&mut self, expr: &Expression) -> usize {
        match expr {
            Expression::LocalRef(index) => *index,
            Expression::InputRef(_) | Expression::Literal(_) => self.register(expr.clone()),
            Expression::Binary { left, op, right } => {
                let left = self.add_expr(left);
                let right = self.add_expr(right);
                self.register(Expression::binary(
                    Expression::local_ref(left),
                    *op,
                    Expression::local_ref(right),
                ))
            }
            Expression::Unary { op, operand } => {
                let operand = self.add_expr(operand);
                self.register(Expression::unary(*op, Expression::local_ref(operand)))
            }
        }
    }

    /// 登记已经扁平化的条目，操作数必须已是 `LocalRef`
    pub(crate) fn register(&mut self, expr: Expression) -> usize {
        let digest = expr.to_string();
        if let Some(&index) = self.digests.get(&digest) {
            return index;
        }
        let index = self.exprs.len();
        self.exprs.push(expr);
        self.digests.insert(digest, index);
        index
    }

    /// 添加过滤条件
    ///
    /// 条件必须是布尔类型或 NULL。已有条件时，新条件以 AND 连接在原条件之后。
    pub fn add_condition(&mut self, expr: &Expression) -> ProgramResult<()> {
        let locals = self.local_types()?;
        let data_type = expr.deduce_type(&self.input_row_type, &locals)?;
        if !data_type.is_condition() {
            return Err(ProgramError::invalid_program(format!(
                "条件必须是布尔类型，实际为 {}: {}",
                data_type, expr
            )));
        }

        let index = self.add_expr(expr);
        let index = match self.condition {
            Some(existing) if existing != index => self.register(Expression::binary(
                Expression::local_ref(existing),
                BinaryOperator::And,
                Expression::local_ref(index),
            )),
            _ => index,
        };
        self.condition = Some(index);
        Ok(())
    }

    /// 添加一个输出字段，返回它在输出中的位置
    pub fn add_project(&mut self, index: usize, name: impl Into<String>) -> usize {
        self.projects.push(index);
        self.project_names.push(name.into());
        self.projects.len() - 1
    }

    /// 登记表达式并作为输出字段
    pub fn add_project_expr(&mut self, expr: &Expression, name: impl Into<String>) -> usize {
        let index = self.add_expr(expr);
        self.add_project(index, name)
    }

    /// 覆盖投影
    ///
    /// 输入字段引用沿用输入字段名，其余字段命名为 `$f<位置>`
    pub fn set_projection(&mut self, indices: &[usize]) {
        self.clear_projects();
        for (position, &index) in indices.iter().enumerate() {
            let name = self
                .exprs
                .get(index)
                .and_then(Expression::as_input_ref)
                .and_then(|field| self.input_row_type.field(field))
                .map(|field| field.name.clone())
                .unwrap_or_else(|| format!("$f{}", position));
            self.add_project(index, name);
        }
    }

    pub fn clear_projects(&mut self) {
        self.projects.clear();
        self.project_names.clear();
    }

    pub fn clear_condition(&mut self) {
        self.condition = None;
    }

    /// 直接指定条件条目，类型在 `get_program` 时检查
    pub(crate) fn set_condition(&mut self, index: usize) {
        self.condition = Some(index);
    }

    /// 校验并生成程序
    pub fn get_program(&self) -> ProgramResult<Program> {
        Program::from_parts(
            self.input_row_type.clone(),
            self.exprs.clone(),
            self.projects.clone(),
            self.project_names.clone(),
            self.condition,
        )
    }

    /// 已登记表达式的类型，登记顺序
    fn local_types(&self) -> ProgramResult<Vec<DataType>> {
        let mut types = Vec::with_capacity(self.exprs.len());
        for expr in &self.exprs {
            let data_type = expr.deduce_type(&self.input_row_type, &types)?;
            types.push(data_type);
        }
        Ok(types)
    }
}

impl FieldResolver for ProgramBuilder {
    fn field_type(&self, index: usize) -> Option<DataType> {
        self.input_row_type.field_type(index)
    }

    fn field_index(&self, name: &str) -> Option<usize> {
        self.input_row_type.field_index(name)
    }

    fn field_count(&self) -> usize {
        self.input_row_type.field_count()
    }
}
