//! 集成测试共享工具模块
//!
//! 提供测试计划的构造函数和常用断言，供所有集成测试使用

#![allow(dead_code)]

pub mod assertions;
pub mod data_fixtures;

use relrewrite::core::types::{DataType, Expression, RowType};
use relrewrite::query::planner::plan::{FilterNode, NodeId, PlanArena, ProjectNode, ScanNode};

/// 测试计划包装器
///
/// 持有计划区和当前的根节点，按自底向上的顺序逐层叠加节点
pub struct TestPlan {
    pub arena: PlanArena,
    pub root: NodeId,
}

impl TestPlan {
    /// 以一个扫描节点开始的计划
    pub fn scan(table: &str, row_type: RowType) -> Self {
        let mut arena = PlanArena::new();
        let root = arena.add(ScanNode::new(table, row_type));
        Self { arena, root }
    }

    /// 在当前根上叠加过滤节点
    pub fn filter(mut self, condition: Expression) -> Self {
        let node = FilterNode::new(&self.arena, self.root, condition).expect("过滤节点应该创建成功");
        self.root = self.arena.add(node);
        self
    }

    /// 在当前根上叠加投影节点
    pub fn project(mut self, exprs: Vec<Expression>, names: &[&str]) -> Self {
        let names = names.iter().map(|name| name.to_string()).collect();
        let node =
            ProjectNode::new(&self.arena, self.root, exprs, names).expect("投影节点应该创建成功");
        self.root = self.arena.add(node);
        self
    }

    pub fn explain(&self) -> String {
        self.arena.explain(self.root).expect("计划应该可以输出")
    }
}

/// 两个整数字段 `a`、`b` 的行类型
pub fn ab_row_type() -> RowType {
    RowType::of(&[("a", DataType::Int), ("b", DataType::Int)])
}

/// `a > b`
pub fn a_gt_b() -> Expression {
    Expression::gt(Expression::input_ref(0), Expression::input_ref(1))
}
