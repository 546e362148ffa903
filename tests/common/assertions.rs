//! 自定义断言辅助模块
//!
//! 提供测试中的常用断言函数

use relrewrite::query::planner::plan::{NodeId, PlanArena, PlanNodeKind};

/// 断言结果成功，返回内部值
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    result.expect("操作应该成功")
}

/// 断言结果失败并匹配错误消息
pub fn assert_err_with<T: std::fmt::Debug, E: std::fmt::Display>(
    result: Result<T, E>,
    expected_msg: &str,
) {
    let err = result.expect_err("操作应该失败");
    let err_str = err.to_string();
    assert!(
        err_str.contains(expected_msg),
        "错误消息应包含 '{}', 实际是 '{}'",
        expected_msg,
        err_str
    );
}

/// 断言从根可达的节点种类（自顶向下）
pub fn assert_plan_kinds(arena: &PlanArena, root: NodeId, expected: &[PlanNodeKind]) {
    let mut kinds = Vec::new();
    let mut current = Some(arena.resolve(root));
    while let Some(id) = current {
        kinds.push(arena.get(id).expect("节点应该存在").kind());
        current = arena.inputs(id).expect("输入应该存在").first().copied();
    }
    assert_eq!(kinds, expected, "计划形状不匹配:\n{}", arena.explain(root).unwrap_or_default());
}
