//! 重写调用上下文
//!
//! 每次触发尝试创建一个 `RewriteCall`，触发结束即丢弃。它向规则提供
//! 匹配到的节点、以匹配节点行类型为输入的程序构建器，以及只能使用一次的
//! “提议替换”操作。规则不会修改计划区，替换由驱动器统一提交。

use crate::core::types::RowType;
use crate::query::planner::plan::{NodeId, PlanArena, PlanNodeEnum};
use crate::query::planner::program::ProgramBuilder;
use crate::query::planner::rewrite::result::{
    FiringOutcome, MatchedResult, Replacement, RewriteError, RewriteResult,
};

/// 重写调用
#[derive(Debug)]
pub struct RewriteCall<'a> {
    arena: &'a PlanArena,
    rule_name: &'static str,
    matched: MatchedResult,
    proposal: Option<Replacement>,
}

impl<'a> RewriteCall<'a> {
    pub fn new(arena: &'a PlanArena, rule_name: &'static str, matched: MatchedResult) -> Self {
        Self {
            arena,
            rule_name,
            matched,
            proposal: None,
        }
    }

    pub fn arena(&self) -> &'a PlanArena {
        self.arena
    }

    pub fn rule_name(&self) -> &'static str {
        self.rule_name
    }

    pub fn matched(&self) -> &MatchedResult {
        &self.matched
    }

    /// 匹配的根节点
    pub fn root(&self) -> NodeId {
        self.matched.root()
    }

    /// 第 `position` 个模式位置的节点 ID
    pub fn node_id(&self, position: usize) -> RewriteResult<NodeId> {
        self.matched.node(position).ok_or_else(|| {
            RewriteError::invalid_node(format!(
                "规则 {} 的模式没有第 {} 个位置",
                self.rule_name, position
            ))
        })
    }

    /// 第 `position` 个模式位置的节点
    pub fn node(&self, position: usize) -> RewriteResult<&'a PlanNodeEnum> {
        Ok(self.arena.get(self.node_id(position)?)?)
    }

    /// 以第 `position` 个匹配节点的输出行类型为输入的程序构建器
    pub fn program_builder(&self, position: usize) -> RewriteResult<ProgramBuilder> {
        Ok(ProgramBuilder::new(self.node(position)?.row_type().clone()))
    }

    /// 是否已经提议过替换
    pub fn is_transformed(&self) -> bool {
        self.proposal.is_some()
    }

    /// 提议用新节点替换匹配的根节点
    ///
    /// 每次触发只能提议一次；新节点的输出形状必须与根节点一致。
    pub fn transform_to(&mut self, node: impl Into<PlanNodeEnum>) -> RewriteResult<()> {
        let node = node.into();
        self.check_proposal(node.row_type())?;
        if let Some(missing) = node.inputs().into_iter().find(|id| !self.arena.contains(*id)) {
            return Err(RewriteError::invalid_node(format!(
                "替换节点引用了不存在的输入 {}",
                missing
            )));
        }
        self.proposal = Some(Replacement::New(node));
        Ok(())
    }

    /// 提议用计划区中已有的节点替换匹配的根节点
    ///
    /// 已有节点不会被改写，它的字段名也必须与根节点一致。
    pub fn transform_to_existing(&mut self, id: NodeId) -> RewriteResult<()> {
        let row_type = self.arena.row_type(id)?;
        self.check_proposal(row_type)?;
        let expected = self.arena.row_type(self.root())?;
        if expected != row_type {
            return Err(RewriteError::row_type_mismatch(expected, row_type));
        }
        self.proposal = Some(Replacement::Existing(id));
        Ok(())
    }

    fn check_proposal(&self, row_type: &RowType) -> RewriteResult<()> {
        if self.proposal.is_some() {
            return Err(RewriteError::AlreadyTransformed(self.rule_name.to_string()));
        }
        let expected = self.arena.row_type(self.root())?;
        if !expected.same_shape(row_type) {
            return Err(RewriteError::row_type_mismatch(expected, row_type));
        }
        Ok(())
    }

    /// 结束调用，得到触发结果
    pub fn into_outcome(self) -> FiringOutcome {
        let root = self.root();
        match self.proposal {
            Some(replacement) => FiringOutcome::Replaced { root, replacement },
            None => FiringOutcome::Declined,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{DataType, Expression};
    use crate::query::planner::plan::{FilterNode, ProjectNode, ScanNode};

    fn setup() -> (PlanArena, NodeId, NodeId) {
        let mut arena = PlanArena::new();
        let scan = arena.add(ScanNode::new(
            "t",
            RowType::of(&[("a", DataType::Int), ("b", DataType::Int)]),
        ));
        let filter = FilterNode::new(
            &arena,
            scan,
            Expression::gt(Expression::input_ref(0), Expression::input_ref(1)),
        )
        .expect("过滤节点应该创建成功");
        let filter = arena.add(filter);
        (arena, scan, filter)
    }

    #[test]
    fn test_transform_is_single_use() {
        let (arena, scan, filter) = setup();
        let mut call = RewriteCall::new(&arena, "TestRule", MatchedResult::new(vec![filter, scan]));
        assert_eq!(call.node_id(1), Ok(scan));
        assert!(call.node(2).is_err());

        call.transform_to_existing(scan).expect("第一次提议应该成功");
        assert!(call.is_transformed());
        assert_eq!(
            call.transform_to_existing(scan),
            Err(RewriteError::AlreadyTransformed("TestRule".to_string()))
        );
        assert_eq!(
            call.into_outcome(),
            FiringOutcome::Replaced {
                root: filter,
                replacement: Replacement::Existing(scan),
            }
        );
    }

    #[test]
    fn test_transform_rejects_shape_change() {
        let (arena, scan, filter) = setup();
        let narrow = ProjectNode::with_fields(&arena, scan, &["a"]).expect("投影节点应该创建成功");
        let mut call = RewriteCall::new(&arena, "TestRule", MatchedResult::new(vec![filter, scan]));
        let result = call.transform_to(narrow);
        assert!(matches!(result, Err(RewriteError::RowTypeMismatch { .. })));
        assert!(!call.is_transformed());
        assert!(call.into_outcome().is_declined());
    }

    #[test]
    fn test_existing_replacement_keeps_field_names() {
        let (mut arena, scan, filter) = setup();
        let renamed = ProjectNode::new(
            &arena,
            scan,
            vec![Expression::input_ref(0), Expression::input_ref(1)],
            vec!["x".to_string(), "y".to_string()],
        )
        .expect("投影节点应该创建成功");
        let renamed = arena.add(renamed);

        let mut call = RewriteCall::new(&arena, "TestRule", MatchedResult::new(vec![filter, scan]));
        let result = call.transform_to_existing(renamed);
        assert!(matches!(result, Err(RewriteError::RowTypeMismatch { .. })));
        assert!(!call.is_transformed());

        call.transform_to_existing(scan).expect("字段名一致时应该允许替换");
        assert!(call.is_transformed());
    }

    #[test]
    fn test_program_builder_scoped_to_node() {
        let (arena, scan, filter) = setup();
        let call = RewriteCall::new(&arena, "TestRule", MatchedResult::new(vec![filter, scan]));
        let builder = call.program_builder(1).expect("构建器应该创建成功");
        assert_eq!(builder.input_row_type(), arena.row_type(scan).expect("节点应该存在"));
    }
}
