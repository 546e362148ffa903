//! 模式匹配定义
//!
//! 提供计划节点的模式匹配功能，用于重写规则识别特定计划结构。
//! 匹配是纯结构性的：只看节点种类和子节点形状，结果确定，不依赖任何隐藏状态。

use crate::query::planner::plan::{NodeId, PlanArena, PlanNodeKind};
use crate::query::planner::rewrite::result::MatchedResult;

/// 模式结构体
///
/// 包含当前节点的匹配条件和子节点的模式。
/// 子模式列表为空时不约束子节点；`Any` 且没有子模式的子模式匹配任意子树。
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    /// 当前节点的匹配条件
    pub node: MatchNode,
    /// 子节点的模式列表，按输入顺序
    pub dependencies: Vec<Pattern>,
}

impl Pattern {
    /// 使用指定节点条件创建模式
    pub fn with_node(node: MatchNode) -> Self {
        Self {
            node,
            dependencies: Vec::new(),
        }
    }

    /// 匹配单个节点种类
    pub fn kind(kind: PlanNodeKind) -> Self {
        Self::with_node(MatchNode::Single(kind))
    }

    /// 匹配多个可能的节点种类
    pub fn multi(kinds: Vec<PlanNodeKind>) -> Self {
        Self::with_node(MatchNode::Multi(kinds))
    }

    /// 匹配除给定种类外的任意节点
    pub fn except(kinds: Vec<PlanNodeKind>) -> Self {
        Self::with_node(MatchNode::Except(kinds))
    }

    /// 匹配任意节点
    pub fn any() -> Self {
        Self::with_node(MatchNode::Any)
    }

    /// 添加子节点模式
    pub fn with_dependency(mut self, dependency: Pattern) -> Self {
        self.dependencies.push(dependency);
        self
    }

    /// 使用节点种类添加子节点模式
    pub fn with_dependency_kind(self, kind: PlanNodeKind) -> Self {
        self.with_dependency(Self::kind(kind))
    }

    /// 检查模式是否匹配给定的计划节点
    pub fn matches(&self, arena: &PlanArena, node: NodeId) -> bool {
        self.bind(arena, node).is_some()
    }

    /// 匹配并返回每个模式位置对应的节点（先序）
    pub fn bind(&self, arena: &PlanArena, node: NodeId) -> Option<MatchedResult> {
        let mut nodes = Vec::new();
        if self.bind_into(arena, arena.resolve(node), &mut nodes) {
            Some(MatchedResult::new(nodes))
        } else {
            None
        }
    }

    fn bind_into(&self, arena: &PlanArena, node: NodeId, nodes: &mut Vec<NodeId>) -> bool {
        let plan_node = match arena.get(node) {
            Ok(plan_node) => plan_node,
            Err(_) => return false,
        };
        if !self.node.matches(plan_node.kind()) {
            return false;
        }
        nodes.push(node);

        if self.dependencies.is_empty() {
            return true;
        }
        let inputs = match arena.inputs(node) {
            Ok(inputs) => inputs,
            Err(_) => return false,
        };
        if inputs.len() < self.dependencies.len() {
            return false;
        }
        self.dependencies
            .iter()
            .zip(inputs)
            .all(|(dependency, input)| dependency.bind_into(arena, input, nodes))
    }

    /// 注册时的静态检查
    ///
    /// 根节点必须给出具体种类；任何模式声明的子模式数量不能超过它能匹配的
    /// 节点种类的输入数量。
    pub fn validate(&self) -> Result<(), String> {
        if self.root_kinds().is_empty() {
            return Err(format!("根模式必须匹配具体的节点种类: {:?}", self.node));
        }
        self.validate_arity()
    }

    fn validate_arity(&self) -> Result<(), String> {
        let max_arity = self
            .node
            .kinds()
            .iter()
            .map(PlanNodeKind::arity)
            .max()
            .unwrap_or(0);
        if self.dependencies.len() > max_arity {
            return Err(format!(
                "模式 {:?} 声明了 {} 个子模式，但最多只有 {} 个输入",
                self.node,
                self.dependencies.len(),
                max_arity
            ));
        }
        for dependency in &self.dependencies {
            dependency.validate_arity()?;
        }
        Ok(())
    }

    /// 根节点可能匹配的节点种类，用于规则索引
    ///
    /// `Any` 不计入，根为 `Any` 的模式不能注册
    pub fn root_kinds(&self) -> Vec<PlanNodeKind> {
        match &self.node {
            MatchNode::Any => Vec::new(),
            node => node.kinds(),
        }
    }
}

/// 节点匹配枚举
///
/// 定义如何匹配单个计划节点
#[derive(Debug, Clone, PartialEq)]
pub enum MatchNode {
    /// 匹配单个种类的节点
    Single(PlanNodeKind),
    /// 匹配多个种类中的任意一个
    Multi(Vec<PlanNodeKind>),
    /// 匹配给定种类以外的节点
    Except(Vec<PlanNodeKind>),
    /// 匹配任何节点
    Any,
}

impl MatchNode {
    /// 检查节点种类是否匹配
    pub fn matches(&self, kind: PlanNodeKind) -> bool {
        match self {
            MatchNode::Single(expected) => *expected == kind,
            MatchNode::Multi(kinds) => kinds.contains(&kind),
            MatchNode::Except(kinds) => !kinds.contains(&kind),
            MatchNode::Any => true,
        }
    }

    /// 满足条件的全部节点种类
    pub fn kinds(&self) -> Vec<PlanNodeKind> {
        PlanNodeKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.matches(*kind))
            .collect()
    }
}
