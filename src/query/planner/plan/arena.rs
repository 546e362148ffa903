//! 计划区
//!
//! 计划以追加式节点表保存，节点用 `NodeId` 下标引用。节点加入后不可变。
//!
//! 替换通过转发表完成：`replace(old, new)` 只做一次赋值，把 `old` 的槽位
//! 绑定到 `new`。所有读取都先沿转发表解析，所以引用 `old` 的节点会看到
//! `new`；持有 `old` 的调用方仍可通过 `get_raw` 读取原节点。
//!
//! 每个位置至多提交一次替换是调用方的约定，计划区不做检查。

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::RowType;
use crate::query::planner::plan::PlanNodeEnum;

/// 计划节点 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 计划区
#[derive(Debug, Clone, Default)]
pub struct PlanArena {
    nodes: Vec<PlanNodeEnum>,
    forward: Vec<Option<NodeId>>,
}

impl PlanArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加节点
    pub fn add(&mut self, node: impl Into<PlanNodeEnum>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node.into());
        self.forward.push(None);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// 沿转发表解析到当前生效的节点
    pub fn resolve(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(Some(next)) = self.forward.get(current.0) {
            current = *next;
        }
        current
    }

    /// 获取当前生效的节点
    pub fn get(&self, id: NodeId) -> PlanResult<&PlanNodeEnum> {
        self.get_raw(self.resolve(id))
    }

    /// 获取槽位中的原节点，不经过转发
    pub fn get_raw(&self, id: NodeId) -> PlanResult<&PlanNodeEnum> {
        self.nodes.get(id.0).ok_or(PlanError::NodeNotFound(id.0))
    }

    /// 已解析的输入节点
    pub fn inputs(&self, id: NodeId) -> PlanResult<Vec<NodeId>> {
        Ok(self
            .get(id)?
            .inputs()
            .into_iter()
            .map(|input| self.resolve(input))
            .collect())
    }

    pub fn row_type(&self, id: NodeId) -> PlanResult<&RowType> {
        Ok(self.get(id)?.row_type())
    }

    /// 槽位是否已被替换
    pub fn is_replaced(&self, id: NodeId) -> bool {
        matches!(self.forward.get(id.0), Some(Some(_)))
    }

    /// 用 `new` 替换 `old`
    ///
    /// 两者的输出形状必须一致；`new` 的子树中不能包含 `old`，否则产生环。
    /// 检查失败时计划区保持不变。
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> PlanResult<()> {
        let old = self.resolve(old);
        let new = self.resolve(new);
        let old_row_type = self.row_type(old)?;
        let new_row_type = self.row_type(new)?;
        if old == new {
            return Ok(());
        }
        if !old_row_type.same_shape(new_row_type) {
            return Err(PlanError::row_type_mismatch(old_row_type, new_row_type));
        }
        if self.reachable(new)?.contains(&old) {
            return Err(PlanError::CycleDetected(old.0));
        }
        self.forward[old.0] = Some(new);
        Ok(())
    }

    /// 加入新节点并用它替换 `old`
    ///
    /// 检查全部通过后才加入节点，失败时计划区保持不变。
    pub fn replace_with(&mut self, old: NodeId, node: PlanNodeEnum) -> PlanResult<NodeId> {
        let old = self.resolve(old);
        let old_row_type = self.row_type(old)?;
        if !old_row_type.same_shape(node.row_type()) {
            return Err(PlanError::row_type_mismatch(old_row_type, node.row_type()));
        }
        for input in node.inputs() {
            if !self.contains(input) {
                return Err(PlanError::NodeNotFound(input.0));
            }
            if self.reachable(input)?.contains(&old) {
                return Err(PlanError::CycleDetected(old.0));
            }
        }
        let new = self.add(node);
        self.forward[old.0] = Some(new);
        Ok(new)
    }

    /// 从根可达的节点，后序（输入在前）
    pub fn reachable(&self, root: NodeId) -> PlanResult<Vec<NodeId>> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        self.collect_post_order(self.resolve(root), &mut visited, &mut order)?;
        Ok(order)
    }

    fn collect_post_order(
        &self,
        id: NodeId,
        visited: &mut HashSet<NodeId>,
        order: &mut Vec<NodeId>,
    ) -> PlanResult<()> {
        if !visited.insert(id) {
            return Ok(());
        }
        for input in self.inputs(id)? {
            self.collect_post_order(input, visited, order)?;
        }
        order.push(id);
        Ok(())
    }

    /// 生成以 `root` 为根的计划树文本
    pub fn explain(&self, root: NodeId) -> PlanResult<String> {
        let mut out = String::new();
        self.explain_node(self.resolve(root), 0, &mut out)?;
        Ok(out)
    }

    fn explain_node(&self, id: NodeId, depth: usize, out: &mut String) -> PlanResult<()> {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&self.get(id)?.describe());
        out.push('\n');
        for input in self.inputs(id)? {
            self.explain_node(input, depth + 1, out)?;
        }
        Ok(())
    }
}
