//! 计划节点种类

use serde::{Deserialize, Serialize};
use std::fmt;

/// 计划节点种类
///
/// 模式匹配和规则索引都以节点种类为键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlanNodeKind {
    Scan,
    Values,
    Filter,
    Project,
    Calc,
    Join,
}

impl PlanNodeKind {
    /// 全部节点种类
    pub const ALL: [PlanNodeKind; 6] = [
        PlanNodeKind::Scan,
        PlanNodeKind::Values,
        PlanNodeKind::Filter,
        PlanNodeKind::Project,
        PlanNodeKind::Calc,
        PlanNodeKind::Join,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PlanNodeKind::Scan => "Scan",
            PlanNodeKind::Values => "Values",
            PlanNodeKind::Filter => "Filter",
            PlanNodeKind::Project => "Project",
            PlanNodeKind::Calc => "Calc",
            PlanNodeKind::Join => "Join",
        }
    }

    /// 该种类节点的输入数量
    pub fn arity(&self) -> usize {
        match self {
            PlanNodeKind::Scan | PlanNodeKind::Values => 0,
            PlanNodeKind::Filter | PlanNodeKind::Project | PlanNodeKind::Calc => 1,
            PlanNodeKind::Join => 2,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.arity() == 0
    }
}

impl fmt::Display for PlanNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
