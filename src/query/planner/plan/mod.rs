//! 计划模型
//!
//! - `arena`: 计划区与节点 ID，负责节点存储、转发解析和原子替换
//! - `nodes`: 具体计划节点（Scan、Values、Filter、Project、Calc、Join）

pub mod arena;
pub mod nodes;

pub use arena::{NodeId, PlanArena};
pub use nodes::{
    CalcNode, FilterNode, JoinNode, JoinType, PlanNodeEnum, PlanNodeKind, ProjectNode, ScanNode,
    ValuesNode,
};
