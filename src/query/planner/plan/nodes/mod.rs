//! 计划节点定义
//!
//! 节点一经加入计划区（`PlanArena`）就不可变。节点通过 `NodeId` 引用输入，
//! 构造函数从计划区读取输入的行类型并校验节点自身的表达式。

pub mod calc_node;
pub mod filter_node;
pub mod join_node;
pub mod plan_node_enum;
pub mod plan_node_kind;
pub mod project_node;
pub mod scan_node;

pub use calc_node::CalcNode;
pub use filter_node::FilterNode;
pub use join_node::{JoinNode, JoinType};
pub use plan_node_enum::PlanNodeEnum;
pub use plan_node_kind::PlanNodeKind;
pub use project_node::ProjectNode;
pub use scan_node::{ScanNode, ValuesNode};
