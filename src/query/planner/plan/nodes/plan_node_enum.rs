//! PlanNode 枚举定义
//!
//! 这个枚举避免了动态分发的性能开销

use super::{CalcNode, FilterNode, JoinNode, PlanNodeKind, ProjectNode, ScanNode, ValuesNode};
use crate::core::types::RowType;
use crate::query::planner::plan::NodeId;

/// PlanNode 枚举，包含所有可能的节点类型
#[derive(Debug, Clone, PartialEq)]
pub enum PlanNodeEnum {
    /// 表扫描节点
    Scan(ScanNode),
    /// 常量行节点
    Values(ValuesNode),
    /// 过滤节点
    Filter(FilterNode),
    /// 投影节点
    Project(ProjectNode),
    /// 计算节点
    Calc(CalcNode),
    /// 连接节点
    Join(JoinNode),
}

impl PlanNodeEnum {
    pub fn kind(&self) -> PlanNodeKind {
        match self {
            PlanNodeEnum::Scan(_) => PlanNodeKind::Scan,
            PlanNodeEnum::Values(_) => PlanNodeKind::Values,
            PlanNodeEnum::Filter(_) => PlanNodeKind::Filter,
            PlanNodeEnum::Project(_) => PlanNodeKind::Project,
            PlanNodeEnum::Calc(_) => PlanNodeKind::Calc,
            PlanNodeEnum::Join(_) => PlanNodeKind::Join,
        }
    }

    /// 获取节点名称
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// 输入节点，未经转发解析
    pub fn inputs(&self) -> Vec<NodeId> {
        match self {
            PlanNodeEnum::Scan(_) | PlanNodeEnum::Values(_) => Vec::new(),
            PlanNodeEnum::Filter(n) => vec![n.input()],
            PlanNodeEnum::Project(n) => vec![n.input()],
            PlanNodeEnum::Calc(n) => vec![n.input()],
            PlanNodeEnum::Join(n) => vec![n.left(), n.right()],
        }
    }

    /// 输出行类型
    pub fn row_type(&self) -> &RowType {
        match self {
            PlanNodeEnum::Scan(n) => n.row_type(),
            PlanNodeEnum::Values(n) => n.row_type(),
            PlanNodeEnum::Filter(n) => n.row_type(),
            PlanNodeEnum::Project(n) => n.row_type(),
            PlanNodeEnum::Calc(n) => n.row_type(),
            PlanNodeEnum::Join(n) => n.row_type(),
        }
    }

    /// 单行描述，不含输入
    pub fn describe(&self) -> String {
        match self {
            PlanNodeEnum::Scan(n) => format!("Scan(table=[{}])", n.table()),
            PlanNodeEnum::Values(n) => format!("Values(rows=[{}])", n.rows().len()),
            PlanNodeEnum::Filter(n) => format!("Filter(condition=[{}])", n.condition()),
            PlanNodeEnum::Project(n) => {
                let items = n
                    .names()
                    .iter()
                    .zip(n.exprs())
                    .map(|(name, expr)| format!("{}=[{}]", name, expr))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Project({})", items)
            }
            PlanNodeEnum::Calc(n) => format!("Calc({})", n.program()),
            PlanNodeEnum::Join(n) => match n.condition() {
                Some(condition) => {
                    format!("Join(type=[{}], condition=[{}])", n.join_type(), condition)
                }
                None => format!("Join(type=[{}])", n.join_type()),
            },
        }
    }

    pub fn is_filter(&self) -> bool {
        matches!(self, PlanNodeEnum::Filter(_))
    }

    pub fn is_project(&self) -> bool {
        matches!(self, PlanNodeEnum::Project(_))
    }

    pub fn is_calc(&self) -> bool {
        matches!(self, PlanNodeEnum::Calc(_))
    }

    pub fn as_filter(&self) -> Option<&FilterNode> {
        match self {
            PlanNodeEnum::Filter(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_project(&self) -> Option<&ProjectNode> {
        match self {
            PlanNodeEnum::Project(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_calc(&self) -> Option<&CalcNode> {
        match self {
            PlanNodeEnum::Calc(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_join(&self) -> Option<&JoinNode> {
        match self {
            PlanNodeEnum::Join(n) => Some(n),
            _ => None,
        }
    }
}

macro_rules! impl_from_node {
    ($($variant:ident($node:ty)),+ $(,)?) => {
        $(
            impl From<$node> for PlanNodeEnum {
                fn from(node: $node) -> Self {
                    PlanNodeEnum::$variant(node)
                }
            }
        )+
    };
}

impl_from_node! {
    Scan(ScanNode),
    Values(ValuesNode),
    Filter(FilterNode),
    Project(ProjectNode),
    Calc(CalcNode),
    Join(JoinNode),
}
