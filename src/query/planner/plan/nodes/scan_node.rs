//! 叶子节点：表扫描和常量行

use crate::core::error::{PlanError, PlanResult};
use crate::core::types::RowType;
use crate::core::Row;

/// 表扫描节点
///
/// 按名称读取表，行类型由调用方给出
#[derive(Debug, Clone, PartialEq)]
pub struct ScanNode {
    table: String,
    row_type: RowType,
}

impl ScanNode {
    pub fn new(table: impl Into<String>, row_type: RowType) -> Self {
        Self {
            table: table.into(),
            row_type,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }
}

/// 常量行节点
#[derive(Debug, Clone, PartialEq)]
pub struct ValuesNode {
    row_type: RowType,
    rows: Vec<Row>,
}

impl ValuesNode {
    /// 创建常量行节点，每一行都必须符合行类型
    pub fn new(row_type: RowType, rows: Vec<Row>) -> PlanResult<Self> {
        for (i, row) in rows.iter().enumerate() {
            let conforms = row.len() == row_type.len()
                && row
                    .iter()
                    .zip(row_type.fields())
                    .all(|(value, field)| value.conforms_to(field.data_type));
            if !conforms {
                return Err(PlanError::invalid_node(format!(
                    "第 {} 行不符合行类型 {}",
                    i, row_type
                )));
            }
        }
        Ok(Self { row_type, rows })
    }

    pub fn row_type(&self) -> &RowType {
        &self.row_type
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}
