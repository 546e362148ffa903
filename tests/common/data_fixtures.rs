//! 测试数据生成模块
//!
//! 提供各种测试行数据的生成函数

use relrewrite::core::{Row, Value};

/// 两列整数行
pub fn int_rows(pairs: &[(Option<i64>, Option<i64>)]) -> Vec<Row> {
    pairs
        .iter()
        .map(|(a, b)| vec![int_or_null(*a), int_or_null(*b)])
        .collect()
}

/// 覆盖大于、小于、相等与 NULL 的样例数据
pub fn sample_rows() -> Vec<Row> {
    int_rows(&[
        (Some(5), Some(3)),
        (Some(1), Some(9)),
        (None, Some(2)),
        (Some(4), Some(4)),
        (Some(7), None),
        (Some(-2), Some(-8)),
    ])
}

pub fn int_or_null(value: Option<i64>) -> Value {
    value.map(Value::Int).unwrap_or(Value::Null)
}
