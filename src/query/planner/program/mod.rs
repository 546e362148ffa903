//! 表达式程序模块
//!
//! 表达式程序（`Program`）是计算节点（Calc）携带的扁平化标量表达式列表：
//! 每个条目是输入字段引用、字面量，或者操作数全部引用更早条目的运算。
//! 程序还包含输出投影和一个可选的过滤条件。
//!
//! # 模块结构
//!
//! - `def`: `Program` 定义、校验、求值和展示
//! - `builder`: `ProgramBuilder`，增量构建程序，在 `get_program` 时统一校验
//! - `merge`: 程序组合与规范化
//!
//! # 示例
//!
//! ```text
//! 输入: RecordType(INTEGER a, INTEGER b)，条件 a > b
//!
//! expr#0=[$0], expr#1=[$1], expr#2=[>($t0, $t1)], a=[$t0], b=[$t1], $condition=[$t2]
//! ```

pub mod builder;
pub mod def;
pub mod merge;

pub use builder::ProgramBuilder;
pub use def::Program;
