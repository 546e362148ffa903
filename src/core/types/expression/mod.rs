//! 标量表达式类型定义
//!
//! 本模块定义重写核心使用的标量表达式类型 `Expression`。
//!
//! ## 变体说明
//!
//! | 变体 | 用途 |
//! |------|------|
//! | `InputRef` | 按位置引用输入行的字段，显示为 `$i` |
//! | `LocalRef` | 按位置引用程序中先前定义的表达式，显示为 `$ti` |
//! | `Literal` | 字面量值 |
//! | `Binary` | 二元运算 |
//! | `Unary` | 一元运算 |
//!
//! 计划节点（Filter、Project、Join）上的表达式只使用 `InputRef`；
//! `LocalRef` 只出现在程序的表达式列表中。
//!
//! ## 使用示例
//!
//! ```rust
//! use relrewrite::core::Expression;
//!
//! // a > b
//! let cond = Expression::gt(Expression::input_ref(0), Expression::input_ref(1));
//! assert_eq!(cond.to_string(), ">($0, $1)");
//! ```

mod constructors;
mod def;
mod display;
mod inspection;
mod type_deduce;

pub use def::Expression;
