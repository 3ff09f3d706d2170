//! Template DSL: scanning, parsing and the syntax tree.

pub mod ast;
pub mod parser;
pub mod scanner;

pub use ast::{Action, AstNode, Comparison, ComparisonOperator};
pub use parser::{parse, parse_single_line, DslParser};
pub use scanner::Scanner;
