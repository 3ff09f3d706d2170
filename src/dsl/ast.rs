//! Template syntax tree.

use crate::context::sanitize_action_name;
use crate::error::EvalError;
use regex::Regex;

/// A parsed template node. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Text emitted as-is.
    Literal(String),
    /// `{{$name,arg,...}}`
    Variable { name: String, args: Vec<String> },
    /// `{{!command}}`
    ShellCommand(String),
    /// Children rendered in order and concatenated.
    Block(Vec<AstNode>),
    /// `<prefix> name = value`
    Assignment { name: String, value: Box<AstNode> },
    Comparison(Comparison),
    If {
        condition: Comparison,
        then_branch: Box<AstNode>,
        else_branch: Option<Box<AstNode>>,
    },
    Action(Action),
    ReloadAction(Action),
    /// `<prefix> call (name) (args)` or `{{|call (name) (args)}}`
    ActionCall { name: String, arguments: String },
    /// `<prefix> execute` block: scheduled as a post script and emitted inline.
    ExecuteFile(Box<AstNode>),
    /// Opaque source handed to the script engine registered for `language`.
    Script { language: String, source: String },
}

impl AstNode {
    pub fn literal(text: impl Into<String>) -> Self {
        AstNode::Literal(text.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        AstNode::Variable {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn assignment(name: impl Into<String>, value: AstNode) -> Self {
        AstNode::Assignment {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn block(children: impl IntoIterator<Item = AstNode>) -> Self {
        AstNode::Block(children.into_iter().collect())
    }
}

/// An action before rendering: a display name plus an unevaluated body.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub name: String,
    pub body: Box<AstNode>,
    pub hide_from_run_all: bool,
}

impl Action {
    pub fn new(name: impl Into<String>, body: AstNode, hide_from_run_all: bool) -> Self {
        Self {
            name: name.into(),
            body: Box::new(body),
            hide_from_run_all,
        }
    }

    pub fn sanitized_name(&self) -> String {
        sanitize_action_name(&self.name)
    }
}

/// `(left) OP (right)`
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Box<AstNode>,
    pub right: Box<AstNode>,
    pub operator: ComparisonOperator,
}

impl Comparison {
    pub fn new(left: AstNode, operator: ComparisonOperator, right: AstNode) -> Self {
        Self {
            left: Box::new(left),
            right: Box::new(right),
            operator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    /// `==`, case-insensitive
    EqualsIgnoreCase,
    /// `===`
    Equals,
    /// `~=`, left must fully match the pattern on the right
    Matches,
    /// `!=`, case-sensitive
    NotEquals,
    /// `>`
    GreaterThan,
    /// `<`
    LessThan,
    /// `||`
    Or,
    /// `&&`
    And,
}

impl ComparisonOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let operator = match symbol {
            "==" => Self::EqualsIgnoreCase,
            "===" => Self::Equals,
            "~=" => Self::Matches,
            "!=" => Self::NotEquals,
            ">" => Self::GreaterThan,
            "<" => Self::LessThan,
            "||" => Self::Or,
            "&&" => Self::And,
            _ => return None,
        };
        Some(operator)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::EqualsIgnoreCase => "==",
            Self::Equals => "===",
            Self::Matches => "~=",
            Self::NotEquals => "!=",
            Self::GreaterThan => ">",
            Self::LessThan => "<",
            Self::Or => "||",
            Self::And => "&&",
        }
    }

    /// Apply the operator to two rendered operands. Both operands are always evaluated by the
    /// caller; there is no short-circuiting.
    pub fn apply(self, left: &str, right: &str) -> Result<bool, EvalError> {
        let result = match self {
            Self::EqualsIgnoreCase => left.to_lowercase() == right.to_lowercase(),
            Self::Equals => left == right,
            Self::Matches => {
                let anchored = format!("^(?:{})$", right);
                let pattern = Regex::new(&anchored).map_err(|e| EvalError::InvalidPattern {
                    pattern: right.to_string(),
                    message: e.to_string(),
                })?;
                pattern.is_match(left)
            }
            Self::NotEquals => left != right,
            Self::GreaterThan => parse_integer(left)? > parse_integer(right)?,
            Self::LessThan => parse_integer(left)? < parse_integer(right)?,
            Self::Or => parse_boolean(left) || parse_boolean(right),
            Self::And => parse_boolean(left) && parse_boolean(right),
        };
        Ok(result)
    }
}

fn parse_integer(operand: &str) -> Result<i64, EvalError> {
    operand
        .parse()
        .map_err(|_| EvalError::NotAnInteger(operand.to_string()))
}

fn parse_boolean(operand: &str) -> bool {
    operand.eq_ignore_ascii_case("true")
}
