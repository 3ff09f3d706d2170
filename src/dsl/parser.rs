//! Recursive-descent parser for the template DSL.
//!
//! A template starts with a `Command prefix: <prefix>` header. Lines starting with the prefix
//! are commands (assignments, blocks, calls); every other line is literal text with `{{...}}`
//! interpolations. The command keyword ends at whitespace or an opening parenthesis, so
//! `# call(Foo)(x)` is a call. A command that fails to parse is rewound and read as a literal
//! line instead, unless the failure is hard.

use crate::dsl::ast::{Action, AstNode, Comparison, ComparisonOperator};
use crate::dsl::scanner::Scanner;
use crate::error::ParseError;
use tracing::{trace, warn};

const HEADER_KEYWORD: &str = "Command prefix";
const INTERPOLATION_OPEN: &str = "{{";
const INTERPOLATION_CLOSE: &str = "}}";
/// Prefix used for single-line templates such as target paths.
pub const SINGLE_LINE_PREFIX: &str = "#";

/// Parse a full template, including its `Command prefix:` header.
pub fn parse(source: &str, report_parse_errors: bool) -> Result<AstNode, ParseError> {
    let mut scanner = Scanner::new(source);
    let prefix = parse_command_prefix(&mut scanner).map_err(ParseError::into_hard)?;
    DslParser {
        scanner,
        prefix,
        report_parse_errors,
    }
    .parse_document(true)
}

/// Parse a single header-less line using `#` as the command prefix.
pub fn parse_single_line(line: &str, report_parse_errors: bool) -> Result<AstNode, ParseError> {
    DslParser::with_prefix(line, SINGLE_LINE_PREFIX, report_parse_errors).parse_document(true)
}

fn parse_command_prefix(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    scanner.assert_read(HEADER_KEYWORD)?;
    scanner.skip_whitespace();
    scanner.assert_read(": ")?;

    let prefix = scanner.read_line().trim_end_matches('\r');
    if prefix.is_empty() {
        return Err(scanner.error("Expected the command prefix"));
    }
    Ok(prefix.to_string())
}

pub struct DslParser<'a> {
    scanner: Scanner<'a>,
    prefix: String,
    report_parse_errors: bool,
}

impl<'a> DslParser<'a> {
    /// A parser for header-less text with an already known command prefix.
    pub fn with_prefix(source: &'a str, prefix: &str, report_parse_errors: bool) -> Self {
        Self {
            scanner: Scanner::new(source),
            prefix: prefix.to_string(),
            report_parse_errors,
        }
    }

    fn nested<'b>(&self, source: &'b str) -> DslParser<'b> {
        DslParser::with_prefix(source, &self.prefix, self.report_parse_errors)
    }

    /// Parse sections until the input is exhausted.
    pub fn parse_document(mut self, with_newline: bool) -> Result<AstNode, ParseError> {
        let mut children = Vec::new();
        while self.scanner.can_read() {
            children.push(self.parse_section(with_newline)?);
        }
        Ok(AstNode::Block(children))
    }

    /// A command, or a literal line. `with_newline` keeps the line terminator in the output.
    fn parse_section(&mut self, with_newline: bool) -> Result<AstNode, ParseError> {
        let start = self.scanner.position();
        let indent = self.scanner.skip_horizontal_whitespace();

        if self.scanner.peek_remaining().starts_with(self.prefix.as_str()) {
            if let Some(command) = self.try_parse(Self::parse_command)? {
                if indent.is_empty() {
                    return Ok(command);
                }
                return Ok(AstNode::block([AstNode::literal(indent), command]));
            }
        }

        self.scanner.reset(start);
        let line = if with_newline {
            self.scanner.read_line_including_newline()
        } else {
            self.scanner.read_line()
        };
        Ok(self.parse_line(line))
    }

    /// Run `parse`, rewinding on a recoverable failure. Hard failures propagate.
    fn try_parse(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Result<AstNode, ParseError>,
    ) -> Result<Option<AstNode>, ParseError> {
        let start = self.scanner.position();
        match parse(self) {
            Ok(node) => Ok(Some(node)),
            Err(err) if err.hard => Err(err),
            Err(err) => {
                self.report(&err);
                self.scanner.reset(start);
                Ok(None)
            }
        }
    }

    fn report(&self, err: &ParseError) {
        if self.report_parse_errors {
            warn!(error = %err, "Parse attempt failed, reading as literal text");
        } else {
            trace!(error = %err, "Parse attempt failed, reading as literal text");
        }
    }

    fn parse_line(&self, line: &str) -> AstNode {
        let mut scanner = Scanner::new(line);
        let mut children = Vec::new();

        while scanner.can_read() {
            let literal = scanner.read_until(INTERPOLATION_OPEN);
            if !literal.is_empty() {
                children.push(AstNode::literal(literal));
            }
            if scanner.assert_read(INTERPOLATION_OPEN).is_err() {
                continue;
            }

            let checkpoint = scanner.position();
            match parse_interpolation(&mut scanner) {
                Ok(node) => children.push(node),
                Err(err) => {
                    self.report(&err);
                    scanner.reset(checkpoint);
                    children.push(AstNode::literal(INTERPOLATION_OPEN));
                }
            }
        }

        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        AstNode::Block(children)
    }

    fn parse_command(&mut self) -> Result<AstNode, ParseError> {
        self.scanner.assert_read(&self.prefix)?;
        self.scanner.skip_horizontal_whitespace();

        match self.scanner.peek_while(|c| !c.is_whitespace() && c != '(') {
            "action" => self.read_action("action", false),
            "action*" => self.read_action("action*", true),
            "reload" => self.read_reload(),
            "script" => self.read_script(),
            "if" => self.read_if(),
            "call" => self.read_call(),
            "execute" => self.read_execute(),
            _ => self.read_assignment(),
        }
    }

    fn read_assignment(&mut self) -> Result<AstNode, ParseError> {
        let name = self.scanner.read_while(|c| !c.is_whitespace());
        if name.is_empty() {
            return Err(self.scanner.error("Expected a variable name"));
        }
        self.scanner.skip_horizontal_whitespace();
        self.scanner.assert_read("= ")?;

        let value = self.parse_section(false)?;
        Ok(AstNode::assignment(name, value))
    }

    fn read_action(&mut self, keyword: &str, hidden: bool) -> Result<AstNode, ParseError> {
        let (name, body) = self.read_named_enclosed(keyword)?;
        let body = self.nested(body).parse_document(true)?;
        Ok(AstNode::Action(Action::new(name, body, hidden)))
    }

    fn read_reload(&mut self) -> Result<AstNode, ParseError> {
        let (name, body) = self.read_named_enclosed("reload")?;
        let body = self.nested(body).parse_document(true)?;
        Ok(AstNode::ReloadAction(Action::new(name, body, false)))
    }

    fn read_execute(&mut self) -> Result<AstNode, ParseError> {
        let (_, body) = self.read_named_enclosed("execute")?;
        let body = self.nested(body).parse_document(true)?;
        Ok(AstNode::ExecuteFile(Box::new(body)))
    }

    fn read_script(&mut self) -> Result<AstNode, ParseError> {
        let (language, source) = self.read_named_enclosed("script")?;
        Ok(AstNode::Script {
            language: language.trim().to_string(),
            source: source.to_string(),
        })
    }

    fn read_if(&mut self) -> Result<AstNode, ParseError> {
        let (condition, body) = self.read_named_enclosed("if")?;
        let condition = self.read_comparison(condition)?;

        let (then_body, else_body) = self.split_else(body);
        let then_branch = self.nested(then_body).parse_document(false)?;
        let else_branch = match else_body {
            Some(text) => Some(Box::new(self.nested(text).parse_document(false)?)),
            None => None,
        };

        Ok(AstNode::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch,
        })
    }

    fn read_call(&mut self) -> Result<AstNode, ParseError> {
        self.scanner.assert_read("call")?;
        read_call_arguments(&mut self.scanner)
    }

    /// `<keyword> <name line>`, then raw text up to `<prefix> end <keyword>`.
    fn read_named_enclosed(&mut self, keyword: &str) -> Result<(&'a str, &'a str), ParseError> {
        self.scanner.assert_read(keyword)?;
        self.scanner.skip_horizontal_whitespace();
        let name = self.scanner.read_line().trim_end_matches('\r');

        let end_marker = format!("{} end {}", self.prefix, keyword);
        let body = self.scanner.read_until(&end_marker);
        self.scanner.assert_read(&end_marker)?;

        let rest = self.scanner.peek_remaining();
        if rest.starts_with("\r\n") {
            self.scanner.read_chars(2);
        } else if rest.starts_with('\n') {
            self.scanner.read_char();
        }
        Ok((name, body))
    }

    /// Split an `if` body at its `<prefix> else` line.
    fn split_else<'b>(&self, body: &'b str) -> (&'b str, Option<&'b str>) {
        let marker = format!("{} else", self.prefix);
        let mut offset = 0;
        for line in body.split_inclusive('\n') {
            if line.trim() == marker {
                return (&body[..offset], Some(&body[offset + line.len()..]));
            }
            offset += line.len();
        }
        (body, None)
    }

    /// `(left) OP (right)`. Only an unknown operator is a hard failure.
    fn read_comparison(&self, condition: &str) -> Result<Comparison, ParseError> {
        let mut scanner = Scanner::new(condition);
        let left = scanner.read_enclosed_by('(', ')')?;
        scanner.skip_horizontal_whitespace();
        let symbol = scanner.read_while(|c| !c.is_whitespace());
        let operator = ComparisonOperator::from_symbol(symbol)
            .ok_or_else(|| scanner.error("Unknown comparison").into_hard())?;
        scanner.skip_horizontal_whitespace();
        let right = scanner.read_enclosed_by('(', ')')?;

        Ok(Comparison::new(
            self.nested(&left).parse_section(false)?,
            operator,
            self.nested(&right).parse_section(false)?,
        ))
    }
}

fn parse_interpolation(scanner: &mut Scanner<'_>) -> Result<AstNode, ParseError> {
    let node = match scanner.read_char() {
        Some('$') => read_variable(scanner)?,
        Some('!') => AstNode::ShellCommand(scanner.read_until(INTERPOLATION_CLOSE).to_string()),
        Some('|') => {
            scanner.skip_horizontal_whitespace();
            if scanner.peek_remaining().starts_with("call") {
                scanner.read_chars(4);
            }
            let call = read_call_arguments(scanner)?;
            scanner.skip_horizontal_whitespace();
            call
        }
        _ => return Err(scanner.error("Unknown command")),
    };
    scanner.assert_read(INTERPOLATION_CLOSE)?;
    Ok(node)
}

fn read_variable(scanner: &mut Scanner<'_>) -> Result<AstNode, ParseError> {
    let inner = scanner.read_until(INTERPOLATION_CLOSE);
    let mut parts: Vec<&str> = inner.split(',').collect();
    while parts.len() > 1 && parts.last().is_some_and(|part| part.is_empty()) {
        parts.pop();
    }

    let name = parts[0];
    if name.is_empty() {
        return Err(scanner.error("Expected a variable name"));
    }
    Ok(AstNode::Variable {
        name: name.to_string(),
        args: parts[1..].iter().map(|arg| arg.to_string()).collect(),
    })
}

/// `(name) (arguments)`
fn read_call_arguments(scanner: &mut Scanner<'_>) -> Result<AstNode, ParseError> {
    scanner.skip_horizontal_whitespace();
    let name = scanner.read_enclosed_by('(', ')')?;
    scanner.skip_horizontal_whitespace();
    let arguments = scanner.read_enclosed_by('(', ')')?;
    Ok(AstNode::ActionCall { name, arguments })
}
