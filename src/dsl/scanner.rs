//! Cursor-based scanning over an immutable string.
//!
//! Positions are byte offsets and always sit on a character boundary; counts passed to the
//! `*_n` helpers are in characters.

use crate::error::ParseError;
use regex::Regex;

const QUOTE_CHARS: [char; 2] = ['"', '\''];

/// A cursor over a source string.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    position: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            position: 0,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Rewind (or advance) to a checkpoint previously obtained from [`Scanner::position`].
    pub fn reset(&mut self, position: usize) {
        debug_assert!(self.source.is_char_boundary(position));
        self.position = position;
    }

    /// A copy of this scanner at the same position.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn can_read(&self) -> bool {
        self.position < self.source.len()
    }

    /// True if at least `amount` more characters are available.
    pub fn can_read_n(&self, amount: usize) -> bool {
        amount == 0 || self.remaining().chars().nth(amount - 1).is_some()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// The next `amount` characters, or fewer if the input ends first.
    pub fn peek_n(&self, amount: usize) -> &'a str {
        let remaining = self.remaining();
        &remaining[..byte_len_of_chars(remaining, amount)]
    }

    pub fn peek_while(&self, predicate: impl Fn(char) -> bool) -> &'a str {
        let remaining = self.remaining();
        let end = remaining
            .char_indices()
            .find(|(_, c)| !predicate(*c))
            .map(|(i, _)| i)
            .unwrap_or(remaining.len());
        &remaining[..end]
    }

    pub fn peek_remaining(&self) -> &'a str {
        self.remaining()
    }

    pub fn read_char(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Read up to `amount` characters.
    pub fn read_chars(&mut self, amount: usize) -> &'a str {
        let read = self.peek_n(amount);
        self.position += read.len();
        read
    }

    /// Read for as long as the predicate matches, leaving the cursor on the first mismatch.
    pub fn read_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let read = self.peek_while(predicate);
        self.position += read.len();
        read
    }

    /// Read until the first occurrence of `marker`, leaving the cursor in front of it.
    ///
    /// Reads the rest of the input if the marker never occurs.
    pub fn read_until(&mut self, marker: &str) -> &'a str {
        if marker.is_empty() {
            return "";
        }
        let remaining = self.remaining();
        let end = remaining.find(marker).unwrap_or(remaining.len());
        self.position += end;
        &remaining[..end]
    }

    /// Read the text `pattern` matches at the cursor, or nothing if it does not match there.
    pub fn read_regex(&mut self, pattern: &Regex) -> &'a str {
        let remaining = self.remaining();
        match pattern.find(remaining) {
            Some(m) if m.start() == 0 => {
                self.position += m.end();
                &remaining[..m.end()]
            }
            _ => "",
        }
    }

    /// Read a line without its terminating newline.
    pub fn read_line(&mut self) -> &'a str {
        let line = self.read_line_including_newline();
        line.strip_suffix('\n').unwrap_or(line)
    }

    pub fn read_line_including_newline(&mut self) -> &'a str {
        let remaining = self.remaining();
        let end = remaining
            .find('\n')
            .map(|i| i + 1)
            .unwrap_or(remaining.len());
        self.position += end;
        &remaining[..end]
    }

    pub fn read_remaining(&mut self) -> &'a str {
        let remaining = self.remaining();
        self.position = self.source.len();
        remaining
    }

    /// Read a single whitespace-delimited word, or a `"`/`'` quoted phrase with backslash
    /// escapes. An unterminated quote reads to the end of the input.
    pub fn read_phrase(&mut self) -> String {
        let quote = match self.peek() {
            Some(c) if QUOTE_CHARS.contains(&c) => c,
            _ => return self.read_while(|c| !c.is_whitespace()).to_string(),
        };
        self.read_char();

        let mut phrase = String::new();
        let mut escaped = false;
        while let Some(c) = self.read_char() {
            if escaped {
                escaped = false;
                phrase.push(c);
            } else if c == '\\' {
                escaped = true;
            } else if c == quote {
                break;
            } else {
                phrase.push(c);
            }
        }
        phrase
    }

    /// Read everything between `open` and `close`, honouring backslash escapes.
    pub fn read_enclosed_by(&mut self, open: char, close: char) -> Result<String, ParseError> {
        self.assert_read(open.encode_utf8(&mut [0u8; 4]))?;

        let mut content = String::new();
        let mut escaped = false;
        while let Some(c) = self.read_char() {
            if escaped {
                escaped = false;
                content.push(c);
            } else if c == '\\' {
                escaped = true;
            } else if c == close {
                return Ok(content);
            } else {
                content.push(c);
            }
        }
        Err(self.error(format!("Did not get closing {}", close)))
    }

    /// Consume `expected` or fail without moving the cursor.
    pub fn assert_read(&mut self, expected: &str) -> Result<(), ParseError> {
        if self.remaining().starts_with(expected) {
            self.position += expected.len();
            return Ok(());
        }
        if !self.can_read_n(expected.chars().count()) {
            let remaining = self.remaining();
            let missing = expected.strip_prefix(remaining).unwrap_or(expected);
            return Err(self.error(format!("Expected '{}'", missing)));
        }
        Err(self.error(format!("Expected '{}'", expected)))
    }

    pub fn skip_whitespace(&mut self) -> &'a str {
        self.read_while(char::is_whitespace)
    }

    /// Skip spaces and tabs, never crossing a line break.
    pub fn skip_horizontal_whitespace(&mut self) -> &'a str {
        self.read_while(is_horizontal_whitespace)
    }

    /// A parse error positioned at the cursor.
    pub fn error(&self, detail: impl Into<String>) -> ParseError {
        ParseError::at(self.source, self.position, detail)
    }

    fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }
}

pub fn is_horizontal_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

fn byte_len_of_chars(text: &str, amount: usize) -> usize {
    text.char_indices()
        .nth(amount)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
