//! Cursor-driven directive scanner.
//!
//! The scanner walks the template source once and yields a [`Node`] for
//! every directive and text run. Each step skips leading whitespace and then
//! classifies the cursor position with a bounded lookahead:
//!
//! | Lookahead | Kind |
//! |-----------|------|
//! | `#` | comment, rest of line dropped |
//! | `@var`, `@if`, `@elseif`, `@else`, `@endif` | directive, payload runs to end of line |
//! | `@` + anything else | [`TemplateError::MalformedDirective`] |
//! | anything else | text run |
//!
//! Directives consume their terminating newline. A text run ends before an
//! `@` or after a newline, except inside `{ ... }` where neither counts, so
//! markers like `{{ user@host }}` stay in one piece. A backslash protects the
//! next character from ending the run.

use crate::error::{Result, TemplateError};
use crate::expr::Expr;
use crate::value::Scalar;

/// One compiled element of a template.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Node {
    pub kind: NodeKind,
    /// 1-based line the element starts on.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeKind {
    Text(String),
    Var { name: String, value: Scalar },
    If(Expr),
    ElseIf(Expr),
    Else,
    EndIf,
}

/// What the cursor currently points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookahead {
    Comment,
    Text,
    /// A directive keyword and the length of its `@word` marker.
    Directive(Keyword, usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    Var,
    If,
    ElseIf,
    Else,
    EndIf,
}

impl Keyword {
    fn from_word(word: &str) -> Option<Self> {
        match word {
            "var" => Some(Keyword::Var),
            "if" => Some(Keyword::If),
            "elseif" => Some(Keyword::ElseIf),
            "else" => Some(Keyword::Else),
            "endif" => Some(Keyword::EndIf),
            _ => None,
        }
    }
}

pub(crate) struct Scanner<'s> {
    source: &'s str,
    cursor: usize,
    line: usize,
}

impl<'s> Scanner<'s> {
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            cursor: 0,
            line: 1,
        }
    }

    fn rest(&self) -> &'s str {
        &self.source[self.cursor..]
    }

    /// Moves the cursor forward by `len` bytes and returns the skipped text.
    fn advance(&mut self, len: usize) -> &'s str {
        let taken = &self.source[self.cursor..self.cursor + len];
        self.line += taken.matches('\n').count();
        self.cursor += len;
        taken
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.advance(rest.len() - rest.trim_start().len());
    }

    /// Consumes through the next newline and returns the line without it.
    fn take_line(&mut self) -> &'s str {
        let rest = self.rest();
        let len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        self.advance(len).trim_end_matches(['\n', '\r'])
    }

    /// Classifies the cursor position.
    fn classify(&self) -> Result<Lookahead> {
        let rest = self.rest();

        if rest.starts_with('#') {
            return Ok(Lookahead::Comment);
        }
        let Some(after_at) = rest.strip_prefix('@') else {
            return Ok(Lookahead::Text);
        };

        let word_len = after_at
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after_at.len());

        match Keyword::from_word(&after_at[..word_len]) {
            Some(keyword) => Ok(Lookahead::Directive(keyword, word_len + 1)),
            None => Err(TemplateError::MalformedDirective {
                token: rest.split_whitespace().next().unwrap_or("@").to_string(),
                line: self.line,
            }),
        }
    }

    /// Consumes a text run and returns it, newline included.
    fn take_text(&mut self) -> &'s str {
        let rest = self.rest();
        let mut depth = 0usize;
        let mut end = rest.len();
        let mut chars = rest.char_indices();

        while let Some((at, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '{' => depth += 1,
                '}' => depth = depth.saturating_sub(1),
                '@' if depth == 0 => {
                    end = at;
                    break;
                }
                '\n' if depth == 0 => {
                    end = at + 1;
                    break;
                }
                _ => {}
            }
        }

        self.advance(end)
    }

    fn scan_var(payload: &str, line: usize) -> Result<NodeKind> {
        let payload = payload.trim();
        let name_len = payload.find(char::is_whitespace).unwrap_or(payload.len());
        let (name, value) = payload.split_at(name_len);

        if name.is_empty() {
            return Err(TemplateError::MalformedDirective {
                token: "@var".to_string(),
                line,
            });
        }

        Ok(NodeKind::Var {
            name: name.to_string(),
            value: Scalar::parse(value.trim()),
        })
    }

    /// Checks that a directive without arguments has nothing after it.
    fn expect_bare(payload: &str, line: usize) -> Result<()> {
        match payload.split_whitespace().next() {
            Some(token) => Err(TemplateError::MalformedDirective {
                token: token.to_string(),
                line,
            }),
            None => Ok(()),
        }
    }

    fn scan_directive(keyword: Keyword, payload: &str, line: usize) -> Result<NodeKind> {
        Ok(match keyword {
            Keyword::Var => Self::scan_var(payload, line)?,
            Keyword::If => NodeKind::If(Expr::parse(payload, line)?),
            Keyword::ElseIf => NodeKind::ElseIf(Expr::parse(payload, line)?),
            Keyword::Else => {
                Self::expect_bare(payload, line)?;
                NodeKind::Else
            }
            Keyword::EndIf => {
                Self::expect_bare(payload, line)?;
                NodeKind::EndIf
            }
        })
    }

    fn next_node(&mut self) -> Result<Option<Node>> {
        loop {
            self.skip_whitespace();
            if self.rest().is_empty() {
                return Ok(None);
            }

            let line = self.line;
            let kind = match self.classify()? {
                Lookahead::Comment => {
                    self.take_line();
                    continue;
                }
                Lookahead::Text => NodeKind::Text(self.take_text().to_string()),
                Lookahead::Directive(keyword, marker_len) => {
                    self.advance(marker_len);
                    let payload = self.take_line();
                    Self::scan_directive(keyword, payload, line)?
                }
            };

            return Ok(Some(Node { kind, line }));
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_node() {
            Ok(node) => node.map(Ok),
            Err(err) => {
                // Stop after the first error.
                self.cursor = self.source.len();
                Some(Err(err))
            }
        }
    }
}
