//! Template parsing.
//!
//! A template is literal text interspersed with tags between a delimiter
//! pair (`{{` / `}}` by default):
//!
//! | tag              | meaning                               |
//! |------------------|---------------------------------------|
//! | `{{name}}`       | variable                              |
//! | `{{{name}}}`     | variable, unescaped form              |
//! | `{{&name}}`      | variable, unescaped form              |
//! | `{{#name}}`      | opens a section                       |
//! | `{{^name}}`      | opens an inverted section             |
//! | `{{/name}}`      | closes the innermost open section     |
//! | `{{! comment }}` | ignored                               |
//!
//! Text outside tags is kept byte for byte, whitespace and newlines included.

use crate::constants::{DEFAULT_CLOSE_DELIMITER, DEFAULT_MAX_DEPTH, DEFAULT_OPEN_DELIMITER};
use crate::error::{Error, Result};

/// Location of a tag inside its template. Line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    fn locate(text: &str, offset: usize) -> Self {
        let before = &text[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        Self { offset, line, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Literal(String),
    Variable { name: String, escape: bool, span: Span },
    Section { name: String, negated: bool, body: Vec<Node>, span: Span },
}

/// A parsed template together with the identifier used in error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub nodes: Vec<Node>,
}

/// The opening and closing tag markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    open: String,
    close: String,
}

impl Delimiters {
    /// # Errors
    /// * `Error::ConfigError` if either delimiter is empty or contains whitespace
    pub fn new(open: &str, close: &str) -> Result<Self> {
        for delimiter in [open, close] {
            if delimiter.is_empty() || delimiter.chars().any(char::is_whitespace) {
                return Err(Error::ConfigError(format!("invalid delimiter '{delimiter}'")));
            }
        }
        Ok(Self { open: open.to_string(), close: close.to_string() })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self {
            open: DEFAULT_OPEN_DELIMITER.to_string(),
            close: DEFAULT_CLOSE_DELIMITER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Variable { escape: bool },
    Open { negated: bool },
    Close,
    Comment,
}

#[derive(Debug)]
struct RawTag<'a> {
    kind: TagKind,
    name: &'a str,
    start: usize,
    end: usize,
}

struct Frame {
    name: String,
    negated: bool,
    span: Span,
    nodes: Vec<Node>,
}

/// An open section found at the very start of a path segment and never
/// closed inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingGate<'a> {
    pub name: String,
    pub negated: bool,
    pub rest: &'a str,
}

/// Stack-based template parser with a bounded section depth.
#[derive(Debug, Clone)]
pub struct Parser {
    delimiters: Delimiters,
    max_depth: usize,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(Delimiters::default(), DEFAULT_MAX_DEPTH)
    }
}

impl Parser {
    pub fn new(delimiters: Delimiters, max_depth: usize) -> Self {
        Self { delimiters, max_depth }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    /// Parses `text` into a node tree. `name` identifies the template in
    /// error messages.
    ///
    /// # Errors
    /// * `Error::TemplateSyntaxError` for unterminated tags, invalid names,
    ///   close tags that do not match the innermost open section, sections
    ///   left open at end of input, and nesting deeper than the maximum depth
    pub fn parse(&self, name: &str, text: &str) -> Result<Template> {
        let mut root = Vec::new();
        let mut stack: Vec<Frame> = Vec::new();
        let mut pos = 0;

        while let Some(tag) = self.next_tag(name, text, pos)? {
            if tag.start > pos {
                push_literal(current(&mut stack, &mut root), &text[pos..tag.start]);
            }
            pos = tag.end;
            let span = Span::locate(text, tag.start);

            match tag.kind {
                TagKind::Comment => {}
                TagKind::Variable { escape } => {
                    current(&mut stack, &mut root).push(Node::Variable {
                        name: tag.name.to_string(),
                        escape,
                        span,
                    });
                }
                TagKind::Open { negated } => {
                    if stack.len() >= self.max_depth {
                        return Err(syntax_error(
                            name,
                            span,
                            format!("sections nested deeper than {} levels", self.max_depth),
                        ));
                    }
                    stack.push(Frame { name: tag.name.to_string(), negated, span, nodes: Vec::new() });
                }
                TagKind::Close => {
                    let frame = stack.pop().ok_or_else(|| {
                        syntax_error(
                            name,
                            span,
                            format!("closing tag '{}' has no open section", tag.name),
                        )
                    })?;
                    if frame.name != tag.name {
                        return Err(syntax_error(
                            name,
                            span,
                            format!(
                                "closing tag '{}' does not match section '{}' opened at line {}, column {}",
                                tag.name, frame.name, frame.span.line, frame.span.column
                            ),
                        ));
                    }
                    current(&mut stack, &mut root).push(Node::Section {
                        name: frame.name,
                        negated: frame.negated,
                        body: frame.nodes,
                        span: frame.span,
                    });
                }
            }
        }

        if let Some(frame) = stack.last() {
            return Err(syntax_error(
                name,
                frame.span,
                format!("section '{}' is never closed", frame.name),
            ));
        }
        if pos < text.len() {
            push_literal(&mut root, &text[pos..]);
        }

        Ok(Template { name: name.to_string(), nodes: root })
    }

    /// Detects a section-open tag at the start of `segment` whose name is
    /// never closed inside `segment`, returning it with the remaining text.
    pub fn leading_gate<'a>(&self, segment: &'a str) -> Option<LeadingGate<'a>> {
        let first = self.next_tag(segment, segment, 0).ok()??;
        let TagKind::Open { negated } = first.kind else {
            return None;
        };
        if first.start != 0 {
            return None;
        }

        // sections opened after the first one must close before it can
        let mut pos = first.end;
        let mut depth = 0usize;
        while let Some(tag) = self.next_tag(segment, segment, pos).ok()? {
            match tag.kind {
                TagKind::Open { .. } => depth += 1,
                TagKind::Close if depth > 0 => depth -= 1,
                TagKind::Close if tag.name == first.name => return None,
                _ => {}
            }
            pos = tag.end;
        }

        Some(LeadingGate { name: first.name.to_string(), negated, rest: &segment[first.end..] })
    }

    /// Finds the next tag at or after `from`.
    fn next_tag<'a>(&self, name: &str, text: &'a str, from: usize) -> Result<Option<RawTag<'a>>> {
        let open = self.delimiters.open.as_str();
        let close = self.delimiters.close.as_str();

        let Some(found) = text[from..].find(open) else {
            return Ok(None);
        };
        let start = from + found;
        let inner_start = start + open.len();

        let unterminated = || {
            syntax_error(name, Span::locate(text, start), "unterminated tag".to_string())
        };

        if open.ends_with('{') && text[inner_start..].starts_with('{') {
            let terminator = format!("}}{close}");
            let inner_end = text[inner_start + 1..]
                .find(&terminator)
                .map(|i| inner_start + 1 + i)
                .ok_or_else(unterminated)?;
            let tag_name = validate_name(name, text, start, text[inner_start + 1..inner_end].trim())?;
            return Ok(Some(RawTag {
                kind: TagKind::Variable { escape: false },
                name: tag_name,
                start,
                end: inner_end + terminator.len(),
            }));
        }

        let inner_end = text[inner_start..]
            .find(close)
            .map(|i| inner_start + i)
            .ok_or_else(unterminated)?;
        let end = inner_end + close.len();
        let inner = text[inner_start..inner_end].trim();

        let (kind, rest) = match inner.chars().next() {
            Some('!') => return Ok(Some(RawTag { kind: TagKind::Comment, name: "", start, end })),
            Some('#') => (TagKind::Open { negated: false }, &inner[1..]),
            Some('^') => (TagKind::Open { negated: true }, &inner[1..]),
            Some('/') => (TagKind::Close, &inner[1..]),
            Some('&') => (TagKind::Variable { escape: false }, &inner[1..]),
            _ => (TagKind::Variable { escape: true }, inner),
        };
        let tag_name = validate_name(name, text, start, rest.trim())?;

        Ok(Some(RawTag { kind, name: tag_name, start, end }))
    }
}

fn validate_name<'a>(template: &str, text: &str, start: usize, candidate: &'a str) -> Result<&'a str> {
    let valid = !candidate.is_empty()
        && candidate.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(candidate)
    } else {
        Err(syntax_error(
            template,
            Span::locate(text, start),
            format!("invalid tag name '{candidate}'"),
        ))
    }
}

fn current<'s>(stack: &'s mut [Frame], root: &'s mut Vec<Node>) -> &'s mut Vec<Node> {
    match stack.last_mut() {
        Some(frame) => &mut frame.nodes,
        None => root,
    }
}

fn push_literal(nodes: &mut Vec<Node>, text: &str) {
    if let Some(Node::Literal(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Literal(text.to_string()));
    }
}

fn syntax_error(template: &str, span: Span, message: String) -> Error {
    Error::TemplateSyntaxError {
        template: template.to_string(),
        line: span.line,
        column: span.column,
        message,
    }
}
