//! Flat stylesheets: reading, `@extend` resolution and CSS output.
//!
//! A stylesheet here is a sequence of style rules with no nesting:
//!
//! ```text
//! .error { color: red; }
//! .serious-error { @extend .error; border-width: 3px; }
//! ```
//!
//! Declarations are kept as raw text; only selectors and `@extend`
//! statements are interpreted.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::error::{ExtendError, ParseError};
use crate::extend::{ExtendDirective, ExtendOptions, resolve_extends};
use crate::parser::parse_selector_list_at;
use crate::selector::SelectorList;

/// `@extend <target> [!optional];`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendRule {
    /// The extended selectors.
    pub target: SelectorList,
    /// Whether `!optional` was given.
    pub optional: bool,
}

/// A selector list and the statements of its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRule {
    /// The rule's selector.
    pub selector: SelectorList,
    /// Declarations as written, without the trailing `;`.
    pub declarations: Vec<String>,
    /// `@extend` statements, in order.
    pub extends: Vec<ExtendRule>,
}

/// A flat stylesheet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Stylesheet {
    /// Style rules in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Read a stylesheet.
    ///
    /// # Errors
    /// Returns a [`ParseError`] for malformed selectors, unbalanced blocks,
    /// strings or comments, nested rules, and at-rules other than a
    /// rule-level `@extend`.
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let text = blank_comments(source)?;
        StylesheetReader::new(&text).read()
    }

    /// Every rule's selector list, in source order.
    #[must_use]
    pub fn selector_lists(&self) -> Vec<SelectorList> {
        self.rules.iter().map(|rule| rule.selector.clone()).collect()
    }

    /// One directive per `@extend` statement and alternative of the rule
    /// that contains it.
    #[must_use]
    pub fn extend_directives(&self) -> Vec<ExtendDirective> {
        let mut directives = Vec::new();
        for rule in &self.rules {
            for extend in &rule.extends {
                for extender in &rule.selector {
                    let directive = ExtendDirective::new(extend.target.clone(), extender.clone());
                    directives.push(if extend.optional {
                        directive.optional()
                    } else {
                        directive
                    });
                }
            }
        }
        directives
    }

    /// Render the stylesheet as written, `@extend` statements included.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for rule in &self.rules {
            let mut statements: Vec<String> = rule.declarations.clone();
            statements.extend(rule.extends.iter().map(|extend| {
                let optional = if extend.optional { " !optional" } else { "" };
                format!("@extend {}{optional}", extend.target)
            }));
            write_rule(&mut css, &rule.selector, &statements);
        }
        css
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// The result of [`compile`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Compilation {
    /// The output stylesheet.
    pub css: String,
    /// Invalid and unmatched `@extend` directives.
    pub diagnostics: Vec<ExtendError>,
}

/// Read `source`, resolve its `@extend` directives and render the result.
///
/// Rules keep their source order. Alternatives containing placeholders are
/// not emitted, nor are rules left with no selector or no declarations.
///
/// # Errors
/// Returns a [`ParseError`] if `source` cannot be read; see
/// [`Stylesheet::parse`].
pub fn compile(source: &str, options: &ExtendOptions) -> Result<Compilation, ParseError> {
    let sheet = Stylesheet::parse(source)?;
    let resolution = resolve_extends(&sheet.selector_lists(), sheet.extend_directives(), options);

    let mut css = String::new();
    for (rule, list) in sheet.rules.iter().zip(&resolution.lists) {
        let visible = list.without_placeholders();
        if visible.is_empty() || rule.declarations.is_empty() {
            continue;
        }
        write_rule(&mut css, &visible, &rule.declarations);
    }
    Ok(Compilation {
        css,
        diagnostics: resolution.diagnostics,
    })
}

fn write_rule(css: &mut String, selector: &SelectorList, statements: &[String]) {
    if !css.is_empty() {
        css.push('\n');
    }
    let _ = writeln!(css, "{selector} {{");
    for statement in statements {
        let _ = writeln!(css, "  {statement};");
    }
    css.push_str("}\n");
}

/// Replace every comment with whitespace of the same byte length, keeping
/// line breaks, so offsets into the result are offsets into `source`.
fn blank_comments(source: &str) -> Result<String, ParseError> {
    let mut text = String::with_capacity(source.len());
    let mut chars = source.char_indices().peekable();
    let mut quote: Option<char> = None;
    while let Some((offset, c)) = chars.next() {
        match quote {
            Some(open) => {
                text.push(c);
                if c == '\\' {
                    if let Some((_, escaped)) = chars.next() {
                        text.push(escaped);
                    }
                } else if c == open {
                    quote = None;
                }
            }
            None if c == '/' && chars.next_if(|&(_, next)| next == '*').is_some() => {
                text.push_str("  ");
                let mut closed = false;
                while let Some((_, inner)) = chars.next() {
                    if inner == '*' && chars.next_if(|&(_, next)| next == '/').is_some() {
                        text.push_str("  ");
                        closed = true;
                        break;
                    }
                    if inner == '\n' {
                        text.push('\n');
                    } else {
                        text.extend(std::iter::repeat_n(' ', inner.len_utf8()));
                    }
                }
                if !closed {
                    return Err(ParseError::Unterminated {
                        what: "comment",
                        offset,
                    });
                }
            }
            None => {
                if matches!(c, '"' | '\'') {
                    quote = Some(c);
                }
                text.push(c);
            }
        }
    }
    Ok(text)
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules),
/// restricted to flat style rules.
struct StylesheetReader<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> StylesheetReader<'a> {
    const fn new(text: &'a str) -> Self {
        Self { text, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.position..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        let rest = &self.text[self.position..];
        self.position += rest.len() - rest.trim_start().len();
    }

    fn read(mut self) -> Result<Stylesheet, ParseError> {
        let mut rules = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Ok(Stylesheet { rules }),
                // Top-level at-rules, `@extend` included, are not supported.
                Some('@') => return Err(self.at_rule_error(self.position)),
                Some(_) => rules.push(self.style_rule()?),
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-a-qualified-rule)
    fn style_rule(&mut self) -> Result<StyleRule, ParseError> {
        let start = self.position;
        let (end, stop) = self.scan()?;
        match stop {
            Some('{') => {}
            Some(ch) => return Err(ParseError::UnexpectedChar { ch, offset: end }),
            None => return Err(ParseError::UnexpectedEnd { expected: "'{'" }),
        }
        let mut rule = StyleRule {
            selector: parse_selector_list_at(&self.text[start..end], start)?,
            declarations: Vec::new(),
            extends: Vec::new(),
        };
        let open = end;
        self.position = end + 1;

        loop {
            self.skip_whitespace();
            let statement_start = self.position;
            let (end, stop) = self.scan()?;
            match stop {
                Some('{') => return Err(ParseError::NestedRule { offset: end }),
                None => {
                    return Err(ParseError::Unterminated {
                        what: "block",
                        offset: open,
                    });
                }
                _ => {}
            }
            let statement = self.text[statement_start..end].trim_end();
            if !statement.is_empty() {
                self.statement(&mut rule, statement, statement_start)?;
            }
            self.position = end + 1;
            if stop == Some('}') {
                return Ok(rule);
            }
        }
    }

    fn statement(
        &self,
        rule: &mut StyleRule,
        statement: &str,
        offset: usize,
    ) -> Result<(), ParseError> {
        let Some(after_at) = statement.strip_prefix('@') else {
            rule.declarations.push(statement.to_string());
            return Ok(());
        };
        let name_len = at_keyword_len(after_at);
        if !after_at[..name_len].eq_ignore_ascii_case("extend") {
            return Err(self.at_rule_error(offset));
        }

        let rest = after_at[name_len..].trim_start();
        let target_offset = offset + statement.len() - rest.len();
        let (target, optional) = match rest.strip_suffix("!optional") {
            Some(target) => (target, true),
            None => (rest, false),
        };
        rule.extends.push(ExtendRule {
            target: parse_selector_list_at(target, target_offset)?,
            optional,
        });
        Ok(())
    }

    fn at_rule_error(&self, offset: usize) -> ParseError {
        let after_at = &self.text[offset + 1..];
        ParseError::UnsupportedAtRule {
            name: after_at[..at_keyword_len(after_at)].to_string(),
            offset,
        }
    }

    /// Find the next `{`, `;` or `}` outside strings, parentheses and
    /// brackets, from the current position.
    fn scan(&self) -> Result<(usize, Option<char>), ParseError> {
        let mut depth = 0_usize;
        let mut quote: Option<(char, usize)> = None;
        let mut escaped = false;
        for (index, c) in self.text[self.position..].char_indices() {
            let offset = self.position + index;
            if let Some((open, _)) = quote {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else if c == open {
                    quote = None;
                }
                continue;
            }
            match c {
                '"' | '\'' => quote = Some((c, offset)),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                '{' | ';' | '}' if depth == 0 => return Ok((offset, Some(c))),
                _ => {}
            }
        }
        match quote {
            Some((_, offset)) => Err(ParseError::Unterminated {
                what: "string",
                offset,
            }),
            None => Ok((self.text.len(), None)),
        }
    }
}

fn at_keyword_len(after_at: &str) -> usize {
    after_at
        .find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_'))
        .unwrap_or(after_at.len())
}
