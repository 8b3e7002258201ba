//! Selector text to selector trees.
//!
//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! Supports:
//! - Type and universal selectors with namespaces: `div`, `*`, `svg|rect`, `*|a`, `|a`, `ns|*`
//! - Class, ID, placeholder and parent selectors: `.class`, `#id`, `%name`, `&`
//! - Attribute selectors: `[href]`, `[ns|type="text" i]` with `= ~= |= ^= $= *=`
//! - Pseudo-classes and pseudo-elements, with raw arguments (`:nth-child(2n+1)`)
//!   or selector arguments (`:not(.a, .b)`)
//! - Combinators `' ' > + ~`, the reference combinator `/for/`, leading and
//!   trailing combinators
//! - Line breaks after commas, recorded on the following alternative

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::ParseError;
use crate::selector::{
    AttributeMatcher, AttributeOperator, AttributeSelector, Combinator, ComplexSelector,
    CompoundSelector, Namespace, PseudoArgument, PseudoSelector, SelectorList, SimpleSelector,
};

/// Pseudo-classes whose argument is a selector list.
const SELECTOR_PSEUDOS: &[&str] = &[
    "not",
    "matches",
    "is",
    "where",
    "any",
    "-moz-any",
    "-webkit-any",
    "has",
    "host",
    "host-context",
    "current",
];

/// Pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: &[&str] = &["before", "after", "first-line", "first-letter"];

/// Parse a comma-separated selector list.
///
/// # Errors
/// Returns a [`ParseError`] if any alternative is empty or malformed.
pub fn parse_selector_list(input: &str) -> Result<SelectorList, ParseError> {
    parse_selector_list_at(input, 0)
}

/// [`parse_selector_list`] for text that starts `base` bytes into a larger
/// source; error offsets are relative to that source.
pub(crate) fn parse_selector_list_at(input: &str, base: usize) -> Result<SelectorList, ParseError> {
    let mut parser = SelectorParser::new(input, base);
    let list = parser.selector_list()?;
    parser.expect_end()?;
    Ok(list)
}

/// Parse a single complex selector.
///
/// # Errors
/// Returns a [`ParseError`] if the input is malformed or is a list.
pub fn parse_complex(input: &str) -> Result<ComplexSelector, ParseError> {
    let mut parser = SelectorParser::new(input, 0);
    let _ = parser.skip_whitespace();
    let complex = parser.complex_selector()?;
    parser.expect_end()?;
    Ok(complex)
}

/// Parse a single compound selector.
///
/// # Errors
/// Returns a [`ParseError`] if the input is malformed or has combinators.
pub fn parse_compound(input: &str) -> Result<CompoundSelector, ParseError> {
    let mut parser = SelectorParser::new(input, 0);
    let _ = parser.skip_whitespace();
    let compound = parser.compound_selector()?;
    let _ = parser.skip_whitespace();
    parser.expect_end()?;
    Ok(compound)
}

/// Check if a character can start an identifier.
/// [§ 4.3.10 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue an identifier.
/// [§ 4.3.9 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_char(c: char) -> bool {
    is_ident_start_char(c) || c.is_ascii_digit() || c == '-'
}

/// Characters that end a compound selector.
const fn ends_compound(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, ',' | '>' | '+' | '~' | '/' | ')' | '{')
}

struct SelectorParser<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Offset of `input` within the text reported in errors.
    base: usize,
}

impl<'a> SelectorParser<'a> {
    fn new(input: &'a str, base: usize) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            base,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Byte offset of the next character, or of the end of input.
    fn offset(&mut self) -> usize {
        self.base
            + self
                .chars
                .peek()
                .map_or(self.input.len(), |&(offset, _)| offset)
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if(|&(_, c)| c == expected).is_some()
    }

    fn unexpected(&mut self, expected: &'static str) -> ParseError {
        let offset = self.offset();
        match self.peek() {
            Some(ch) => ParseError::UnexpectedChar { ch, offset },
            None => ParseError::UnexpectedEnd { expected },
        }
    }

    fn expect(&mut self, expected: char, description: &'static str) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else {
            Err(self.unexpected(description))
        }
    }

    fn expect_end(&mut self) -> Result<(), ParseError> {
        let _ = self.skip_whitespace();
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of selector")),
        }
    }

    /// Skip whitespace, returning whether a line break was among it.
    fn skip_whitespace(&mut self) -> bool {
        let mut line_feed = false;
        while let Some((_, c)) = self.chars.next_if(|&(_, c)| c.is_ascii_whitespace()) {
            line_feed |= c == '\n';
        }
        line_feed
    }

    fn selector_list(&mut self) -> Result<SelectorList, ParseError> {
        let mut list = SelectorList::new();
        let mut line_feed = self.skip_whitespace();
        loop {
            let mut complex = self.complex_selector()?;
            complex.set_line_feed(line_feed && !list.is_empty());
            list.push(complex);
            if !self.eat(',') {
                return Ok(list);
            }
            line_feed = self.skip_whitespace();
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// "A complex selector is a chain of one or more compound selectors
    /// separated by combinators."
    fn complex_selector(&mut self) -> Result<ComplexSelector, ParseError> {
        let start = self.offset();
        let mut links: Vec<(Option<CompoundSelector>, Combinator)> = Vec::new();
        loop {
            let _ = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',' | ')' | '{') => break,
                Some('>') => Some(Combinator::Child),
                Some('+') => Some(Combinator::Adjacent),
                Some('~') => Some(Combinator::GeneralSibling),
                Some('/') => None,
                Some(_) => {
                    let compound = self.compound_selector()?;
                    links.push((Some(compound), Combinator::Descendant));
                    continue;
                }
            };
            let combinator = match combinator {
                Some(combinator) => {
                    let _ = self.chars.next();
                    combinator
                }
                None => self.reference_combinator()?,
            };
            // Two combinators in a row get an empty link between them.
            match links.last_mut() {
                Some((Some(_), last)) if *last == Combinator::Descendant => *last = combinator,
                _ => links.push((None, combinator)),
            }
        }
        ComplexSelector::from_links(links).ok_or(ParseError::EmptySelector { offset: start })
    }

    /// `/name/`
    fn reference_combinator(&mut self) -> Result<Combinator, ParseError> {
        let start = self.offset();
        self.expect('/', "'/'")?;
        let name = self.identifier()?;
        if !self.eat('/') {
            return Err(ParseError::Unterminated {
                what: "reference combinator",
                offset: start,
            });
        }
        Ok(Combinator::Reference(name))
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn compound_selector(&mut self) -> Result<CompoundSelector, ParseError> {
        let mut compound = CompoundSelector::new();
        while let Some(c) = self.peek() {
            if ends_compound(c) {
                break;
            }
            compound.push(self.simple_selector()?);
        }
        if compound.is_empty() {
            return Err(self.unexpected("a selector"));
        }
        Ok(compound)
    }

    fn simple_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        match self.peek() {
            // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
            Some('.') => {
                let _ = self.chars.next();
                Ok(SimpleSelector::Class(self.identifier()?))
            }
            // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
            Some('#') => {
                let _ = self.chars.next();
                Ok(SimpleSelector::Id(self.name()?))
            }
            Some('%') => {
                let _ = self.chars.next();
                Ok(SimpleSelector::Placeholder(self.identifier()?))
            }
            Some('&') => {
                let _ = self.chars.next();
                Ok(SimpleSelector::Parent)
            }
            Some('[') => self.attribute_selector().map(SimpleSelector::Attribute),
            Some(':') => self.pseudo_selector(),
            Some(_) => self.element_selector(),
            None => Err(ParseError::UnexpectedEnd {
                expected: "a simple selector",
            }),
        }
    }

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors),
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// and their namespace prefixes.
    fn element_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        let namespace = if self.eat('|') {
            Namespace::Empty
        } else {
            let first = self.name_or_star()?;
            if !self.at_namespace_separator() {
                return Ok(match first {
                    None => SimpleSelector::universal(),
                    Some(name) => SimpleSelector::type_selector(name),
                });
            }
            let _ = self.chars.next();
            first.map_or(Namespace::Any, Namespace::Named)
        };
        Ok(match self.name_or_star()? {
            None => SimpleSelector::Universal(namespace),
            Some(name) => SimpleSelector::Type { namespace, name },
        })
    }

    /// `*` as `None`, an identifier as `Some`.
    fn name_or_star(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat('*') {
            Ok(None)
        } else {
            self.identifier().map(Some)
        }
    }

    /// A `|` that separates a namespace, not the start of `|=`.
    fn at_namespace_separator(&mut self) -> bool {
        let mut lookahead = self.chars.clone();
        matches!(lookahead.next(), Some((_, '|'))) && !matches!(lookahead.next(), Some((_, '=')))
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    fn attribute_selector(&mut self) -> Result<AttributeSelector, ParseError> {
        let start = self.offset();
        self.expect('[', "'['")?;
        let _ = self.skip_whitespace();

        let (namespace, name) = if self.eat('|') {
            (Namespace::Empty, self.identifier()?)
        } else {
            let first = self.name_or_star()?;
            if self.at_namespace_separator() {
                let _ = self.chars.next();
                (first.map_or(Namespace::Any, Namespace::Named), self.identifier()?)
            } else {
                let Some(name) = first else {
                    return Err(self.unexpected("an attribute name"));
                };
                (Namespace::Implicit, name)
            }
        };
        let _ = self.skip_whitespace();

        let matcher = if self.eat(']') {
            None
        } else {
            let operator = self.attribute_operator()?;
            let _ = self.skip_whitespace();
            let value = self.attribute_value(start)?;
            let _ = self.skip_whitespace();
            let modifier = self
                .chars
                .next_if(|&(_, c)| c.is_ascii_alphabetic())
                .map(|(_, c)| c);
            let _ = self.skip_whitespace();
            if !self.eat(']') {
                return Err(match self.peek() {
                    None => ParseError::Unterminated {
                        what: "attribute selector",
                        offset: start,
                    },
                    Some(_) => self.unexpected("']'"),
                });
            }
            Some(AttributeMatcher {
                operator,
                value,
                modifier,
            })
        };
        Ok(AttributeSelector {
            namespace,
            name,
            matcher,
        })
    }

    fn attribute_operator(&mut self) -> Result<AttributeOperator, ParseError> {
        let operator = match self.peek() {
            Some('=') => {
                let _ = self.chars.next();
                return Ok(AttributeOperator::Equals);
            }
            Some('~') => AttributeOperator::Includes,
            Some('|') => AttributeOperator::DashMatch,
            Some('^') => AttributeOperator::Prefix,
            Some('$') => AttributeOperator::Suffix,
            Some('*') => AttributeOperator::Substring,
            _ => return Err(self.unexpected("an attribute operator")),
        };
        let _ = self.chars.next();
        self.expect('=', "'='")?;
        Ok(operator)
    }

    /// A quoted string (kept with its quotes) or an identifier.
    fn attribute_value(&mut self, start: usize) -> Result<String, ParseError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.chars.next();
                let mut value = String::from(quote);
                while let Some((_, c)) = self.chars.next() {
                    value.push(c);
                    if c == '\\' {
                        if let Some((_, escaped)) = self.chars.next() {
                            value.push(escaped);
                        }
                    } else if c == quote {
                        return Ok(value);
                    }
                }
                Err(ParseError::Unterminated {
                    what: "string",
                    offset: start,
                })
            }
            Some(_) => self.name(),
            None => Err(ParseError::Unterminated {
                what: "attribute selector",
                offset: start,
            }),
        }
    }

    /// [§ 3.5 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes),
    /// [§ 3.6 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-element-syntax)
    fn pseudo_selector(&mut self) -> Result<SimpleSelector, ParseError> {
        self.expect(':', "':'")?;
        let double_colon = self.eat(':');
        let name = self.identifier()?;
        let is_element = double_colon || LEGACY_PSEUDO_ELEMENTS.contains(&name.as_str());

        let mut pseudo = PseudoSelector::new(name);
        if self.peek() == Some('(') {
            let (argument, argument_offset) = self.parenthesized()?;
            let takes_selector = !is_element
                && SELECTOR_PSEUDOS.contains(&pseudo.name.to_ascii_lowercase().as_str());
            pseudo.argument = Some(if takes_selector {
                let mut inner = SelectorParser::new(argument, argument_offset);
                let list = inner.selector_list()?;
                inner.expect_end()?;
                PseudoArgument::Selector(list)
            } else {
                PseudoArgument::Raw(argument.trim().to_string())
            });
        }

        Ok(if is_element {
            SimpleSelector::PseudoElement(pseudo)
        } else {
            SimpleSelector::PseudoClass(pseudo)
        })
    }

    /// The text between balanced parentheses and its offset.
    fn parenthesized(&mut self) -> Result<(&'a str, usize), ParseError> {
        let open = self.offset();
        self.expect('(', "'('")?;
        let start = self.offset() - self.base;
        let mut depth = 1_u32;
        let mut quote: Option<char> = None;
        while let Some((offset, c)) = self.chars.next() {
            match (quote, c) {
                (Some(_), '\\') => {
                    let _ = self.chars.next();
                }
                (Some(open_quote), _) if c == open_quote => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '(') => depth += 1,
                (None, ')') => {
                    depth -= 1;
                    if depth == 0 {
                        let input = self.input;
                        return Ok((&input[start..offset], self.base + start));
                    }
                }
                (None, _) => {}
            }
        }
        Err(ParseError::Unterminated {
            what: "pseudo-class argument",
            offset: open,
        })
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    ///
    /// An identifier: optional leading hyphens, an ident-start character,
    /// then ident characters. Backslash escapes are kept verbatim.
    fn identifier(&mut self) -> Result<String, ParseError> {
        let mut ident = String::new();
        while self.eat('-') {
            ident.push('-');
        }
        let starts_ident = matches!(self.peek(), Some(c) if is_ident_start_char(c) || c == '\\');
        if ident.len() < 2 && !starts_ident {
            return Err(self.unexpected("an identifier"));
        }
        self.consume_name_chars(&mut ident);
        Ok(ident)
    }

    /// A run of ident characters that may start with a digit (`#1a`).
    fn name(&mut self) -> Result<String, ParseError> {
        let mut name = String::new();
        self.consume_name_chars(&mut name);
        if name.is_empty() {
            return Err(self.unexpected("a name"));
        }
        Ok(name)
    }

    fn consume_name_chars(&mut self, into: &mut String) {
        while let Some((_, c)) = self
            .chars
            .next_if(|&(_, c)| is_ident_char(c) || c == '\\')
        {
            into.push(c);
            if c == '\\' {
                if let Some((_, escaped)) = self.chars.next() {
                    into.push(escaped);
                }
            }
        }
    }
}
