//! CSS selector parsing and matching for target lookup.
//!
//! Supports the subset widgets need to find their trigger elements:
//! - `"li"`, `"*"` - by tag
//! - `"#task-3"` - by id
//! - `".task-item"` - by class, compounds like `"li.task.done"`
//! - `"[data-kind]"`, `"[data-kind='card']"` - by attribute
//! - `"ul .item"` / `"ul > li"` - descendant and child combinators
//! - `"a, b"` - selector groups

use crate::error::SelectorError;
use std::str::FromStr;

/// Read access to an element tree, as needed to evaluate selectors.
pub trait ElementTree {
    /// Node handle.
    type Node: Clone;

    /// Lower-case tag name, `None` for non-element nodes.
    fn tag_name(&self, node: &Self::Node) -> Option<String>;

    /// Attribute value.
    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// Whether the element's class list contains `class`.
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Parent element, `None` at the root.
    fn parent_element(&self, node: &Self::Node) -> Option<Self::Node>;
}

/// Attribute condition inside a compound selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    /// Attribute name
    pub name: String,
    /// Required value, `None` for a presence test
    pub value: Option<String>,
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    /// Tag name, `None` for any element
    pub tag: Option<String>,
    /// Required id
    pub id: Option<String>,
    /// Required classes
    pub classes: Vec<String>,
    /// Required attributes
    pub attributes: Vec<AttributeMatch>,
}

impl Compound {
    fn matches<T: ElementTree>(&self, tree: &T, node: &T::Node) -> bool {
        let Some(tag) = tree.tag_name(node) else {
            return false;
        };
        if let Some(ref wanted) = self.tag {
            if !wanted.eq_ignore_ascii_case(&tag) {
                return false;
            }
        }
        if let Some(ref id) = self.id {
            if tree.attribute(node, "id").as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        if !self.classes.iter().all(|c| tree.has_class(node, c)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            let actual = tree.attribute(node, &attr.name);
            match attr.value {
                Some(ref value) => actual.as_deref() == Some(value.as_str()),
                None => actual.is_some(),
            }
        })
    }
}

/// How two compounds relate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: any ancestor
    Descendant,
    /// `>`: direct parent
    Child,
}

/// Compounds joined by combinators, e.g. `ul.menu > li`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Complex {
    /// Compounds from left to right
    pub parts: Vec<Compound>,
    /// `combinators[i]` joins `parts[i]` and `parts[i + 1]`
    pub combinators: Vec<Combinator>,
}

impl Complex {
    fn matches<T: ElementTree>(&self, tree: &T, node: &T::Node) -> bool {
        self.parts
            .len()
            .checked_sub(1)
            .is_some_and(|last| self.match_from(tree, last, node))
    }

    fn match_from<T: ElementTree>(&self, tree: &T, idx: usize, node: &T::Node) -> bool {
        if !self.parts[idx].matches(tree, node) {
            return false;
        }
        if idx == 0 {
            return true;
        }
        match self.combinators[idx - 1] {
            Combinator::Child => tree
                .parent_element(node)
                .is_some_and(|parent| self.match_from(tree, idx - 1, &parent)),
            Combinator::Descendant => {
                let mut current = tree.parent_element(node);
                while let Some(ancestor) = current {
                    if self.match_from(tree, idx - 1, &ancestor) {
                        return true;
                    }
                    current = tree.parent_element(&ancestor);
                }
                false
            }
        }
    }
}

/// Parsed selector group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector string.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        SelectorParser::new(input).parse()
    }

    /// The comma-separated alternatives of this group.
    #[must_use]
    pub fn alternatives(&self) -> &[Complex] {
        &self.alternatives
    }

    /// Check if this selector matches an element.
    pub fn matches<T: ElementTree>(&self, tree: &T, node: &T::Node) -> bool {
        self.alternatives.iter().any(|alt| alt.matches(tree, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Selector parser.
pub struct SelectorParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> SelectorParser<'a> {
    /// Create a new parser.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Parse the selector.
    pub fn parse(&mut self) -> Result<Selector, SelectorError> {
        self.skip_whitespace();

        if self.peek_char().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = Vec::new();
        loop {
            alternatives.push(self.parse_complex()?);
            self.skip_whitespace();
            match self.peek_char() {
                None => break,
                Some(',') => {
                    self.advance();
                    self.skip_whitespace();
                    if self.peek_char().is_none() {
                        return Err(SelectorError::DanglingCombinator);
                    }
                }
                Some(c) => return Err(SelectorError::UnexpectedChar(c)),
            }
        }

        Ok(Selector { alternatives })
    }

    fn parse_complex(&mut self) -> Result<Complex, SelectorError> {
        let mut parts = vec![self.parse_compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            match self.peek_char() {
                None | Some(',') => break,
                Some('>') => {
                    self.advance();
                    self.skip_whitespace();
                    combinators.push(Combinator::Child);
                    parts.push(self.parse_compound()?);
                }
                Some(_) if had_whitespace => {
                    combinators.push(Combinator::Descendant);
                    parts.push(self.parse_compound()?);
                }
                Some(c) => return Err(SelectorError::UnexpectedChar(c)),
            }
        }

        Ok(Complex { parts, combinators })
    }

    fn parse_compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        let mut consumed = false;

        match self.peek_char() {
            Some('*') => {
                self.advance();
                consumed = true;
            }
            Some(c) if c.is_alphabetic() => {
                compound.tag = Some(self.read_identifier()?.to_ascii_lowercase());
                consumed = true;
            }
            _ => {}
        }

        loop {
            match self.peek_char() {
                Some('#') => {
                    self.advance(); // Skip '#'
                    compound.id = Some(self.read_identifier()?);
                }
                Some('.') => {
                    self.advance(); // Skip '.'
                    compound.classes.push(self.read_identifier()?);
                }
                Some('[') => compound.attributes.push(self.parse_attribute()?),
                _ => break,
            }
            consumed = true;
        }

        if consumed {
            return Ok(compound);
        }

        Err(match self.peek_char() {
            None | Some('>' | ',') => SelectorError::DanglingCombinator,
            Some(c) => SelectorError::UnexpectedChar(c),
        })
    }

    fn parse_attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.advance(); // Skip '['

        let name = self.read_until_any(&['=', ']']).trim().to_string();
        if name.is_empty() {
            return Err(SelectorError::InvalidAttribute);
        }

        let value = if self.peek_char() == Some('=') {
            self.advance(); // Skip '='

            let quote = self.peek_char().filter(|c| *c == '\'' || *c == '"');
            if let Some(q) = quote {
                self.advance();
                let value = self.read_until_any(&[q]);
                if self.peek_char() != Some(q) {
                    return Err(SelectorError::UnclosedAttribute);
                }
                self.advance();
                Some(value)
            } else {
                Some(self.read_until_any(&[']']).trim().to_string())
            }
        } else {
            None
        };

        // Skip ']'
        if self.peek_char() != Some(']') {
            return Err(SelectorError::UnclosedAttribute);
        }
        self.advance();

        Ok(AttributeMatch { name, value })
    }

    fn read_identifier(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        if self.pos == start {
            return Err(SelectorError::ExpectedIdentifier);
        }

        Ok(self.input[start..self.pos].to_string())
    }

    fn read_until_any(&mut self, stops: &[char]) -> String {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if stops.contains(&c) {
                break;
            }
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos != start
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }
}
