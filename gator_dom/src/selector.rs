// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector engine: the document's native `matches` capability.
//!
//! ## Supported syntax
//!
//! - Selector lists separated by `,`.
//! - Compound selectors made of an optional type (`li`, `*`) followed by any number of
//!   `#id` and `.class` parts.
//! - Descendant (whitespace) and child (`>`) combinators.
//!
//! Anything else (attribute selectors, pseudo-classes, sibling combinators) is rejected with a
//! [`SelectorError`], the way a browser raises a syntax error from `Element.matches`.

use core::iter::Peekable;
use core::str::CharIndices;

use thiserror::Error;

use crate::Document;
use crate::types::{ElementData, NodeId};

/// Errors produced while parsing a selector.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector (or one entry of a selector list) is empty.
    #[error("empty selector")]
    Empty,
    /// A `#` or `.` was not followed by a name.
    #[error("missing name after `{0}` at byte {1}")]
    EmptyName(char, usize),
    /// A character outside the supported syntax.
    #[error("unexpected `{0}` at byte {1}")]
    Unexpected(char, usize),
    /// A combinator without a compound selector on one side.
    #[error("dangling combinator")]
    DanglingCombinator,
}

/// A parsed selector list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorList(Vec<Complex>);

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    // `combinators[i]` sits between `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    ids: Vec<String>,
    classes: Vec<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

type Chars<'a> = Peekable<CharIndices<'a>>;

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn take_name(chars: &mut Chars<'_>) -> String {
    let mut name = String::new();
    while let Some(&(_, c)) = chars.peek() {
        if !is_name_char(c) {
            break;
        }
        name.push(c);
        chars.next();
    }
    name
}

impl SelectorList {
    /// Parse a selector list.
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        input
            .split(',')
            .map(Complex::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Whether `node` in `doc` matches any selector of the list.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.0.iter().any(|c| c.matches(doc, node))
    }
}

impl Complex {
    fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut chars = input.char_indices().peekable();
        let mut compounds = Vec::new();
        let mut combinators = Vec::new();
        let mut pending: Option<Combinator> = None;
        loop {
            while chars.peek().is_some_and(|&(_, c)| c.is_whitespace()) {
                chars.next();
            }
            match chars.peek() {
                None => break,
                Some(&(_, '>')) => {
                    chars.next();
                    if compounds.is_empty() || pending == Some(Combinator::Child) {
                        return Err(SelectorError::DanglingCombinator);
                    }
                    pending = Some(Combinator::Child);
                }
                Some(_) => {
                    if !compounds.is_empty() {
                        combinators.push(pending.take().unwrap_or(Combinator::Descendant));
                    }
                    compounds.push(Compound::parse(&mut chars)?);
                }
            }
        }
        if pending.is_some() {
            return Err(SelectorError::DanglingCombinator);
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Self {
            compounds,
            combinators,
        })
    }

    fn matches(&self, doc: &Document, node: NodeId) -> bool {
        self.matches_from(doc, node, self.compounds.len() - 1)
    }

    // Right-to-left with backtracking over descendant combinators.
    fn matches_from(&self, doc: &Document, node: NodeId, i: usize) -> bool {
        let Some(el) = doc.element(node) else {
            return false;
        };
        if !self.compounds[i].matches(el) {
            return false;
        }
        if i == 0 {
            return true;
        }
        match self.combinators[i - 1] {
            Combinator::Child => doc
                .parent(node)
                .is_some_and(|p| self.matches_from(doc, p, i - 1)),
            Combinator::Descendant => {
                let mut cur = doc.parent(node);
                while let Some(p) = cur {
                    if self.matches_from(doc, p, i - 1) {
                        return true;
                    }
                    cur = doc.parent(p);
                }
                false
            }
        }
    }
}

impl Compound {
    fn parse(chars: &mut Chars<'_>) -> Result<Self, SelectorError> {
        let mut out = Self::default();
        match chars.peek() {
            Some(&(_, '*')) => {
                chars.next();
            }
            Some(&(_, c)) if is_name_char(c) => {
                out.tag = Some(take_name(chars).to_ascii_uppercase());
            }
            _ => {}
        }
        while let Some(&(pos, c)) = chars.peek() {
            match c {
                '#' | '.' => {
                    chars.next();
                    let name = take_name(chars);
                    if name.is_empty() {
                        return Err(SelectorError::EmptyName(c, pos));
                    }
                    if c == '#' {
                        out.ids.push(name);
                    } else {
                        out.classes.push(name);
                    }
                }
                '>' => break,
                c if c.is_whitespace() => break,
                c => return Err(SelectorError::Unexpected(c, pos)),
            }
        }
        Ok(out)
    }

    fn matches(&self, el: &ElementData) -> bool {
        if let Some(tag) = &self.tag
            && *tag != el.tag
        {
            return false;
        }
        self.ids.iter().all(|id| el.id.as_deref() == Some(id.as_str()))
            && self.classes.iter().all(|c| el.has_class(c))
    }
}
