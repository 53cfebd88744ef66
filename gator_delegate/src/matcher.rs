// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selector matching: native when the host offers it, a restricted fallback otherwise.
//!
//! The fallback understands exactly one simple selector:
//!
//! - `.name`: the class attribute contains `name` as a whole whitespace-separated token,
//! - `#name`: the id attribute equals `name`,
//! - `name`: the tag name equals `name`, ignoring ASCII case.
//!
//! Anything else (`li.a`, `ul > li`, `[href]`) never matches under the fallback.

use crate::config::MatcherPreference;
use crate::types::{Capabilities, ElementLookup, Host};

/// Which matching strategy a delegator uses. Resolved once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SelectorMatcher {
    /// Defer to [`Host::matches_selector`].
    Native,
    /// Use [`SimpleSelector`].
    Fallback,
}

impl SelectorMatcher {
    /// Pick a matcher from the host capabilities and the configured preference.
    pub fn resolve(caps: Capabilities, preference: MatcherPreference) -> Self {
        match preference {
            MatcherPreference::Auto if caps.contains(Capabilities::NATIVE_MATCHES) => Self::Native,
            _ => Self::Fallback,
        }
    }

    /// Whether `node` matches `selector`.
    pub fn matches<K, H: Host<K>>(self, host: &H, node: &K, selector: &str) -> bool {
        match self {
            Self::Native => host.matches_selector(node, selector),
            Self::Fallback => {
                SimpleSelector::parse(selector).is_some_and(|s| s.matches(host, node))
            }
        }
    }
}

/// A single class, id, or tag selector.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SimpleSelector<'a> {
    /// `.name`
    Class(&'a str),
    /// `#name`
    Id(&'a str),
    /// `name`
    Tag(&'a str),
}

impl<'a> SimpleSelector<'a> {
    /// Parse `selector`; `None` for anything outside the fallback syntax.
    pub fn parse(selector: &'a str) -> Option<Self> {
        let (ctor, name): (fn(&'a str) -> Self, &'a str) =
            if let Some(rest) = selector.strip_prefix('.') {
                (Self::Class, rest)
            } else if let Some(rest) = selector.strip_prefix('#') {
                (Self::Id, rest)
            } else {
                (Self::Tag, selector)
            };
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_alphanumeric() || c == '-' || c == '_');
        valid.then(|| ctor(name))
    }

    /// Evaluate against the element attributes of `node`.
    pub fn matches<K>(self, elements: &impl ElementLookup<K>, node: &K) -> bool {
        match self {
            Self::Class(token) => elements
                .class_name(node)
                .is_some_and(|c| c.split_ascii_whitespace().any(|t| t == token)),
            Self::Id(id) => elements.id(node) == Some(id),
            Self::Tag(tag) => elements
                .tag_name(node)
                .is_some_and(|t| t.eq_ignore_ascii_case(tag)),
        }
    }
}
