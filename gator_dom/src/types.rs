// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the document: node identifiers and element data.

/// Identifier for a node in a [`Document`](crate::Document).
///
/// A small, copyable handle made of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// Equality is identity: two `NodeId`s are equal only if they name the same live slot
/// and generation, so a stale handle never aliases a newer element.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }

    /// Slot index, stable for the lifetime of the node.
    pub const fn slot(self) -> u32 {
        self.0
    }

    /// Generation of the slot when this handle was issued.
    pub const fn generation(self) -> u32 {
        self.1
    }
}

/// Element data supplied on insert.
///
/// Tag names are stored upper-cased, the way HTML documents report `tagName`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementData {
    /// Upper-cased tag name.
    pub tag: String,
    /// Value of the `id` attribute, if any.
    pub id: Option<String>,
    /// Raw value of the `class` attribute (whitespace-separated tokens).
    pub class_name: String,
}

impl ElementData {
    /// Element with the given tag and no attributes.
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_uppercase(),
            id: None,
            class_name: String::new(),
        }
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn with_class(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_owned();
        self
    }

    /// Whether the class attribute contains `token` as a whole word.
    pub fn has_class(&self, token: &str) -> bool {
        !token.is_empty() && self.class_name.split_ascii_whitespace().any(|c| c == token)
    }
}
