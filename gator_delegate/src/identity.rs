// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element table: assigns each node a stable [`ElementKey`] on first sight.

use std::collections::HashMap;
use std::hash::Hash;

use crate::types::ElementKey;

/// Identity-keyed side table from nodes to [`ElementKey`]s.
#[derive(Clone, Debug)]
pub(crate) struct ElementTable<K> {
    keys: HashMap<K, ElementKey>,
    nodes: Vec<K>,
}

impl<K> Default for ElementTable<K> {
    fn default() -> Self {
        Self {
            keys: HashMap::new(),
            nodes: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> ElementTable<K> {
    /// Key for `node`, assigning the next one if the node is new.
    pub(crate) fn key_for(&mut self, node: &K) -> ElementKey {
        if let Some(&key) = self.keys.get(node) {
            return key;
        }
        #[allow(
            clippy::cast_possible_truncation,
            reason = "ElementKey ids are 32-bit."
        )]
        let key = ElementKey(self.nodes.len() as u32);
        self.keys.insert(node.clone(), key);
        self.nodes.push(node.clone());
        key
    }

    /// Key for `node` if it has been seen.
    pub(crate) fn lookup(&self, node: &K) -> Option<ElementKey> {
        self.keys.get(node).copied()
    }

    /// Node registered under `key`.
    pub(crate) fn node(&self, key: ElementKey) -> Option<&K> {
        self.nodes.get(key.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_and_sequential() {
        let mut t = ElementTable::default();
        let a = t.key_for(&"a");
        let b = t.key_for(&"b");
        assert_eq!(a.get(), 0);
        assert_eq!(b.get(), 1);
        assert_eq!(t.key_for(&"a"), a);
        assert_eq!(t.node(b), Some(&"b"));
        assert_eq!(t.node(ElementKey(2)), None);
    }

    #[test]
    fn lookup_does_not_assign() {
        let mut t = ElementTable::default();
        assert_eq!(t.lookup(&7_u32), None);
        assert_eq!(t.node(ElementKey(0)), None);
        let k = t.key_for(&7);
        assert_eq!(t.lookup(&7), Some(k));
        assert_eq!(t.node(ElementKey(1)), None);
    }
}
