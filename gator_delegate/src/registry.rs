// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler registry: (element, event type, selector) → callbacks in registration order.
//!
//! Every added callback gets a sequence number from a registry-wide counter, so ordering by
//! sequence number is registration order even across selectors. Empty selector buckets and
//! empty event types are pruned on removal, which makes "is this pair registered" a plain
//! lookup.

use std::collections::HashMap;

use crate::types::{ElementKey, Selector};

/// One registered callback.
#[derive(Clone, Debug)]
pub(crate) struct Entry<C> {
    pub(crate) seq: u64,
    pub(crate) callback: C,
}

/// Callbacks sharing a selector, oldest first.
#[derive(Clone, Debug)]
pub(crate) struct Bucket<C> {
    pub(crate) selector: Selector,
    pub(crate) entries: Vec<Entry<C>>,
}

/// What to remove for an (element, event type) pair.
#[derive(Debug)]
pub(crate) enum Removal<'a, C> {
    /// The first registration of `callback` under `selector`.
    Callback(&'a Selector, &'a C),
    /// Every callback under `selector`.
    Selector(&'a Selector),
    /// Everything registered for the event type.
    EventType,
}

impl<C> Clone for Removal<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Removal<'_, C> {}

#[derive(Clone, Debug)]
pub(crate) struct Registry<C> {
    elements: HashMap<ElementKey, HashMap<String, Vec<Bucket<C>>>>,
    next_seq: u64,
}

impl<C> Default for Registry<C> {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<C: PartialEq> Registry<C> {
    /// Register `callback` after everything already registered.
    pub(crate) fn add(
        &mut self,
        key: ElementKey,
        event_type: &str,
        selector: Selector,
        callback: C,
    ) {
        let seq = self.next_seq;
        self.next_seq += 1;
        let buckets = self
            .elements
            .entry(key)
            .or_default()
            .entry(event_type.to_owned())
            .or_default();
        let entry = Entry { seq, callback };
        match buckets.iter_mut().find(|b| b.selector == selector) {
            Some(bucket) => bucket.entries.push(entry),
            None => buckets.push(Bucket {
                selector,
                entries: vec![entry],
            }),
        }
    }

    /// Remove registrations. Returns how many callbacks were dropped; unknown keys are a no-op.
    pub(crate) fn remove(
        &mut self,
        key: ElementKey,
        event_type: &str,
        removal: Removal<'_, C>,
    ) -> usize {
        let Some(types) = self.elements.get_mut(&key) else {
            return 0;
        };
        let Some(buckets) = types.get_mut(event_type) else {
            return 0;
        };
        let drop_type = matches!(removal, Removal::EventType);
        let removed = match removal {
            Removal::EventType => buckets.iter().map(|b| b.entries.len()).sum(),
            Removal::Selector(selector) => {
                let Some(i) = buckets.iter().position(|b| b.selector == *selector) else {
                    return 0;
                };
                buckets.remove(i).entries.len()
            }
            Removal::Callback(selector, callback) => {
                let Some(bucket) = buckets.iter_mut().find(|b| b.selector == *selector) else {
                    return 0;
                };
                let Some(i) = bucket.entries.iter().position(|e| e.callback == *callback) else {
                    return 0;
                };
                bucket.entries.remove(i);
                buckets.retain(|b| !b.entries.is_empty());
                1
            }
        };
        if drop_type || buckets.is_empty() {
            types.remove(event_type);
        }
        if types.is_empty() {
            self.elements.remove(&key);
        }
        removed
    }

    /// Buckets registered for the pair, in first-registration order.
    pub(crate) fn buckets(&self, key: ElementKey, event_type: &str) -> &[Bucket<C>] {
        self.elements
            .get(&key)
            .and_then(|types| types.get(event_type))
            .map_or(&[], Vec::as_slice)
    }

    pub(crate) fn is_registered(&self, key: ElementKey, event_type: &str) -> bool {
        self.elements
            .get(&key)
            .is_some_and(|types| types.contains_key(event_type))
    }

    /// Event types with at least one registration on `key`.
    pub(crate) fn event_types(&self, key: ElementKey) -> Vec<String> {
        self.elements
            .get(&key)
            .map(|types| types.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Total number of registered callbacks.
    pub(crate) fn len(&self) -> usize {
        self.elements
            .values()
            .flat_map(HashMap::values)
            .flatten()
            .map(|b| b.entries.len())
            .sum()
    }

    pub(crate) fn clear(&mut self) {
        self.elements.clear();
    }
}
