// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Ancestor walk from an event target towards the bound element.
//!
//! Only strict descendants of the bound element can match: the walk stops as soon as it
//! reaches the bound element, and also when a node has no parent (the target was outside the
//! bound element's subtree, or the document root was reached).

use crate::types::{Match, ParentLookup};

/// Walk from `target` upwards and return the first node accepted by `is_match`.
///
/// `distance` counts parent hops from `target`. The bound element itself is never offered to
/// `is_match`.
pub fn resolve_match<K: Clone + PartialEq>(
    target: &K,
    bound: &K,
    parents: &impl ParentLookup<K>,
    mut is_match: impl FnMut(&K) -> bool,
) -> Option<Match<K>> {
    let mut cur = target.clone();
    let mut distance = 0;
    loop {
        if cur == *bound {
            return None;
        }
        if is_match(&cur) {
            return Some(Match {
                node: cur,
                distance,
            });
        }
        cur = parents.parent_of(&cur)?;
        distance += 1;
    }
}

/// Number of parent hops from `target` up to `bound`, or `None` if `bound` is not an
/// inclusive ancestor of `target`.
pub fn distance_to_bound<K: Clone + PartialEq>(
    target: &K,
    bound: &K,
    parents: &impl ParentLookup<K>,
) -> Option<usize> {
    let mut cur = target.clone();
    let mut distance = 0;
    while cur != *bound {
        cur = parents.parent_of(&cur)?;
        distance += 1;
    }
    Some(distance)
}
