// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for delegation: selectors, outcomes, capabilities, and the host traits.
//!
//! ## Overview
//!
//! These types describe the contract between the delegator and the host DOM.
//! The host supplies tree structure ([`ParentLookup`]), element attributes ([`ElementLookup`]),
//! native listener attachment and selector matching ([`Host`]), and the event object
//! ([`NativeEvent`]). Everything else lives in the [`delegator`](crate::delegator).

/// Listener phase requested from the host when attaching a native listener.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Phase {
    /// Parent-to-target traversal; sees events that do not bubble.
    Capture,
    /// Target-to-parent traversal.
    Bubble,
}

/// Callback outcome controlling the rest of a firing.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Outcome {
    /// Keep invoking the remaining matches.
    #[default]
    Continue,
    /// Stop invoking, prevent the default action, and stop native propagation.
    Cancel,
}

impl From<bool> for Outcome {
    /// `false` is the cancellation sentinel.
    fn from(keep_going: bool) -> Self {
        if keep_going {
            Self::Continue
        } else {
            Self::Cancel
        }
    }
}

impl From<()> for Outcome {
    fn from((): ()) -> Self {
        Self::Continue
    }
}

bitflags::bitflags! {
    /// Platform capabilities, probed once per [`Delegator`](crate::delegator::Delegator).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// The host can attach native event listeners at all.
        const LISTENERS      = 0b0000_0001;
        /// Listeners may run in the capture phase.
        const CAPTURE        = 0b0000_0010;
        /// [`Host::matches_selector`] evaluates full selectors.
        const NATIVE_MATCHES = 0b0000_0100;
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

/// Which nodes a registration is scoped to.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Selector {
    /// The bound element itself; no ancestor walk.
    Root,
    /// Descendants of the bound element matching this selector.
    Css(String),
}

impl Selector {
    /// Returns the selector text, or `None` for [`Selector::Root`].
    pub fn as_css(&self) -> Option<&str> {
        match self {
            Self::Root => None,
            Self::Css(s) => Some(s),
        }
    }
}

impl From<&str> for Selector {
    /// An empty string is the root marker.
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Root
        } else {
            Self::Css(s.to_owned())
        }
    }
}

impl From<String> for Selector {
    fn from(s: String) -> Self {
        if s.is_empty() { Self::Root } else { Self::Css(s) }
    }
}

impl From<Option<&str>> for Selector {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::Root, Self::from)
    }
}

/// Selector argument of [`Handle::off`](crate::delegator::Handle::off).
///
/// `None` and `""` leave the selector out. [`Selector::Root`] names root registrations only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SelectorFilter {
    /// No selector given.
    Any,
    /// Registrations under this selector.
    Only(Selector),
}

impl From<&str> for SelectorFilter {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Self::Any
        } else {
            Self::Only(Selector::from(s))
        }
    }
}

impl From<String> for SelectorFilter {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Self::Any
        } else {
            Self::Only(Selector::Css(s))
        }
    }
}

impl From<Option<&str>> for SelectorFilter {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::Any, Self::from)
    }
}

impl From<Selector> for SelectorFilter {
    fn from(s: Selector) -> Self {
        Self::Only(s)
    }
}

/// Stable integer id the delegator assigns to an element on first sight.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ElementKey(pub(crate) u32);

impl ElementKey {
    /// The raw id.
    pub const fn get(self) -> u32 {
        self.0
    }
}

/// The node that satisfied a selector for one firing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Match<K> {
    /// Matched node.
    pub node: K,
    /// Ancestor hops from the event target to `node`; `0` when the target matched.
    pub distance: usize,
}

/// Look up the parent of a node to walk from an event target towards the bound element.
pub trait ParentLookup<K> {
    /// Returns the parent of `node`, or `None` if `node` is a root.
    fn parent_of(&self, node: &K) -> Option<K>;
}

/// Element attributes consulted by the fallback selector matcher.
pub trait ElementLookup<K> {
    /// Tag name of `node`, in any case.
    fn tag_name(&self, node: &K) -> Option<&str>;
    /// Value of the `id` attribute.
    fn id(&self, node: &K) -> Option<&str>;
    /// Raw value of the `class` attribute.
    fn class_name(&self, node: &K) -> Option<&str>;
}

/// The platform event object handed to callbacks.
pub trait NativeEvent<K> {
    /// Event type as reported by the platform (may be a proxy such as `focusin`).
    fn event_type(&self) -> &str;
    /// The real event target, if any.
    fn target(&self) -> Option<K>;
    /// Suppress the platform default action.
    fn prevent_default(&mut self);
    /// Stop native propagation past the current node.
    fn stop_propagation(&mut self);
    /// Whether propagation has been stopped, by us or by a callback.
    fn is_propagation_stopped(&self) -> bool;
    /// Whether the default action has been prevented.
    fn is_default_prevented(&self) -> bool;
}

/// The host DOM as seen by a [`Delegator`](crate::delegator::Delegator).
///
/// Methods take `&self`: hosts are expected to use interior mutability for their listener
/// tables, the same way a browser document is shared.
pub trait Host<K>: ParentLookup<K> + ElementLookup<K> {
    /// Event object type delivered by the host.
    type Event: NativeEvent<K>;

    /// Capabilities of this host. Consulted once.
    fn capabilities(&self) -> Capabilities;

    /// Native `matches`; only called when [`Capabilities::NATIVE_MATCHES`] is set.
    ///
    /// Must return `false` for selectors the host cannot parse.
    fn matches_selector(&self, node: &K, selector: &str) -> bool {
        let _ = (node, selector);
        false
    }

    /// Attach the delegator's native listener for `event_type` on `node`.
    fn add_listener(&self, node: &K, event_type: &str, phase: Phase);

    /// Detach a listener previously attached with the same arguments.
    fn remove_listener(&self, node: &K, event_type: &str, phase: Phase);
}
