// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host for Gator DOM documents.
//!
//! ## Feature
//!
//! Enable with `dom_adapter`.
//!
//! ## Notes
//!
//! [`DomHost`] records native listeners in the [`Document`] and answers selector queries with
//! the document's own selector engine. The document has no event loop, so [`fire`] plays the
//! browser's part: it walks the target's ancestors through the capture, target and bubble
//! phases and hands the event to [`Delegator::dispatch`] for every listener record it meets.

use gator_dom::{Document, DomEvent, NodeId};

use crate::delegator::Delegator;
use crate::types::{Capabilities, ElementLookup, Host, NativeEvent, ParentLookup, Phase};

/// [`Host`] over a [`Document`].
#[derive(Debug)]
pub struct DomHost {
    document: Document,
    capabilities: Capabilities,
}

impl DomHost {
    /// Wrap a document; all capabilities are reported.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            capabilities: Capabilities::all(),
        }
    }

    /// Report only `capabilities`, e.g. to run without capture listeners.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The document, mutably.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

impl ParentLookup<NodeId> for DomHost {
    fn parent_of(&self, node: &NodeId) -> Option<NodeId> {
        self.document.parent(*node)
    }
}

impl ElementLookup<NodeId> for DomHost {
    fn tag_name(&self, node: &NodeId) -> Option<&str> {
        self.document.element(*node).map(|e| e.tag.as_str())
    }

    fn id(&self, node: &NodeId) -> Option<&str> {
        self.document.element(*node).and_then(|e| e.id.as_deref())
    }

    fn class_name(&self, node: &NodeId) -> Option<&str> {
        self.document.element(*node).map(|e| e.class_name.as_str())
    }
}

impl NativeEvent<NodeId> for DomEvent {
    fn event_type(&self) -> &str {
        &self.event_type
    }

    fn target(&self) -> Option<NodeId> {
        Some(self.target)
    }

    fn prevent_default(&mut self) {
        Self::prevent_default(self);
    }

    fn stop_propagation(&mut self) {
        Self::stop_propagation(self);
    }

    fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped()
    }

    fn is_default_prevented(&self) -> bool {
        self.default_prevented()
    }
}

impl Host<NodeId> for DomHost {
    type Event = DomEvent;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    // A selector the document cannot parse matches nothing.
    fn matches_selector(&self, node: &NodeId, selector: &str) -> bool {
        self.document.matches(*node, selector).unwrap_or(false)
    }

    fn add_listener(&self, node: &NodeId, event_type: &str, phase: Phase) {
        self.document
            .add_listener(*node, event_type, phase == Phase::Capture);
    }

    fn remove_listener(&self, node: &NodeId, event_type: &str, phase: Phase) {
        self.document
            .remove_listener(*node, event_type, phase == Phase::Capture);
    }
}

/// Deliver an event of `event_type` to `target` and return it once propagation ends.
///
/// Capture listeners run from the root down to the target's parent, then the target's own
/// listeners, then bubble listeners from the parent up to the root if the event bubbles.
/// Delivery stops after the node where propagation was stopped.
pub fn fire(delegator: &Delegator<NodeId, DomHost>, target: NodeId, event_type: &str) -> DomEvent {
    let mut event = DomEvent::new(event_type, target);
    let path = delegator.host().document().path_to(target);
    let Some((_, ancestors)) = path.split_last() else {
        return event;
    };

    let deliver = |node: NodeId, capture: Option<bool>, event: &mut DomEvent| {
        let records = delegator.host().document().listeners_for(node, event_type);
        for record in records {
            if capture.is_none_or(|c| c == record.capture) {
                delegator.dispatch(&node, event);
            }
        }
        event.propagation_stopped()
    };

    for &node in ancestors {
        if deliver(node, Some(true), &mut event) {
            return event;
        }
    }
    if deliver(target, None, &mut event) || !event.bubbles {
        return event;
    }
    for &node in ancestors.iter().rev() {
        if deliver(node, Some(false), &mut event) {
            break;
        }
    }
    event
}

/// Move focus to `target`: `focus` followed by the bubbling `focusin`.
pub fn focus(delegator: &Delegator<NodeId, DomHost>, target: NodeId) -> DomEvent {
    let event = fire(delegator, target, "focus");
    fire(delegator, target, "focusin");
    event
}

/// Take focus from `target`: `blur` followed by the bubbling `focusout`.
pub fn blur(delegator: &Delegator<NodeId, DomHost>, target: NodeId) -> DomEvent {
    let event = fire(delegator, target, "blur");
    fire(delegator, target, "focusout");
    event
}
