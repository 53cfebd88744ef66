// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Native event object.

use crate::types::NodeId;

/// Event types that do not bubble.
pub const NON_BUBBLING: &[&str] = &["focus", "blur", "mouseenter", "mouseleave", "load"];

/// An event being delivered through a [`Document`](crate::Document).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomEvent {
    /// Event type, e.g. `"click"`.
    pub event_type: String,
    /// Node the event was fired at.
    pub target: NodeId,
    /// Whether the event takes part in the bubble phase.
    pub bubbles: bool,
    default_prevented: bool,
    propagation_stopped: bool,
}

impl DomEvent {
    /// Create an event targeting `target`; bubbling follows [`NON_BUBBLING`].
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_owned(),
            target,
            bubbles: !NON_BUBBLING.contains(&event_type),
            default_prevented: false,
            propagation_stopped: false,
        }
    }

    /// Prevent the default action.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Stop further propagation.
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Whether the default action was prevented.
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }

    /// Whether propagation was stopped.
    pub fn propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }
}
