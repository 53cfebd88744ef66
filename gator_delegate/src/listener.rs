// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! How logical event types map to native listeners.
//!
//! `focus` and `blur` do not bubble, so a listener on an ancestor never sees them in the bubble
//! phase. Hosts with capture listeners get a capture-phase listener for the logical type.
//! Hosts without capture get a bubble-phase listener for the proxy type (`focusin` /
//! `focusout`), and the proxy is mapped back to the logical type when the event arrives.
//! Several logical types can share one native listener this way, so the delegator counts
//! users per native listener.

use crate::config::Config;
use crate::types::{Capabilities, Phase};

/// Where a native listener goes for one logical event type.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NativeListener {
    /// Type passed to [`Host::add_listener`](crate::types::Host::add_listener).
    pub event_type: String,
    /// Phase passed to the host.
    pub phase: Phase,
}

/// Listener strategy. Resolved once per delegator.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ListenerStrategy {
    /// Capture-phase listeners for non-bubbling types.
    Capture,
    /// Bubble-phase listeners on the configured proxy types.
    BubbleProxy,
}

impl ListenerStrategy {
    /// Pick a strategy from the host capabilities.
    pub fn resolve(caps: Capabilities) -> Self {
        if caps.contains(Capabilities::CAPTURE) {
            Self::Capture
        } else {
            Self::BubbleProxy
        }
    }

    /// Native listener for a logical event type.
    pub fn native_for(self, event_type: &str, config: &Config) -> NativeListener {
        match (self, config.proxy_for(event_type)) {
            (_, None) => NativeListener {
                event_type: event_type.to_owned(),
                phase: Phase::Bubble,
            },
            (Self::Capture, Some(_)) => NativeListener {
                event_type: event_type.to_owned(),
                phase: Phase::Capture,
            },
            (Self::BubbleProxy, Some(proxy)) => NativeListener {
                event_type: proxy.to_owned(),
                phase: Phase::Bubble,
            },
        }
    }

    /// Logical event types served by a native event of type `native`.
    ///
    /// Under [`BubbleProxy`](Self::BubbleProxy) a proxy type serves both its logical type and
    /// registrations made for the proxy name itself.
    pub fn logical_types<'a>(self, native: &'a str, config: &'a Config) -> Vec<&'a str> {
        let mut out = vec![native];
        if self == Self::BubbleProxy
            && let Some(logical) = config.logical_for_proxy(native)
        {
            out.push(logical);
        }
        out
    }
}
