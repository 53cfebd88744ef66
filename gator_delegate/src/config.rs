// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegator configuration.
//!
//! ## Overview
//!
//! [`Config::default`] matches browser behavior and is what [`Delegator::new`] uses:
//! native listeners follow registrations, the native matcher is used when available, and
//! `focus`/`blur` fall back to `focusin`/`focusout` on hosts without capture listeners.
//!
//! With the `serde` feature, `Config` can be loaded from any serde format. Missing fields take
//! their default values.
//!
//! [`Delegator::new`]: crate::delegator::Delegator::new

use crate::error::Error;

/// When the native listener for an (element, event type) pair is detached.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ListenerPolicy {
    /// Attach on the first registration, detach when the last one is removed.
    #[default]
    FollowRegistrations,
    /// Attach on the first registration and keep the listener until
    /// [`Delegator::clear`](crate::delegator::Delegator::clear).
    KeepAttached,
}

/// Which selector matcher to use.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MatcherPreference {
    /// Native matching when the host has it, the fallback otherwise.
    #[default]
    Auto,
    /// Always use the single class/id/tag fallback.
    Fallback,
}

/// A non-bubbling event type and the bubbling event the host fires alongside it.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FocusProxy {
    /// Type callers register, e.g. `focus`.
    pub event_type: String,
    /// Bubbling stand-in used without capture listeners, e.g. `focusin`.
    pub proxy: String,
}

impl FocusProxy {
    /// Pair `event_type` with its bubbling `proxy`.
    pub fn new(event_type: &str, proxy: &str) -> Self {
        Self {
            event_type: event_type.to_owned(),
            proxy: proxy.to_owned(),
        }
    }
}

/// Configuration for a [`Delegator`](crate::delegator::Delegator).
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Native listener lifetime.
    pub listener_policy: ListenerPolicy,
    /// Selector matcher choice.
    pub matcher: MatcherPreference,
    /// Event types that need capture (or a bubbling proxy) to be delegated.
    pub focus_proxies: Vec<FocusProxy>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listener_policy: ListenerPolicy::default(),
            matcher: MatcherPreference::default(),
            focus_proxies: vec![
                FocusProxy::new("focus", "focusin"),
                FocusProxy::new("blur", "focusout"),
            ],
        }
    }
}

impl Config {
    /// Set the listener policy.
    #[must_use]
    pub fn with_listener_policy(mut self, policy: ListenerPolicy) -> Self {
        self.listener_policy = policy;
        self
    }

    /// Set the matcher preference.
    #[must_use]
    pub fn with_matcher(mut self, matcher: MatcherPreference) -> Self {
        self.matcher = matcher;
        self
    }

    /// Replace the non-bubbling event table.
    #[must_use]
    pub fn with_focus_proxies(mut self, proxies: Vec<FocusProxy>) -> Self {
        self.focus_proxies = proxies;
        self
    }

    /// Check the focus proxy table.
    ///
    /// Every entry needs non-empty names, a proxy different from its event type, and no name
    /// may appear twice across the table.
    pub fn validate(&self) -> Result<(), Error> {
        let mut seen: Vec<&str> = Vec::new();
        for p in &self.focus_proxies {
            if p.event_type.is_empty() || p.proxy.is_empty() {
                return Err(Error::InvalidConfig("focus proxy with an empty name".into()));
            }
            if p.event_type == p.proxy {
                return Err(Error::InvalidConfig(format!(
                    "`{}` cannot proxy itself",
                    p.event_type
                )));
            }
            for name in [p.event_type.as_str(), p.proxy.as_str()] {
                if seen.contains(&name) {
                    return Err(Error::InvalidConfig(format!(
                        "`{name}` appears twice in focus proxies"
                    )));
                }
                seen.push(name);
            }
        }
        Ok(())
    }

    pub(crate) fn proxy_for(&self, event_type: &str) -> Option<&str> {
        self.focus_proxies
            .iter()
            .find(|p| p.event_type == event_type)
            .map(|p| p.proxy.as_str())
    }

    pub(crate) fn logical_for_proxy(&self, proxy: &str) -> Option<&str> {
        self.focus_proxies
            .iter()
            .find(|p| p.proxy == proxy)
            .map(|p| p.event_type.as_str())
    }
}
