// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gator Delegate: selector-scoped event delegation.
//!
//! ## Overview
//!
//! Instead of attaching a listener to every element that should react to an event, attach one
//! native listener to a common ancestor and decide at dispatch time which registered selectors
//! the event target (or one of its ancestors) satisfies. This crate keeps the registrations,
//! attaches and detaches native listeners through a [`Host`](crate::types::Host), and runs the
//! matching callbacks in a fixed order when the host reports a native event.
//!
//! ## Host
//!
//! The DOM is abstracted behind [`Host`](crate::types::Host): parent lookup, element attributes,
//! optional native selector matching, and listener attachment. Hosts report
//! [`Capabilities`](crate::types::Capabilities); without native matching the delegator falls back
//! to single class, id or tag selectors, and without capture listeners `focus`/`blur` are
//! delegated through their bubbling `focusin`/`focusout` counterparts.
//!
//! ## Ordering
//!
//! For each firing, every selector registered on the bound element is resolved by walking from
//! the target up to (but excluding) the bound element. Callbacks run nearest match first; ties
//! run in registration order. Callbacks registered without a selector run for the bound element
//! itself, after every delegated match.
//!
//! A callback returning `false` (or [`Outcome::Cancel`](crate::types::Outcome::Cancel)) prevents
//! the default action, stops propagation, and ends the dispatch.
//!
//! ## Listener lifetime
//!
//! The first registration of an event type on an element attaches exactly one native listener.
//! By default the listener is detached again when the last registration goes away; see
//! [`ListenerPolicy`](crate::config::ListenerPolicy).
//!
//! ## Example
//!
//! ```
//! # #[cfg(feature = "dom_adapter")]
//! # fn main() {
//! use gator_delegate::adapters::dom::{DomHost, fire};
//! use gator_delegate::{Callback, Delegated, Delegator};
//! use gator_dom::{Document, ElementData, NodeId};
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let mut doc = Document::new();
//! let ul = doc.insert(None, ElementData::new("ul").with_id("list"));
//! let li = doc.insert(Some(ul), ElementData::new("li").with_class("item"));
//! let a = doc.insert(Some(li), ElementData::new("a"));
//!
//! let delegator = Delegator::new(DomHost::new(doc));
//! let hits = Rc::new(Cell::new(0));
//! let counter = Rc::clone(&hits);
//! let on_item = Callback::new(move |d: &mut Delegated<'_, NodeId, DomHost>| {
//!     assert_eq!(d.subject, li);
//!     assert_eq!(d.distance, 1);
//!     counter.set(counter.get() + 1);
//! });
//!
//! delegator.handle(ul).on("click", "li.item", &on_item).unwrap();
//! fire(&delegator, a, "click");
//! assert_eq!(hits.get(), 1);
//!
//! delegator.handle(ul).off("click", "li.item", Some(&on_item));
//! fire(&delegator, a, "click");
//! assert_eq!(hits.get(), 1);
//! # }
//! # #[cfg(not(feature = "dom_adapter"))]
//! # fn main() {}
//! ```
//!
//! The example needs the `dom_adapter` feature.

pub mod adapters;
pub mod config;
pub mod delegator;
pub mod error;
mod identity;
pub mod listener;
pub mod matcher;
mod registry;
pub mod types;
pub mod walk;

pub use config::{Config, FocusProxy, ListenerPolicy, MatcherPreference};
pub use delegator::{Callback, Delegated, Delegator, Dispatched, EventTypes, Handle};
pub use error::Error;
pub use types::{Capabilities, ElementKey, Host, Outcome, Phase, Selector, SelectorFilter};
