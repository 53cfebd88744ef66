// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gator DOM: a small generational arena DOM.
//!
//! Gator DOM is the reference host for `gator_delegate`. It models just enough of a browser
//! document to exercise event delegation without a browser:
//!
//! - A hierarchy of elements with upper-cased tag names, ids and class lists.
//! - A selector engine standing in for `Element.matches` (see [`selector`]).
//! - Listener records, kept per node the way a browser keeps `addEventListener` registrations.
//! - A [`DomEvent`] type whose bubbling follows the platform rules for `focus`/`blur`.
//!
//! It does not deliver events by itself; delivery lives next to the delegator, in
//! `gator_delegate::adapters::dom`.
//!
//! ## API overview
//!
//! - [`Document`]: container managing elements and listener records.
//! - [`ElementData`]: per-element tag, id and class attribute.
//! - [`NodeId`]: generational handle of an element.
//! - [`SelectorList`]: a parsed selector; [`Document::matches`] parses and evaluates in one go.
//!
//! ### Minimal usage
//!
//! ```
//! use gator_dom::{Document, ElementData};
//!
//! let mut doc = Document::new();
//! let ul = doc.insert(None, ElementData::new("ul").with_id("list"));
//! let li = doc.insert(Some(ul), ElementData::new("li").with_class("a"));
//! let span = doc.insert(Some(li), ElementData::new("span"));
//!
//! assert_eq!(doc.path_to(span), vec![ul, li, span]);
//! assert_eq!(doc.matches(li, "#list > li.a"), Ok(true));
//! assert_eq!(doc.matches(span, "li"), Ok(false));
//! ```

mod document;
mod event;
pub mod selector;
mod types;

pub use document::{Document, ListenerRecord};
pub use event::{DomEvent, NON_BUBBLING};
pub use selector::{SelectorError, SelectorList};
pub use types::{ElementData, NodeId};
