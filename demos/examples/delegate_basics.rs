// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegation basics.
//!
//! Binds one click listener to a list, registers handlers for a few selectors, and fires clicks
//! at different depths to show which handlers run and in what order.
//!
//! Run:
//! - `RUST_LOG=gator_delegate=debug cargo run -p gator_demos --example delegate_basics`

use gator_delegate::adapters::dom::{DomHost, fire};
use gator_delegate::{Callback, Delegated, Delegator};
use gator_dom::{Document, ElementData, NodeId};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut doc = Document::new();
    let list = doc.insert(None, ElementData::new("ul").with_id("list"));
    let home = doc.insert(Some(list), ElementData::new("li").with_class("item"));
    let link = doc.insert(Some(home), ElementData::new("a").with_class("nav"));
    let about = doc.insert(Some(list), ElementData::new("li").with_class("item disabled"));

    let delegator = Delegator::new(DomHost::new(doc));
    let say = |what: &'static str| {
        Callback::new(move |d: &mut Delegated<'_, NodeId, DomHost>| {
            println!("  {what:<10} subject={:?} distance={}", d.subject, d.distance);
        })
    };
    let block = Callback::new(|d: &mut Delegated<'_, NodeId, DomHost>| {
        println!("  disabled   subject={:?} -> cancel", d.subject);
        false
    });

    let h = delegator.handle(list);
    h.on("click", "li.item", &say("item")).unwrap();
    h.on("click", "a.nav", &say("link")).unwrap();
    h.on("click", ".disabled", &block).unwrap();
    h.on("click", "li.item", &say("item/2")).unwrap();
    h.on("click", "", &say("list")).unwrap();

    println!(
        "listeners on #list: {}",
        delegator.host().document().listeners_for(list, "click").len()
    );

    println!("== click a.nav ==");
    fire(&delegator, link, "click");

    println!("== click li.disabled ==");
    let event = fire(&delegator, about, "click");
    println!("  default prevented: {}", event.default_prevented());

    println!("== off(click, li.item) ==");
    h.off("click", "li.item", None);
    fire(&delegator, link, "click");
}
