// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus delegation.
//!
//! `focus` and `blur` do not bubble. The same registration works against a host with capture
//! listeners and against one without, where the delegator listens for `focusin`/`focusout`.
//!
//! Run:
//! - `RUST_LOG=gator_delegate=debug cargo run -p gator_demos --example delegate_focus`

use gator_delegate::adapters::dom::{DomHost, blur, focus};
use gator_delegate::{Callback, Capabilities, Delegated, Delegator};
use gator_dom::{Document, ElementData, NodeId};
use tracing_subscriber::EnvFilter;

fn form() -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let form = doc.insert(None, ElementData::new("form"));
    let row = doc.insert(Some(form), ElementData::new("div").with_class("row"));
    let input = doc.insert(Some(row), ElementData::new("input").with_class("field"));
    (doc, form, input)
}

fn run(label: &str, host: DomHost, form: NodeId, input: NodeId) {
    let delegator = Delegator::new(host);
    let log = Callback::new(|d: &mut Delegated<'_, NodeId, DomHost>| {
        println!(
            "  {} (native {}) on {:?}",
            d.event_type, d.event.event_type, d.subject
        );
    });
    delegator
        .handle(form)
        .on(["focus", "blur"], ".field", &log)
        .unwrap();

    println!("== {label} ({:?}) ==", delegator.strategy());
    for record in [
        delegator.host().document().listeners_for(form, "focus"),
        delegator.host().document().listeners_for(form, "focusin"),
    ]
    .concat()
    {
        println!("  listener: {} capture={}", record.event_type, record.capture);
    }
    focus(&delegator, input);
    blur(&delegator, input);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let (doc, f, input) = form();
    run("capture", DomHost::new(doc), f, input);

    let (doc, f, input) = form();
    let host =
        DomHost::new(doc).with_capabilities(Capabilities::LISTENERS | Capabilities::NATIVE_MATCHES);
    run("bubbling proxy", host, f, input);
}
