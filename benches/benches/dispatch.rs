// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use gator_delegate::adapters::dom::{DomHost, fire};
use gator_delegate::{Callback, Config, Delegated, Delegator, MatcherPreference};
use gator_dom::{Document, ElementData, NodeId};

// A list of `items` entries, each `depth` levels deep. Returns the list and the deepest node of
// the last entry.
fn gen_list(items: usize, depth: usize) -> (Document, NodeId, NodeId) {
    let mut doc = Document::new();
    let body = doc.insert(None, ElementData::new("body"));
    let list = doc.insert(Some(body), ElementData::new("ul").with_id("list"));
    let mut leaf = list;
    for i in 0..items {
        let class = if i % 2 == 0 { "item even" } else { "item odd" };
        leaf = doc.insert(Some(list), ElementData::new("li").with_class(class));
        for _ in 0..depth {
            leaf = doc.insert(Some(leaf), ElementData::new("span").with_class("inner"));
        }
    }
    (doc, list, leaf)
}

fn noop() -> Callback<NodeId, DomHost> {
    Callback::new(|d: &mut Delegated<'_, NodeId, DomHost>| {
        black_box(d.distance);
    })
}

fn delegator(doc: Document, matcher: MatcherPreference) -> Delegator<NodeId, DomHost> {
    let config = Config::default().with_matcher(matcher);
    Delegator::with_config(DomHost::new(doc), config).expect("valid config")
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");
    for &selectors in &[1_usize, 8, 32] {
        for (name, matcher, pool) in [
            ("native", MatcherPreference::Auto, &["li.odd", "#list > li span", ".inner", "ul li"][..]),
            ("fallback", MatcherPreference::Fallback, &["li", ".odd", ".inner", "span"][..]),
        ] {
            let (doc, list, leaf) = gen_list(64, 4);
            let d = delegator(doc, matcher);
            let cb = noop();
            let h = d.handle(list);
            for i in 0..selectors {
                h.on("click", pool[i % pool.len()], &cb).unwrap();
            }
            group.throughput(Throughput::Elements(selectors as u64));
            group.bench_function(format!("{name}_{selectors}"), |b| {
                b.iter(|| black_box(fire(&d, black_box(leaf), "click")));
            });
        }
    }
    group.finish();
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    group.bench_function("on_off_256", |b| {
        b.iter_batched(
            || {
                let (doc, list, _) = gen_list(8, 1);
                (delegator(doc, MatcherPreference::Auto), list)
            },
            |(d, list)| {
                let cbs: Vec<_> = (0..256).map(|_| noop()).collect();
                let h = d.handle(list);
                for cb in &cbs {
                    h.on(["click", "keyup"], "li", cb).unwrap();
                }
                for cb in &cbs {
                    h.off(["click", "keyup"], "li", Some(cb));
                }
                black_box(d.registration_count())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_registration);
criterion_main!(benches);
