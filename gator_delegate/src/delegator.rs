// Copyright 2025 the Gator Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Delegator: handles, registration, native listener bookkeeping, and dispatch.
//!
//! ## Overview
//!
//! A [`Delegator`] owns the host, the element table, the handler registry, and the memoized
//! matcher and listener strategy. It is single-threaded and uses interior mutability, so
//! callbacks can call [`Handle::on`] and [`Handle::off`] while a dispatch is running.
//!
//! ## Dispatch order
//!
//! For one firing, every registered selector is resolved with an ancestor walk from the event
//! target. Matches are invoked by ascending distance (nearest first, the way native bubbling
//! reaches inner elements first), then in registration order. Root registrations run last,
//! at the bound element's own distance from the target.
//!
//! The set of callbacks is snapshotted before the first one runs; registrations added or
//! removed by a callback take effect from the next firing.
//!
//! ## Binding
//!
//! Each (element, event type) pair is either unbound or bound. The first [`Handle::on`] for a
//! pair attaches one native listener; later calls only add registry entries. What happens
//! when the last registration goes away is decided by
//! [`ListenerPolicy`](crate::config::ListenerPolicy).

use std::cell::{OnceCell, RefCell};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::{Config, ListenerPolicy};
use crate::error::Error;
use crate::identity::ElementTable;
use crate::listener::{ListenerStrategy, NativeListener};
use crate::matcher::SelectorMatcher;
use crate::registry::{Registry, Removal};
use crate::types::{
    Capabilities, ElementKey, Host, Match, NativeEvent, Outcome, Selector, SelectorFilter,
};
use crate::walk::{distance_to_bound, resolve_match};

type CallbackFn<K, H> = dyn Fn(&mut Delegated<'_, K, H>) -> Outcome;

/// A delegated event handler.
///
/// Clones share identity: [`Handle::off`] removes a registration by comparing callbacks with
/// `==`, which is true only for clones of the same `Callback::new`.
pub struct Callback<K, H: Host<K>>(Rc<CallbackFn<K, H>>);

impl<K, H: Host<K>> Callback<K, H> {
    /// Wrap a closure. It may return [`Outcome`], `bool` (`false` cancels), or `()`.
    pub fn new<F, R>(f: F) -> Self
    where
        F: Fn(&mut Delegated<'_, K, H>) -> R + 'static,
        R: Into<Outcome>,
        K: 'static,
        H: 'static,
    {
        let f: Rc<CallbackFn<K, H>> = Rc::new(move |d: &mut Delegated<'_, K, H>| f(d).into());
        Self(f)
    }

    fn call(&self, d: &mut Delegated<'_, K, H>) -> Outcome {
        (self.0)(d)
    }
}

impl<K, H: Host<K>> Clone for Callback<K, H> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<K, H: Host<K>> PartialEq for Callback<K, H> {
    fn eq(&self, other: &Self) -> bool {
        Rc::as_ptr(&self.0).cast::<()>() == Rc::as_ptr(&other.0).cast::<()>()
    }
}

impl<K, H: Host<K>> Eq for Callback<K, H> {}

impl<K, H: Host<K>> fmt::Debug for Callback<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Callback")
            .field(&Rc::as_ptr(&self.0).cast::<()>())
            .finish()
    }
}

/// What a callback receives.
pub struct Delegated<'a, K, H: Host<K>> {
    /// The delegator running this dispatch; usable for re-entrant `on`/`off`.
    pub delegator: &'a Delegator<K, H>,
    /// Element the native listener is attached to.
    pub bound: &'a K,
    /// Event type the callback was registered under. Differs from the native event's type
    /// when a `focus`/`blur` registration is served by its `focusin`/`focusout` proxy.
    pub event_type: &'a str,
    /// The node that satisfied the selector (the bound element for root registrations).
    pub subject: K,
    /// Ancestor hops from the event target to `subject`.
    pub distance: usize,
    /// The native event.
    pub event: &'a mut H::Event,
}

impl<K: Clone + Eq + Hash + fmt::Debug, H: Host<K>> Delegated<'_, K, H> {
    /// Handle for the bound element.
    pub fn handle(&self) -> Handle<'_, K, H> {
        self.delegator.handle(self.bound.clone())
    }
}

impl<K: fmt::Debug, H: Host<K>> fmt::Debug for Delegated<'_, K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegated")
            .field("bound", self.bound)
            .field("event_type", &self.event_type)
            .field("subject", &self.subject)
            .field("distance", &self.distance)
            .finish_non_exhaustive()
    }
}

/// Summary of one [`Delegator::dispatch`] call.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Dispatched {
    /// Callbacks invoked.
    pub invoked: usize,
    /// A callback returned [`Outcome::Cancel`].
    pub cancelled: bool,
    /// A callback stopped propagation on the event itself.
    pub stopped: bool,
}

/// One or more event types.
///
/// Implemented for a single `&str` and for arrays, slices and vectors of strings.
pub trait EventTypes {
    /// The event types, in order.
    fn event_types(&self) -> Vec<&str>;
}

impl EventTypes for &str {
    fn event_types(&self) -> Vec<&str> {
        vec![*self]
    }
}

impl EventTypes for String {
    fn event_types(&self) -> Vec<&str> {
        vec![self.as_str()]
    }
}

impl<const N: usize> EventTypes for [&str; N] {
    fn event_types(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl EventTypes for &[&str] {
    fn event_types(&self) -> Vec<&str> {
        self.to_vec()
    }
}

impl EventTypes for Vec<&str> {
    fn event_types(&self) -> Vec<&str> {
        self.clone()
    }
}

impl EventTypes for Vec<String> {
    fn event_types(&self) -> Vec<&str> {
        self.iter().map(String::as_str).collect()
    }
}

struct Candidate<K, H: Host<K>> {
    event_type: String,
    distance: usize,
    seq: u64,
    subject: K,
    callback: Callback<K, H>,
}

/// Selector-scoped event delegation over a host DOM.
pub struct Delegator<K, H: Host<K>> {
    host: H,
    config: Config,
    elements: RefCell<ElementTable<K>>,
    registry: RefCell<Registry<Callback<K, H>>>,
    // (element, logical type) pairs currently holding a native listener.
    bound: RefCell<HashSet<(ElementKey, String)>>,
    // Native listeners and how many bound pairs use each.
    native: RefCell<HashMap<(ElementKey, NativeListener), usize>>,
    capabilities: OnceCell<Capabilities>,
    matcher: OnceCell<SelectorMatcher>,
    strategy: OnceCell<ListenerStrategy>,
}

impl<K, H: Host<K>> fmt::Debug for Delegator<K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegator")
            .field("config", &self.config)
            .field("bound", &self.bound.borrow().len())
            .field("native", &self.native.borrow().len())
            .field("matcher", &self.matcher.get())
            .field("strategy", &self.strategy.get())
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug, H: Host<K>> Delegator<K, H> {
    /// Create a delegator with the default [`Config`].
    pub fn new(host: H) -> Self {
        Self::build(host, Config::default())
    }

    /// Create a delegator with an explicit configuration.
    pub fn with_config(host: H, config: Config) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self::build(host, config))
    }

    fn build(host: H, config: Config) -> Self {
        Self {
            host,
            config,
            elements: RefCell::new(ElementTable::default()),
            registry: RefCell::new(Registry::default()),
            bound: RefCell::new(HashSet::new()),
            native: RefCell::new(HashMap::new()),
            capabilities: OnceCell::new(),
            matcher: OnceCell::new(),
            strategy: OnceCell::new(),
        }
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably (e.g. to grow the document between firings).
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// The configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Host capabilities, probed on first use.
    pub fn capabilities(&self) -> Capabilities {
        *self.capabilities.get_or_init(|| self.host.capabilities())
    }

    /// The selector matcher in use, resolved on first use.
    pub fn matcher(&self) -> SelectorMatcher {
        *self.matcher.get_or_init(|| {
            let m = SelectorMatcher::resolve(self.capabilities(), self.config.matcher);
            debug!(matcher = ?m, "resolved selector matcher");
            m
        })
    }

    /// The listener strategy in use, resolved on first use.
    pub fn strategy(&self) -> ListenerStrategy {
        *self.strategy.get_or_init(|| {
            let s = ListenerStrategy::resolve(self.capabilities());
            debug!(strategy = ?s, "resolved listener strategy");
            s
        })
    }

    /// Handle for `element`. All handles for the same node share one [`ElementKey`].
    pub fn handle(&self, element: K) -> Handle<'_, K, H> {
        let key = self.elements.borrow_mut().key_for(&element);
        Handle {
            delegator: self,
            element,
            key,
        }
    }

    /// Key of `element`, if a handle was ever created for it.
    pub fn element_key(&self, element: &K) -> Option<ElementKey> {
        self.elements.borrow().lookup(element)
    }

    /// Whether `element` currently holds a native listener for `event_type`.
    pub fn is_bound(&self, element: &K, event_type: &str) -> bool {
        self.element_key(element).is_some_and(|key| {
            self.bound
                .borrow()
                .contains(&(key, event_type.to_owned()))
        })
    }

    /// Number of registered callbacks across all elements.
    pub fn registration_count(&self) -> usize {
        self.registry.borrow().len()
    }

    /// Detach every native listener and drop every registration.
    ///
    /// Element keys stay assigned, so existing handles remain valid.
    pub fn clear(&self) {
        let native: Vec<_> = self.native.borrow_mut().drain().map(|(k, _)| k).collect();
        self.bound.borrow_mut().clear();
        self.registry.borrow_mut().clear();
        for (key, listener) in native {
            let node = self.elements.borrow().node(key).cloned();
            if let Some(node) = node {
                self.detach(&node, &listener);
            }
        }
    }

    /// Run the delegated callbacks for a native event delivered to `bound`.
    ///
    /// Hosts call this from the native listener attached by [`Handle::on`].
    pub fn dispatch(&self, bound: &K, event: &mut H::Event) -> Dispatched {
        let Some(key) = self.element_key(bound) else {
            return Dispatched::default();
        };
        let target = event.target().unwrap_or_else(|| bound.clone());
        let native_type = event.event_type().to_owned();
        let mut candidates = self.collect(key, bound, &target, &native_type);
        candidates.sort_by_key(|c| (c.distance, c.seq));
        trace!(
            element = ?bound,
            event_type = %native_type,
            candidates = candidates.len(),
            "dispatch"
        );

        let mut report = Dispatched::default();
        for c in candidates {
            let outcome = c.callback.call(&mut Delegated {
                delegator: self,
                bound,
                event_type: &c.event_type,
                subject: c.subject,
                distance: c.distance,
                event: &mut *event,
            });
            report.invoked += 1;
            if outcome == Outcome::Cancel {
                event.prevent_default();
                event.stop_propagation();
                report.cancelled = true;
                break;
            }
            if event.is_propagation_stopped() {
                report.stopped = true;
                break;
            }
        }
        trace!(?report, "dispatch done");
        report
    }

    fn collect(
        &self,
        key: ElementKey,
        bound: &K,
        target: &K,
        native_type: &str,
    ) -> Vec<Candidate<K, H>> {
        let matcher = self.matcher();
        let registry = self.registry.borrow();
        let mut out = Vec::new();
        for event_type in self.strategy().logical_types(native_type, &self.config) {
            for bucket in registry.buckets(key, event_type) {
                let found = match &bucket.selector {
                    Selector::Root => Some(Match {
                        node: bound.clone(),
                        distance: distance_to_bound(target, bound, &self.host)
                            .unwrap_or(usize::MAX),
                    }),
                    Selector::Css(css) => resolve_match(target, bound, &self.host, |n| {
                        matcher.matches(&self.host, n, css)
                    }),
                };
                let Some(m) = found else {
                    continue;
                };
                out.extend(bucket.entries.iter().map(|e| Candidate {
                    event_type: event_type.to_owned(),
                    distance: m.distance,
                    seq: e.seq,
                    subject: m.node.clone(),
                    callback: e.callback.clone(),
                }));
            }
        }
        out
    }

    fn on(
        &self,
        key: ElementKey,
        element: &K,
        types: &[&str],
        selector: &Selector,
        callback: &Callback<K, H>,
    ) -> Result<(), Error> {
        if !self.capabilities().contains(Capabilities::LISTENERS) {
            return Err(Error::ListenersUnsupported);
        }
        if types.iter().any(|t| t.is_empty()) {
            return Err(Error::EmptyEventType);
        }
        for &event_type in types {
            self.registry
                .borrow_mut()
                .add(key, event_type, selector.clone(), callback.clone());
            let newly_bound = self
                .bound
                .borrow_mut()
                .insert((key, event_type.to_owned()));
            if newly_bound {
                self.bind(key, element, event_type);
            }
        }
        Ok(())
    }

    fn off(
        &self,
        key: ElementKey,
        element: &K,
        types: &[&str],
        removal: Removal<'_, Callback<K, H>>,
    ) {
        for &event_type in types {
            let removed = self.registry.borrow_mut().remove(key, event_type, removal);
            trace!(element = ?element, event_type, removed, "off");
            self.release_if_empty(key, element, event_type);
        }
    }

    fn release_if_empty(&self, key: ElementKey, element: &K, event_type: &str) {
        if self.config.listener_policy == ListenerPolicy::KeepAttached
            || self.registry.borrow().is_registered(key, event_type)
        {
            return;
        }
        let was_bound = self
            .bound
            .borrow_mut()
            .remove(&(key, event_type.to_owned()));
        if was_bound {
            self.unbind(key, element, event_type);
        }
    }

    fn bind(&self, key: ElementKey, element: &K, event_type: &str) {
        let listener = self.strategy().native_for(event_type, &self.config);
        let users = {
            let mut native = self.native.borrow_mut();
            let users = native.entry((key, listener.clone())).or_insert(0);
            *users += 1;
            *users
        };
        if users == 1 {
            debug!(
                element = ?element,
                event_type = %listener.event_type,
                phase = ?listener.phase,
                "attach native listener"
            );
            self.host
                .add_listener(element, &listener.event_type, listener.phase);
        }
    }

    fn unbind(&self, key: ElementKey, element: &K, event_type: &str) {
        let listener = self.strategy().native_for(event_type, &self.config);
        let last = {
            let mut native = self.native.borrow_mut();
            let entry = (key, listener.clone());
            match native.get_mut(&entry) {
                Some(users) if *users > 1 => {
                    *users -= 1;
                    false
                }
                Some(_) => {
                    native.remove(&entry);
                    true
                }
                None => false,
            }
        };
        if last {
            self.detach(element, &listener);
        }
    }

    fn detach(&self, element: &K, listener: &NativeListener) {
        debug!(
            element = ?element,
            event_type = %listener.event_type,
            phase = ?listener.phase,
            "detach native listener"
        );
        self.host
            .remove_listener(element, &listener.event_type, listener.phase);
    }
}

/// Delegation handle for one element, from [`Delegator::handle`].
pub struct Handle<'a, K, H: Host<K>> {
    delegator: &'a Delegator<K, H>,
    element: K,
    key: ElementKey,
}

impl<K: fmt::Debug, H: Host<K>> fmt::Debug for Handle<'_, K, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("element", &self.element)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl<K: Clone + Eq + Hash + fmt::Debug, H: Host<K>> Handle<'_, K, H> {
    /// The bound element.
    pub fn element(&self) -> &K {
        &self.element
    }

    /// The element's key.
    pub fn key(&self) -> ElementKey {
        self.key
    }

    /// Register `callback` for `types` on descendants matching `selector`.
    ///
    /// Pass `""`, `None`, or [`Selector::Root`] to bind to the element itself. Nothing is
    /// registered if any event type is empty.
    pub fn on(
        &self,
        types: impl EventTypes,
        selector: impl Into<Selector>,
        callback: &Callback<K, H>,
    ) -> Result<&Self, Error> {
        self.delegator.on(
            self.key,
            &self.element,
            &types.event_types(),
            &selector.into(),
            callback,
        )?;
        Ok(self)
    }

    /// Remove registrations for `types`.
    ///
    /// | selector | callback | removes |
    /// |---|---|---|
    /// | given | given | that one registration |
    /// | given | `None` | every callback under the selector |
    /// | `None`/`""` | given | that callback's root registration |
    /// | `None`/`""` | `None` | everything for the event type, like [`off_all`](Self::off_all) |
    ///
    /// Pass [`Selector::Root`] to address root registrations without a callback. Removing
    /// something that is not registered does nothing.
    pub fn off(
        &self,
        types: impl EventTypes,
        selector: impl Into<SelectorFilter>,
        callback: Option<&Callback<K, H>>,
    ) -> &Self {
        let filter = selector.into();
        let root = Selector::Root;
        let removal = match (&filter, callback) {
            (SelectorFilter::Only(s), Some(c)) => Removal::Callback(s, c),
            (SelectorFilter::Only(s), None) => Removal::Selector(s),
            (SelectorFilter::Any, Some(c)) => Removal::Callback(&root, c),
            (SelectorFilter::Any, None) => Removal::EventType,
        };
        self.delegator
            .off(self.key, &self.element, &types.event_types(), removal);
        self
    }

    /// Remove every registration for `types`, whatever the selector.
    pub fn off_all(&self, types: impl EventTypes) -> &Self {
        self.delegator.off(
            self.key,
            &self.element,
            &types.event_types(),
            Removal::EventType,
        );
        self
    }

    /// Remove every registration on this element.
    pub fn clear(&self) -> &Self {
        let types = self.delegator.registry.borrow().event_types(self.key);
        let types: Vec<&str> = types.iter().map(String::as_str).collect();
        self.delegator
            .off(self.key, &self.element, &types, Removal::EventType);
        self
    }

    /// Whether this element holds a native listener for `event_type`.
    pub fn is_bound(&self, event_type: &str) -> bool {
        self.delegator
            .bound
            .borrow()
            .contains(&(self.key, event_type.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatcherPreference;
    use crate::types::{ElementLookup, ParentLookup, Phase};
    use std::cell::Cell;

    // 0 div#root
    // └── 1 ul#list
    //     ├── 2 li.a
    //     │   └── 3 span
    //     └── 4 li.b
    //         └── 5 span
    const TREE: &[(u32, Option<u32>, &str, Option<&str>, &str)] = &[
        (0, None, "DIV", Some("root"), ""),
        (1, Some(0), "UL", Some("list"), ""),
        (2, Some(1), "LI", None, "a"),
        (3, Some(2), "SPAN", None, ""),
        (4, Some(1), "LI", None, "b"),
        (5, Some(4), "SPAN", None, ""),
    ];

    #[derive(Clone, Debug, Default, Eq, PartialEq)]
    struct Log(Vec<(u32, String, Phase, bool)>);

    #[derive(Debug, Default)]
    struct Mock {
        caps: Capabilities,
        listeners: RefCell<Log>,
    }

    impl Mock {
        fn with_caps(caps: Capabilities) -> Self {
            Self {
                caps,
                listeners: RefCell::default(),
            }
        }

        fn attached(&self) -> usize {
            let log = self.listeners.borrow();
            let added = log.0.iter().filter(|l| l.3).count();
            added - (log.0.len() - added)
        }
    }

    impl ParentLookup<u32> for Mock {
        fn parent_of(&self, node: &u32) -> Option<u32> {
            TREE.iter().find(|n| n.0 == *node).and_then(|n| n.1)
        }
    }

    impl ElementLookup<u32> for Mock {
        fn tag_name(&self, node: &u32) -> Option<&str> {
            TREE.iter().find(|n| n.0 == *node).map(|n| n.2)
        }
        fn id(&self, node: &u32) -> Option<&str> {
            TREE.iter().find(|n| n.0 == *node).and_then(|n| n.3)
        }
        fn class_name(&self, node: &u32) -> Option<&str> {
            TREE.iter().find(|n| n.0 == *node).map(|n| n.4)
        }
    }

    #[derive(Debug)]
    struct Ev {
        ty: &'static str,
        target: u32,
        prevented: bool,
        stopped: bool,
    }

    fn ev(ty: &'static str, target: u32) -> Ev {
        Ev {
            ty,
            target,
            prevented: false,
            stopped: false,
        }
    }

    impl NativeEvent<u32> for Ev {
        fn event_type(&self) -> &str {
            self.ty
        }
        fn target(&self) -> Option<u32> {
            Some(self.target)
        }
        fn prevent_default(&mut self) {
            self.prevented = true;
        }
        fn stop_propagation(&mut self) {
            self.stopped = true;
        }
        fn is_propagation_stopped(&self) -> bool {
            self.stopped
        }
        fn is_default_prevented(&self) -> bool {
            self.prevented
        }
    }

    impl Host<u32> for Mock {
        type Event = Ev;

        fn capabilities(&self) -> Capabilities {
            self.caps
        }

        fn add_listener(&self, node: &u32, event_type: &str, phase: Phase) {
            self.listeners
                .borrow_mut()
                .0
                .push((*node, event_type.to_owned(), phase, true));
        }

        fn remove_listener(&self, node: &u32, event_type: &str, phase: Phase) {
            self.listeners
                .borrow_mut()
                .0
                .push((*node, event_type.to_owned(), phase, false));
        }
    }

    type Trace = Rc<RefCell<Vec<(&'static str, u32, usize)>>>;

    // The mock has no native matcher, so every test runs on the fallback.
    fn delegator() -> Delegator<u32, Mock> {
        Delegator::new(Mock::with_caps(Capabilities::LISTENERS | Capabilities::CAPTURE))
    }

    fn recorder(trace: &Trace, name: &'static str) -> Callback<u32, Mock> {
        let trace = Rc::clone(trace);
        Callback::new(move |d: &mut Delegated<'_, u32, Mock>| {
            trace.borrow_mut().push((name, d.subject, d.distance));
        })
    }

    #[test]
    fn nearest_match_first_then_registration_order() {
        let d = delegator();
        let trace = Trace::default();
        d.handle(1)
            .on("click", "li", &recorder(&trace, "li"))
            .unwrap()
            .on("click", ".a", &recorder(&trace, "a"))
            .unwrap()
            .on("click", "span", &recorder(&trace, "span"))
            .unwrap()
            .on("click", "", &recorder(&trace, "root"))
            .unwrap();
        let report = d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(report.invoked, 4);
        assert_eq!(
            *trace.borrow(),
            vec![("span", 3, 0), ("li", 2, 1), ("a", 2, 1), ("root", 1, 2)]
        );
    }

    #[test]
    fn unmatched_selectors_do_not_fire() {
        let d = delegator();
        let trace = Trace::default();
        d.handle(1).on("click", ".a", &recorder(&trace, "a")).unwrap();
        d.dispatch(&1, &mut ev("click", 5));
        assert!(trace.borrow().is_empty());
        // The bound element itself is not a delegated match.
        d.handle(2).on("click", "li", &recorder(&trace, "li")).unwrap();
        d.dispatch(&2, &mut ev("click", 3));
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn cancel_stops_the_rest_and_flags_the_event() {
        let d = delegator();
        let trace = Trace::default();
        let h = d.handle(1);
        h.on("click", "span", &recorder(&trace, "span")).unwrap();
        h.on("click", "li", &Callback::new(|_: &mut Delegated<'_, u32, Mock>| false))
            .unwrap();
        h.on("click", ".a", &recorder(&trace, "a")).unwrap();
        h.on("click", "", &recorder(&trace, "root")).unwrap();
        let mut e = ev("click", 3);
        let report = d.dispatch(&1, &mut e);
        assert_eq!(
            report,
            Dispatched {
                invoked: 2,
                cancelled: true,
                stopped: false
            }
        );
        assert!(e.prevented && e.stopped);
        assert_eq!(*trace.borrow(), vec![("span", 3, 0)]);
    }

    #[test]
    fn stop_propagation_from_a_callback_ends_dispatch() {
        let d = delegator();
        let trace = Trace::default();
        let h = d.handle(1);
        h.on(
            "click",
            "span",
            &Callback::new(|d: &mut Delegated<'_, u32, Mock>| d.event.stop_propagation()),
        )
        .unwrap();
        h.on("click", "li", &recorder(&trace, "li")).unwrap();
        let mut e = ev("click", 3);
        let report = d.dispatch(&1, &mut e);
        assert!(report.stopped);
        assert!(!e.prevented);
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn on_twice_attaches_one_listener() {
        let d = delegator();
        let trace = Trace::default();
        let h = d.handle(1);
        h.on("click", "li", &recorder(&trace, "one")).unwrap();
        h.on("click", "li", &recorder(&trace, "two")).unwrap();
        d.handle(1).on("click", ".b", &recorder(&trace, "three")).unwrap();
        assert_eq!(d.host().attached(), 1);
        d.dispatch(&1, &mut ev("click", 5));
        assert_eq!(
            *trace.borrow(),
            vec![("one", 4, 1), ("two", 4, 1), ("three", 4, 1)]
        );
    }

    #[test]
    fn handles_are_deduplicated_per_element() {
        let d = delegator();
        let a = d.handle(1);
        let b = d.handle(1);
        let c = d.handle(2);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_eq!(d.element_key(&1), Some(a.key()));
        assert_eq!(d.element_key(&3), None);
    }

    #[test]
    fn off_granularity() {
        let d = delegator();
        let trace = Trace::default();
        let one = recorder(&trace, "one");
        let two = recorder(&trace, "two");
        let other = recorder(&trace, "other");
        let h = d.handle(1);
        h.on("click", "li", &one).unwrap();
        h.on("click", "li", &two).unwrap();
        h.on("click", "span", &other).unwrap();

        h.off("click", "li", Some(&one));
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(*trace.borrow(), vec![("other", 3, 0), ("two", 2, 1)]);

        trace.borrow_mut().clear();
        h.off("click", "li", None);
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(*trace.borrow(), vec![("other", 3, 0)]);

        trace.borrow_mut().clear();
        h.off_all("click");
        d.dispatch(&1, &mut ev("click", 3));
        assert!(trace.borrow().is_empty());
        assert_eq!(d.registration_count(), 0);
    }

    #[test]
    fn off_without_selector_or_callback_clears_the_type() {
        let d = delegator();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        let h = d.handle(1);
        h.on("click", "li", &cb).unwrap();
        h.on("click", None, &cb).unwrap();
        h.on("keyup", "li", &cb).unwrap();

        h.off("click", None, None);
        assert!(!h.is_bound("click"));
        assert!(h.is_bound("keyup"));
        assert_eq!(d.registration_count(), 1);
        d.dispatch(&1, &mut ev("click", 3));
        assert!(trace.borrow().is_empty());
    }

    #[test]
    fn missing_selector_with_callback_targets_root() {
        let d = delegator();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        let h = d.handle(1);
        h.on("click", "li", &cb).unwrap();
        h.on("click", "", &cb).unwrap();

        h.off("click", None, Some(&cb));
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(*trace.borrow(), vec![("cb", 2, 1)]);

        // An explicit root selector without a callback leaves delegated entries alone.
        h.on("click", "", &cb).unwrap();
        h.off("click", Selector::Root, None);
        assert_eq!(d.registration_count(), 1);
        assert!(h.is_bound("click"));
    }

    #[test]
    fn off_of_unknown_registrations_is_a_no_op() {
        let d = delegator();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        let h = d.handle(1);
        h.off("click", "li", Some(&cb)).off("click", "li", None).off_all("keyup");
        h.on("click", "li", &cb).unwrap();
        h.off("click", ".zzz", Some(&cb)).off("keyup", "li", None);
        assert!(h.is_bound("click"));
        assert_eq!(d.registration_count(), 1);
    }

    #[test]
    fn listener_follows_registrations_by_default() {
        let d = delegator();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        let h = d.handle(1);
        h.on("click", "li", &cb).unwrap();
        h.off("click", "li", Some(&cb));
        assert!(!h.is_bound("click"));
        assert_eq!(d.host().attached(), 0);
        // Re-registering binds again.
        h.on("click", "li", &cb).unwrap();
        assert!(h.is_bound("click"));
        assert_eq!(d.host().attached(), 1);
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(trace.borrow().len(), 1);
    }

    #[test]
    fn keep_attached_policy_attaches_once() {
        let d = Delegator::with_config(
            Mock::with_caps(Capabilities::all()),
            Config::default().with_listener_policy(ListenerPolicy::KeepAttached),
        )
        .unwrap();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        let h = d.handle(1);
        h.on("click", "li", &cb).unwrap();
        h.off_all("click");
        assert!(h.is_bound("click"));
        h.on("click", "li", &cb).unwrap();
        assert_eq!(d.host().listeners.borrow().0.len(), 1);
        d.clear();
        assert!(!h.is_bound("click"));
        assert_eq!(d.host().attached(), 0);
    }

    #[test]
    fn multiple_types_in_one_call() {
        let d = delegator();
        let trace = Trace::default();
        d.handle(1)
            .on(["click", "dblclick"], "span", &recorder(&trace, "s"))
            .unwrap();
        d.dispatch(&1, &mut ev("dblclick", 5));
        d.dispatch(&1, &mut ev("click", 5));
        d.dispatch(&1, &mut ev("keyup", 5));
        assert_eq!(trace.borrow().len(), 2);
        d.handle(1).off_all(vec!["click", "dblclick"]);
        assert_eq!(d.host().attached(), 0);
    }

    #[test]
    fn rejects_empty_types_and_listenerless_hosts() {
        let d = delegator();
        let trace = Trace::default();
        let cb = recorder(&trace, "cb");
        assert_eq!(
            d.handle(1).on(["click", ""], "li", &cb).err(),
            Some(Error::EmptyEventType)
        );
        assert_eq!(d.registration_count(), 0);

        let bare = Delegator::new(Mock::with_caps(Capabilities::empty()));
        assert_eq!(
            bare.handle(1).on("click", "li", &cb).err(),
            Some(Error::ListenersUnsupported)
        );
    }

    #[test]
    fn focus_uses_capture_when_available() {
        let d = delegator();
        let trace = Trace::default();
        d.handle(1).on("focus", "li", &recorder(&trace, "f")).unwrap();
        assert_eq!(
            d.host().listeners.borrow().0,
            vec![(1, "focus".to_owned(), Phase::Capture, true)]
        );
    }

    #[test]
    fn focus_uses_bubbling_proxy_without_capture() {
        let d = Delegator::new(Mock::with_caps(Capabilities::LISTENERS));
        let trace = Trace::default();
        let h = d.handle(1);
        h.on("blur", "li", &recorder(&trace, "blur")).unwrap();
        h.on("focusout", "span", &recorder(&trace, "focusout")).unwrap();
        // Both logical types share one native focusout listener.
        assert_eq!(
            d.host().listeners.borrow().0,
            vec![(1, "focusout".to_owned(), Phase::Bubble, true)]
        );
        d.dispatch(&1, &mut ev("focusout", 3));
        assert_eq!(
            *trace.borrow(),
            vec![("focusout", 3, 0), ("blur", 2, 1)]
        );
        h.off_all("blur");
        assert_eq!(d.host().attached(), 1);
        h.off_all("focusout");
        assert_eq!(d.host().attached(), 0);
    }

    #[test]
    fn proxied_callbacks_see_their_registered_type() {
        let d = Delegator::new(Mock::with_caps(Capabilities::LISTENERS));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cb = {
            let seen = Rc::clone(&seen);
            Callback::new(move |d: &mut Delegated<'_, u32, Mock>| {
                seen.borrow_mut()
                    .push((d.event_type.to_owned(), d.event.event_type().to_owned()));
            })
        };
        let h = d.handle(1);
        h.on("blur", "span", &cb).unwrap();
        h.on("focusout", "span", &cb).unwrap();
        d.dispatch(&1, &mut ev("focusout", 3));
        assert_eq!(
            *seen.borrow(),
            vec![
                ("blur".to_owned(), "focusout".to_owned()),
                ("focusout".to_owned(), "focusout".to_owned()),
            ]
        );
    }

    #[test]
    fn callbacks_may_register_and_unregister_during_dispatch() {
        let d = delegator();
        let trace = Trace::default();
        let late = recorder(&trace, "late");
        let victim = recorder(&trace, "victim");
        let h = d.handle(1);
        let (late2, victim2) = (late.clone(), victim.clone());
        h.on(
            "click",
            "span",
            &Callback::new(move |d: &mut Delegated<'_, u32, Mock>| {
                let h = d.handle();
                h.on("click", "span", &late2).unwrap();
                h.off("click", "li", Some(&victim2));
            }),
        )
        .unwrap();
        h.on("click", "li", &victim).unwrap();

        // The snapshot still runs `victim` and does not run `late`.
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(*trace.borrow(), vec![("victim", 2, 1)]);

        trace.borrow_mut().clear();
        d.dispatch(&1, &mut ev("click", 3));
        assert_eq!(*trace.borrow(), vec![("late", 3, 0)]);
    }

    #[test]
    fn fallback_preference_overrides_native_matching() {
        struct Native(Mock);
        impl ParentLookup<u32> for Native {
            fn parent_of(&self, node: &u32) -> Option<u32> {
                self.0.parent_of(node)
            }
        }
        impl ElementLookup<u32> for Native {
            fn tag_name(&self, node: &u32) -> Option<&str> {
                self.0.tag_name(node)
            }
            fn id(&self, node: &u32) -> Option<&str> {
                self.0.id(node)
            }
            fn class_name(&self, node: &u32) -> Option<&str> {
                self.0.class_name(node)
            }
        }
        impl Host<u32> for Native {
            type Event = Ev;
            fn capabilities(&self) -> Capabilities {
                Capabilities::all()
            }
            // Everything matches natively.
            fn matches_selector(&self, _: &u32, _: &str) -> bool {
                true
            }
            fn add_listener(&self, _: &u32, _: &str, _: Phase) {}
            fn remove_listener(&self, _: &u32, _: &str, _: Phase) {}
        }

        let hits = Rc::new(Cell::new(0));
        let count = |hits: &Rc<Cell<usize>>| {
            let hits = Rc::clone(hits);
            Callback::new(move |_: &mut Delegated<'_, u32, Native>| hits.set(hits.get() + 1))
        };

        let native = Delegator::new(Native(Mock::default()));
        native.handle(1).on("click", "li.a", &count(&hits)).unwrap();
        native.dispatch(&1, &mut ev("click", 3));
        assert_eq!(native.matcher(), SelectorMatcher::Native);
        assert_eq!(hits.get(), 1);

        let forced = Delegator::with_config(
            Native(Mock::default()),
            Config::default().with_matcher(MatcherPreference::Fallback),
        )
        .unwrap();
        forced.handle(1).on("click", "li.a", &count(&hits)).unwrap();
        forced.dispatch(&1, &mut ev("click", 3));
        assert_eq!(forced.matcher(), SelectorMatcher::Fallback);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dispatch_on_unknown_element_does_nothing() {
        let d = delegator();
        assert_eq!(d.dispatch(&1, &mut ev("click", 3)), Dispatched::default());
        d.handle(1);
        assert_eq!(d.dispatch(&1, &mut ev("click", 3)), Dispatched::default());
    }

    #[test]
    fn callback_identity_is_shared_by_clones() {
        let trace = Trace::default();
        let a = recorder(&trace, "a");
        let b = recorder(&trace, "a");
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn handle_clear_unbinds_every_type() {
        let d = delegator();
        let trace = Trace::default();
        let h = d.handle(1);
        h.on(["click", "keyup", "focus"], "li", &recorder(&trace, "x"))
            .unwrap();
        assert_eq!(d.host().attached(), 3);
        h.clear();
        assert_eq!(d.host().attached(), 0);
        assert_eq!(d.registration_count(), 0);
    }
}
