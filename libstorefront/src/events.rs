//! In-process event bus coordinating the model and the views
//!
//! The bus is the only channel between components: views emit events on
//! user interaction, the model emits events on state change, and the
//! orchestration layer subscribes to both. No component holds a direct
//! reference to another.
//!
//! # Dispatch semantics
//!
//! Dispatch is synchronous and single-threaded: `emit` invokes every
//! matching handler in registration order with the same payload and
//! returns only after all of them ran. There is no queuing and no
//! isolation; a panicking handler propagates to the emitter. Re-entrant
//! emission from within a handler is permitted and executes depth-first.
//!
//! Topics are either exact names or regex patterns, matched per emission
//! against the event's topic string.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use regex::Regex;

use crate::error::{Result, StorefrontError};
use crate::types::{OrderField, Product};
use crate::validation::FormStep;

/// Events carried by the bus
///
/// A closed set of typed payload variants, one per topic. Payloads are
/// plain immutable snapshots; handlers never receive references into
/// live model state.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The catalog was replaced (fetched at startup)
    CatalogChanged { items: Vec<Product> },
    /// The previewed product changed, or the preview was cleared
    ///
    /// `in_basket` reflects the basket at emission time so the preview
    /// can offer add or remove without asking the model.
    PreviewChanged {
        product: Option<Product>,
        in_basket: bool,
    },
    /// Basket contents changed; carries product snapshots in basket
    /// order plus the current total
    BasketChanged { items: Vec<Product>, total: u64 },
    /// A validation pass recomputed the complete error set for a step
    ///
    /// Fields absent from the mapping are implicitly valid.
    FormErrorsChanged {
        step: FormStep,
        errors: BTreeMap<OrderField, String>,
    },

    /// A catalog card was activated
    CardSelected { id: String },
    /// The previewed product should be added to the basket
    BasketAddRequested { id: String },
    /// A product should be removed from the basket
    BasketRemoveRequested { id: String },
    /// The basket view should open
    BasketOpenRequested,
    /// The order step should open
    OrderOpenRequested,
    /// A checkout form field changed
    OrderFieldChanged { field: OrderField, value: String },
    /// The order step was submitted
    OrderSubmitted,
    /// The contacts step was submitted
    ContactsSubmitted,
    /// The success view was dismissed
    SuccessDismissed,

    /// The catalog fetch resolved
    ProductsFetched { items: Vec<Product> },
    /// The order submission resolved with a confirmation
    OrderCompleted { total: u64 },

    /// The modal opened (page becomes locked)
    ModalOpened,
    /// The modal closed (page unlocks)
    ModalClosed,
}

impl AppEvent {
    /// Stable topic string this event is published under
    pub fn topic(&self) -> &'static str {
        match self {
            AppEvent::CatalogChanged { .. } => "catalog:changed",
            AppEvent::PreviewChanged { .. } => "preview:changed",
            AppEvent::BasketChanged { .. } => "basket:changed",
            AppEvent::FormErrorsChanged { .. } => "form:errors-changed",
            AppEvent::CardSelected { .. } => "card:selected",
            AppEvent::BasketAddRequested { .. } => "basket:add-requested",
            AppEvent::BasketRemoveRequested { .. } => "basket:remove-requested",
            AppEvent::BasketOpenRequested => "basket:open",
            AppEvent::OrderOpenRequested => "order:open",
            AppEvent::OrderFieldChanged { .. } => "order:field-changed",
            AppEvent::OrderSubmitted => "order:submitted",
            AppEvent::ContactsSubmitted => "contacts:submitted",
            AppEvent::SuccessDismissed => "success:dismissed",
            AppEvent::ProductsFetched { .. } => "api:products-fetched",
            AppEvent::OrderCompleted { .. } => "api:order-completed",
            AppEvent::ModalOpened => "modal:opened",
            AppEvent::ModalClosed => "modal:closed",
        }
    }
}

/// Subscription topic: an exact name or a pattern
#[derive(Debug, Clone)]
pub enum Topic {
    Exact(String),
    Pattern(Regex),
}

impl Topic {
    pub fn exact(name: impl Into<String>) -> Self {
        Topic::Exact(name.into())
    }

    /// Compile a pattern topic
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the pattern is not a valid regex.
    pub fn pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| StorefrontError::InvalidInput(format!("Invalid topic pattern: {}", e)))?;
        Ok(Topic::Pattern(regex))
    }

    /// Does this topic match the given topic name?
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Topic::Exact(exact) => exact == name,
            Topic::Pattern(regex) => regex.is_match(name),
        }
    }
}

/// Handle returned by `on`, used to remove the subscription later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Handler = Rc<dyn Fn(&AppEvent)>;

struct Subscriber {
    id: SubscriptionId,
    topic: Topic,
    handler: Handler,
}

#[derive(Default)]
struct Inner {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

/// The bus itself: a cheaply cloneable handle over shared subscriber state
///
/// Single-threaded by construction (`Rc` inner); clones share the same
/// subscriber list, so the bus can be handed to every component at
/// construction time.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Rc<RefCell<Inner>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a topic
    ///
    /// Handlers run in registration order. A handler registered from
    /// within a dispatch sees only subsequent emissions.
    pub fn on(&self, topic: Topic, handler: impl Fn(&AppEvent) + 'static) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        let id = SubscriptionId(inner.next_id);
        inner.next_id += 1;
        inner.subscribers.push(Subscriber {
            id,
            topic,
            handler: Rc::new(handler),
        });
        id
    }

    /// Register a handler for an exact topic name
    pub fn on_exact(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&AppEvent) + 'static,
    ) -> SubscriptionId {
        self.on(Topic::exact(name), handler)
    }

    /// Register a handler for a pattern topic
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the pattern is not a valid regex.
    pub fn on_pattern(
        &self,
        pattern: &str,
        handler: impl Fn(&AppEvent) + 'static,
    ) -> Result<SubscriptionId> {
        Ok(self.on(Topic::pattern(pattern)?, handler))
    }

    /// Remove a subscription; returns false if it was already gone
    pub fn off(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|s| s.id != id);
        inner.subscribers.len() != before
    }

    /// Emit an event to every handler whose topic matches
    ///
    /// Synchronous: all matching handlers run to completion, in
    /// registration order, before this returns. The subscriber list is
    /// snapshotted before dispatch, so handlers may freely subscribe,
    /// unsubscribe, or emit again (depth-first) without deadlocking the
    /// bus.
    pub fn emit(&self, event: AppEvent) {
        let name = event.topic();
        let matching: Vec<Handler> = self
            .inner
            .borrow()
            .subscribers
            .iter()
            .filter(|s| s.topic.matches(name))
            .map(|s| Rc::clone(&s.handler))
            .collect();

        for handler in matching {
            handler(&event);
        }
    }

    /// Convenience wrapper: a closure that emits a fixed event each call
    pub fn trigger(&self, event: AppEvent) -> impl Fn() {
        let bus = self.clone();
        move || bus.emit(event.clone())
    }

    /// Number of live subscriptions, for diagnostics
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(log: &Rc<RefCell<Vec<String>>>, tag: &str) -> impl Fn(&AppEvent) {
        let log = Rc::clone(log);
        let tag = tag.to_string();
        move |event| log.borrow_mut().push(format!("{}:{}", tag, event.topic()))
    }

    #[test]
    fn test_exact_topic_dispatch() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.on_exact("modal:opened", record(&log, "a"));
        bus.on_exact("modal:closed", record(&log, "b"));

        bus.emit(AppEvent::ModalOpened);

        assert_eq!(*log.borrow(), vec!["a:modal:opened"]);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.on_exact("modal:opened", record(&log, "first"));
        bus.on_exact("modal:opened", record(&log, "second"));
        bus.on_exact("modal:opened", record(&log, "third"));

        bus.emit(AppEvent::ModalOpened);

        assert_eq!(
            *log.borrow(),
            vec![
                "first:modal:opened",
                "second:modal:opened",
                "third:modal:opened"
            ]
        );
    }

    #[test]
    fn test_pattern_topic_matches_multiple_events() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.on_pattern("^modal:", record(&log, "m")).unwrap();

        bus.emit(AppEvent::ModalOpened);
        bus.emit(AppEvent::BasketOpenRequested);
        bus.emit(AppEvent::ModalClosed);

        assert_eq!(*log.borrow(), vec!["m:modal:opened", "m:modal:closed"]);
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let bus = EventBus::new();
        let result = bus.on_pattern("(unclosed", |_| {});
        assert!(result.is_err());
    }

    #[test]
    fn test_same_payload_to_every_handler() {
        let bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        for _ in 0..2 {
            let seen = Rc::clone(&seen);
            bus.on_exact("card:selected", move |event| {
                if let AppEvent::CardSelected { id } = event {
                    seen.borrow_mut().push(id.clone());
                }
            });
        }

        bus.emit(AppEvent::CardSelected {
            id: "p1".to_string(),
        });

        assert_eq!(*seen.borrow(), vec!["p1", "p1"]);
    }

    #[test]
    fn test_off_removes_subscription() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let id = bus.on_exact("modal:opened", record(&log, "a"));
        assert_eq!(bus.subscriber_count(), 1);

        assert!(bus.off(id));
        assert!(!bus.off(id));
        assert_eq!(bus.subscriber_count(), 0);

        bus.emit(AppEvent::ModalOpened);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_reentrant_emission_is_depth_first() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        {
            let log = Rc::clone(&log);
            let bus_inner = bus.clone();
            bus.on_exact("order:open", move |_| {
                log.borrow_mut().push("order-begin".to_string());
                bus_inner.emit(AppEvent::ModalOpened);
                log.borrow_mut().push("order-end".to_string());
            });
        }
        bus.on_exact("modal:opened", record(&log, "modal"));

        bus.emit(AppEvent::OrderOpenRequested);

        // The nested emission completes before the outer handler resumes.
        assert_eq!(
            *log.borrow(),
            vec!["order-begin", "modal:modal:opened", "order-end"]
        );
    }

    #[test]
    fn test_handler_registered_during_dispatch_sees_later_emissions_only() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        {
            let log = Rc::clone(&log);
            let bus_inner = bus.clone();
            bus.on_exact("modal:opened", move |_| {
                bus_inner.on_exact("modal:opened", record(&log, "late"));
            });
        }

        bus.emit(AppEvent::ModalOpened);
        assert!(log.borrow().is_empty());

        bus.emit(AppEvent::ModalOpened);
        assert_eq!(*log.borrow(), vec!["late:modal:opened"]);
    }

    #[test]
    fn test_trigger_helper_emits_fixed_event() {
        let bus = EventBus::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        bus.on_exact("basket:open", record(&log, "t"));
        let open_basket = bus.trigger(AppEvent::BasketOpenRequested);

        open_basket();
        open_basket();

        assert_eq!(*log.borrow(), vec!["t:basket:open", "t:basket:open"]);
    }

    #[test]
    fn test_emit_with_no_subscribers_is_noop() {
        let bus = EventBus::new();
        bus.emit(AppEvent::ModalClosed);
        assert_eq!(bus.subscriber_count(), 0);
    }
}
