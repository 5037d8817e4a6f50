//! Application data model
//!
//! Single source of truth for catalog, basket, preview selection, the
//! order draft, and validation errors. Views never touch this type;
//! every mutation happens through the orchestration layer, and every
//! observable change is announced on the injected event bus.
//!
//! The catalog is fetched once at startup and read-only afterwards.
//! Basket and order draft live for the session and are cleared after a
//! successful submission. Nothing is persisted.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{Result, StorefrontError};
use crate::events::{AppEvent, EventBus};
use crate::types::{OrderDraft, OrderField, OrderPayload, Product};
use crate::validation::{FormStep, ValidationRules};

pub struct AppModel {
    events: EventBus,
    rules: ValidationRules,
    catalog: Vec<Product>,
    basket: Vec<String>,
    preview: Option<String>,
    order: OrderDraft,
    errors: BTreeMap<OrderField, String>,
}

impl AppModel {
    /// Create a model publishing its change events on `events`
    ///
    /// The bus is constructor-injected; there is no ambient global
    /// model or bus anywhere in the crate.
    pub fn new(events: EventBus) -> Self {
        Self::with_rules(events, ValidationRules::default())
    }

    /// Create a model with a custom validation policy
    pub fn with_rules(events: EventBus, rules: ValidationRules) -> Self {
        Self {
            events,
            rules,
            catalog: Vec::new(),
            basket: Vec::new(),
            preview: None,
            order: OrderDraft::default(),
            errors: BTreeMap::new(),
        }
    }

    // === Catalog ===

    /// Replace the catalog and emit `catalog:changed`
    pub fn set_items(&mut self, items: Vec<Product>) {
        self.catalog = items;
        self.events.emit(AppEvent::CatalogChanged {
            items: self.catalog.clone(),
        });
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }

    // === Preview selection ===

    /// Select a product for preview (or clear with `None`) and emit
    /// `preview:changed`
    ///
    /// An id unknown to the catalog is ignored.
    pub fn set_preview(&mut self, id: Option<&str>) {
        let product = match id {
            Some(id) => match self.product(id) {
                Some(product) => Some(product.clone()),
                None => {
                    warn!(id, "preview requested for unknown product");
                    return;
                }
            },
            None => None,
        };

        self.preview = product.as_ref().map(|p| p.id.clone());
        let in_basket = product
            .as_ref()
            .map(|p| self.is_in_basket(&p.id))
            .unwrap_or(false);
        self.events
            .emit(AppEvent::PreviewChanged { product, in_basket });
    }

    pub fn preview(&self) -> Option<&Product> {
        self.preview.as_deref().and_then(|id| self.product(id))
    }

    // === Basket ===

    /// Add a product id to the basket and emit `basket:changed`
    ///
    /// Idempotent: an id already present is a no-op and emits nothing.
    /// An id unknown to the catalog is never admitted, so the basket
    /// cannot hold dangling ids.
    pub fn add_to_basket(&mut self, id: &str) {
        if self.product(id).is_none() {
            warn!(id, "refusing to add unknown product to basket");
            return;
        }
        if self.basket.iter().any(|existing| existing == id) {
            return;
        }
        self.basket.push(id.to_string());
        self.emit_basket_changed();
    }

    /// Remove a product id from the basket and emit `basket:changed`
    ///
    /// Removing an absent id is a no-op and emits nothing.
    pub fn remove_from_basket(&mut self, id: &str) {
        let before = self.basket.len();
        self.basket.retain(|existing| existing != id);
        if self.basket.len() != before {
            self.emit_basket_changed();
        }
    }

    /// Empty the basket and emit `basket:changed` with total 0
    pub fn clear_basket(&mut self) {
        self.basket.clear();
        self.emit_basket_changed();
    }

    /// Basket ids in insertion order
    pub fn basket_ids(&self) -> &[String] {
        &self.basket
    }

    /// Basket products in insertion order
    pub fn basket_products(&self) -> Vec<Product> {
        self.basket
            .iter()
            .filter_map(|id| self.product(id).cloned())
            .collect()
    }

    pub fn is_in_basket(&self, id: &str) -> bool {
        self.basket.iter().any(|existing| existing == id)
    }

    /// Sum of the prices of contained products; priceless items count 0
    pub fn basket_total(&self) -> u64 {
        self.basket
            .iter()
            .filter_map(|id| self.product(id).and_then(|p| p.price))
            .sum()
    }

    fn emit_basket_changed(&self) {
        self.events.emit(AppEvent::BasketChanged {
            items: self.basket_products(),
            total: self.basket_total(),
        });
    }

    // === Order draft ===

    /// Set one draft field
    ///
    /// Mutation only: the caller drives an explicit validation pass
    /// afterwards (see `validate_order_form` / `validate_contacts_form`).
    pub fn set_order_field(&mut self, field: OrderField, value: &str) {
        self.order.set(field, value);
    }

    pub fn order(&self) -> &OrderDraft {
        &self.order
    }

    /// Recompute the order-step error set wholesale, emit
    /// `form:errors-changed`, and report whether the step is valid
    pub fn validate_order_form(&mut self) -> bool {
        self.run_validation(FormStep::Order)
    }

    /// Recompute the contacts-step error set wholesale, emit
    /// `form:errors-changed`, and report whether the step is valid
    pub fn validate_contacts_form(&mut self) -> bool {
        self.run_validation(FormStep::Contacts)
    }

    fn run_validation(&mut self, step: FormStep) -> bool {
        self.errors = self.rules.validate(step, &self.order);
        self.events.emit(AppEvent::FormErrorsChanged {
            step,
            errors: self.errors.clone(),
        });
        self.errors.is_empty()
    }

    /// Error set from the most recent validation pass
    pub fn errors(&self) -> &BTreeMap<OrderField, String> {
        &self.errors
    }

    /// Reset the draft and errors, emitting an empty error set
    pub fn clear_order(&mut self) {
        self.order.clear();
        self.errors.clear();
        self.events.emit(AppEvent::FormErrorsChanged {
            step: FormStep::Order,
            errors: BTreeMap::new(),
        });
    }

    /// Combine the draft and basket into a submission payload
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no payment method is selected or the
    /// basket holds nothing payable. Both are unreachable through the
    /// orchestration layer, which gates submission on validation.
    pub fn order_payload(&self) -> Result<OrderPayload> {
        let payment = self
            .order
            .payment
            .ok_or_else(|| StorefrontError::InvalidInput("no payment method selected".into()))?;
        let total = self.basket_total();
        if total == 0 {
            return Err(StorefrontError::InvalidInput(
                "basket holds nothing payable".into(),
            ));
        }

        Ok(OrderPayload {
            payment,
            address: self.order.address.clone(),
            email: self.order.email.clone(),
            phone: self.order.phone.clone(),
            total,
            items: self.basket.clone(),
        })
    }
}
