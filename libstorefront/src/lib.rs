//! Storefront core - headless catalog, basket, and checkout state
//!
//! This library holds everything below the view layer of the storefront:
//! the event bus, the application data model, the validation policy,
//! and the HTTP client for the product and order endpoints. It knows
//! nothing about rendering; front ends subscribe to the bus and drive
//! the model through the orchestration layer they own.

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod model;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use api::{HttpShopApi, ShopApi};
pub use config::Config;
pub use error::{Result, StorefrontError};
pub use events::{AppEvent, EventBus, SubscriptionId, Topic};
pub use model::AppModel;
pub use types::{OrderConfirmation, OrderDraft, OrderField, OrderPayload, Payment, Product};
pub use validation::{FormStep, ValidationRules};
