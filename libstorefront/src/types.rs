//! Core domain types for the storefront

use serde::{Deserialize, Serialize};

/// A catalog product
///
/// Immutable once fetched: the catalog is loaded at startup and never
/// mutated afterwards. A product with `price: None` is "priceless" and
/// cannot be purchased; it may still sit in the basket but contributes
/// nothing to the total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub category: String,
    pub price: Option<u64>,
}

impl Product {
    /// A product can be purchased only if it has a price
    pub fn purchasable(&self) -> bool {
        self.price.is_some()
    }
}

/// Envelope returned by the catalog endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductList {
    pub total: usize,
    pub items: Vec<Product>,
}

/// Payment method for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Payment {
    Card,
    Cash,
}

impl std::fmt::Display for Payment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Payment::Card => write!(f, "card"),
            Payment::Cash => write!(f, "cash"),
        }
    }
}

impl std::str::FromStr for Payment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "card" => Ok(Payment::Card),
            "cash" => Ok(Payment::Cash),
            _ => Err(format!("Invalid payment method: '{}'", s)),
        }
    }
}

/// Fields of the order draft, used as keys of the validation error set
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Payment => "payment",
            OrderField::Address => "address",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The in-progress, not-yet-submitted order field values
///
/// Each field is independently settable; validation is a separate,
/// explicit pass (see the model). Cleared wholesale after a successful
/// submission or explicit cancellation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub payment: Option<Payment>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl OrderDraft {
    /// Set a single field from its string representation
    ///
    /// An unparseable payment value leaves the field unset; the
    /// validation pass reports it as missing.
    pub fn set(&mut self, field: OrderField, value: &str) {
        match field {
            OrderField::Payment => self.payment = value.parse().ok(),
            OrderField::Address => self.address = value.to_string(),
            OrderField::Email => self.email = value.to_string(),
            OrderField::Phone => self.phone = value.to_string(),
        }
    }

    /// Reset every field to its empty state
    pub fn clear(&mut self) {
        *self = OrderDraft::default();
    }
}

/// Request body for order submission
///
/// Combines the order draft fields with the basket contents: the ordered
/// id list and the derived total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderPayload {
    pub payment: Payment,
    pub address: String,
    pub email: String,
    pub phone: String,
    pub total: u64,
    pub items: Vec<String>,
}

/// Confirmation returned by the order endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub id: String,
    pub total: u64,
}
