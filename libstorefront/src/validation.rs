//! Checkout form validation policy
//!
//! Validation is wholesale by contract: every pass recomputes the
//! complete error set for its step from the current draft. Fields absent
//! from the returned mapping are implicitly valid. The exact rule set is
//! a policy object so callers can swap it; the recompute contract is not
//! negotiable.

use std::collections::BTreeMap;

use regex::Regex;

use crate::types::{OrderDraft, OrderField};

/// The two checkout steps, each with its own rule subset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStep {
    /// Payment method + delivery address
    Order,
    /// Contact email + phone
    Contacts,
}

impl std::fmt::Display for FormStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormStep::Order => write!(f, "order"),
            FormStep::Contacts => write!(f, "contacts"),
        }
    }
}

/// Configurable validation rules for the checkout forms
#[derive(Debug, Clone)]
pub struct ValidationRules {
    email_shape: Regex,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            // Basic address shape: something@something.tld, no whitespace.
            email_shape: Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
                .expect("static email pattern compiles"),
        }
    }
}

impl ValidationRules {
    /// Override the email shape pattern
    pub fn with_email_shape(mut self, pattern: Regex) -> Self {
        self.email_shape = pattern;
        self
    }

    /// Recompute the full error set for a step
    pub fn validate(&self, step: FormStep, draft: &OrderDraft) -> BTreeMap<OrderField, String> {
        match step {
            FormStep::Order => self.validate_order(draft),
            FormStep::Contacts => self.validate_contacts(draft),
        }
    }

    /// Order step: payment method selected, address non-empty
    pub fn validate_order(&self, draft: &OrderDraft) -> BTreeMap<OrderField, String> {
        let mut errors = BTreeMap::new();

        if draft.payment.is_none() {
            errors.insert(OrderField::Payment, "Select a payment method".to_string());
        }
        if draft.address.trim().is_empty() {
            errors.insert(OrderField::Address, "Enter a delivery address".to_string());
        }

        errors
    }

    /// Contacts step: email matches the address shape, phone non-empty
    pub fn validate_contacts(&self, draft: &OrderDraft) -> BTreeMap<OrderField, String> {
        let mut errors = BTreeMap::new();

        if !self.email_shape.is_match(draft.email.trim()) {
            errors.insert(OrderField::Email, "Enter a valid email address".to_string());
        }
        if draft.phone.trim().is_empty() {
            errors.insert(OrderField::Phone, "Enter a phone number".to_string());
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Payment;

    fn draft(payment: Option<Payment>, address: &str, email: &str, phone: &str) -> OrderDraft {
        OrderDraft {
            payment,
            address: address.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }

    #[test]
    fn test_order_step_valid() {
        let rules = ValidationRules::default();
        let errors = rules.validate_order(&draft(Some(Payment::Card), "1 Main St", "", ""));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_empty_address_yields_exactly_address_key() {
        let rules = ValidationRules::default();
        let errors = rules.validate_order(&draft(Some(Payment::Card), "", "", ""));

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&OrderField::Address));
    }

    #[test]
    fn test_whitespace_address_is_empty() {
        let rules = ValidationRules::default();
        let errors = rules.validate_order(&draft(Some(Payment::Cash), "   ", "", ""));
        assert!(errors.contains_key(&OrderField::Address));
    }

    #[test]
    fn test_missing_payment_reported() {
        let rules = ValidationRules::default();
        let errors = rules.validate_order(&draft(None, "1 Main St", "", ""));

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&OrderField::Payment));
    }

    #[test]
    fn test_order_step_both_fields_invalid() {
        let rules = ValidationRules::default();
        let errors = rules.validate_order(&draft(None, "", "", ""));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_contacts_step_valid() {
        let rules = ValidationRules::default();
        let errors = rules.validate_contacts(&draft(None, "", "user@shop.example", "+155501"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_malformed_email_yields_exactly_email_key() {
        let rules = ValidationRules::default();
        let errors = rules.validate_contacts(&draft(None, "", "not-an-email", "+155501"));

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&OrderField::Email));
    }

    #[test]
    fn test_email_shapes() {
        let rules = ValidationRules::default();
        for bad in ["", "a@b", "a b@c.d", "@c.d", "a@", "a@@c.d"] {
            let errors = rules.validate_contacts(&draft(None, "", bad, "1"));
            assert!(errors.contains_key(&OrderField::Email), "accepted: {:?}", bad);
        }
        for good in ["a@b.c", "user.name@shop.example", "x+y@host.co.uk"] {
            let errors = rules.validate_contacts(&draft(None, "", good, "1"));
            assert!(!errors.contains_key(&OrderField::Email), "rejected: {:?}", good);
        }
    }

    #[test]
    fn test_empty_phone_reported() {
        let rules = ValidationRules::default();
        let errors = rules.validate_contacts(&draft(None, "", "user@shop.example", " "));

        assert_eq!(errors.len(), 1);
        assert!(errors.contains_key(&OrderField::Phone));
    }

    #[test]
    fn test_errors_recomputed_wholesale() {
        let rules = ValidationRules::default();
        let mut d = draft(None, "", "", "");

        let first = rules.validate_contacts(&d);
        assert_eq!(first.len(), 2);

        // Fixing one field drops its key entirely on the next pass.
        d.set(OrderField::Email, "user@shop.example");
        let second = rules.validate_contacts(&d);
        assert_eq!(second.len(), 1);
        assert!(!second.contains_key(&OrderField::Email));
    }

    #[test]
    fn test_configurable_email_shape() {
        let rules = ValidationRules::default()
            .with_email_shape(Regex::new(r"^.+@internal\.corp$").unwrap());

        let errors = rules.validate_contacts(&draft(None, "", "user@shop.example", "1"));
        assert!(errors.contains_key(&OrderField::Email));

        let errors = rules.validate_contacts(&draft(None, "", "user@internal.corp", "1"));
        assert!(!errors.contains_key(&OrderField::Email));
    }
}
