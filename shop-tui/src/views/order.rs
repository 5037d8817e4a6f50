//! Order step of checkout: payment method and delivery address

use std::collections::BTreeMap;

use libstorefront::{AppEvent, OrderField, Payment};

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};

/// The first checkout form
///
/// Owns the in-progress input state (the user types here, so the view
/// is the source of the draft values) and reflects the error set handed
/// back after each validation pass.
pub struct OrderFormView {
    fragment: Fragment,
    payment: Option<Payment>,
    address: String,
    can_submit: bool,
}

impl OrderFormView {
    /// # Errors
    ///
    /// Fails if the order-form template is missing any element the view
    /// writes to.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment = templates.fragment(
            "order-form",
            &[
                "order.payment-card",
                "order.payment-cash",
                "order.address",
                "order.errors",
                "order.submit",
            ],
        )?;
        let mut view = Self {
            fragment,
            payment: None,
            address: String::new(),
            can_submit: false,
        };
        view.fragment.set_disabled("order.submit", true);
        view.sync();
        Ok(view)
    }

    /// Choose a payment method; returns the field-change event
    pub fn select_payment(&mut self, payment: Payment) -> AppEvent {
        self.payment = Some(payment);
        self.sync();
        AppEvent::OrderFieldChanged {
            field: OrderField::Payment,
            value: payment.to_string(),
        }
    }

    /// Append a character to the address; returns the field-change event
    pub fn push_char(&mut self, c: char) -> AppEvent {
        self.address.push(c);
        self.sync();
        self.address_changed()
    }

    /// Delete the last address character; returns the field-change event
    pub fn backspace(&mut self) -> AppEvent {
        self.address.pop();
        self.sync();
        self.address_changed()
    }

    /// Show the error set from the latest validation pass
    ///
    /// The set is complete for this step; an empty set enables submit.
    pub fn set_errors(&mut self, errors: &BTreeMap<OrderField, String>) {
        self.can_submit = errors.is_empty();
        let joined = errors.values().cloned().collect::<Vec<_>>().join("; ");
        self.fragment.set_text("order.errors", joined);
        self.fragment.set_disabled("order.submit", !self.can_submit);
    }

    /// The submission event, unless validation left the step invalid
    pub fn submit(&self) -> Option<AppEvent> {
        if self.can_submit {
            Some(AppEvent::OrderSubmitted)
        } else {
            None
        }
    }

    /// Drop all input state, ready for the next order
    pub fn reset(&mut self) {
        self.payment = None;
        self.address.clear();
        self.can_submit = false;
        self.fragment.set_text("order.errors", "");
        self.fragment.set_disabled("order.submit", true);
        self.sync();
    }

    pub fn root(&self) -> &Node {
        self.fragment.root()
    }

    fn address_changed(&self) -> AppEvent {
        AppEvent::OrderFieldChanged {
            field: OrderField::Address,
            value: self.address.clone(),
        }
    }

    fn sync(&mut self) {
        self.fragment.set_text("order.address", &self.address);
        self.fragment
            .set_attr("order.payment-card", "selected", bool_attr(self.payment == Some(Payment::Card)));
        self.fragment
            .set_attr("order.payment-cash", "selected", bool_attr(self.payment == Some(Payment::Cash)));
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builtin_templates;

    fn view() -> OrderFormView {
        OrderFormView::new(&builtin_templates()).unwrap()
    }

    #[test]
    fn test_payment_selection_produces_field_event() {
        let mut form = view();
        let event = form.select_payment(Payment::Cash);
        assert_eq!(
            event,
            AppEvent::OrderFieldChanged {
                field: OrderField::Payment,
                value: "cash".to_string(),
            }
        );
        assert_eq!(
            form.root().find("order.payment-cash").unwrap().attr("selected"),
            Some("true")
        );
        assert_eq!(
            form.root().find("order.payment-card").unwrap().attr("selected"),
            Some("false")
        );
    }

    #[test]
    fn test_typing_carries_the_full_value() {
        let mut form = view();
        form.push_char('1');
        form.push_char('a');
        let event = form.push_char('b');
        assert_eq!(
            event,
            AppEvent::OrderFieldChanged {
                field: OrderField::Address,
                value: "1ab".to_string(),
            }
        );

        let event = form.backspace();
        assert_eq!(
            event,
            AppEvent::OrderFieldChanged {
                field: OrderField::Address,
                value: "1a".to_string(),
            }
        );
        assert_eq!(form.root().find("order.address").unwrap().text(), "1a");
    }

    #[test]
    fn test_submit_gated_on_error_set() {
        let mut form = view();
        assert_eq!(form.submit(), None);

        let mut errors = BTreeMap::new();
        errors.insert(OrderField::Address, "Enter a delivery address".to_string());
        form.set_errors(&errors);
        assert_eq!(form.submit(), None);
        assert!(form.root().find("order.submit").unwrap().disabled());
        assert_eq!(
            form.root().find("order.errors").unwrap().text(),
            "Enter a delivery address"
        );

        form.set_errors(&BTreeMap::new());
        assert_eq!(form.submit(), Some(AppEvent::OrderSubmitted));
        assert!(!form.root().find("order.submit").unwrap().disabled());
    }

    #[test]
    fn test_reset_clears_input_and_gate() {
        let mut form = view();
        form.select_payment(Payment::Card);
        form.push_char('x');
        form.set_errors(&BTreeMap::new());

        form.reset();
        assert_eq!(form.submit(), None);
        assert_eq!(form.root().find("order.address").unwrap().text(), "");
        assert_eq!(
            form.root().find("order.payment-card").unwrap().attr("selected"),
            Some("false")
        );
    }
}
