//! Contacts step of checkout: email and phone

use std::collections::BTreeMap;

use libstorefront::{AppEvent, OrderField};

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};

/// Which input currently receives typed characters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactsFocus {
    Email,
    Phone,
}

/// The second checkout form
pub struct ContactsFormView {
    fragment: Fragment,
    email: String,
    phone: String,
    focus: ContactsFocus,
    can_submit: bool,
}

impl ContactsFormView {
    /// # Errors
    ///
    /// Fails if the contacts-form template is missing any element the
    /// view writes to.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment = templates.fragment(
            "contacts-form",
            &[
                "contacts.email",
                "contacts.phone",
                "contacts.errors",
                "contacts.submit",
            ],
        )?;
        let mut view = Self {
            fragment,
            email: String::new(),
            phone: String::new(),
            focus: ContactsFocus::Email,
            can_submit: false,
        };
        view.fragment.set_disabled("contacts.submit", true);
        view.sync();
        Ok(view)
    }

    pub fn focus(&self) -> ContactsFocus {
        self.focus
    }

    /// Move focus to the other input
    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            ContactsFocus::Email => ContactsFocus::Phone,
            ContactsFocus::Phone => ContactsFocus::Email,
        };
        self.sync();
    }

    /// Append a character to the focused input; returns the field-change
    /// event
    pub fn push_char(&mut self, c: char) -> AppEvent {
        match self.focus {
            ContactsFocus::Email => self.email.push(c),
            ContactsFocus::Phone => self.phone.push(c),
        }
        self.sync();
        self.focused_changed()
    }

    /// Delete the last character of the focused input; returns the
    /// field-change event
    pub fn backspace(&mut self) -> AppEvent {
        match self.focus {
            ContactsFocus::Email => self.email.pop(),
            ContactsFocus::Phone => self.phone.pop(),
        };
        self.sync();
        self.focused_changed()
    }

    /// Show the error set from the latest validation pass
    pub fn set_errors(&mut self, errors: &BTreeMap<OrderField, String>) {
        self.can_submit = errors.is_empty();
        let joined = errors.values().cloned().collect::<Vec<_>>().join("; ");
        self.fragment.set_text("contacts.errors", joined);
        self.fragment
            .set_disabled("contacts.submit", !self.can_submit);
    }

    /// The submission event, unless validation left the step invalid
    pub fn submit(&self) -> Option<AppEvent> {
        if self.can_submit {
            Some(AppEvent::ContactsSubmitted)
        } else {
            None
        }
    }

    /// Drop all input state, ready for the next order
    pub fn reset(&mut self) {
        self.email.clear();
        self.phone.clear();
        self.focus = ContactsFocus::Email;
        self.can_submit = false;
        self.fragment.set_text("contacts.errors", "");
        self.fragment.set_disabled("contacts.submit", true);
        self.sync();
    }

    pub fn root(&self) -> &Node {
        self.fragment.root()
    }

    fn focused_changed(&self) -> AppEvent {
        match self.focus {
            ContactsFocus::Email => AppEvent::OrderFieldChanged {
                field: OrderField::Email,
                value: self.email.clone(),
            },
            ContactsFocus::Phone => AppEvent::OrderFieldChanged {
                field: OrderField::Phone,
                value: self.phone.clone(),
            },
        }
    }

    fn sync(&mut self) {
        self.fragment.set_text("contacts.email", &self.email);
        self.fragment.set_text("contacts.phone", &self.phone);
        self.fragment.set_attr(
            "contacts.email",
            "focused",
            if self.focus == ContactsFocus::Email {
                "true"
            } else {
                "false"
            },
        );
        self.fragment.set_attr(
            "contacts.phone",
            "focused",
            if self.focus == ContactsFocus::Phone {
                "true"
            } else {
                "false"
            },
        );
    }
}
