//! Modal container hosting one content fragment at a time

use libstorefront::AppEvent;

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};

/// What the modal currently shows, for input routing and refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Preview,
    Basket,
    OrderForm,
    ContactsForm,
    Success,
}

pub struct ModalView {
    fragment: Fragment,
    showing: Option<ContentKind>,
}

impl ModalView {
    /// # Errors
    ///
    /// Fails if the modal template is missing its content slot.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let mut fragment = templates.fragment("modal", &["modal.content"])?;
        fragment.root_mut().set_hidden(true);
        Ok(Self {
            fragment,
            showing: None,
        })
    }

    /// Show `content`; returns `ModalOpened` on the closed-to-open
    /// transition only
    ///
    /// Replacing the content of an already open modal (stepping from
    /// order to contacts, say) swaps the fragment without re-announcing
    /// the open state.
    pub fn open(&mut self, kind: ContentKind, content: Node) -> Option<AppEvent> {
        let was_closed = self.showing.is_none();
        self.showing = Some(kind);
        self.fragment.root_mut().set_hidden(false);
        self.fragment.replace_children("modal.content", vec![content]);
        was_closed.then_some(AppEvent::ModalOpened)
    }

    /// Swap the content in place without touching the open state
    ///
    /// No-op when closed or showing a different kind.
    pub fn refresh(&mut self, kind: ContentKind, content: Node) {
        if self.showing == Some(kind) {
            self.fragment.replace_children("modal.content", vec![content]);
        }
    }

    /// Hide the modal; returns `ModalClosed`, or `None` if it was
    /// already closed
    pub fn close(&mut self) -> Option<AppEvent> {
        if self.showing.is_none() {
            return None;
        }
        self.showing = None;
        self.fragment.root_mut().set_hidden(true);
        self.fragment.replace_children("modal.content", Vec::new());
        Some(AppEvent::ModalClosed)
    }

    pub fn showing(&self) -> Option<ContentKind> {
        self.showing
    }

    pub fn root(&self) -> &Node {
        self.fragment.root()
    }
}
