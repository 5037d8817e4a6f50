//! Top-level page: header with basket counter, gallery, lock state

use libstorefront::AppEvent;

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};

/// The page shell every other view mounts into
///
/// Keeps the gallery card order so cursor movement and selection stay
/// consistent with what is on screen. While a modal is open the page is
/// locked and ignores gallery interaction.
pub struct PageView {
    fragment: Fragment,
    card_ids: Vec<String>,
    cursor: usize,
    locked: bool,
}

impl PageView {
    /// # Errors
    ///
    /// Fails if the page template is missing any element the view
    /// writes to.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment =
            templates.fragment("page", &["page.gallery", "page.basket-counter"])?;
        Ok(Self {
            fragment,
            card_ids: Vec::new(),
            cursor: 0,
            locked: false,
        })
    }

    /// Mount the gallery cards, replacing whatever was there
    pub fn set_catalog(&mut self, cards: Vec<(String, Node)>) {
        self.card_ids = cards.iter().map(|(id, _)| id.clone()).collect();
        self.cursor = 0;
        let nodes = cards.into_iter().map(|(_, node)| node).collect();
        self.fragment.replace_children("page.gallery", nodes);
    }

    /// Update the header basket counter
    pub fn set_counter(&mut self, count: usize) {
        self.fragment
            .set_text("page.basket-counter", count.to_string());
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the gallery cursor, clamped to the card range
    pub fn move_cursor(&mut self, delta: isize) {
        if self.locked || self.card_ids.is_empty() {
            return;
        }
        let last = self.card_ids.len() - 1;
        self.cursor = self
            .cursor
            .saturating_add_signed(delta)
            .min(last);
    }

    /// The selection event for the card under the cursor
    pub fn select(&self) -> Option<AppEvent> {
        if self.locked {
            return None;
        }
        self.card_ids
            .get(self.cursor)
            .map(|id| AppEvent::CardSelected { id: id.clone() })
    }

    /// The basket-opening event
    pub fn open_basket(&self) -> Option<AppEvent> {
        if self.locked {
            return None;
        }
        Some(AppEvent::BasketOpenRequested)
    }

    pub fn root(&self) -> &Node {
        self.fragment.root()
    }
}
