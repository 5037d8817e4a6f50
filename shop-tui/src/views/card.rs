//! Product cards for the gallery and the preview modal

use libstorefront::{AppEvent, Product};

use crate::dom::{Fragment, TemplateRegistry, ViewResult};
use crate::views::{price_text, View};

/// Where the card appears, which decides its template and behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
    /// Compact tile in the gallery; activation opens the preview
    Gallery,
    /// Full card in the modal; activation adds to or removes from the
    /// basket
    Preview,
}

/// Snapshot a card renders from
#[derive(Debug, Clone)]
pub struct CardData {
    pub product: Product,
    pub in_basket: bool,
}

pub struct CatalogCard {
    kind: CardKind,
    fragment: Fragment,
    product_id: Option<String>,
    action: Action,
}

/// What activating the card should do, decided at render time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Select,
    Add,
    Remove,
    Nothing,
}

impl CatalogCard {
    /// # Errors
    ///
    /// Fails if the card template or any element the card writes to is
    /// missing from the registry.
    pub fn new(kind: CardKind, templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment = match kind {
            CardKind::Gallery => templates.fragment(
                "gallery-card",
                &["card.category", "card.title", "card.image", "card.price"],
            )?,
            CardKind::Preview => templates.fragment(
                "preview-card",
                &[
                    "card.category",
                    "card.title",
                    "card.image",
                    "card.description",
                    "card.button",
                    "card.price",
                ],
            )?,
        };
        Ok(Self {
            kind,
            fragment,
            product_id: None,
            action: Action::Nothing,
        })
    }

    /// The event a user activation stands for, if any
    ///
    /// `None` for a preview of a priceless product that is not in the
    /// basket, where the buy button is disabled.
    pub fn activate(&self) -> Option<AppEvent> {
        let id = self.product_id.clone()?;
        match self.action {
            Action::Select => Some(AppEvent::CardSelected { id }),
            Action::Add => Some(AppEvent::BasketAddRequested { id }),
            Action::Remove => Some(AppEvent::BasketRemoveRequested { id }),
            Action::Nothing => None,
        }
    }
}

impl View for CatalogCard {
    type Data = CardData;

    fn render(&mut self, data: &Self::Data) {
        let product = &data.product;
        self.product_id = Some(product.id.clone());

        self.fragment.set_text("card.title", &product.title);
        self.fragment.set_text("card.category", &product.category);
        self.fragment
            .set_text("card.price", price_text(product.price));
        self.fragment.set_attr("card.image", "src", &product.image);
        self.fragment
            .set_attr("card.image", "alt", &product.title);

        match self.kind {
            CardKind::Gallery => {
                self.action = Action::Select;
            }
            CardKind::Preview => {
                self.fragment
                    .set_text("card.description", &product.description);
                if data.in_basket {
                    self.action = Action::Remove;
                    self.fragment.set_text("card.button", "Remove from basket");
                    self.fragment.set_disabled("card.button", false);
                } else if product.purchasable() {
                    self.action = Action::Add;
                    self.fragment.set_text("card.button", "Buy");
                    self.fragment.set_disabled("card.button", false);
                } else {
                    self.action = Action::Nothing;
                    self.fragment.set_text("card.button", "Not for sale");
                    self.fragment.set_disabled("card.button", true);
                }
            }
        }
    }

    fn root(&self) -> &crate::dom::Node {
        self.fragment.root()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::builtin_templates;

    fn product(id: &str, price: Option<u64>) -> Product {
        Product {
            id: id.to_string(),
            title: format!("Product {}", id),
            description: "A fine product".to_string(),
            image: "http://cdn.example/p.svg".to_string(),
            category: "other".to_string(),
            price,
        }
    }

    #[test]
    fn test_gallery_card_activation_selects() {
        let templates = builtin_templates();
        let mut card = CatalogCard::new(CardKind::Gallery, &templates).unwrap();
        card.render(&CardData {
            product: product("p1", Some(100)),
            in_basket: false,
        });

        assert_eq!(
            card.activate(),
            Some(AppEvent::CardSelected {
                id: "p1".to_string()
            })
        );
        assert_eq!(card.root().find("card.price").unwrap().text(), "100 synapses");
    }

    #[test]
    fn test_preview_offers_buy_when_absent_from_basket() {
        let templates = builtin_templates();
        let mut card = CatalogCard::new(CardKind::Preview, &templates).unwrap();
        card.render(&CardData {
            product: product("p1", Some(100)),
            in_basket: false,
        });

        assert_eq!(card.root().find("card.button").unwrap().text(), "Buy");
        assert_eq!(
            card.activate(),
            Some(AppEvent::BasketAddRequested {
                id: "p1".to_string()
            })
        );
    }

    #[test]
    fn test_preview_offers_remove_when_in_basket() {
        let templates = builtin_templates();
        let mut card = CatalogCard::new(CardKind::Preview, &templates).unwrap();
        card.render(&CardData {
            product: product("p1", Some(100)),
            in_basket: true,
        });

        assert_eq!(
            card.root().find("card.button").unwrap().text(),
            "Remove from basket"
        );
        assert_eq!(
            card.activate(),
            Some(AppEvent::BasketRemoveRequested {
                id: "p1".to_string()
            })
        );
    }

    #[test]
    fn test_preview_of_priceless_product_cannot_buy() {
        let templates = builtin_templates();
        let mut card = CatalogCard::new(CardKind::Preview, &templates).unwrap();
        card.render(&CardData {
            product: product("p1", None),
            in_basket: false,
        });

        let button = card.root().find("card.button").unwrap();
        assert!(button.disabled());
        assert_eq!(card.root().find("card.price").unwrap().text(), "Priceless");
        assert_eq!(card.activate(), None);
    }

    #[test]
    fn test_activation_before_render_is_inert() {
        let templates = builtin_templates();
        let card = CatalogCard::new(CardKind::Gallery, &templates).unwrap();
        assert_eq!(card.activate(), None);
    }
}
