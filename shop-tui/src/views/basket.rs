//! Basket view: ordered rows, running total, and the order button

use libstorefront::{AppEvent, Product};

use crate::dom::{Fragment, Node, TemplateRegistry, ViewResult};
use crate::views::{price_text, View};

/// Snapshot the basket renders from
#[derive(Debug, Clone, Default)]
pub struct BasketData {
    pub items: Vec<Product>,
    pub total: u64,
}

pub struct BasketView {
    fragment: Fragment,
    row_template: Fragment,
    ids: Vec<String>,
    total: u64,
}

impl BasketView {
    /// # Errors
    ///
    /// Fails if the basket or basket-row template is missing any
    /// element the view writes to.
    pub fn new(templates: &TemplateRegistry) -> ViewResult<Self> {
        let fragment = templates.fragment(
            "basket",
            &["basket.list", "basket.button", "basket.total"],
        )?;
        let row_template = templates.fragment(
            "basket-row",
            &["row.index", "row.title", "row.price", "row.delete"],
        )?;
        Ok(Self {
            fragment,
            row_template,
            ids: Vec::new(),
            total: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The removal event for the row at `index`, if it exists
    pub fn remove_at(&self, index: usize) -> Option<AppEvent> {
        self.ids
            .get(index)
            .map(|id| AppEvent::BasketRemoveRequested { id: id.clone() })
    }

    /// The order-opening event, unless the basket holds nothing payable
    pub fn place_order(&self) -> Option<AppEvent> {
        if self.total == 0 {
            return None;
        }
        Some(AppEvent::OrderOpenRequested)
    }

    fn build_row(&self, index: usize, product: &Product) -> Node {
        let mut row = self.row_template.clone();
        row.set_text("row.index", (index + 1).to_string());
        row.set_text("row.title", &product.title);
        row.set_text("row.price", price_text(product.price));
        row.root().clone()
    }
}

impl View for BasketView {
    type Data = BasketData;

    fn render(&mut self, data: &Self::Data) {
        self.ids = data.items.iter().map(|p| p.id.clone()).collect();
        self.total = data.total;

        let rows: Vec<Node> = if data.items.is_empty() {
            vec![Node::new("li").with_text("Basket is empty")]
        } else {
            data.items
                .iter()
                .enumerate()
                .map(|(index, product)| self.build_row(index, product))
                .collect()
        };
        self.fragment.replace_children("basket.list", rows);

        self.fragment
            .set_text("basket.total", price_text(Some(data.total)));
        // Nothing payable means nothing to order.
        self.fragment
            .set_disabled("basket.button", data.total == 0);
    }

    fn root(&self) -> &Node {
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
            description: String::new(),
            image: String::new(),
            category: "other".to_string(),
            price,
        }
    }

    fn view() -> BasketView {
        BasketView::new(&builtin_templates()).unwrap()
    }

    #[test]
    fn test_empty_basket_shows_placeholder_and_disables_order() {
        let mut basket = view();
        basket.render(&BasketData::default());

        let list = basket.root().find("basket.list").unwrap();
        assert_eq!(list.children().len(), 1);
        assert_eq!(list.children()[0].text(), "Basket is empty");
        assert!(basket.root().find("basket.button").unwrap().disabled());
        assert_eq!(basket.place_order(), None);
    }

    #[test]
    fn test_rows_are_indexed_in_order() {
        let mut basket = view();
        basket.render(&BasketData {
            items: vec![product("a", Some(100)), product("b", None)],
            total: 100,
        });

        let list = basket.root().find("basket.list").unwrap();
        assert_eq!(list.children().len(), 2);
        assert_eq!(list.children()[0].find("row.index").unwrap().text(), "1");
        assert_eq!(
            list.children()[0].find("row.title").unwrap().text(),
            "Product a"
        );
        assert_eq!(list.children()[1].find("row.index").unwrap().text(), "2");
        assert_eq!(
            list.children()[1].find("row.price").unwrap().text(),
            "Priceless"
        );
    }

    #[test]
    fn test_total_and_order_button_follow_data() {
        let mut basket = view();
        basket.render(&BasketData {
            items: vec![product("a", Some(100))],
            total: 100,
        });

        assert_eq!(
            basket.root().find("basket.total").unwrap().text(),
            "100 synapses"
        );
        assert!(!basket.root().find("basket.button").unwrap().disabled());
        assert_eq!(basket.place_order(), Some(AppEvent::OrderOpenRequested));
    }

    #[test]
    fn test_priceless_only_basket_cannot_order() {
        let mut basket = view();
        basket.render(&BasketData {
            items: vec![product("b", None)],
            total: 0,
        });

        assert!(basket.root().find("basket.button").unwrap().disabled());
        assert_eq!(basket.place_order(), None);
    }

    #[test]
    fn test_remove_at_maps_index_to_id() {
        let mut basket = view();
        basket.render(&BasketData {
            items: vec![product("a", Some(100)), product("b", Some(50))],
            total: 150,
        });

        assert_eq!(
            basket.remove_at(1),
            Some(AppEvent::BasketRemoveRequested {
                id: "b".to_string()
            })
        );
        assert_eq!(basket.remove_at(2), None);
    }
}
