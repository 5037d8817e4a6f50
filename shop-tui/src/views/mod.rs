//! View components
//!
//! Each view owns a `Fragment` cloned from a template and renders plain
//! data snapshots into it. Views never reach into the model or into
//! each other; data arrives as arguments and user interactions come
//! back out as `AppEvent` values for the shell to publish. Returning
//! the event instead of emitting it directly keeps the view borrow
//! released before any handler runs, so handlers may freely re-render
//! the very view the interaction came from.

pub mod basket;
pub mod card;
pub mod contacts;
pub mod modal;
pub mod order;
pub mod page;
pub mod success;

pub use basket::{BasketData, BasketView};
pub use card::{CardData, CardKind, CatalogCard};
pub use contacts::{ContactsFocus, ContactsFormView};
pub use modal::{ContentKind, ModalView};
pub use order::OrderFormView;
pub use page::PageView;
pub use success::{SuccessData, SuccessView};

use crate::dom::Node;

/// A component that renders a data snapshot into its owned fragment
pub trait View {
    type Data;

    /// Re-render the fragment from `data`
    fn render(&mut self, data: &Self::Data);

    /// Root of the rendered fragment, for mounting or cloning
    fn root(&self) -> &Node;
}

/// Price line shared by cards, basket rows, and totals
pub(crate) fn price_text(price: Option<u64>) -> String {
    match price {
        Some(value) => format!("{} synapses", value),
        None => "Priceless".to_string(),
    }
}
