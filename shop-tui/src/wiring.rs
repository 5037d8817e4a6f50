//! Orchestration: the only place that knows the component graph
//!
//! Everything else communicates over the bus. The handlers here move
//! data from events into views and mutations into the model, always in
//! that shape: borrow one component per statement, drop the guard, then
//! publish any follow-up event. Handlers for events the model emits
//! while mutably borrowed (`catalog:changed`, `preview:changed`,
//! `basket:changed`, `form:errors-changed`) work from the event payload
//! alone and never touch the model.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::error;

use libstorefront::{AppEvent, AppModel, EventBus, OrderField};

use crate::dom::{builtin_templates, TemplateRegistry};
use crate::error::Result;
use crate::services::ApiHandle;
use crate::views::{
    BasketData, BasketView, CardData, CardKind, CatalogCard, ContactsFormView, ContentKind,
    ModalView, OrderFormView, PageView, SuccessData, SuccessView, View,
};

/// Every component of the running application
///
/// Views and model sit behind `Rc<RefCell<_>>` so bus handlers can
/// share them; the whole graph is single-threaded.
pub struct Components {
    pub bus: EventBus,
    pub model: Rc<RefCell<AppModel>>,
    pub page: Rc<RefCell<PageView>>,
    pub modal: Rc<RefCell<ModalView>>,
    pub basket: Rc<RefCell<BasketView>>,
    pub preview: Rc<RefCell<CatalogCard>>,
    pub order_form: Rc<RefCell<OrderFormView>>,
    pub contacts_form: Rc<RefCell<ContactsFormView>>,
    pub success: Rc<RefCell<SuccessView>>,
    pub api: Rc<ApiHandle>,
}

/// Construct every component against the built-in templates and wire
/// the handlers
///
/// # Errors
///
/// Fails if any view finds its template or a required element missing.
/// Construction is the only fallible phase; afterwards rendering cannot
/// miss.
pub fn build(bus: EventBus, api: ApiHandle) -> Result<Components> {
    let templates = builtin_templates();

    let components = Components {
        model: Rc::new(RefCell::new(AppModel::new(bus.clone()))),
        page: Rc::new(RefCell::new(PageView::new(&templates)?)),
        modal: Rc::new(RefCell::new(ModalView::new(&templates)?)),
        basket: Rc::new(RefCell::new(BasketView::new(&templates)?)),
        preview: Rc::new(RefCell::new(CatalogCard::new(
            CardKind::Preview,
            &templates,
        )?)),
        order_form: Rc::new(RefCell::new(OrderFormView::new(&templates)?)),
        contacts_form: Rc::new(RefCell::new(ContactsFormView::new(&templates)?)),
        success: Rc::new(RefCell::new(SuccessView::new(&templates)?)),
        api: Rc::new(api),
        bus,
    };
    wire(&components, templates)?;
    Ok(components)
}

/// Publish an optional follow-up event
pub fn forward(bus: &EventBus, event: Option<AppEvent>) {
    if let Some(event) = event {
        bus.emit(event);
    }
}

fn wire(c: &Components, templates: TemplateRegistry) -> Result<()> {
    // A single gallery card re-rendered per product and cloned into the
    // page; constructing it here keeps the dispatch path infallible.
    let gallery_stamp = Rc::new(RefCell::new(CatalogCard::new(
        CardKind::Gallery,
        &templates,
    )?));

    // Fetched catalog lands in the model.
    {
        let model = Rc::clone(&c.model);
        c.bus.on_exact("api:products-fetched", move |event| {
            if let AppEvent::ProductsFetched { items } = event {
                model.borrow_mut().set_items(items.clone());
            }
        });
    }

    // Catalog snapshot becomes gallery cards on the page.
    {
        let page = Rc::clone(&c.page);
        c.bus.on_exact("catalog:changed", move |event| {
            if let AppEvent::CatalogChanged { items } = event {
                let mut cards = Vec::with_capacity(items.len());
                for product in items {
                    let mut stamp = gallery_stamp.borrow_mut();
                    stamp.render(&CardData {
                        product: product.clone(),
                        in_basket: false,
                    });
                    cards.push((product.id.clone(), stamp.root().clone()));
                }
                page.borrow_mut().set_catalog(cards);
            }
        });
    }

    // Selecting a card asks the model for a preview.
    {
        let model = Rc::clone(&c.model);
        c.bus.on_exact("card:selected", move |event| {
            if let AppEvent::CardSelected { id } = event {
                model.borrow_mut().set_preview(Some(id));
            }
        });
    }

    // Preview snapshot opens the preview modal.
    {
        let preview = Rc::clone(&c.preview);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("preview:changed", move |event| {
            if let AppEvent::PreviewChanged {
                product: Some(product),
                in_basket,
            } = event
            {
                preview.borrow_mut().render(&CardData {
                    product: product.clone(),
                    in_basket: *in_basket,
                });
                let node = preview.borrow().root().clone();
                let follow = modal.borrow_mut().open(ContentKind::Preview, node);
                forward(&bus, follow);
            }
        });
    }

    // Buying from the preview adds to the basket and dismisses it.
    {
        let model = Rc::clone(&c.model);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("basket:add-requested", move |event| {
            if let AppEvent::BasketAddRequested { id } = event {
                model.borrow_mut().add_to_basket(id);
                let follow = modal.borrow_mut().close();
                forward(&bus, follow);
            }
        });
    }

    // Removal arrives from basket rows and from the preview card. Only
    // the preview modal closes afterwards; the basket stays open and is
    // re-rendered by the basket:changed handler.
    {
        let model = Rc::clone(&c.model);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("basket:remove-requested", move |event| {
            if let AppEvent::BasketRemoveRequested { id } = event {
                model.borrow_mut().remove_from_basket(id);
                let showing_preview = modal.borrow().showing() == Some(ContentKind::Preview);
                if showing_preview {
                    let follow = modal.borrow_mut().close();
                    forward(&bus, follow);
                }
            }
        });
    }

    // Opening the basket renders a model snapshot into the modal.
    {
        let model = Rc::clone(&c.model);
        let basket = Rc::clone(&c.basket);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("basket:open", move |_| {
            let data = {
                let model = model.borrow();
                BasketData {
                    items: model.basket_products(),
                    total: model.basket_total(),
                }
            };
            basket.borrow_mut().render(&data);
            let node = basket.borrow().root().clone();
            let follow = modal.borrow_mut().open(ContentKind::Basket, node);
            forward(&bus, follow);
        });
    }

    // Basket changes re-render the basket view and the header counter,
    // and refresh the open basket modal in place.
    {
        let basket = Rc::clone(&c.basket);
        let page = Rc::clone(&c.page);
        let modal = Rc::clone(&c.modal);
        c.bus.on_exact("basket:changed", move |event| {
            if let AppEvent::BasketChanged { items, total } = event {
                basket.borrow_mut().render(&BasketData {
                    items: items.clone(),
                    total: *total,
                });
                page.borrow_mut().set_counter(items.len());
                let node = basket.borrow().root().clone();
                modal.borrow_mut().refresh(ContentKind::Basket, node);
            }
        });
    }

    // Checkout step one.
    {
        let order_form = Rc::clone(&c.order_form);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("order:open", move |_| {
            let node = order_form.borrow().root().clone();
            let follow = modal.borrow_mut().open(ContentKind::OrderForm, node);
            forward(&bus, follow);
        });
    }

    // Any field edit re-validates its whole step.
    {
        let model = Rc::clone(&c.model);
        c.bus.on_exact("order:field-changed", move |event| {
            if let AppEvent::OrderFieldChanged { field, value } = event {
                model.borrow_mut().set_order_field(*field, value);
                match field {
                    OrderField::Payment | OrderField::Address => {
                        model.borrow_mut().validate_order_form();
                    }
                    OrderField::Email | OrderField::Phone => {
                        model.borrow_mut().validate_contacts_form();
                    }
                }
            }
        });
    }

    // The complete error set lands in the step's form, and the open
    // modal picks up the re-rendered fragment.
    {
        let order_form = Rc::clone(&c.order_form);
        let contacts_form = Rc::clone(&c.contacts_form);
        let modal = Rc::clone(&c.modal);
        c.bus.on_exact("form:errors-changed", move |event| {
            if let AppEvent::FormErrorsChanged { step, errors } = event {
                match step {
                    libstorefront::FormStep::Order => {
                        order_form.borrow_mut().set_errors(errors);
                        let node = order_form.borrow().root().clone();
                        modal.borrow_mut().refresh(ContentKind::OrderForm, node);
                    }
                    libstorefront::FormStep::Contacts => {
                        contacts_form.borrow_mut().set_errors(errors);
                        let node = contacts_form.borrow().root().clone();
                        modal.borrow_mut().refresh(ContentKind::ContactsForm, node);
                    }
                }
            }
        });
    }

    // Submitting the order step advances to contacts when valid.
    {
        let model = Rc::clone(&c.model);
        let contacts_form = Rc::clone(&c.contacts_form);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("order:submitted", move |_| {
            let valid = model.borrow_mut().validate_order_form();
            if valid {
                let node = contacts_form.borrow().root().clone();
                let follow = modal.borrow_mut().open(ContentKind::ContactsForm, node);
                forward(&bus, follow);
            }
        });
    }

    // Submitting contacts fires the one and only order call.
    {
        let model = Rc::clone(&c.model);
        let api = Rc::clone(&c.api);
        c.bus.on_exact("contacts:submitted", move |_| {
            let valid = model.borrow_mut().validate_contacts_form();
            if !valid {
                return;
            }
            let payload = model.borrow().order_payload();
            match payload {
                Ok(payload) => api.submit_order(payload),
                Err(e) => error!(error = %e, "order payload rejected after validation"),
            }
        });
    }

    // A confirmed order shows the success view and resets the session.
    {
        let model = Rc::clone(&c.model);
        let success = Rc::clone(&c.success);
        let order_form = Rc::clone(&c.order_form);
        let contacts_form = Rc::clone(&c.contacts_form);
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("api:order-completed", move |event| {
            if let AppEvent::OrderCompleted { total } = event {
                success.borrow_mut().render(&SuccessData { total: *total });
                let node = success.borrow().root().clone();
                let follow = modal.borrow_mut().open(ContentKind::Success, node);
                forward(&bus, follow);

                model.borrow_mut().clear_basket();
                model.borrow_mut().clear_order();
                order_form.borrow_mut().reset();
                contacts_form.borrow_mut().reset();
            }
        });
    }

    // Dismissing the success view closes the modal.
    {
        let modal = Rc::clone(&c.modal);
        let bus = c.bus.clone();
        c.bus.on_exact("success:dismissed", move |_| {
            let follow = modal.borrow_mut().close();
            forward(&bus, follow);
        });
    }

    // The page locks while any modal is open. These handlers must not
    // borrow the modal; it is still mutably borrowed when they run.
    {
        let page = Rc::clone(&c.page);
        c.bus.on_exact("modal:opened", move |_| {
            page.borrow_mut().set_locked(true);
        });
    }
    {
        let page = Rc::clone(&c.page);
        c.bus.on_exact("modal:closed", move |_| {
            page.borrow_mut().set_locked(false);
        });
    }

    Ok(())
}
