//! shop-tui - Terminal front end for the storefront
//!
//! Wires the storefront components together, fetches the catalog, and
//! runs the key-driven event loop until the user quits.

use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use tracing::warn;

use libstorefront::{logging, Config, EventBus, HttpShopApi, Payment};

use shop_tui::{
    error::Result,
    services::ApiHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui,
    views::ContentKind,
    wiring::{self, forward, Components},
};

const TICK: Duration = Duration::from_millis(100);

fn main() -> Result<()> {
    logging::init_default();
    install_panic_hook();

    let config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "no usable config, falling back to defaults");
        Config::default_config()
    });

    let api = ApiHandle::new(Arc::new(HttpShopApi::new(&config)))?;
    let components = wiring::build(EventBus::new(), api)?;

    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, &components);
    restore_terminal(terminal)?;

    result
}

fn run_app(terminal: &mut Tui, c: &Components) -> Result<()> {
    c.api.fetch_products();

    loop {
        {
            let page = c.page.borrow();
            let modal = c.modal.borrow();
            let cursor = page.cursor();
            terminal.draw(|frame| {
                ui::render(frame, page.root(), modal.root(), cursor);
            })?;
        }

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let showing = c.modal.borrow().showing();
                if showing.is_none() && key.code == KeyCode::Char('q') {
                    break;
                }
                handle_key(c, showing, key.code);
            }
        }

        c.api.pump(&c.bus);
    }

    Ok(())
}

/// Route one key press to the view that owns the focus
///
/// Every view borrow here is scoped to a single statement; the produced
/// event is published only after the guard is dropped, since its
/// handlers may re-enter the same view.
fn handle_key(c: &Components, showing: Option<ContentKind>, code: KeyCode) {
    match showing {
        None => match code {
            KeyCode::Up => c.page.borrow_mut().move_cursor(-1),
            KeyCode::Down => c.page.borrow_mut().move_cursor(1),
            KeyCode::Enter => {
                let event = c.page.borrow().select();
                forward(&c.bus, event);
            }
            KeyCode::Char('b') => {
                let event = c.page.borrow().open_basket();
                forward(&c.bus, event);
            }
            _ => {}
        },
        Some(ContentKind::Preview) => match code {
            KeyCode::Enter => {
                let event = c.preview.borrow().activate();
                forward(&c.bus, event);
            }
            KeyCode::Esc => close_modal(c),
            _ => {}
        },
        Some(ContentKind::Basket) => match code {
            KeyCode::Char(digit @ '1'..='9') => {
                let index = digit as usize - '1' as usize;
                let event = c.basket.borrow().remove_at(index);
                forward(&c.bus, event);
            }
            KeyCode::Enter => {
                let event = c.basket.borrow().place_order();
                forward(&c.bus, event);
            }
            KeyCode::Esc => close_modal(c),
            _ => {}
        },
        Some(ContentKind::OrderForm) => match code {
            KeyCode::Left => {
                let event = c.order_form.borrow_mut().select_payment(Payment::Card);
                c.bus.emit(event);
            }
            KeyCode::Right => {
                let event = c.order_form.borrow_mut().select_payment(Payment::Cash);
                c.bus.emit(event);
            }
            KeyCode::Char(ch) => {
                let event = c.order_form.borrow_mut().push_char(ch);
                c.bus.emit(event);
            }
            KeyCode::Backspace => {
                let event = c.order_form.borrow_mut().backspace();
                c.bus.emit(event);
            }
            KeyCode::Enter => {
                let event = c.order_form.borrow().submit();
                forward(&c.bus, event);
            }
            KeyCode::Esc => close_modal(c),
            _ => {}
        },
        Some(ContentKind::ContactsForm) => match code {
            KeyCode::Tab => c.contacts_form.borrow_mut().toggle_focus(),
            KeyCode::Char(ch) => {
                let event = c.contacts_form.borrow_mut().push_char(ch);
                c.bus.emit(event);
            }
            KeyCode::Backspace => {
                let event = c.contacts_form.borrow_mut().backspace();
                c.bus.emit(event);
            }
            KeyCode::Enter => {
                let event = c.contacts_form.borrow().submit();
                forward(&c.bus, event);
            }
            KeyCode::Esc => close_modal(c),
            _ => {}
        },
        Some(ContentKind::Success) => match code {
            KeyCode::Enter | KeyCode::Esc => {
                let event = c.success.borrow().dismiss();
                c.bus.emit(event);
            }
            _ => {}
        },
    }
}

fn close_modal(c: &Components) {
    let event = c.modal.borrow_mut().close();
    forward(&c.bus, event);
}
