//! shop-tui - Terminal front end for the storefront
//!
//! Catalog browsing, a basket, and a two-step checkout, all coordinated
//! over the event bus from `libstorefront`. The crate splits into the
//! headless layers (`dom`, `views`, `wiring`, `services`), which tests
//! drive without a terminal, and the thin terminal shell (`terminal`,
//! `ui`, the binary).

pub mod dom;
pub mod error;
pub mod services;
pub mod terminal;
pub mod ui;
pub mod views;
pub mod wiring;
