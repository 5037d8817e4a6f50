//! Bridge between the async HTTP client and the synchronous UI loop
//!
//! The handle owns the tokio runtime. Calls are fired onto it and their
//! outcomes funneled through a channel; the UI loop drains the channel
//! each tick with [`ApiHandle::pump`], which turns outcomes into bus
//! events. Failed calls are logged and produce no event, leaving all
//! state untouched.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error};

use libstorefront::{AppEvent, EventBus, OrderConfirmation, OrderPayload, Product, ShopApi};

use crate::error::Result;

/// Outcome of one in-flight call
enum ApiOutcome {
    Products(libstorefront::Result<Vec<Product>>),
    Order(libstorefront::Result<OrderConfirmation>),
}

pub struct ApiHandle {
    runtime: tokio::runtime::Runtime,
    api: Arc<dyn ShopApi>,
    tx: Sender<ApiOutcome>,
    rx: Receiver<ApiOutcome>,
}

impl ApiHandle {
    /// # Errors
    ///
    /// Fails if the tokio runtime cannot be created.
    pub fn new(api: Arc<dyn ShopApi>) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()?;
        let (tx, rx) = crossbeam_channel::unbounded();
        Ok(Self {
            runtime,
            api,
            tx,
            rx,
        })
    }

    /// Start a catalog fetch; the outcome arrives via `pump`
    pub fn fetch_products(&self) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = api.fetch_products().await;
            let _ = tx.send(ApiOutcome::Products(outcome));
        });
    }

    /// Start an order submission; the outcome arrives via `pump`
    pub fn submit_order(&self, payload: OrderPayload) {
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        self.runtime.spawn(async move {
            let outcome = api.submit_order(&payload).await;
            let _ = tx.send(ApiOutcome::Order(outcome));
        });
    }

    /// Drain finished calls, emitting a bus event per success
    ///
    /// Failures are logged and swallowed here; no retry, no user-facing
    /// error state. Returns the number of outcomes processed.
    pub fn pump(&self, bus: &EventBus) -> usize {
        let mut processed = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            self.dispatch(bus, outcome);
            processed += 1;
        }
        processed
    }

    /// Block up to `timeout` for at least one outcome, then drain
    ///
    /// Returns whether anything was processed. Used by tests and by the
    /// startup fetch.
    pub fn pump_wait(&self, bus: &EventBus, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(outcome) => {
                self.dispatch(bus, outcome);
                self.pump(bus);
                true
            }
            Err(_) => false,
        }
    }

    fn dispatch(&self, bus: &EventBus, outcome: ApiOutcome) {
        match outcome {
            ApiOutcome::Products(Ok(items)) => {
                debug!(count = items.len(), "catalog fetched");
                bus.emit(AppEvent::ProductsFetched { items });
            }
            ApiOutcome::Products(Err(e)) => {
                error!(error = %e, "catalog fetch failed");
            }
            ApiOutcome::Order(Ok(confirmation)) => {
                debug!(id = %confirmation.id, total = confirmation.total, "order confirmed");
                bus.emit(AppEvent::OrderCompleted {
                    total: confirmation.total,
                });
            }
            ApiOutcome::Order(Err(e)) => {
                error!(error = %e, "order submission failed");
            }
        }
    }
}
