//! Application State

use std::sync::Arc;

use checkout_payments::CheckoutService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Checkout orchestrator holding the processor client
    pub checkout: Arc<CheckoutService>,
}
