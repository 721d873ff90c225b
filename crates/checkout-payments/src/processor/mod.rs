//! Payment Processor Port
//!
//! The orchestrator talks to the processor only through [`CheckoutProcessor`],
//! so each instance carries its own credential and tests can swap in
//! [`MockProcessor`].

mod mock;
mod stripe;

pub use self::mock::MockProcessor;
pub use self::stripe::StripeProcessor;

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ::stripe::{CheckoutSessionMode, CreateCheckoutSessionPaymentIntentDataSetupFutureUsage, Currency};

use crate::error::Result;

/// Everything the processor needs to open one hosted checkout session
#[derive(Clone, Debug, PartialEq)]
pub struct SessionParams {
    pub mode: CheckoutSessionMode,

    /// Line item currency
    pub currency: Currency,

    /// Unit price in minor units
    pub unit_amount: i64,

    /// Product name shown on the hosted page
    pub product_name: String,

    pub quantity: u64,

    pub allow_promotion_codes: bool,

    pub success_url: String,

    pub cancel_url: String,

    /// When the hosted session stops accepting payment
    pub expires_at: DateTime<Utc>,

    /// How the payment method is kept after checkout
    pub setup_future_usage: CreateCheckoutSessionPaymentIntentDataSetupFutureUsage,

    pub metadata: HashMap<String, String>,
}

/// Session issued by the processor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessorSession {
    /// Processor session ID
    pub id: String,

    /// Hosted page the user is redirected to
    pub url: String,
}

/// Payment processor client trait
///
/// Implementations must not retry; every error is terminal for the request.
#[async_trait]
pub trait CheckoutProcessor: Send + Sync {
    /// Create a hosted checkout session
    async fn create_session(&self, params: SessionParams) -> Result<ProcessorSession>;

    /// Processor name
    fn name(&self) -> &str;
}
