//! Checkout Session Policy
//!
//! Every value the orchestrator puts into a session request that does not come
//! from the caller: currencies, redirect targets, expiry, metadata.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use stripe::{CheckoutSessionMode, CreateCheckoutSessionPaymentIntentDataSetupFutureUsage, Currency};

use crate::error::{PaymentError, Result};
use crate::processor::SessionParams;

pub const DEFAULT_SUCCESS_URL: &str = "http://127.0.0.1:5500/Stripe-Payment-Go/payment-success.html";
pub const DEFAULT_CANCEL_URL: &str = "http://127.0.0.1:5500/Stripe-Payment-Go/payment-failed.html";
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;
const MIN_SESSION_TTL_MINUTES: i64 = 30;
const MAX_SESSION_TTL_MINUTES: i64 = 24 * 60;
pub const API_VERSION_KEY: &str = "api_version";
pub const API_VERSION: &str = "2024-05-01";

/// Fixed parameters applied to every checkout session
#[derive(Clone, Debug, PartialEq)]
pub struct CheckoutPolicy {
    /// Currency whose minor-unit scale is used to convert the price
    pub scaling_currency: Currency,

    /// Currency code submitted on the line item
    pub line_item_currency: Currency,

    /// Where the processor sends the browser after payment
    pub success_url: String,

    /// Where the processor sends the browser when checkout is abandoned
    pub cancel_url: String,

    /// How long the hosted session stays open
    pub session_ttl: Duration,

    /// Value recorded under the `api_version` metadata key
    pub api_version: String,

    pub allow_promotion_codes: bool,
}

impl Default for CheckoutPolicy {
    fn default() -> Self {
        Self {
            scaling_currency: Currency::USD,
            // Amounts are scaled as USD but submitted as INR. Kept as-is until
            // the two are reconciled; both are overridable.
            line_item_currency: Currency::INR,
            success_url: DEFAULT_SUCCESS_URL.into(),
            cancel_url: DEFAULT_CANCEL_URL.into(),
            session_ttl: Duration::minutes(DEFAULT_SESSION_TTL_MINUTES),
            api_version: API_VERSION.into(),
            allow_promotion_codes: true,
        }
    }
}

impl CheckoutPolicy {
    /// Create from environment variables, falling back to the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();

        if let Some(code) = lookup("CHECKOUT_SCALING_CURRENCY") {
            policy.scaling_currency = parse_currency("CHECKOUT_SCALING_CURRENCY", &code)?;
        }
        if let Some(code) = lookup("CHECKOUT_LINE_ITEM_CURRENCY") {
            policy.line_item_currency = parse_currency("CHECKOUT_LINE_ITEM_CURRENCY", &code)?;
        }
        if let Some(url) = lookup("CHECKOUT_SUCCESS_URL") {
            policy.success_url = url;
        }
        if let Some(url) = lookup("CHECKOUT_CANCEL_URL") {
            policy.cancel_url = url;
        }
        if let Some(minutes) = lookup("CHECKOUT_SESSION_TTL_MINUTES") {
            let minutes: i64 = minutes.trim().parse().map_err(|_| {
                PaymentError::Config(format!("CHECKOUT_SESSION_TTL_MINUTES is not a number: {minutes}"))
            })?;
            // Stripe only accepts expiries between 30 minutes and 24 hours out.
            if !(MIN_SESSION_TTL_MINUTES..=MAX_SESSION_TTL_MINUTES).contains(&minutes) {
                return Err(PaymentError::Config(format!(
                    "CHECKOUT_SESSION_TTL_MINUTES must be between {MIN_SESSION_TTL_MINUTES} and {MAX_SESSION_TTL_MINUTES}"
                )));
            }
            policy.session_ttl = Duration::minutes(minutes);
        }

        Ok(policy)
    }

    /// Build the processor request for one purchase
    pub fn session_params(&self, unit_amount: i64, plan_name: &str, now: DateTime<Utc>) -> SessionParams {
        let mut metadata = HashMap::new();
        metadata.insert(API_VERSION_KEY.to_string(), self.api_version.clone());

        SessionParams {
            mode: CheckoutSessionMode::Payment,
            currency: self.line_item_currency,
            unit_amount,
            product_name: plan_name.to_string(),
            quantity: 1,
            allow_promotion_codes: self.allow_promotion_codes,
            success_url: self.success_url.clone(),
            cancel_url: self.cancel_url.clone(),
            expires_at: now + self.session_ttl,
            setup_future_usage: CreateCheckoutSessionPaymentIntentDataSetupFutureUsage::OffSession,
            metadata,
        }
    }
}

fn parse_currency(key: &str, code: &str) -> Result<Currency> {
    code.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| PaymentError::Config(format!("{key} is not a known currency: {code}")))
}
