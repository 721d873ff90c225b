//! # checkout-payments
//!
//! Hosted checkout session creation for stripe-checkout.
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌─────────────────┐
//! │ price text  │────▶│  amount      │────▶│ CheckoutService │
//! │ "19.99"     │     │  (1999)      │     │  + policy       │
//! └─────────────┘     └──────────────┘     └────────┬────────┘
//!                                                   │
//!                                          ┌────────▼────────┐
//!                                          │ CheckoutProcessor│
//!                                          │ (Stripe / mock) │
//!                                          └─────────────────┘
//! ```
//!
//! The processor owns its credential, so nothing here touches global state
//! and several services with different keys can run side by side.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use checkout_payments::{CheckoutPolicy, CheckoutService, StripeProcessor};
//!
//! let processor = Arc::new(StripeProcessor::new("sk_test_xxx"));
//! let checkout = CheckoutService::new(processor, CheckoutPolicy::default());
//!
//! let response = checkout.create_checkout_session("user-1", "19.99", "Pro").await?;
//!
//! // Redirect user to: response.session.unwrap().session_url
//! ```

pub mod amount;
mod checkout;
mod error;
pub mod policy;
pub mod processor;

pub use amount::{normalize, normalize_in};
pub use checkout::{ApiResponse, CheckoutService, CheckoutSession, PaymentRequest, SESSION_CREATED_MESSAGE};
pub use error::{PaymentError, Result};
pub use policy::CheckoutPolicy;
pub use processor::{CheckoutProcessor, MockProcessor, ProcessorSession, SessionParams, StripeProcessor};
