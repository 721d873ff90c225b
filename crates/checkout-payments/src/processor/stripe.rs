//! Stripe Checkout Processor
//!
//! Opens hosted Stripe Checkout sessions with the credential it was built with.

use async_trait::async_trait;
use ::stripe::{
    CheckoutSession as StripeCheckoutSession, Client, CreateCheckoutSession,
    CreateCheckoutSessionLineItems, CreateCheckoutSessionLineItemsPriceData,
    CreateCheckoutSessionLineItemsPriceDataProductData, CreateCheckoutSessionPaymentIntentData,
};

use super::{CheckoutProcessor, ProcessorSession, SessionParams};
use crate::error::{PaymentError, Result};

/// Stripe client wrapper
pub struct StripeProcessor {
    client: Client,
}

impl StripeProcessor {
    /// Create a new Stripe processor bound to `secret_key`
    pub fn new(secret_key: &str) -> Self {
        Self {
            client: Client::new(secret_key),
        }
    }
}

/// Translate session parameters into Stripe's create-session request
fn build_request(params: &SessionParams) -> CreateCheckoutSession<'_> {
    let mut request = CreateCheckoutSession::new();
    request.mode = Some(params.mode);
    request.success_url = Some(&params.success_url);
    request.cancel_url = Some(&params.cancel_url);
    request.allow_promotion_codes = Some(params.allow_promotion_codes);
    request.expires_at = Some(params.expires_at.timestamp());
    request.metadata = Some(params.metadata.clone());
    request.payment_intent_data = Some(CreateCheckoutSessionPaymentIntentData {
        setup_future_usage: Some(params.setup_future_usage),
        ..Default::default()
    });
    request.line_items = Some(vec![CreateCheckoutSessionLineItems {
        quantity: Some(params.quantity),
        price_data: Some(CreateCheckoutSessionLineItemsPriceData {
            currency: params.currency,
            unit_amount: Some(params.unit_amount),
            product_data: Some(CreateCheckoutSessionLineItemsPriceDataProductData {
                name: params.product_name.clone(),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    }]);
    request
}

#[async_trait]
impl CheckoutProcessor for StripeProcessor {
    async fn create_session(&self, params: SessionParams) -> Result<ProcessorSession> {
        tracing::debug!(
            currency = %params.currency,
            unit_amount = params.unit_amount,
            expires_at = %params.expires_at,
            "Creating Stripe checkout session"
        );

        let session = StripeCheckoutSession::create(&self.client, build_request(&params)).await?;

        let url = session
            .url
            .ok_or_else(|| PaymentError::Upstream("No checkout URL returned".into()))?;

        Ok(ProcessorSession {
            id: session.id.to_string(),
            url,
        })
    }

    fn name(&self) -> &str {
        "stripe"
    }
}

#[cfg(test)]
mod tests {
    use ::stripe::{
        CheckoutSessionMode, CreateCheckoutSessionPaymentIntentDataSetupFutureUsage, Currency,
    };
    use chrono::Utc;

    use super::*;
    use crate::policy::{CheckoutPolicy, DEFAULT_CANCEL_URL, DEFAULT_SUCCESS_URL};

    #[test]
    fn test_build_request_carries_policy() {
        let params = CheckoutPolicy::default().session_params(1999, "Pro", Utc::now());
        let request = build_request(&params);

        assert_eq!(request.mode, Some(CheckoutSessionMode::Payment));
        assert_eq!(request.success_url, Some(DEFAULT_SUCCESS_URL));
        assert_eq!(request.cancel_url, Some(DEFAULT_CANCEL_URL));
        assert_eq!(request.allow_promotion_codes, Some(true));
        assert_eq!(request.expires_at, Some(params.expires_at.timestamp()));

        let metadata = request.metadata.as_ref().unwrap();
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata["api_version"], "2024-05-01");

        let intent = request.payment_intent_data.as_ref().unwrap();
        assert_eq!(
            intent.setup_future_usage,
            Some(CreateCheckoutSessionPaymentIntentDataSetupFutureUsage::OffSession)
        );

        let line_items = request.line_items.as_ref().unwrap();
        assert_eq!(line_items.len(), 1);
        assert_eq!(line_items[0].quantity, Some(1));

        let price = line_items[0].price_data.as_ref().unwrap();
        assert_eq!(price.currency, Currency::INR);
        assert_eq!(price.unit_amount, Some(1999));
        assert_eq!(price.product_data.as_ref().unwrap().name, "Pro");
    }

    #[test]
    fn test_build_request_follows_overrides() {
        let policy = CheckoutPolicy {
            line_item_currency: Currency::USD,
            success_url: "https://shop.example/ok".into(),
            allow_promotion_codes: false,
            ..CheckoutPolicy::default()
        };
        let params = policy.session_params(500, "Basic", Utc::now());
        let request = build_request(&params);

        assert_eq!(request.success_url, Some("https://shop.example/ok"));
        assert_eq!(request.allow_promotion_codes, Some(false));
        let line_items = request.line_items.as_ref().unwrap();
        assert_eq!(line_items[0].price_data.as_ref().unwrap().currency, Currency::USD);
    }
}
