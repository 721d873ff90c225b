//! Checkout Orchestration
//!
//! Validates the price, builds the session request from the policy, calls the
//! processor once, and shapes the result into the public response contract.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::amount::normalize_in;
use crate::error::{PaymentError, Result};
use crate::policy::CheckoutPolicy;
use crate::processor::CheckoutProcessor;

pub const SESSION_CREATED_MESSAGE: &str = "Checkout session created successful";

/// Inbound purchase request. Missing fields read as empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentRequest {
    #[serde(rename = "user_uuid")]
    pub user_id: String,

    /// Decimal price text, e.g. `"19.99"`
    pub price: String,

    pub plan_name: String,
}

/// Record of a created session, echoed back to the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    #[serde(rename = "user_uuid")]
    pub user_id: String,

    /// URL to redirect user to
    pub session_url: String,

    /// Processor session ID
    pub session_id: String,

    pub plan_name: String,

    /// Price exactly as the caller sent it
    pub price: String,

    /// RFC 3339 UTC timestamp
    pub created_at: String,
}

/// Response body for every outcome of the checkout endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    pub message: String,
    pub status_code: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<CheckoutSession>,
}

impl ApiResponse {
    /// Successful session creation
    pub fn created(session: CheckoutSession) -> Self {
        Self {
            ok: true,
            message: SESSION_CREATED_MESSAGE.into(),
            status_code: 200,
            session: Some(session),
        }
    }

    /// Failure carrying no session
    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            status_code,
            session: None,
        }
    }
}

/// Creates hosted checkout sessions through an injected processor
pub struct CheckoutService {
    processor: Arc<dyn CheckoutProcessor>,
    policy: CheckoutPolicy,
}

impl CheckoutService {
    pub fn new(processor: Arc<dyn CheckoutProcessor>, policy: CheckoutPolicy) -> Self {
        Self { processor, policy }
    }

    /// Name of the processor sessions are created with
    pub fn processor_name(&self) -> &str {
        self.processor.name()
    }

    /// Create a checkout session for one purchase.
    ///
    /// An unparseable price fails with [`PaymentError::InvalidAmount`] before
    /// the processor is contacted. Processor failures are returned as
    /// [`PaymentError::Upstream`] without retrying.
    pub async fn create_checkout_session(
        &self,
        user_id: &str,
        price: &str,
        plan_name: &str,
    ) -> Result<ApiResponse> {
        let unit_amount = normalize_in(price, self.policy.scaling_currency).map_err(|e| match e {
            PaymentError::InvalidAmount(msg) => {
                PaymentError::InvalidAmount(format!("failed to convert the amount: {msg}"))
            }
            other => other,
        })?;

        let params = self.policy.session_params(unit_amount, plan_name, Utc::now());

        let session = self.processor.create_session(params).await.inspect_err(|e| {
            tracing::error!(
                processor = self.processor.name(),
                error = %e,
                "Checkout session creation failed"
            );
        })?;

        let record = CheckoutSession {
            user_id: user_id.to_string(),
            session_url: session.url,
            session_id: session.id,
            plan_name: plan_name.to_string(),
            price: price.to_string(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };

        tracing::info!(
            session_id = %record.session_id,
            user_id = %record.user_id,
            plan = %record.plan_name,
            unit_amount,
            "Created checkout session"
        );

        Ok(ApiResponse::created(record))
    }

    /// Convenience wrapper taking the parsed request body
    pub async fn create_for(&self, request: &PaymentRequest) -> Result<ApiResponse> {
        self.create_checkout_session(&request.user_id, &request.price, &request.plan_name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::MockProcessor;
    use chrono::DateTime;
    use stripe::Currency;

    fn service(processor: Arc<MockProcessor>) -> CheckoutService {
        CheckoutService::new(processor, CheckoutPolicy::default())
    }

    #[tokio::test]
    async fn test_creates_session() {
        let processor = Arc::new(MockProcessor::new());
        let checkout = service(processor.clone());

        let response = checkout
            .create_checkout_session("u1", "10.00", "Pro")
            .await
            .unwrap();

        assert!(response.ok);
        assert_eq!(response.status_code, 200);
        assert_eq!(response.message, SESSION_CREATED_MESSAGE);

        let session = response.session.unwrap();
        assert_eq!(session.session_id, "sess_1");
        assert_eq!(session.session_url, "https://pay.example/sess_1");
        assert_eq!(session.user_id, "u1");
        assert_eq!(session.plan_name, "Pro");
        assert_eq!(session.price, "10.00");
        assert!(DateTime::parse_from_rfc3339(&session.created_at).is_ok());
        assert!(session.created_at.ends_with('Z'));

        let requests = processor.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].unit_amount, 1000);
        assert_eq!(requests[0].currency, Currency::INR);
        assert_eq!(requests[0].product_name, "Pro");
    }

    #[tokio::test]
    async fn test_invalid_amount_skips_processor() {
        let processor = Arc::new(MockProcessor::new());
        let checkout = service(processor.clone());

        let err = checkout
            .create_checkout_session("u1", "abc", "Pro")
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::InvalidAmount(_)));
        assert!(err.to_string().contains("failed to convert the amount"));
        assert!(processor.requests().is_empty());
    }

    #[tokio::test]
    async fn test_upstream_failure_is_returned() {
        let processor = Arc::new(MockProcessor::failing("api key invalid"));
        let checkout = service(processor.clone());

        let err = checkout
            .create_checkout_session("u1", "10.00", "Pro")
            .await
            .unwrap_err();

        assert_eq!(err, PaymentError::Upstream("api key invalid".into()));
        assert_eq!(processor.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_identical_requests_get_distinct_sessions() {
        let processor = Arc::new(MockProcessor::new());
        let checkout = service(processor);
        let request = PaymentRequest {
            user_id: "u1".into(),
            price: "10.00".into(),
            plan_name: "Pro".into(),
        };

        let first = checkout.create_for(&request).await.unwrap().session.unwrap();
        let second = checkout.create_for(&request).await.unwrap().session.unwrap();

        assert_ne!(first.session_id, second.session_id);
    }

    #[tokio::test]
    async fn test_scaling_follows_policy() {
        let processor = Arc::new(MockProcessor::new());
        let policy = CheckoutPolicy {
            scaling_currency: Currency::JPY,
            line_item_currency: Currency::JPY,
            ..CheckoutPolicy::default()
        };
        let checkout = CheckoutService::new(processor.clone(), policy);

        checkout
            .create_checkout_session("u1", "1500", "Basic")
            .await
            .unwrap();

        let requests = processor.requests();
        assert_eq!(requests[0].unit_amount, 1500);
        assert_eq!(requests[0].currency, Currency::JPY);
    }

    #[test]
    fn test_request_wire_format() {
        let request: PaymentRequest =
            serde_json::from_str(r#"{"user_uuid":"u1","price":"9.50"}"#).unwrap();
        assert_eq!(request.user_id, "u1");
        assert_eq!(request.price, "9.50");
        assert_eq!(request.plan_name, "");
    }

    #[test]
    fn test_failure_response_has_no_session() {
        let json = serde_json::to_value(ApiResponse::failure(500, "boom")).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["status_code"], 500);
        assert!(json.get("session").is_none());
    }
}
