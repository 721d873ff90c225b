//! Mock Checkout Processor
//!
//! For tests and local runs without a Stripe account. Issues sequential
//! session IDs and remembers every request it was given.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::{CheckoutProcessor, ProcessorSession, SessionParams};
use crate::error::{PaymentError, Result};

/// In-memory processor
#[derive(Debug, Default)]
pub struct MockProcessor {
    issued: AtomicUsize,
    /// When set, every call fails with this message
    failure: Option<String>,
    requests: Mutex<Vec<SessionParams>>,
}

impl MockProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a processor whose every call fails upstream
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<SessionParams> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl CheckoutProcessor for MockProcessor {
    async fn create_session(&self, params: SessionParams) -> Result<ProcessorSession> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(params);

        if let Some(message) = &self.failure {
            return Err(PaymentError::Upstream(message.clone()));
        }

        let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("sess_{n}");

        Ok(ProcessorSession {
            url: format!("https://pay.example/{id}"),
            id,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
