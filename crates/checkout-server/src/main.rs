//! stripe-checkout HTTP Server
//!
//! Axum-based server that turns purchase requests into hosted Stripe
//! Checkout sessions.

mod config;
mod handlers;
mod routes;
mod state;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use checkout_payments::{CheckoutPolicy, CheckoutService, StripeProcessor};

use crate::config::ServerConfig;
use crate::routes::router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    let dotenv = dotenvy::dotenv();

    let config = ServerConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if dotenv.is_err() {
        tracing::debug!("No .env file found, using system environment");
    }

    if !config.has_secret() {
        tracing::warn!("⚠ SECRET_KEY not set - Stripe will reject checkout requests");
    }

    let policy = CheckoutPolicy::from_env()?;
    tracing::info!(
        scaling_currency = %policy.scaling_currency,
        line_item_currency = %policy.line_item_currency,
        session_ttl_minutes = policy.session_ttl.num_minutes(),
        "Checkout policy loaded"
    );
    if policy.scaling_currency != policy.line_item_currency {
        tracing::warn!(
            "⚠ Prices are scaled as {} but charged in {}",
            policy.scaling_currency,
            policy.line_item_currency
        );
    }

    let processor = Arc::new(StripeProcessor::new(&config.secret_key));
    let state = AppState {
        checkout: Arc::new(CheckoutService::new(processor, policy)),
    };

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("🚀 checkout server running on http://{}", config.bind_addr);
    tracing::info!("  POST /create-session - Create Stripe checkout session");
    tracing::info!("  GET  /health         - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
