//! # Order Placement Trait
//!
//! Seam between checkout and whatever actually accepts an order.
//! The storefront has no payment gateway; `SimulatedPlacement` stands in for
//! one by waiting and confirming.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │          OrderPlacement (trait)             │
//! │  ├── place()                                │
//! │  └── name()                                 │
//! └─────────────────────────────────────────────┘
//!                       ▲
//!                       │
//!             ┌─────────┴─────────┐
//!             │ SimulatedPlacement│
//!             └───────────────────┘
//! ```

use crate::checkout::Order;
use crate::error::CartResult;
use crate::money::Price;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};

/// Receipt for a placed order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub order_id: String,
    /// Human-facing order number
    pub confirmation_number: String,
    pub total: Price,
    pub placed_at: DateTime<Utc>,
}

#[async_trait]
pub trait OrderPlacement: Send + Sync {
    /// Submit an order.
    async fn place(&self, order: &Order) -> CartResult<OrderConfirmation>;

    /// Placement backend name (for logging)
    fn name(&self) -> &'static str;
}

/// Type alias for a shared placement backend (dynamic dispatch)
pub type BoxedOrderPlacement = Arc<dyn OrderPlacement>;

/// Accepts every order after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedPlacement {
    delay: Duration,
}

impl SimulatedPlacement {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No delay, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedPlacement {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl OrderPlacement for SimulatedPlacement {
    #[instrument(skip(self, order), fields(order_id = %order.id))]
    async fn place(&self, order: &Order) -> CartResult<OrderConfirmation> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let confirmation_number = order
            .id
            .split('-')
            .next()
            .unwrap_or(order.id.as_str())
            .to_uppercase();

        info!(
            "Simulated order placed: {} ({} items, total={})",
            confirmation_number,
            order.item_count(),
            order.summary.total
        );

        Ok(OrderConfirmation {
            order_id: order.id.clone(),
            confirmation_number: format!("LX-{confirmation_number}"),
            total: order.summary.total,
            placed_at: Utc::now(),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}
