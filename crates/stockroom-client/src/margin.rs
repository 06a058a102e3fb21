//! # Margin Calculation
//!
//! Strategies producing margin/markup/profit and the calculator that keeps
//! only the latest result on screen.
//!
//! ## Strategy Composition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     FallbackMarginStrategy                              │
//! │                                                                         │
//! │   primary: RemoteMarginStrategy ─────┐                                  │
//! │     • product id  → POST /products/{id}/margin                          │
//! │     • no id       → NotApplicable (or /margin/calculate if configured)  │
//! │                                      │                                  │
//! │                 Ok ◄─────────────────┤                                  │
//! │                                      │ NotApplicable → fallback, silent │
//! │                                      │ other error   → fallback + note  │
//! │                                      ▼                                  │
//! │   fallback: LocalMarginStrategy  (sell-buy)/sell, (sell-buy)/buy        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Stale Results
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  recompute #1 (token 1) ─────────────────────────► done → Superseded    │
//! │  recompute #2 (token 2) ──────────► done → Applied                      │
//! │                                                                         │
//! │  A result is published only if its token is still the latest issued.  │
//! │  The check and the write happen under the same lock.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use stockroom_core::{local_margin, MarginInputs, MarginResult, ProductId, ProductPriceState};

use crate::config::MarginSettings;
use crate::error::{ClientError, ClientResult};
use crate::transport::RestClient;

/// Note attached to a local result that replaced a failed remote one.
pub const FALLBACK_NOTE: &str = "Remote margin calculation unavailable, showing local estimate";

// =============================================================================
// Request
// =============================================================================

/// Everything a strategy needs to compute one margin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarginRequest {
    pub product_id: Option<ProductId>,
    pub inputs: MarginInputs,
}

// =============================================================================
// Strategy Trait
// =============================================================================

/// One way of computing a margin.
#[async_trait]
pub trait MarginStrategy: Send + Sync {
    async fn calculate(&self, request: &MarginRequest) -> ClientResult<MarginResult>;
}

// =============================================================================
// Local Strategy
// =============================================================================

/// Pure local formula; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalMarginStrategy;

#[async_trait]
impl MarginStrategy for LocalMarginStrategy {
    async fn calculate(&self, request: &MarginRequest) -> ClientResult<MarginResult> {
        Ok(local_margin(request.inputs))
    }
}

// =============================================================================
// Remote Strategy
// =============================================================================

/// Backend calculation, product-aware when the product has been saved.
#[derive(Debug, Clone)]
pub struct RemoteMarginStrategy {
    client: RestClient,
    remote_for_unsaved: bool,
}

impl RemoteMarginStrategy {
    pub fn new(client: RestClient, remote_for_unsaved: bool) -> Self {
        RemoteMarginStrategy {
            client,
            remote_for_unsaved,
        }
    }
}

#[async_trait]
impl MarginStrategy for RemoteMarginStrategy {
    async fn calculate(&self, request: &MarginRequest) -> ClientResult<MarginResult> {
        let sell = request.inputs.sell().to_decimal();

        let response = match &request.product_id {
            Some(id) => self.client.calculate_product_margin(id, sell).await?,
            None if self.remote_for_unsaved => {
                let buy = request.inputs.buy().to_decimal();
                self.client.calculate_margin(sell, buy).await?
            }
            None => return Err(ClientError::NotApplicable("product has not been saved")),
        };

        Ok(response.into())
    }
}

// =============================================================================
// Fallback Decorator
// =============================================================================

/// Runs `primary`, switching to `fallback` when it cannot or does not answer.
pub struct FallbackMarginStrategy {
    primary: Arc<dyn MarginStrategy>,
    fallback: Arc<dyn MarginStrategy>,
}

impl FallbackMarginStrategy {
    pub fn new(primary: Arc<dyn MarginStrategy>, fallback: Arc<dyn MarginStrategy>) -> Self {
        FallbackMarginStrategy { primary, fallback }
    }
}

#[async_trait]
impl MarginStrategy for FallbackMarginStrategy {
    async fn calculate(&self, request: &MarginRequest) -> ClientResult<MarginResult> {
        match self.primary.calculate(request).await {
            Ok(result) => Ok(result),
            Err(ClientError::NotApplicable(reason)) => {
                debug!(reason, "Primary margin strategy not applicable");
                self.fallback.calculate(request).await
            }
            Err(e) => {
                warn!(error = %e, product_id = ?request.product_id, "Margin calculation failed, falling back");
                Ok(self.fallback.calculate(request).await?.with_error(FALLBACK_NOTE))
            }
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Outcome of one [`MarginCalculator::recompute`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarginUpdate {
    /// This call was the latest; the displayed margin is now this value.
    Applied(Option<MarginResult>),

    /// A newer call was issued meanwhile; nothing was published.
    Superseded,
}

/// Recomputes margins and keeps the latest one for display.
pub struct MarginCalculator {
    strategy: Arc<dyn MarginStrategy>,
    latest_token: AtomicU64,
    current: RwLock<Option<MarginResult>>,
}

impl MarginCalculator {
    pub fn new(strategy: Arc<dyn MarginStrategy>) -> Self {
        MarginCalculator {
            strategy,
            latest_token: AtomicU64::new(0),
            current: RwLock::new(None),
        }
    }

    /// Remote-with-local-fallback, or local only when remote is disabled.
    pub fn from_settings(client: RestClient, settings: &MarginSettings) -> Self {
        let local: Arc<dyn MarginStrategy> = Arc::new(LocalMarginStrategy);
        if !settings.remote_enabled {
            return Self::new(local);
        }

        let remote = Arc::new(RemoteMarginStrategy::new(client, settings.remote_for_unsaved));
        Self::new(Arc::new(FallbackMarginStrategy::new(remote, local)))
    }

    /// The margin currently displayed.
    pub async fn current(&self) -> Option<MarginResult> {
        self.current.read().await.clone()
    }

    /// Recomputes the margin for `state`.
    ///
    /// ## Errors
    /// Only when the configured strategy itself fails and this call is still
    /// the latest. The displayed margin is left untouched in that case.
    pub async fn recompute(
        &self,
        state: &ProductPriceState,
        product_id: Option<&ProductId>,
    ) -> ClientResult<MarginUpdate> {
        let token = self.latest_token.fetch_add(1, Ordering::SeqCst) + 1;

        let outcome = match MarginInputs::from_state(state) {
            Ok(inputs) => {
                let request = MarginRequest {
                    product_id: product_id.cloned(),
                    inputs,
                };
                self.strategy.calculate(&request).await.map(Some)
            }
            Err(_) => Ok(None),
        };

        let mut current = self.current.write().await;
        if self.latest_token.load(Ordering::SeqCst) != token {
            debug!(token, "Discarding stale margin result");
            return Ok(MarginUpdate::Superseded);
        }

        let result = outcome?;
        *current = result.clone();
        Ok(MarginUpdate::Applied(result))
    }

    /// Forgets the displayed margin and invalidates calls in flight.
    pub async fn reset(&self) {
        let mut current = self.current.write().await;
        self.latest_token.fetch_add(1, Ordering::SeqCst);
        *current = None;
    }
}
