//! # VAT Rate Registry
//!
//! Supplies the selectable tax rates. Never fails: anything wrong with the
//! remote list degrades to the built-in defaults.

use tracing::{debug, warn};

use stockroom_core::{TaxRate, VatRate, DEFAULT_VAT_BPS};

use crate::error::{ClientError, ClientResult};
use crate::transport::RestClient;

/// Rates offered when the backend list is unavailable.
pub fn fallback_rates() -> Vec<VatRate> {
    vec![
        VatRate::new("23", TaxRate::from_bps(2300), "23%"),
        VatRate::new("8", TaxRate::from_bps(800), "8%"),
        VatRate::new("5", TaxRate::from_bps(500), "5%"),
        VatRate::new("0", TaxRate::zero(), "0%"),
    ]
}

/// Looks up a rate by id.
pub fn find<'a>(rates: &'a [VatRate], id: &str) -> Option<&'a VatRate> {
    rates.iter().find(|rate| rate.id == id)
}

/// Loads VAT rates from the backend.
#[derive(Debug, Clone)]
pub struct VatRateRegistry {
    client: RestClient,
}

impl VatRateRegistry {
    pub fn new(client: RestClient) -> Self {
        VatRateRegistry { client }
    }

    /// The remote list, or [`fallback_rates`] if it cannot be used.
    pub async fn load(&self) -> Vec<VatRate> {
        match self.load_remote().await {
            Ok(rates) => rates,
            Err(e) => {
                warn!(error = %e, "Failed to load VAT rates, using defaults");
                fallback_rates()
            }
        }
    }

    /// The remote list only. An empty list is an error, so callers can
    /// tell a usable answer from one that needs the defaults.
    pub async fn load_remote(&self) -> ClientResult<Vec<VatRate>> {
        let rates = self.fetch().await?;
        if rates.is_empty() {
            return Err(ClientError::InvalidPayload("empty VAT rate list".into()));
        }
        debug!(count = rates.len(), "Loaded VAT rates");
        Ok(rates)
    }

    /// Rate preselected for new products.
    pub fn default_rate(&self) -> TaxRate {
        TaxRate::from_bps(DEFAULT_VAT_BPS)
    }

    async fn fetch(&self) -> ClientResult<Vec<VatRate>> {
        self.client
            .vat_rates()
            .await?
            .rates
            .into_iter()
            .map(VatRate::try_from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_rates() {
        let rates = fallback_rates();
        let bps: Vec<u32> = rates.iter().map(|r| r.rate.bps()).collect();
        assert_eq!(bps, vec![2300, 800, 500, 0]);
        assert_eq!(find(&rates, "8").map(|r| r.rate.bps()), Some(800));
        assert!(find(&rates, "7").is_none());
    }
}
