//! # REST Transport
//!
//! Thin reqwest wrapper for the admin backend.
//!
//! ## Request Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         RestClient::send                                │
//! │                                                                         │
//! │  endpoint(["products", id]) ──► base_url/products/{id} (id escaped)    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  x-request-id: <uuid v4> ──► reqwest (timeout, connect_timeout)        │
//! │           │                                                             │
//! │     ┌─────┴───────────┐                                                 │
//! │     ▼                 ▼                                                 │
//! │   2xx               non-2xx                                            │
//! │   JSON body         { message } ──► ClientError::Rejected              │
//! │                                                                         │
//! │  No retries: every collaborator degrades instead.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use stockroom_core::ProductId;

use crate::config::ApiSettings;
use crate::error::{ClientError, ClientResult};
use crate::protocol::{
    CreatedProduct, ErrorBody, MarginCalculateRequest, MarginResponse, ProductMarginRequest,
    ProductPayload, VatRatesResponse,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

// =============================================================================
// Rest Client
// =============================================================================

/// HTTP client for every admin backend endpoint.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: Url,
}

impl RestClient {
    /// Builds a client from the `[api]` config section.
    pub fn new(settings: &ApiSettings) -> ClientResult<Self> {
        let base_url = Url::parse(&settings.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(settings.base_url.clone()));
        }

        let http = Client::builder()
            .timeout(settings.timeout())
            .connect_timeout(settings.connect_timeout())
            .build()?;

        Ok(RestClient { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends escaped path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // =========================================================================
    // Endpoints
    // =========================================================================

    /// `GET /vat-rates`
    pub async fn vat_rates(&self) -> ClientResult<VatRatesResponse> {
        let url = self.endpoint(&["vat-rates"])?;
        self.send::<(), _>(Method::GET, url, None).await
    }

    /// `POST /margin/calculate`
    pub async fn calculate_margin(&self, sell: Decimal, buy: Decimal) -> ClientResult<MarginResponse> {
        let url = self.endpoint(&["margin", "calculate"])?;
        let body = MarginCalculateRequest {
            sell_price: sell,
            buy_price: buy,
        };
        self.send(Method::POST, url, Some(&body)).await
    }

    /// `POST /products/{id}/margin`
    pub async fn calculate_product_margin(
        &self,
        id: &ProductId,
        sell: Decimal,
    ) -> ClientResult<MarginResponse> {
        let url = self.endpoint(&["products", id.as_str(), "margin"])?;
        let body = ProductMarginRequest { sell_price: sell };
        self.send(Method::POST, url, Some(&body)).await
    }

    /// `GET /products/{id}`
    pub async fn fetch_product(&self, id: &ProductId) -> ClientResult<ProductPayload> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.send::<(), _>(Method::GET, url, None).await
    }

    /// `PUT /products/{id}`. The response body is not used.
    pub async fn update_product(&self, id: &ProductId, payload: &ProductPayload) -> ClientResult<()> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.execute(Method::PUT, url, Some(payload)).await?;
        Ok(())
    }

    /// `POST /products`
    pub async fn create_product(&self, payload: &ProductPayload) -> ClientResult<CreatedProduct> {
        let url = self.endpoint(&["products"])?;
        self.send(Method::POST, url, Some(payload)).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    async fn send<B, T>(&self, method: Method, url: Url, body: Option<&B>) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let bytes = self.execute(method, url, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Sends one request and returns the body of a 2xx response.
    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> ClientResult<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4();
        debug!(%request_id, %method, %url, "Sending request");

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(REQUEST_ID_HEADER, request_id.to_string());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%request_id, %method, %url, error = %e, "Request failed");
            ClientError::from(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            debug!(%request_id, status = status.as_u16(), "Request succeeded");
            return Ok(bytes.to_vec());
        }

        let message = rejection_message(status, &bytes);
        warn!(%request_id, %method, %url, status = status.as_u16(), %message, "Request rejected");
        Err(ClientError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

/// Server-provided `{ message }`, else the status reason.
fn rejection_message(status: StatusCode, body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> RestClient {
        RestClient::new(&ApiSettings {
            base_url: base.to_string(),
            ..ApiSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:8080/api");
        assert_eq!(
            c.endpoint(&["products", "42", "margin"]).unwrap().as_str(),
            "http://localhost:8080/api/products/42/margin"
        );

        let c = client("http://localhost:8080/api/");
        assert_eq!(
            c.endpoint(&["vat-rates"]).unwrap().as_str(),
            "http://localhost:8080/api/vat-rates"
        );
    }

    #[test]
    fn test_endpoint_escapes_ids() {
        let c = client("http://localhost:8080");
        assert_eq!(
            c.endpoint(&["products", "a/b c"]).unwrap().as_str(),
            "http://localhost:8080/products/a%2Fb%20c"
        );
    }

    #[test]
    fn test_rejects_non_base_url() {
        let err = RestClient::new(&ApiSettings {
            base_url: "mailto:admin@example.com".into(),
            ..ApiSettings::default()
        })
        .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_rejection_message() {
        assert_eq!(
            rejection_message(StatusCode::CONFLICT, br#"{"message":"Duplicate barcode"}"#),
            "Duplicate barcode"
        );
        assert_eq!(
            rejection_message(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>"),
            "Internal Server Error"
        );
        assert_eq!(
            rejection_message(StatusCode::BAD_REQUEST, br#"{"message":""}"#),
            "Bad Request"
        );
    }
}
