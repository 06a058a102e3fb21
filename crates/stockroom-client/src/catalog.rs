//! # Product Service
//!
//! Save and fetch of a single product. Last write wins at the backend; no
//! retries.

use tracing::{debug, info};

use stockroom_core::{ProductForm, ProductId};

use crate::error::ClientResult;
use crate::protocol::ProductPayload;
use crate::transport::RestClient;

#[derive(Debug, Clone)]
pub struct ProductService {
    client: RestClient,
}

impl ProductService {
    pub fn new(client: RestClient) -> Self {
        ProductService { client }
    }

    /// Loads a persisted product into form data.
    pub async fn fetch(&self, id: &ProductId) -> ClientResult<ProductForm> {
        debug!(product_id = %id, "Fetching product");
        self.client.fetch_product(id).await?.into_form()
    }

    /// Saves the form: `PUT` for an existing product, `POST` for a new one.
    ///
    /// Returns the identity the product is stored under.
    pub async fn save(&self, id: Option<&ProductId>, form: &ProductForm) -> ClientResult<ProductId> {
        let payload = ProductPayload::from_form(id, form);

        match id {
            Some(id) => {
                self.client.update_product(id, &payload).await?;
                info!(product_id = %id, "Product updated");
                Ok(id.clone())
            }
            None => {
                let created = self.client.create_product(&payload).await?;
                let id = ProductId::new(created.id);
                info!(product_id = %id, "Product created");
                Ok(id)
            }
        }
    }
}
