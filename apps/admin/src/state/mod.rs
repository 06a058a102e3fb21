//! # State Module
//!
//! Application state for the product editor.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐    ┌──────────────────────────────┐  │
//! │  │        EditorState           │    │          Services            │  │
//! │  │                              │    │                              │  │
//! │  │  Arc<Mutex<ProductEditor>>   │    │  ProductService              │  │
//! │  │  Arc<MarginCalculator>       │    │  VatRateRegistry + cache     │  │
//! │  └──────────────────────────────┘    └──────────────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • The editor mutex is held only for synchronous edits, never across   │
//! │    an .await                                                           │
//! │  • MarginCalculator orders concurrent recomputes by token              │
//! │  • Services are read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod editor;

pub use editor::ProductEditor;

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::RwLock;
use tracing::warn;

use stockroom_client::vat::fallback_rates;
use stockroom_client::{ClientConfig, MarginCalculator, ProductService, RestClient, VatRateRegistry};
use stockroom_core::{PairingPolicy, VatRate};

// =============================================================================
// Editor State
// =============================================================================

/// The edit session shared by all commands.
#[derive(Clone)]
pub struct EditorState {
    editor: Arc<Mutex<ProductEditor>>,
    margin: Arc<MarginCalculator>,
}

impl EditorState {
    pub fn new(editor: ProductEditor, margin: MarginCalculator) -> Self {
        EditorState {
            editor: Arc::new(Mutex::new(editor)),
            margin: Arc::new(margin),
        }
    }

    /// Executes a function with read access to the editor.
    pub fn with_editor<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&ProductEditor) -> R,
    {
        let editor = self.editor.lock().unwrap_or_else(PoisonError::into_inner);
        f(&editor)
    }

    /// Executes a function with write access to the editor.
    pub fn with_editor_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ProductEditor) -> R,
    {
        let mut editor = self.editor.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut editor)
    }

    /// Replaces the whole session.
    pub fn replace(&self, editor: ProductEditor) {
        self.with_editor_mut(|current| *current = editor);
    }

    pub fn margin(&self) -> &MarginCalculator {
        &self.margin
    }
}

// =============================================================================
// Services
// =============================================================================

/// Backend collaborators of the editor.
pub struct Services {
    pub products: ProductService,
    pub vat: VatRateRegistry,
    pub policy: PairingPolicy,
    vat_cache: RwLock<Vec<VatRate>>,
}

impl Services {
    pub fn new(client: RestClient, policy: PairingPolicy) -> Self {
        Services {
            products: ProductService::new(client.clone()),
            vat: VatRateRegistry::new(client),
            policy,
            vat_cache: RwLock::new(Vec::new()),
        }
    }

    /// Builds the services and the margin calculator from configuration.
    pub fn from_config(config: &ClientConfig) -> stockroom_client::ClientResult<(Self, MarginCalculator)> {
        let client = RestClient::new(&config.api)?;
        let margin = MarginCalculator::from_settings(client.clone(), &config.margin);
        Ok((Self::new(client, config.pairing_policy()), margin))
    }

    /// The VAT rate list, loaded from the registry on first use.
    ///
    /// Only a list the backend actually served is cached. While the backend
    /// is unreachable the defaults are returned and the next call retries.
    pub async fn vat_rates(&self) -> Vec<VatRate> {
        {
            let cached = self.vat_cache.read().await;
            if !cached.is_empty() {
                return cached.clone();
            }
        }

        match self.vat.load_remote().await {
            Ok(rates) => {
                *self.vat_cache.write().await = rates.clone();
                rates
            }
            Err(e) => {
                warn!(error = %e, "VAT rates unavailable, offering defaults");
                fallback_rates()
            }
        }
    }
}
