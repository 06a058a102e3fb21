//! # Product Editor Commands
//!
//! Commands driving one product edit session. Each returns the full
//! [`EditorView`] so the caller can redraw the form from a single value.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Price Edit Flow                                      │
//! │                                                                         │
//! │  edit_price(saleNet, "100")                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌───────────────────────────────────────────┐                         │
//! │  │  lock editor                              │                         │
//! │  │    reducer: net → gross, clear error      │                         │
//! │  │    copy prices + product id               │                         │
//! │  │  unlock                                   │                         │
//! │  └───────────────────────────────────────────┘                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  MarginCalculator::recompute (await, newest call wins)                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EditorView { prices, errors, margin, ... }                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use stockroom_client::vat::find;
use stockroom_client::MarginUpdate;
use stockroom_core::{
    FieldErrors, MarginResult, MetaField, PriceField, ProductId, ProductMeta, ProductPriceState,
    VatRate,
};

use crate::error::ApiError;
use crate::state::{EditorState, ProductEditor, Services};

/// Everything the form displays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub product_id: Option<String>,
    pub prices: ProductPriceState,
    pub meta: ProductMeta,
    pub errors: FieldErrors,
    pub general_error: Option<String>,
    pub margin: Option<MarginResult>,
    pub dirty: bool,
    pub opened_at: DateTime<Utc>,
}

impl EditorView {
    fn new(editor: &ProductEditor, margin: Option<MarginResult>) -> Self {
        EditorView {
            product_id: editor.product_id().map(|id| id.as_str().to_string()),
            prices: *editor.prices(),
            meta: editor.meta().clone(),
            errors: editor.errors().clone(),
            general_error: editor.general_error().map(str::to_string),
            margin,
            dirty: editor.is_dirty(),
            opened_at: editor.opened_at(),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

async fn view(state: &EditorState) -> EditorView {
    let margin = state.margin().current().await;
    state.with_editor(|editor| EditorView::new(editor, margin))
}

/// Recomputes the margin for the current prices, then renders the view.
///
/// The editor lock is released before the margin call is awaited.
async fn recompute_and_view(state: &EditorState) -> EditorView {
    let (prices, product_id) =
        state.with_editor(|editor| (*editor.prices(), editor.product_id().cloned()));

    match state.margin().recompute(&prices, product_id.as_ref()).await {
        Ok(MarginUpdate::Applied(_)) => {}
        Ok(MarginUpdate::Superseded) => debug!("Margin recompute superseded by a newer edit"),
        Err(e) => warn!(error = %e, "Margin recompute failed, keeping previous value"),
    }

    view(state).await
}

// =============================================================================
// Session Commands
// =============================================================================

/// Opens the editor on an existing product, or on a blank form.
///
/// A new product starts with the registry's default VAT rate.
pub async fn open_editor(
    state: &EditorState,
    services: &Services,
    product_id: Option<String>,
) -> Result<EditorView, ApiError> {
    debug!(product_id = ?product_id, "open_editor command");

    let editor = match product_id {
        Some(id) => {
            let id = ProductId::new(id);
            let form = services.products.fetch(&id).await?;
            ProductEditor::open(Some(id), form, services.policy)
        }
        None => ProductEditor::new(services.vat.default_rate(), services.policy),
    };

    state.margin().reset().await;
    state.replace(editor);
    Ok(recompute_and_view(state).await)
}

/// Discards all edits since the editor was opened or last saved.
pub async fn cancel(state: &EditorState) -> Result<EditorView, ApiError> {
    debug!("cancel command");
    state.with_editor_mut(ProductEditor::cancel);
    Ok(recompute_and_view(state).await)
}

// =============================================================================
// Field Commands
// =============================================================================

/// Applies typed text to one price field.
pub async fn edit_price(
    state: &EditorState,
    field: PriceField,
    raw: String,
) -> Result<EditorView, ApiError> {
    debug!(field = %field, raw = %raw, "edit_price command");
    state.with_editor_mut(|editor| editor.edit_price(field, &raw));
    Ok(recompute_and_view(state).await)
}

/// Applies a typed tax rate.
///
/// An invalid rate is not a command failure: it shows up under
/// `errors.taxRate` and the prices stay as they were.
pub async fn edit_tax_rate(state: &EditorState, raw: String) -> Result<EditorView, ApiError> {
    debug!(raw = %raw, "edit_tax_rate command");
    match state.with_editor_mut(|editor| editor.edit_tax_rate(&raw)) {
        Ok(()) => Ok(recompute_and_view(state).await),
        Err(e) => {
            debug!(error = %e, "Tax rate rejected");
            Ok(view(state).await)
        }
    }
}

/// Applies a rate from the VAT registry by id.
pub async fn select_vat_rate(
    state: &EditorState,
    services: &Services,
    rate_id: String,
) -> Result<EditorView, ApiError> {
    debug!(rate_id = %rate_id, "select_vat_rate command");

    let rates = services.vat_rates().await;
    let rate = find(&rates, &rate_id).ok_or_else(|| ApiError::not_found("VAT rate", &rate_id))?;

    state.with_editor_mut(|editor| editor.select_vat_rate(rate));
    Ok(recompute_and_view(state).await)
}

/// Sets one descriptive field.
pub async fn edit_meta(
    state: &EditorState,
    field: MetaField,
    value: String,
) -> Result<EditorView, ApiError> {
    debug!(field = ?field, "edit_meta command");
    state.with_editor_mut(|editor| editor.edit_meta(field, &value));
    Ok(view(state).await)
}

/// Recomputes the margin without any edit.
pub async fn refresh_margin(state: &EditorState) -> Result<EditorView, ApiError> {
    debug!("refresh_margin command");
    Ok(recompute_and_view(state).await)
}

// =============================================================================
// Submission
// =============================================================================

/// Validates and saves the product.
///
/// ## Errors
/// - `VALIDATION_ERROR` with `fieldErrors` when the form gate fails
/// - `SAVE_FAILED` when the backend call fails; the general error is set and
///   the form stays editable
pub async fn submit(state: &EditorState, services: &Services) -> Result<EditorView, ApiError> {
    debug!("submit command");

    let checked = state.with_editor_mut(|editor| {
        if editor.validate() {
            Ok((editor.product_id().cloned(), editor.form()))
        } else {
            Err(editor.errors().clone())
        }
    });

    let (product_id, form) = match checked {
        Ok(checked) => checked,
        Err(errors) => {
            debug!(count = errors.len(), "Form rejected by validation");
            return Err(ApiError::invalid_form(errors));
        }
    };

    match services.products.save(product_id.as_ref(), &form).await {
        Ok(saved_id) => {
            info!(product_id = %saved_id, "Product saved");
            state.with_editor_mut(|editor| editor.mark_saved(saved_id));
            Ok(recompute_and_view(state).await)
        }
        Err(e) => {
            let message = e.user_message();
            warn!(error = %e, "Product save failed");
            state.with_editor_mut(|editor| editor.record_save_failure(message.clone()));
            Err(ApiError::save_failed(message))
        }
    }
}

// =============================================================================
// VAT Rates
// =============================================================================

/// The VAT rates offered in the rate picker.
pub async fn load_vat_rates(services: &Services) -> Result<Vec<VatRate>, ApiError> {
    debug!("load_vat_rates command");
    Ok(services.vat_rates().await)
}
