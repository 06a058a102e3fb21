//! # Product Editor
//!
//! One product edit session: the price state, the descriptive fields, and
//! the errors shown next to them.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Product Edit Session                                 │
//! │                                                                         │
//! │  Frontend Action          Editor Method           State Change          │
//! │  ───────────────          ─────────────           ────────────          │
//! │                                                                         │
//! │  Type in a price ────────► edit_price() ────────► reducer + clear error │
//! │                                                                         │
//! │  Type a tax rate ────────► edit_tax_rate() ─────► reducer or field error│
//! │                                                                         │
//! │  Pick a VAT rate ────────► select_vat_rate() ───► reducer               │
//! │                                                                         │
//! │  Type name/code/... ─────► edit_meta() ─────────► meta + clear error    │
//! │                                                                         │
//! │  Click Save ─────────────► validate() ──────────► field errors          │
//! │                            mark_saved() ────────► new snapshot          │
//! │                                                                         │
//! │  Click Cancel ───────────► cancel() ────────────► snapshot restored     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use stockroom_core::money::parse_amount;
use stockroom_core::validation::ValidationResult;
use stockroom_core::{
    validate_form, FieldErrors, FormField, MetaField, PairingPolicy, PriceAction, PriceField,
    ProductForm, ProductId, ProductMeta, ProductPriceState, TaxRate, VatRate,
};

/// The state of one product edit session.
#[derive(Debug, Clone)]
pub struct ProductEditor {
    /// `None` until the product has been saved once.
    product_id: Option<ProductId>,
    prices: ProductPriceState,
    meta: ProductMeta,
    errors: FieldErrors,
    general_error: Option<String>,
    policy: PairingPolicy,

    /// Form as it was when the session was opened or last saved.
    snapshot: ProductForm,
    opened_at: DateTime<Utc>,
}

impl ProductEditor {
    /// A blank editor for a new product.
    pub fn new(tax_rate: TaxRate, policy: PairingPolicy) -> Self {
        let form = ProductForm {
            meta: ProductMeta::default(),
            prices: ProductPriceState::with_tax_rate(tax_rate),
        };
        Self::open(None, form, policy)
    }

    /// An editor over existing form data.
    ///
    /// Stored prices are taken as they are; nothing is re-derived.
    pub fn open(product_id: Option<ProductId>, form: ProductForm, policy: PairingPolicy) -> Self {
        ProductEditor {
            product_id,
            prices: form.prices,
            meta: form.meta.clone(),
            errors: FieldErrors::new(),
            general_error: None,
            policy,
            snapshot: form,
            opened_at: Utc::now(),
        }
    }

    // -------------------------------------------------------------------------
    // Edits
    // -------------------------------------------------------------------------

    /// Applies typed text to a price field and re-derives its pair.
    ///
    /// Text that is not a number is read as zero.
    pub fn edit_price(&mut self, field: PriceField, raw: &str) {
        let value = parse_amount(raw);
        self.prices = self
            .prices
            .apply_with(PriceAction::Set { field, value }, self.policy);
        self.errors.remove(field.into());
    }

    /// Applies a typed tax rate.
    ///
    /// A rate outside `[0, 100]` or not a number is recorded as a field error
    /// and leaves the prices untouched.
    pub fn edit_tax_rate(&mut self, raw: &str) -> ValidationResult<()> {
        match TaxRate::parse_percent(raw) {
            Ok(rate) => {
                self.set_tax_rate(rate);
                Ok(())
            }
            Err(e) => {
                self.errors.insert(FormField::TaxRate, &e);
                Err(e)
            }
        }
    }

    /// Applies a rate picked from the registry.
    pub fn select_vat_rate(&mut self, rate: &VatRate) {
        self.set_tax_rate(rate.rate);
    }

    fn set_tax_rate(&mut self, rate: TaxRate) {
        self.prices = self
            .prices
            .apply_with(PriceAction::SetTaxRate(rate), self.policy);
        self.errors.remove(FormField::TaxRate);
    }

    /// Sets one descriptive field.
    pub fn edit_meta(&mut self, field: MetaField, value: &str) {
        self.meta.set(field, value);
        if let Some(form_field) = FormField::for_meta(field) {
            self.errors.remove(form_field);
        }
    }

    // -------------------------------------------------------------------------
    // Submission
    // -------------------------------------------------------------------------

    /// Runs the form gate, replacing the field errors with its findings.
    ///
    /// Returns true when the form may be submitted.
    pub fn validate(&mut self) -> bool {
        self.errors = validate_form(&self.prices, &self.meta);
        self.errors.is_empty()
    }

    /// The data sent to the save endpoint.
    pub fn form(&self) -> ProductForm {
        ProductForm {
            meta: self.meta.clone(),
            prices: self.prices,
        }
    }

    /// Shows a failed save in the general banner. The form stays editable.
    pub fn record_save_failure(&mut self, message: impl Into<String>) {
        self.general_error = Some(message.into());
    }

    /// Records a successful save under `id`.
    pub fn mark_saved(&mut self, id: ProductId) {
        self.product_id = Some(id);
        self.errors.clear();
        self.general_error = None;
        self.snapshot = self.form();
    }

    /// Discards every edit since the session was opened or last saved.
    pub fn cancel(&mut self) {
        self.prices = self.snapshot.prices;
        self.meta = self.snapshot.meta.clone();
        self.errors.clear();
        self.general_error = None;
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn product_id(&self) -> Option<&ProductId> {
        self.product_id.as_ref()
    }

    pub fn prices(&self) -> &ProductPriceState {
        &self.prices
    }

    pub fn meta(&self) -> &ProductMeta {
        &self.meta
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// True when the form differs from its snapshot.
    pub fn is_dirty(&self) -> bool {
        self.prices != self.snapshot.prices || self.meta != self.snapshot.meta
    }
}
