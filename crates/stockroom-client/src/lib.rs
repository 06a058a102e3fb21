//! # stockroom-client: Remote Collaborators of the Product Editor
//!
//! Everything in the editor that talks to the admin backend lives here,
//! together with the fallbacks used when the backend is unavailable.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      stockroom-client                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                    RestClient (reqwest)                          │  │
//! │  │   x-request-id per call • JSON camelCase • { message } errors    │  │
//! │  └──────┬───────────────────────┬──────────────────────┬────────────┘  │
//! │         ▼                       ▼                      ▼               │
//! │  ┌───────────────┐   ┌────────────────────┐   ┌──────────────────┐    │
//! │  │VatRateRegistry│   │  MarginCalculator  │   │  ProductService  │    │
//! │  │               │   │                    │   │                  │    │
//! │  │ remote list   │   │ Fallback(Remote,   │   │ PUT existing     │    │
//! │  │ or 23/8/5/0   │   │          Local)    │   │ POST new         │    │
//! │  │               │   │ latest token wins  │   │ GET for editing  │    │
//! │  └───────────────┘   └────────────────────┘   └──────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Backend URL, timeouts, margin and pricing switches
//! - [`error`] - Client error types
//! - [`protocol`] - Wire DTOs and their conversion to core types
//! - [`transport`] - `RestClient`
//! - [`vat`] - `VatRateRegistry`
//! - [`margin`] - Margin strategies and `MarginCalculator`
//! - [`catalog`] - `ProductService`

pub mod catalog;
pub mod config;
pub mod error;
pub mod margin;
pub mod protocol;
pub mod transport;
pub mod vat;

pub use catalog::ProductService;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use margin::{
    FallbackMarginStrategy, LocalMarginStrategy, MarginCalculator, MarginRequest, MarginStrategy,
    MarginUpdate, RemoteMarginStrategy,
};
pub use transport::RestClient;
pub use vat::VatRateRegistry;
