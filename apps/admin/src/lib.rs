//! # Stockroom Admin Library
//!
//! The product edit session of the admin panel and the console that drives
//! it.
//!
//! ## Module Organization
//! ```text
//! stockroom_admin/
//! ├── lib.rs          ◄─── You are here (App setup & tracing)
//! ├── state/
//! │   ├── mod.rs      ◄─── EditorState, Services
//! │   └── editor.rs   ◄─── ProductEditor (one edit session)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── product.rs  ◄─── Editor commands returning EditorView
//! │   └── console.rs  ◄─── JSON-lines protocol
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::console::{self, ConsoleCommand};
use state::{EditorState, ProductEditor, Services};
use stockroom_client::{ClientConfig, ClientResult};

/// Default log filter when `RUST_LOG` is not set.
const DEFAULT_LOG_FILTER: &str = "info,stockroom=debug,reqwest=warn";

/// Everything one console session works with.
pub struct App {
    pub state: EditorState,
    pub services: Services,
}

impl App {
    /// Builds the collaborators and a blank editor from configuration.
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let (services, margin) = Services::from_config(config)?;
        let editor = ProductEditor::new(services.vat.default_rate(), services.policy);

        info!(
            base_url = %config.base_url(),
            remote_margin = config.margin.remote_enabled,
            policy = ?services.policy,
            "Admin session configured"
        );

        Ok(App {
            state: EditorState::new(editor, margin),
            services,
        })
    }

    /// Serves console commands until `quit` or end of input.
    ///
    /// With `open` set, the product is opened first and its reply is the
    /// first line on `writer`.
    pub async fn run_console<R, W>(
        &self,
        open: Option<String>,
        reader: R,
        mut writer: W,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Some(product_id) = open {
            let reply = console::dispatch(
                self,
                ConsoleCommand::Open {
                    product_id: Some(product_id),
                },
            )
            .await;
            console::write_reply(&mut writer, &reply).await?;
        }

        console::run(self, reader, writer).await
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr; stdout carries the console protocol.
/// `RUST_LOG` replaces the default filter entirely; set `RUST_LOG=debug`
/// to see all command traces.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
