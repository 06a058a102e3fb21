//! # Console Protocol
//!
//! One JSON object per line in, one JSON object per line out.
//!
//! ```text
//! > {"cmd":"editPrice","field":"saleNet","value":"100"}
//! < {"ok":true,"view":{"productId":null,"prices":{...},"margin":null,...}}
//! > {"cmd":"submit"}
//! < {"ok":false,"error":{"code":"VALIDATION_ERROR","message":"...","fieldErrors":{...}}}
//! ```

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use stockroom_core::{MetaField, PriceField, VatRate};

use super::product::{self, EditorView};
use crate::error::ApiError;
use crate::App;

/// A console request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd", rename_all = "camelCase")]
pub enum ConsoleCommand {
    /// Opens an existing product, or a blank form without `productId`.
    Open {
        #[serde(default, rename = "productId")]
        product_id: Option<String>,
    },
    EditPrice {
        field: PriceField,
        value: String,
    },
    EditTaxRate {
        value: String,
    },
    SelectVatRate {
        id: String,
    },
    EditMeta {
        field: MetaField,
        value: String,
    },
    RefreshMargin,
    Submit,
    Cancel,
    VatRates,
    Quit,
}

impl ConsoleCommand {
    /// Parses one input line.
    pub fn parse(line: &str) -> Result<Self, ApiError> {
        serde_json::from_str(line).map_err(|e| ApiError::invalid_command(e.to_string()))
    }
}

/// A console response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleReply {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<EditorView>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vat_rates: Option<Vec<VatRate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl ConsoleReply {
    fn view(view: EditorView) -> Self {
        ConsoleReply {
            ok: true,
            view: Some(view),
            vat_rates: None,
            error: None,
        }
    }

    fn vat_rates(rates: Vec<VatRate>) -> Self {
        ConsoleReply {
            ok: true,
            view: None,
            vat_rates: Some(rates),
            error: None,
        }
    }

    fn error(error: ApiError) -> Self {
        ConsoleReply {
            ok: false,
            view: None,
            vat_rates: None,
            error: Some(error),
        }
    }

    fn done() -> Self {
        ConsoleReply {
            ok: true,
            view: None,
            vat_rates: None,
            error: None,
        }
    }
}

impl From<Result<EditorView, ApiError>> for ConsoleReply {
    fn from(result: Result<EditorView, ApiError>) -> Self {
        match result {
            Ok(view) => ConsoleReply::view(view),
            Err(e) => ConsoleReply::error(e),
        }
    }
}

/// Runs one command against the session.
pub async fn dispatch(app: &App, command: ConsoleCommand) -> ConsoleReply {
    let state = &app.state;
    let services = &app.services;

    match command {
        ConsoleCommand::Open { product_id } => {
            product::open_editor(state, services, product_id).await.into()
        }
        ConsoleCommand::EditPrice { field, value } => {
            product::edit_price(state, field, value).await.into()
        }
        ConsoleCommand::EditTaxRate { value } => product::edit_tax_rate(state, value).await.into(),
        ConsoleCommand::SelectVatRate { id } => {
            product::select_vat_rate(state, services, id).await.into()
        }
        ConsoleCommand::EditMeta { field, value } => {
            product::edit_meta(state, field, value).await.into()
        }
        ConsoleCommand::RefreshMargin => product::refresh_margin(state).await.into(),
        ConsoleCommand::Submit => product::submit(state, services).await.into(),
        ConsoleCommand::Cancel => product::cancel(state).await.into(),
        ConsoleCommand::VatRates => match product::load_vat_rates(services).await {
            Ok(rates) => ConsoleReply::vat_rates(rates),
            Err(e) => ConsoleReply::error(e),
        },
        ConsoleCommand::Quit => ConsoleReply::done(),
    }
}

/// Writes one reply as a single JSON line and flushes it.
pub async fn write_reply<W>(writer: &mut W, reply: &ConsoleReply) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut out = serde_json::to_vec(reply)?;
    out.push(b'\n');
    writer.write_all(&out).await?;
    writer.flush().await
}

/// Reads commands line by line until `quit` or end of input.
///
/// Blank lines are skipped. Malformed lines get an `INVALID_COMMAND` reply
/// and the session continues.
pub async fn run<R, W>(app: &App, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (reply, quit) = match ConsoleCommand::parse(line) {
            Ok(command) => {
                debug!(?command, "Console command");
                let quit = command == ConsoleCommand::Quit;
                (dispatch(app, command).await, quit)
            }
            Err(e) => (ConsoleReply::error(e), false),
        };

        write_reply(&mut writer, &reply).await?;

        if quit {
            info!("Console session ended");
            break;
        }
    }

    Ok(())
}
