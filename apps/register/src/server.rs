//! # Line Protocol
//!
//! One JSON request per line in, one JSON response per line out.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin                                                                  │
//! │  {"id":1,"command":"open_cash","args":{"openingBalanceCents":5000}}     │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  serve() ──► Request ──► commands::dispatch ──► Response                │
//! │                                                     │                   │
//! │  stdout                                             ▼                   │
//! │  {"id":1,"ok":true,"data":{...}}                                        │
//! │  {"id":2,"ok":false,"error":{"code":"NO_OPEN_SESSION","message":...}}   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Requests are handled in order. Blank lines are skipped. A line that is
//! not a valid request gets an `INVALID_REQUEST` response with a null id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::commands;
use crate::error::ApiError;
use crate::state::AppState;

/// A single command invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Echoed back untouched so the caller can match responses.
    #[serde(default)]
    pub id: Value,
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub id: Value,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

impl Response {
    pub fn success(id: Value, data: Value) -> Self {
        Response {
            id,
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(id: Value, error: ApiError) -> Self {
        Response {
            id,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Handles one raw request line.
pub async fn handle_line(state: &AppState, line: &str) -> Response {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed request");
            return Response::failure(Value::Null, ApiError::from(e));
        }
    };

    match commands::dispatch(state, &request.command, request.args).await {
        Ok(data) => Response::success(request.id, data),
        Err(error) => {
            debug!(command = %request.command, code = ?error.code, "Command failed");
            Response::failure(request.id, error)
        }
    }
}

/// Serves requests until the reader reaches end of input.
pub async fn serve<R, W>(state: &AppState, reader: R, mut writer: W) -> std::io::Result<()>
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

        let response = handle_line(state, line).await;
        let mut encoded = serde_json::to_vec(&response)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        encoded.push(b'\n');

        writer.write_all(&encoded).await?;
        writer.flush().await?;
    }

    info!("Input closed, register shutting down");
    Ok(())
}
