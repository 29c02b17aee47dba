// ── Core error types ──
//
// User-facing errors from gridsync-core. Per-row failures are NOT here --
// they accumulate as `RowError` values inside the preview so one bad row
// never aborts a batch. This enum covers whole-run failures only: a file
// whose column model cannot be determined, an unreadable input, or a grid
// call that failed. The `From<gridsync_wapi::Error>` impl translates
// transport-layer errors into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Address errors ───────────────────────────────────────────────
    #[error("Invalid CIDR address: {value:?}")]
    InvalidAddress { value: String },

    // ── File / format errors ─────────────────────────────────────────
    #[error("Input file not found: {path}")]
    FileNotFound { path: String },

    #[error("Unsupported input format: {extension:?} (expected .csv, .xlsx, or .xls)")]
    UnsupportedFormat { extension: String },

    #[error("Cannot determine file schema: {message}")]
    FormatError { message: String },

    #[error("Spreadsheet read failed: {0}")]
    Spreadsheet(String),

    #[error("CSV read failed: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    // ── Mapping document errors ──────────────────────────────────────
    #[error("Malformed EA mapping document: {message}")]
    MappingDocument { message: String },

    // ── Grid errors ──────────────────────────────────────────────────
    #[error("Grid API error: {message}")]
    Grid {
        message: String,
        code: Option<String>,
        status: Option<u16>,
    },

    #[error("Grid authentication failed: {message}")]
    GridAuthentication { message: String },

    #[error("Cannot connect to grid master: {reason}")]
    GridUnreachable { reason: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<gridsync_wapi::Error> for CoreError {
    fn from(err: gridsync_wapi::Error) -> Self {
        match err {
            gridsync_wapi::Error::Authentication { message } => {
                CoreError::GridAuthentication { message }
            }
            gridsync_wapi::Error::Transport(ref e) if e.is_connect() || e.is_timeout() => {
                CoreError::GridUnreachable {
                    reason: e.to_string(),
                }
            }
            gridsync_wapi::Error::Transport(e) => CoreError::Grid {
                message: e.to_string(),
                code: None,
                status: e.status().map(|s| s.as_u16()),
            },
            gridsync_wapi::Error::InvalidUrl(e) => CoreError::GridUnreachable {
                reason: format!("invalid URL: {e}"),
            },
            gridsync_wapi::Error::Tls(message) => CoreError::GridUnreachable {
                reason: format!("TLS error: {message}"),
            },
            gridsync_wapi::Error::Api {
                message,
                code,
                status,
            } => CoreError::Grid {
                message,
                code,
                status: Some(status),
            },
            gridsync_wapi::Error::Deserialization { message, body: _ } => CoreError::Grid {
                message: format!("unexpected response: {message}"),
                code: None,
                status: None,
            },
        }
    }
}
