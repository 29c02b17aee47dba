//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use gridsync_core::CoreError;

/// Exit codes per the CLI contract.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const INPUT: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the grid master")]
    #[diagnostic(
        code(gridsync::connection_failed),
        help(
            "Check that the grid master is running and reachable.\n\
             Reason: {reason}\n\
             Try: gridsync system check --insecure"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Grid authentication failed")]
    #[diagnostic(
        code(gridsync::auth_failed),
        help(
            "Verify the API username and password for profile '{profile}'.\n\
             Run: gridsync config init"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(gridsync::no_credentials),
        help(
            "Configure credentials with: gridsync config init\n\
             Or set the GRIDSYNC_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Input files ──────────────────────────────────────────────────

    #[error("Input file problem: {message}")]
    #[diagnostic(
        code(gridsync::input),
        help("Check the file path and that the file is a CSV or Excel export with a header row.")
    )]
    Input { message: String },

    #[error("Cannot determine the file's schema: {message}")]
    #[diagnostic(
        code(gridsync::format),
        help(
            "The generic parser needs an address column. Rename one header to\n\
             'network', 'cidr', or 'subnet', or pick an explicit --source format."
        )
    )]
    Format { message: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("Grid API error: {message}")]
    #[diagnostic(code(gridsync::api_error))]
    ApiError {
        code: Option<String>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(gridsync::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(gridsync::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: gridsync config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration file not found")]
    #[diagnostic(
        code(gridsync::no_config),
        help(
            "Create one with: gridsync config init\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(gridsync::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Applying changes requires confirmation")]
    #[diagnostic(
        code(gridsync::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes,

    // ── IO / Serialization ───────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(gridsync::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Input { .. } | Self::Format { .. } => exit_code::INPUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAddress { value } => CliError::Validation {
                field: "address".into(),
                reason: format!("invalid CIDR: {value:?}"),
            },

            CoreError::FileNotFound { path } => CliError::Input {
                message: format!("file not found: {path}"),
            },

            CoreError::UnsupportedFormat { extension } => CliError::Input {
                message: format!("unsupported file extension: {extension:?}"),
            },

            CoreError::FormatError { message } => CliError::Format { message },

            CoreError::Spreadsheet(message) => CliError::Input { message },

            CoreError::Csv(e) => CliError::Input {
                message: e.to_string(),
            },

            CoreError::Io(e) => CliError::Io(e),

            CoreError::MappingDocument { message } => CliError::Validation {
                field: "mapping-file".into(),
                reason: message,
            },

            CoreError::Grid { message, code, .. } => CliError::ApiError { code, message },

            CoreError::GridAuthentication { .. } => CliError::AuthFailed {
                profile: "current".into(),
            },

            CoreError::GridUnreachable { reason } => CliError::ConnectionFailed { reason },
        }
    }
}

impl From<gridsync_wapi::Error> for CliError {
    fn from(err: gridsync_wapi::Error) -> Self {
        CliError::from(CoreError::from(err))
    }
}
