//! Import pipeline between `gridsync-wapi` and UI consumers (CLI / web).
//!
//! This crate owns the business logic of a gridsync import run:
//!
//! - **[`cidr`]** — CIDR parsing, normalization, and exact interval
//!   arithmetic for overlap/containment tests.
//! - **[`table`]** — raw tabular input (CSV / Excel) decoded into
//!   header-keyed rows.
//! - **[`parse`]** — one parser per source format (AWS, Azure, GCP,
//!   Alibaba, properties spreadsheets, generic CSV), all behind the same
//!   row-by-row contract: canonical records out, per-row errors
//!   accumulated, never thrown.
//! - **[`mapping`]** — the declarative EA mapping engine transforming
//!   provider tags into grid extended attributes.
//! - **[`reconcile`]** — the pure diff engine classifying every candidate
//!   as create / update / skip against a grid snapshot, with exact
//!   overlap detection.
//! - **[`preview`]** — shapes reconciliation output into the summary +
//!   itemized buckets consumed by callers.
//! - **[`Importer`]** — facade wiring the pipeline to the WAPI client for
//!   snapshot fetch and the apply step. The pipeline itself is pure and
//!   synchronous; only the facade is async.

pub mod cidr;
pub mod convert;
pub mod error;
pub mod importer;
pub mod mapping;
pub mod model;
pub mod parse;
pub mod preview;
pub mod reconcile;
pub mod table;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use importer::{ApplyEvent, ApplyOutcome, ApplyStatus, ImportOptions, Importer};
pub use preview::{ImportPreview, Summary};
pub use table::RawTable;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Action,
    CanonicalNetwork,
    EaMappingRule,
    EaType,
    ExistingNetwork,
    MappingDocument,
    MappingResult,
    MappingWarning,
    PreviewResult,
    ReconciliationItem,
    RowError,
    SourceKind,
    Transform,
};
