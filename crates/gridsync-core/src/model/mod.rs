//! Canonical domain types for the import pipeline.

pub mod mapping;
pub mod network;
pub mod preview;
pub mod snapshot;

pub use mapping::{EaMappingRule, EaType, MappingDocument, MappingResult, MappingWarning, Transform};
pub use network::{CanonicalNetwork, SourceKind};
pub use preview::{Action, PreviewResult, ReconciliationItem, RowError};
pub use snapshot::ExistingNetwork;
