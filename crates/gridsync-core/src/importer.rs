//! The import facade: wires the pure pipeline to the grid.
//!
//! [`Importer::preview`] runs parse → map → reconcile against a snapshot
//! fetched fresh from the grid (never cached -- grid state moves between
//! runs). [`Importer::execute`] applies only the accepted subset,
//! counting per-item successes and failures independently so one refused
//! create never aborts the batch.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;
use tracing::{info, warn};

use gridsync_wapi::{EaDefinition, EaListValue, ExtAttr, NetworkPatch, NewNetwork, WapiClient};

use crate::convert::snapshot_from_wapi;
use crate::error::CoreError;
use crate::mapping;
use crate::model::{EaMappingRule, EaType, ReconciliationItem, SourceKind};
use crate::parse;
use crate::preview::{ImportPreview, assemble};
use crate::reconcile::{COMMENT_KEY, reconcile};
use crate::table::RawTable;

/// EA stamped on every applied record with the source provider name.
const IMPORT_SOURCE_EA: &str = "Import Source";
/// EA stamped on every applied record with the apply timestamp.
const IMPORT_DATE_EA: &str = "Import Date";

/// Per-run settings, passed in explicitly -- no ambient globals, so
/// concurrent runs with different settings never interfere.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Target network view.
    pub network_view: String,
    /// EA mapping document; `None` or unusable → identity pass-through.
    pub mapping_file: Option<PathBuf>,
    /// Cap on the snapshot fetch.
    pub max_results: u32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            network_view: "default".into(),
            mapping_file: None,
            max_results: 1000,
        }
    }
}

/// What happened to one item during apply.
#[derive(Debug, Clone)]
pub enum ApplyStatus {
    Created { reference: String },
    Updated { reference: String },
    Failed { message: String },
}

/// One apply-progress event, emitted per processed item.
#[derive(Debug, Clone)]
pub struct ApplyEvent {
    pub address: String,
    pub status: ApplyStatus,
}

/// Aggregate result of one apply run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

/// Drives one import: preview, then (optionally) execute.
pub struct Importer {
    wapi: WapiClient,
    options: ImportOptions,
}

impl Importer {
    pub fn new(wapi: WapiClient, options: ImportOptions) -> Self {
        Self { wapi, options }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Parse a file, map tags, and classify every row against the grid.
    ///
    /// Pure work happens in-memory; the only grid call is the snapshot
    /// fetch, performed fresh on every invocation.
    pub async fn preview(
        &self,
        path: &Path,
        source: SourceKind,
    ) -> Result<ImportPreview, CoreError> {
        let view = self.options.network_view.clone();

        let table = RawTable::load(path)?;
        info!(rows = table.len(), %source, "loaded input file");

        let rules = mapping::load_rules_or_identity(self.options.mapping_file.as_deref());
        let outcome = parse::parse_table(&table, source, &view)?;

        let candidates: Vec<_> = outcome
            .networks
            .iter()
            .map(|network| (network.clone(), mapping::apply(network, &rules)))
            .collect();

        let existing = snapshot_from_wapi(
            self.wapi
                .list_networks(&view, self.options.max_results)
                .await?,
        );
        info!(existing = existing.len(), view = %view, "fetched grid snapshot");

        let reconciled = reconcile(candidates, &existing, &view);
        Ok(assemble(reconciled, outcome.errors, source, view, rules))
    }

    /// Apply the accepted subset of a preview: creates then updates.
    ///
    /// Emits one [`ApplyEvent`] per processed item through `on_item`.
    /// Individual failures are counted, logged, and skipped -- the batch
    /// always runs to completion.
    pub async fn execute(
        &self,
        preview: &ImportPreview,
        mut on_item: impl FnMut(&ApplyEvent),
    ) -> Result<ApplyOutcome, CoreError> {
        let mut outcome = ApplyOutcome::default();
        let mut provisioned: HashSet<String> = HashSet::new();
        let stamp = Utc::now().to_rfc3339();

        for item in &preview.preview.new_networks {
            let extattrs = outgoing_attributes(item, &stamp);
            self.provision_definitions(&extattrs, &preview.rules, &mut provisioned)
                .await;

            let request = NewNetwork {
                network: item.network.address.to_string(),
                network_view: preview.network_view.clone(),
                comment: item.network.comment.clone(),
                extattrs,
            };
            let event = match self.wapi.create_network(&request).await {
                Ok(reference) => {
                    outcome.created += 1;
                    ApplyEvent {
                        address: request.network.clone(),
                        status: ApplyStatus::Created { reference },
                    }
                }
                Err(error) => {
                    warn!(network = %request.network, %error, "create failed");
                    outcome.failed += 1;
                    ApplyEvent {
                        address: request.network.clone(),
                        status: ApplyStatus::Failed {
                            message: error.to_string(),
                        },
                    }
                }
            };
            on_item(&event);
        }

        for item in &preview.preview.updated_networks {
            let Some(reference) = item.existing_reference.as_deref() else {
                // An update item always carries its reference; a missing
                // one is a bug upstream, not a per-item failure.
                warn!(network = %item.network.address, "update item without reference, skipped");
                outcome.failed += 1;
                continue;
            };

            let extattrs = outgoing_attributes(item, &stamp);
            self.provision_definitions(&extattrs, &preview.rules, &mut provisioned)
                .await;

            let patch = NetworkPatch {
                comment: item
                    .attribute_delta
                    .contains_key(COMMENT_KEY)
                    .then(|| item.network.comment.clone()),
                extattrs: Some(extattrs),
            };
            let address = item.network.address.to_string();
            let event = match self.wapi.update_network(reference, &patch).await {
                Ok(reference) => {
                    outcome.updated += 1;
                    ApplyEvent {
                        address: address.clone(),
                        status: ApplyStatus::Updated { reference },
                    }
                }
                Err(error) => {
                    warn!(network = %address, %error, "update failed");
                    outcome.failed += 1;
                    ApplyEvent {
                        address: address.clone(),
                        status: ApplyStatus::Failed {
                            message: error.to_string(),
                        },
                    }
                }
            };
            on_item(&event);
        }

        info!(
            created = outcome.created,
            updated = outcome.updated,
            failed = outcome.failed,
            "apply finished"
        );
        Ok(outcome)
    }

    /// Ensure EA definitions exist for every outgoing attribute whose
    /// rule allows provisioning. Failures here are logged and tolerated:
    /// the create/update itself decides success or failure.
    async fn provision_definitions(
        &self,
        extattrs: &IndexMap<String, ExtAttr>,
        rules: &[EaMappingRule],
        provisioned: &mut HashSet<String>,
    ) {
        for name in extattrs.keys() {
            if !provisioned.insert(name.clone()) {
                continue;
            }
            let rule = rules.iter().rev().find(|r| &r.target_attribute == name);
            if let Some(rule) = rule {
                if !rule.create_if_missing {
                    continue;
                }
            }

            let mut definition = EaDefinition::string(name.clone());
            if let Some(rule) = rule {
                definition.attr_type = rule.ea_type.to_string();
                if rule.ea_type == EaType::Enum && !rule.list_values.is_empty() {
                    definition.list_values = Some(
                        rule.list_values
                            .iter()
                            .map(|v| EaListValue { value: v.clone() })
                            .collect(),
                    );
                }
            }

            if let Err(error) = self.wapi.ensure_ea_definition(&definition).await {
                warn!(attribute = %name, %error, "EA definition provisioning failed");
            }
        }
    }
}

/// The full outgoing EA payload for one item: its mapped attributes plus
/// the import stamps.
fn outgoing_attributes(item: &ReconciliationItem, stamp: &str) -> IndexMap<String, ExtAttr> {
    let mut extattrs: IndexMap<String, ExtAttr> = item
        .mapping
        .extended_attributes
        .iter()
        .map(|(name, value)| (name.clone(), ExtAttr::new(value.clone())))
        .collect();
    extattrs.insert(
        IMPORT_SOURCE_EA.into(),
        ExtAttr::new(item.network.source.to_string()),
    );
    extattrs.insert(IMPORT_DATE_EA.into(), ExtAttr::new(stamp));
    extattrs
}
