//! The import command: preview, confirm, apply.
//!
//! Row errors and mapping warnings render alongside the successful
//! classification in the same response -- a bad row is information, not
//! a failure path.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tabled::Tabled;

use gridsync_core::{ApplyStatus, ImportPreview, Importer, ReconciliationItem};

use crate::cli::{GlobalOpts, ImportArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::util;

/// How many items each preview section prints before eliding.
const DETAIL_LIMIT: usize = 5;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    importer: &Importer,
    args: ImportArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = args.source.into();
    let preview = importer.preview(&args.file, source).await?;

    // Structured output modes serialize the whole preview and stop;
    // apply is an interactive, table-mode flow.
    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            render_preview(&preview, global);
        }
        _ => {
            let rendered = output::render_single(
                &global.output,
                &preview,
                |_| String::new(),
                |p| format!("{} rows", p.summary.total),
            );
            output::print_output(&rendered, global.quiet);
            if !args.dry_run && preview.preview.has_changes() {
                eprintln!("(structured output selected; re-run with --output table to apply)");
            }
            return Ok(());
        }
    }

    if args.dry_run {
        if !global.quiet {
            println!("\n{}", "Dry run -- no changes applied".yellow());
        }
        return Ok(());
    }

    if !preview.preview.has_changes() {
        if !global.quiet {
            println!("\n{}", "Nothing to apply".yellow());
        }
        return Ok(());
    }

    let prompt = format!(
        "Apply {} create(s) and {} update(s) to view '{}'?",
        preview.summary.new, preview.summary.updated, preview.network_view
    );
    if !util::confirm(&prompt, global.yes)? {
        if !global.quiet {
            println!("{}", "Import cancelled".red());
        }
        return Ok(());
    }

    apply(importer, &preview, global).await
}

async fn apply(
    importer: &Importer,
    preview: &ImportPreview,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let total = preview.summary.new + preview.summary.updated;
    let bar = if global.quiet {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {msg}")
                .expect("static template")
                .progress_chars("=> "),
        );
        bar
    };

    let outcome = importer
        .execute(preview, |event| {
            bar.inc(1);
            match &event.status {
                ApplyStatus::Failed { message } => {
                    bar.println(format!("{} {}: {message}", "✗".red(), event.address));
                }
                _ => bar.set_message(event.address.clone()),
            }
        })
        .await?;
    bar.finish_and_clear();

    if !global.quiet {
        println!("\n{}", "Import complete".green().bold());
        println!("Created: {}", outcome.created);
        println!("Updated: {}", outcome.updated);
        if outcome.failed > 0 {
            println!("{}", format!("Failed:  {}", outcome.failed).red());
        }
    }
    Ok(())
}

// ── Preview rendering ───────────────────────────────────────────────

fn render_preview(preview: &ImportPreview, global: &GlobalOpts) {
    if global.quiet {
        return;
    }

    let summary_rows = vec![
        SummaryRow {
            category: "New networks".into(),
            count: preview.summary.new,
        },
        SummaryRow {
            category: "Updated networks".into(),
            count: preview.summary.updated,
        },
        SummaryRow {
            category: "Overlapping (skipped)".into(),
            count: preview.summary.overlapping,
        },
        SummaryRow {
            category: "Unchanged (skipped)".into(),
            count: preview.summary.unchanged,
        },
        SummaryRow {
            category: "Row errors".into(),
            count: preview.summary.errors,
        },
    ];
    println!("{}", output::render_table(&summary_rows));

    section(
        &format!("{}", "New networks to create:".cyan().bold()),
        &preview.preview.new_networks,
        |item| format!("  • {} - {}", item.network.address, item.network.name),
    );
    section(
        &format!("{}", "Networks to update:".cyan().bold()),
        &preview.preview.updated_networks,
        |item| {
            let keys: Vec<&str> = item.attribute_delta.keys().map(String::as_str).collect();
            format!("  • {} ({})", item.network.address, keys.join(", "))
        },
    );
    section(
        &format!("{}", "Overlapping networks (will be skipped):".yellow().bold()),
        &preview.preview.overlapping_networks,
        |item| format!("  • {} {}", item.network.address, item.reason),
    );

    let warnings = preview.preview.mapping_warnings();
    if !warnings.is_empty() {
        println!("\n{}", "Mapping warnings:".yellow().bold());
        for (address, warning) in warnings.iter().take(DETAIL_LIMIT) {
            println!("  • {address}: {warning}");
        }
        elide(warnings.len());
    }

    if !preview.preview.errors.is_empty() {
        println!("\n{}", "Row errors:".red().bold());
        for error in preview.preview.errors.iter().take(DETAIL_LIMIT) {
            println!("  • {error}");
        }
        elide(preview.preview.errors.len());
    }
}

fn section(title: &str, items: &[ReconciliationItem], line: impl Fn(&ReconciliationItem) -> String) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}");
    for item in items.iter().take(DETAIL_LIMIT) {
        println!("{}", line(item));
    }
    elide(items.len());
}

fn elide(total: usize) {
    if total > DETAIL_LIMIT {
        println!("  ... and {} more", total - DETAIL_LIMIT);
    }
}
