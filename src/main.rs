//! Marginalia
//!
//! Reads a JSON array of highlights on stdin, merges the fragments each
//! book's device split across page or chapter boundaries, and writes the
//! per-book merge outcomes as JSON on stdout.

use std::collections::BTreeMap;
use std::io::{self, Write};

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marginalia::annotations::{self, Annotation};
use marginalia::config::Config;
use marginalia::merge::{HighlightMerger, MergeOutcome};

fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize tracing; stdout carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_new(&config.logging.filter)
                .unwrap_or_else(|_| "marginalia=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!("Starting Marginalia v{}", env!("CARGO_PKG_VERSION"));
    tracing::debug!(
        position_threshold = config.merge.position_threshold,
        time_threshold_secs = config.merge.time_threshold_secs,
        "Merge thresholds"
    );

    let input = io::read_to_string(io::stdin()).context("Failed to read annotations from stdin")?;
    let batch = annotations::from_json(&input).context("Failed to decode annotations")?;

    let merger = HighlightMerger::new(config.merge);
    let outcomes: BTreeMap<String, MergeOutcome> = annotations::group_by_book(drop_empty(batch))
        .into_iter()
        .map(|(book_id, highlights)| (book_id, merger.merge_with_stats(highlights)))
        .collect();

    let reduced: usize = outcomes.values().map(MergeOutcome::reduction_count).sum();
    tracing::info!(books = outcomes.len(), reduced = reduced, "Reconciled highlights");

    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &outcomes).context("Failed to write merge outcome")?;
    writeln!(stdout).context("Failed to write merge outcome")?;

    Ok(())
}

/// Highlights without text cannot be merged or rendered
fn drop_empty(batch: Vec<Annotation>) -> Vec<Annotation> {
    batch
        .into_iter()
        .filter(|annotation| {
            let keep = annotation.has_text();
            if !keep {
                tracing::warn!(id = %annotation.id, "Skipping highlight without text");
            }
            keep
        })
        .collect()
}
