//! Sync command implementation.

use super::{load_fixture, seed_remote};
use fieldsync_engine::{
    standard_registry, LocalStores, MediaStore, RemoteStore, SyncDirection, SyncRequest,
    SyncService, DEFAULT_SYNC_ORDER,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// One entity type's counters, for serialized output.
#[derive(Debug, Serialize)]
pub struct TypeOutcome {
    /// Entity type name.
    pub entity_type: String,
    /// Records written to the remote store.
    pub pushed: usize,
    /// Remote documents applied locally.
    pub pulled: usize,
    /// Records or batches that failed.
    pub failed: usize,
    /// Local records newer than the applied remote document.
    pub conflicts: usize,
}

/// Serialized sync outcome.
#[derive(Debug, Serialize)]
pub struct SyncOutcome {
    /// True when no error occurred.
    pub success: bool,
    /// One-line summary.
    pub message: String,
    /// Per-type counters.
    pub results: Vec<TypeOutcome>,
    /// Every error encountered, in order.
    pub errors: Vec<String>,
}

/// Runs the sync command.
pub fn run(
    fixture: &Path,
    types: &[String],
    direction: SyncDirection,
    force: bool,
    media_dir: &Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let remote = Arc::new(seed_remote(load_fixture(fixture)?));
    info!(fixture = %fixture.display(), "remote fixture loaded");
    let media = Arc::new(MediaStore::open(media_dir)?);
    let stores = LocalStores::in_memory();
    let registry = Arc::new(standard_registry(&stores, media));
    let service = SyncService::new(registry, remote as Arc<dyn RemoteStore>);

    let entity_types: Vec<String> = if types.is_empty() {
        DEFAULT_SYNC_ORDER.iter().map(|t| t.to_string()).collect()
    } else {
        types.to_vec()
    };
    let request = SyncRequest {
        entity_types,
        direction,
        force_sync: force,
    };

    let report = service.synchronize(&request);
    let outcome = SyncOutcome {
        success: report.success,
        message: report.message.clone(),
        results: report
            .results
            .iter()
            .map(|(entity_type, r)| TypeOutcome {
                entity_type: entity_type.clone(),
                pushed: r.pushed,
                pulled: r.pulled,
                failed: r.failed,
                conflicts: r.conflicts,
            })
            .collect(),
        errors: report.errors.clone(),
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
        _ => print_text(&outcome),
    }

    if outcome.success {
        Ok(())
    } else {
        Err(format!("sync finished with {} error(s)", outcome.errors.len()).into())
    }
}

fn print_text(outcome: &SyncOutcome) {
    println!("Sync: {}", outcome.message);
    println!();
    println!(
        "{:<20} {:>8} {:>8} {:>8} {:>10}",
        "type", "pushed", "pulled", "failed", "conflicts"
    );
    for result in &outcome.results {
        println!(
            "{:<20} {:>8} {:>8} {:>8} {:>10}",
            result.entity_type, result.pushed, result.pulled, result.failed, result.conflicts
        );
    }
    if !outcome.errors.is_empty() {
        println!();
        println!("Errors:");
        for error in &outcome.errors {
            println!("  - {error}");
        }
    }
}
