//! Inspect command implementation.

use super::load_fixture;
use fieldsync_document::Document;
use serde::Serialize;
use std::path::Path;

/// Fixture inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// Fixture path.
    pub path: String,
    /// Total documents across all collections.
    pub total_documents: usize,
    /// Per-collection statistics.
    pub collections: Vec<CollectionStats>,
}

/// Statistics for a single collection.
#[derive(Debug, Serialize)]
pub struct CollectionStats {
    /// Collection name.
    pub name: String,
    /// Number of documents.
    pub document_count: usize,
    /// Documents whose stability flag is false or absent.
    pub unstable_count: usize,
    /// Documents without an id field.
    pub missing_id_count: usize,
}

/// Runs the inspect command.
pub fn run(path: &Path, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    let fixture = load_fixture(path)?;

    let collections: Vec<CollectionStats> = fixture
        .iter()
        .map(|(name, documents)| CollectionStats {
            name: name.clone(),
            document_count: documents.len(),
            unstable_count: documents.iter().filter(|d| !d.synchro()).count(),
            missing_id_count: count_missing_ids(documents),
        })
        .collect();

    let result = InspectResult {
        path: path.display().to_string(),
        total_documents: collections.iter().map(|c| c.document_count).sum(),
        collections,
    };

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        _ => print_text(&result),
    }
    Ok(())
}

fn count_missing_ids(documents: &[Document]) -> usize {
    documents.iter().filter(|d| d.id().is_none()).count()
}

fn print_text(result: &InspectResult) {
    println!("Fixture: {}", result.path);
    println!("Total documents: {}", result.total_documents);
    println!();
    println!(
        "{:<20} {:>10} {:>10} {:>12}",
        "collection", "documents", "unstable", "missing ids"
    );
    for collection in &result.collections {
        println!(
            "{:<20} {:>10} {:>10} {:>12}",
            collection.name,
            collection.document_count,
            collection.unstable_count,
            collection.missing_id_count
        );
    }
}
