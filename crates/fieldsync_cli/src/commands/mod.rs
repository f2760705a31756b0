//! CLI command implementations.

pub mod inspect;
pub mod sync;

use fieldsync_document::Document;
use fieldsync_engine::MemoryRemoteStore;
use std::collections::BTreeMap;
use std::path::Path;

/// Loads a remote fixture: a JSON object mapping collection names to
/// arrays of documents.
pub fn load_fixture(
    path: &Path,
) -> Result<BTreeMap<String, Vec<Document>>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read fixture {}: {e}", path.display()))?;
    let fixture: BTreeMap<String, Vec<Document>> = serde_json::from_str(&raw)
        .map_err(|e| format!("malformed fixture {}: {e}", path.display()))?;
    Ok(fixture)
}

/// Seeds a fixture into an in-memory remote store.
pub fn seed_remote(fixture: BTreeMap<String, Vec<Document>>) -> MemoryRemoteStore {
    let remote = MemoryRemoteStore::new();
    for (collection, documents) in fixture {
        for document in documents {
            remote.seed(&collection, document);
        }
    }
    remote
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_round_trips_into_a_remote_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fixture.json");
        std::fs::write(
            &path,
            r#"{
                "roles": [
                    {"id": 1, "name": "agent"},
                    {"name": "inspector", "synchro": false}
                ],
                "users": []
            }"#,
        )
        .unwrap();

        let fixture = load_fixture(&path).unwrap();
        assert_eq!(fixture["roles"].len(), 2);
        assert_eq!(fixture["roles"][0].id(), Some(1));
        assert_eq!(fixture["roles"][1].get_str("name"), Some("inspector"));

        let remote = seed_remote(fixture);
        assert_eq!(remote.documents("roles").len(), 2);
        assert!(remote.documents("users").is_empty());
    }

    #[test]
    fn malformed_fixture_is_a_readable_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "not json").unwrap();

        let err = load_fixture(&path).unwrap_err().to_string();
        assert!(err.contains("broken.json"));
    }
}
