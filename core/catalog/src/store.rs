use anyhow::Result;
use docs_portal_schemas::ProjectMetadata;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// File-backed store for the project metadata document.
///
/// The backing file holds one JSON object mapping project name to record.
/// Loads never fail: a missing or unparsable file reads as an empty mapping.
/// Saves rewrite the whole document; there is no locking, so concurrent
/// writers race and the last save wins.
pub struct MetadataStore {
    path: PathBuf,
}

impl MetadataStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read the full mapping, treating absence or corruption as empty.
    pub fn load(&self) -> HashMap<String, ProjectMetadata> {
        let data = match fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) => {
                debug!(
                    "metadata store not readable at {}: {}",
                    self.path.display(),
                    e
                );
                return HashMap::new();
            }
        };

        match serde_json::from_str(&data) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(
                    "metadata store at {} is corrupt, starting empty: {}",
                    self.path.display(),
                    e
                );
                HashMap::new()
            }
        }
    }

    /// Overwrite the full mapping, creating the parent directory first.
    pub fn save(&self, metadata: &HashMap<String, ProjectMetadata>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let data = serde_json::to_string_pretty(metadata)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record(name: &str) -> ProjectMetadata {
        ProjectMetadata {
            name: name.to_string(),
            display_name: "Sample".to_string(),
            description: "Sample - Other".to_string(),
            category: "other".to_string(),
            path: format!("/repos/{}", name),
            icon: "Package".to_string(),
            tags: Vec::new(),
            auto_detected: true,
        }
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("absent.json"));

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project-metadata.json");
        fs::write(&path, "{not json").unwrap();

        let store = MetadataStore::new(&path);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_creates_parent_and_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("nested/data/project-metadata.json"));

        let mut metadata = HashMap::new();
        metadata.insert("sample".to_string(), sample_record("sample"));
        store.save(&metadata).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded["sample"], metadata["sample"]);
    }

    #[test]
    fn test_save_overwrites_fully() {
        let dir = TempDir::new().unwrap();
        let store = MetadataStore::new(dir.path().join("project-metadata.json"));

        let mut first = HashMap::new();
        first.insert("a".to_string(), sample_record("a"));
        first.insert("b".to_string(), sample_record("b"));
        store.save(&first).unwrap();

        let mut second = HashMap::new();
        second.insert("a".to_string(), sample_record("a"));
        store.save(&second).unwrap();

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert!(!loaded.contains_key("b"));
    }
}
