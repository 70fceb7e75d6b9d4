use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the persisted metadata document inside the data directory.
const METADATA_FILE: &str = "project-metadata.json";

/// Which projects the portal serves and where it keeps its state.
///
/// The roots file is the single source of truth for project paths: a JSON
/// object mapping project name to absolute root directory.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub data_dir: PathBuf,
    pub project_roots: BTreeMap<String, String>,
}

impl PortalConfig {
    /// Load the roots file. A broken or missing configuration is a startup
    /// failure, not something to limp past.
    pub fn load(data_dir: PathBuf, roots_file: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(roots_file).with_context(|| {
            format!("failed to read project roots file {}", roots_file.display())
        })?;

        let project_roots: BTreeMap<String, String> = serde_json::from_str(&data)
            .with_context(|| format!("invalid project roots file {}", roots_file.display()))?;

        info!(
            "serving {} projects from {}",
            project_roots.len(),
            roots_file.display()
        );

        Ok(Self {
            data_dir,
            project_roots,
        })
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join(METADATA_FILE)
    }

    pub fn root_for(&self, project_name: &str) -> Option<&str> {
        self.project_roots.get(project_name).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_roots_file() {
        let dir = TempDir::new().unwrap();
        let roots_path = dir.path().join("project-roots.json");
        std::fs::write(
            &roots_path,
            r#"{"wish-x": "/srv/wish-x", "user-docs": "/srv/user-docs"}"#,
        )
        .unwrap();

        let config = PortalConfig::load(dir.path().join("data"), &roots_path).unwrap();
        assert_eq!(config.project_roots.len(), 2);
        assert_eq!(config.root_for("wish-x"), Some("/srv/wish-x"));
        assert_eq!(config.root_for("unknown"), None);
        assert!(config.store_path().ends_with("project-metadata.json"));
    }

    #[test]
    fn test_missing_or_invalid_roots_file_fails() {
        let dir = TempDir::new().unwrap();

        assert!(PortalConfig::load(dir.path().into(), &dir.path().join("absent.json")).is_err());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[1, 2, 3]").unwrap();
        assert!(PortalConfig::load(dir.path().into(), &bad).is_err());
    }
}
