use chrono::{DateTime, Utc};
use docs_portal_schemas::{
    CategoryGroup, DocTreeNode, KeyDocKind, ParsedMarkdown, ProjectMetadata,
    ProjectMetadataUpdate, ProjectOverview, ProjectStats,
};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::markdown::{MarkdownParser, DEFAULT_PREVIEW_LIMIT};
use crate::scanner;
use crate::store::MetadataStore;
use crate::taxonomy;

/// Failures surfaced to callers. Everything else in the catalog degrades to
/// defaults with a log line.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("project {0} not found")]
    NotFound(String),

    #[error("path {0} escapes the project root")]
    AccessDenied(String),

    #[error("failed to persist metadata")]
    Storage(#[source] anyhow::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Orchestrates the classifier, parser, scanner, and store into the
/// project-facing operations.
pub struct ProjectCatalog {
    store: MetadataStore,
    parser: MarkdownParser,
}

impl ProjectCatalog {
    pub fn new(store: MetadataStore) -> Self {
        Self {
            store,
            parser: MarkdownParser::new(),
        }
    }

    /// Fetch the stored record for a project, creating one by auto-detection
    /// on first sight. Stored categories are re-normalized on the way out in
    /// case the taxonomy moved underneath them.
    pub fn get_or_create(
        &self,
        project_name: &str,
        project_path: &str,
    ) -> Result<ProjectMetadata, CatalogError> {
        let mut all = self.store.load();

        if let Some(existing) = all.get(project_name) {
            let mut record = existing.clone();
            record.category = taxonomy::normalize_category(&record.category);
            return Ok(record);
        }

        let category = taxonomy::auto_detect_category(project_name, project_path);
        let description = taxonomy::generate_description(project_name, &category);
        let icon = taxonomy::category_icon(&category);

        let metadata = ProjectMetadata {
            name: project_name.to_string(),
            display_name: taxonomy::title_case(project_name),
            description,
            category,
            path: project_path.to_string(),
            icon,
            tags: Vec::new(),
            auto_detected: true,
        };

        info!(
            "registered project {} under category {}",
            project_name, metadata.category
        );

        all.insert(project_name.to_string(), metadata.clone());
        self.store.save(&all).map_err(CatalogError::Storage)?;

        Ok(metadata)
    }

    /// Merge an explicit update over an existing record. The project must
    /// already be known; this is the one absence that propagates as an
    /// error.
    pub fn update(
        &self,
        project_name: &str,
        updates: ProjectMetadataUpdate,
    ) -> Result<ProjectMetadata, CatalogError> {
        let mut all = self.store.load();

        let mut record = all
            .get(project_name)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(project_name.to_string()))?;

        if let Some(display_name) = updates.display_name {
            record.display_name = display_name;
        }
        if let Some(description) = updates.description {
            record.description = description;
        }
        if let Some(category) = updates.category {
            record.category = taxonomy::normalize_category(&category);
        }
        if let Some(path) = updates.path {
            record.path = path;
        }
        if let Some(icon) = updates.icon {
            record.icon = icon;
        }
        if let Some(tags) = updates.tags {
            record.tags = tags;
        }
        record.auto_detected = false;

        all.insert(project_name.to_string(), record.clone());
        self.store.save(&all).map_err(CatalogError::Storage)?;

        Ok(record)
    }

    /// Resolve every configured root and bucket the records by category.
    /// Empty buckets are dropped; groups come out in taxonomy order with
    /// projects sorted by display name.
    pub fn group_by_category(
        &self,
        project_roots: &BTreeMap<String, String>,
    ) -> Result<Vec<CategoryGroup>, CatalogError> {
        let mut buckets: HashMap<String, Vec<ProjectMetadata>> = HashMap::new();

        for (name, path) in project_roots {
            let metadata = self.get_or_create(name, path)?;
            buckets
                .entry(metadata.category.clone())
                .or_default()
                .push(metadata);
        }

        let mut groups = Vec::new();
        for definition in taxonomy::all_categories() {
            if let Some(mut projects) = buckets.remove(&definition.name) {
                projects.sort_by(|a, b| {
                    a.display_name
                        .to_lowercase()
                        .cmp(&b.display_name.to_lowercase())
                });
                groups.push(CategoryGroup {
                    definition: definition.clone(),
                    projects,
                });
            }
        }

        Ok(groups)
    }

    /// Assemble the rich per-project record for the detail view: metadata
    /// plus filesystem stats, README summary, and key docs.
    pub fn overview(
        &self,
        project_name: &str,
        project_path: &str,
    ) -> Result<ProjectOverview, CatalogError> {
        let metadata = self.get_or_create(project_name, project_path)?;
        let root = Path::new(project_path);

        let markdown_files = scanner::collect_markdown_files(root);
        let key_docs = scanner::select_key_docs(root, &markdown_files);
        let components = key_docs
            .iter()
            .filter(|doc| matches!(doc.kind, KeyDocKind::Api | KeyDocKind::Config))
            .count();

        let (readme_preview, readme_structure) = match scanner::find_readme(root) {
            Some(readme_path) => match fs::read_to_string(&readme_path) {
                Ok(text) => (
                    self.parser.extract_preview(&text, DEFAULT_PREVIEW_LIMIT),
                    self.parser.parse(&text),
                ),
                Err(e) => {
                    warn!("failed to read {}: {}", readme_path.display(), e);
                    (String::new(), ParsedMarkdown::default())
                }
            },
            None => {
                debug!("no README found under {}", project_path);
                (String::new(), ParsedMarkdown::default())
            }
        };

        Ok(ProjectOverview {
            metadata,
            stats: ProjectStats {
                total_docs: markdown_files.len(),
                last_updated: directory_modified_date(root),
                components,
            },
            readme_preview,
            readme_structure,
            key_docs,
        })
    }

    /// Navigable doc tree for a project root.
    pub fn doc_tree(&self, project_path: &str) -> Vec<DocTreeNode> {
        scanner::build_doc_tree(Path::new(project_path))
    }

    /// Read a documentation file, refusing relative paths that escape the
    /// project root.
    pub fn read_content(
        &self,
        project_path: &str,
        relative: &str,
    ) -> Result<String, CatalogError> {
        let root = Path::new(project_path);
        let resolved = scanner::resolve_under(root, relative);

        if !resolved.starts_with(root) {
            return Err(CatalogError::AccessDenied(relative.to_string()));
        }

        Ok(fs::read_to_string(&resolved)?)
    }
}

/// Modification time of a directory as a date-only ISO 8601 string, today
/// when the metadata is unavailable.
fn directory_modified_date(path: &Path) -> String {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => DateTime::<Utc>::from(modified).format("%Y-%m-%d").to_string(),
        Err(e) => {
            warn!("failed to stat {}: {}", path.display(), e);
            Utc::now().format("%Y-%m-%d").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn catalog_in(dir: &TempDir) -> ProjectCatalog {
        ProjectCatalog::new(MetadataStore::new(dir.path().join("project-metadata.json")))
    }

    #[test]
    fn test_get_or_create_is_stable_across_calls() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        let first = catalog
            .get_or_create("my-api-server", "/repos/my-api-server")
            .unwrap();
        assert_eq!(first.category, "backend");
        assert_eq!(first.display_name, "My Api Server");
        assert!(first.auto_detected);

        let second = catalog
            .get_or_create("my-api-server", "/repos/my-api-server")
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_stored_category_renormalized_on_read() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        catalog.get_or_create("legacy", "/repos/legacy").unwrap();

        // Simulate a record written before the taxonomy settled.
        let store = MetadataStore::new(dir.path().join("project-metadata.json"));
        let mut all = store.load();
        all.get_mut("legacy").unwrap().category = "Backend-Services".to_string();
        store.save(&all).unwrap();

        let record = catalog.get_or_create("legacy", "/repos/legacy").unwrap();
        assert_eq!(record.category, "backend");
    }

    #[test]
    fn test_update_unknown_project_is_not_found() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        let err = catalog
            .update("ghost", ProjectMetadataUpdate::default())
            .unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_update_merges_and_clears_auto_detected() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        catalog.get_or_create("wish-x", "/repos/wish-x").unwrap();

        let updated = catalog
            .update(
                "wish-x",
                ProjectMetadataUpdate {
                    category: Some("E-Commerce".to_string()),
                    tags: Some(vec!["storefront".to_string()]),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.category, "ecommerce");
        assert_eq!(updated.tags, vec!["storefront".to_string()]);
        assert!(!updated.auto_detected);

        // The merge persisted, and a later read does not re-detect.
        let reread = catalog.get_or_create("wish-x", "/repos/wish-x").unwrap();
        assert_eq!(reread, updated);
    }

    #[test]
    fn test_group_by_category_order_and_sorting() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        let mut roots = BTreeMap::new();
        roots.insert("zeta-api".to_string(), "/repos/zeta-api".to_string());
        roots.insert("alpha-server".to_string(), "/repos/alpha-server".to_string());
        roots.insert("user-docs".to_string(), "/repos/user-docs".to_string());

        let groups = catalog.group_by_category(&roots).unwrap();

        // Taxonomy order: documentation before backend; no empty groups.
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].definition.name, "documentation");
        assert_eq!(groups[1].definition.name, "backend");

        let backend_names: Vec<&str> = groups[1]
            .projects
            .iter()
            .map(|p| p.display_name.as_str())
            .collect();
        assert_eq!(backend_names, vec!["Alpha Server", "Zeta Api"]);
    }

    #[test]
    fn test_overview_for_missing_root_degrades() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        let overview = catalog
            .overview("phantom-docs", "/definitely/not/here")
            .unwrap();

        assert_eq!(overview.stats.total_docs, 0);
        assert_eq!(overview.stats.components, 0);
        assert!(overview.readme_preview.is_empty());
        assert!(overview.key_docs.is_empty());
    }

    #[test]
    fn test_read_content_rejects_escape() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog_in(&dir);

        std::fs::write(dir.path().join("README.md"), "# hello").unwrap();

        let ok = catalog
            .read_content(dir.path().to_str().unwrap(), "README.md")
            .unwrap();
        assert_eq!(ok, "# hello");

        let err = catalog
            .read_content(dir.path().to_str().unwrap(), "../../etc/passwd")
            .unwrap_err();
        assert!(matches!(err, CatalogError::AccessDenied(_)));
    }
}
