use serde::{Deserialize, Serialize};

// ============================================================================
// Category Schema
// ============================================================================

/// One entry in the fixed category taxonomy.
///
/// The table itself lives in the catalog crate; these records are what the
/// API hands out alongside grouped projects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDefinition {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub icon: String,
    pub aliases: Vec<String>,
}

// ============================================================================
// Project Metadata Schema
// ============================================================================

/// Persisted per-project record, keyed by `name` in the metadata document.
///
/// Field casing matches the on-disk JSON document, which the viewer also
/// consumes directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    pub name: String,
    pub display_name: String,
    pub description: String,
    pub category: String,
    pub path: String,
    pub icon: String,
    pub tags: Vec<String>,
    pub auto_detected: bool,
}

/// Partial update merged over an existing record.
///
/// The project name is the map key and cannot be changed through an update;
/// `auto_detected` is always forced to false by the catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadataUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub tags: Option<Vec<String>>,
}

// ============================================================================
// Parsed Markdown Schema
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// ATX nesting level, 1..=6.
    pub level: u8,
    pub text: String,
    /// URL-safe slug derived from the heading text.
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

/// Structural summary of a markdown document. Recomputed on every parse,
/// never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMarkdown {
    pub headings: Vec<Heading>,
    pub sections: Vec<Section>,
    pub code_blocks: Vec<CodeBlock>,
    pub install_commands: Vec<String>,
}

// ============================================================================
// Project Stats & Key Docs
// ============================================================================

/// Filesystem-derived statistics, computed per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStats {
    pub total_docs: usize,
    /// Date-only ISO 8601 (`YYYY-MM-DD`).
    pub last_updated: String,
    pub components: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyDocKind {
    #[serde(rename = "api")]
    Api,
    #[serde(rename = "config")]
    Config,
    #[serde(rename = "example")]
    Example,
    #[serde(rename = "guide")]
    Guide,
}

impl KeyDocKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyDocKind::Api => "api",
            KeyDocKind::Config => "config",
            KeyDocKind::Example => "example",
            KeyDocKind::Guide => "guide",
        }
    }
}

/// A documentation file singled out for prominent display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDoc {
    pub title: String,
    /// Root-relative path with `/` separators.
    pub path: String,
    #[serde(rename = "type")]
    pub kind: KeyDocKind,
}

// ============================================================================
// Doc Tree Schema
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocEntryKind {
    #[serde(rename = "file")]
    File,
    #[serde(rename = "directory")]
    Directory,
}

impl DocEntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocEntryKind::File => "file",
            DocEntryKind::Directory => "directory",
        }
    }
}

/// Node in the navigable documentation tree for a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTreeNode {
    pub name: String,
    pub path: String,
    pub relative_path: String,
    #[serde(rename = "type")]
    pub kind: DocEntryKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocTreeNode>,
}

// ============================================================================
// Project Overview (detail view payload)
// ============================================================================

/// Rich per-project record assembled for the project detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOverview {
    #[serde(flatten)]
    pub metadata: ProjectMetadata,
    pub stats: ProjectStats,
    pub readme_preview: String,
    pub readme_structure: ParsedMarkdown,
    pub key_docs: Vec<KeyDoc>,
}

/// Projects of one category, paired with the category's definition.
/// Groups are emitted in taxonomy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub definition: CategoryDefinition,
    pub projects: Vec<ProjectMetadata>,
}
