pub mod catalog;
pub mod config;
pub mod markdown;
pub mod scanner;
pub mod store;
pub mod taxonomy;

pub use catalog::{CatalogError, ProjectCatalog};
pub use config::PortalConfig;
pub use markdown::{
    extract_readme_preview, parse_markdown_structure, MarkdownParser, DEFAULT_PREVIEW_LIMIT,
};
pub use store::MetadataStore;
pub use taxonomy::{
    all_categories, auto_detect_category, category_definition, category_icon,
    generate_description, is_valid_category, normalize_category,
};
