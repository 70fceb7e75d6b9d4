use docs_portal_schemas::{DocEntryKind, DocTreeNode, KeyDoc, KeyDocKind};
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Directories never descended into: version control, dependencies, and
/// build artifacts. Hidden entries are skipped separately.
const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", ".next", "dist", "build", "target"];

/// Maximum nesting depth for the navigable doc tree.
const MAX_TREE_DEPTH: usize = 5;

/// Number of key docs surfaced per project.
const MAX_KEY_DOCS: usize = 5;

fn is_excluded(name: &str) -> bool {
    name.starts_with('.') || EXCLUDED_DIRS.contains(&name)
}

/// Files surfaced in the navigation tree.
fn is_doc_file(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.ends_with(".md") || lower.ends_with(".txt") || lower.starts_with("readme")
}

fn file_stem_lower(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, _)) => stem.to_lowercase(),
        None => name.to_lowercase(),
    }
}

/// Root-relative path with separators normalized to `/`.
fn relative_display(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Enumerate every markdown file under `root` with an explicit worklist,
/// skipping excluded and hidden entries. Unreadable directories are logged
/// and skipped, never fatal.
pub fn collect_markdown_files(root: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut worklist = vec![root.to_path_buf()];

    while let Some(dir) = worklist.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("skipping unreadable directory {}: {}", dir.display(), e);
                continue;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if is_excluded(&name) {
                continue;
            }

            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(_) => continue,
            };

            if file_type.is_dir() {
                worklist.push(entry.path());
            } else if file_type.is_file() && name.to_ascii_lowercase().ends_with(".md") {
                files.push(entry.path());
            }
        }
    }

    files
}

/// Build the navigable documentation tree for a project root: doc files and
/// the directories that (transitively) contain them, directories first,
/// name-ordered, to a bounded depth.
pub fn build_doc_tree(root: &Path) -> Vec<DocTreeNode> {
    tree_level(root, root, 0)
}

fn tree_level(dir: &Path, base: &Path, depth: usize) -> Vec<DocTreeNode> {
    if depth > MAX_TREE_DEPTH {
        return Vec::new();
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping unreadable directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut nodes = Vec::new();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_excluded(&name) {
            continue;
        }

        let path = entry.path();
        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(_) => continue,
        };

        if file_type.is_dir() {
            let children = tree_level(&path, base, depth + 1);
            // Directories with nothing readable below them are pruned.
            if !children.is_empty() {
                nodes.push(DocTreeNode {
                    relative_path: relative_display(&path, base),
                    path: path.display().to_string(),
                    name,
                    kind: DocEntryKind::Directory,
                    children,
                });
            }
        } else if file_type.is_file() && is_doc_file(&name) {
            nodes.push(DocTreeNode {
                relative_path: relative_display(&path, base),
                path: path.display().to_string(),
                name,
                kind: DocEntryKind::File,
                children: Vec::new(),
            });
        }
    }

    nodes.sort_by(|a, b| match (a.kind, b.kind) {
        (DocEntryKind::Directory, DocEntryKind::File) => Ordering::Less,
        (DocEntryKind::File, DocEntryKind::Directory) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });

    nodes
}

/// Select up to five markdown files worth surfacing prominently, by filename
/// heuristic: a stem of exactly readme/api/config, or one containing
/// getting-started or example.
pub fn select_key_docs(root: &Path, markdown_files: &[PathBuf]) -> Vec<KeyDoc> {
    let mut key_docs = Vec::new();

    for path in markdown_files {
        if key_docs.len() >= MAX_KEY_DOCS {
            break;
        }

        let file_name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };
        let stem = file_stem_lower(&file_name);

        let selected = matches!(stem.as_str(), "readme" | "api" | "config")
            || stem.contains("getting-started")
            || stem.contains("example");
        if !selected {
            continue;
        }

        key_docs.push(KeyDoc {
            title: file_name.replace(['-', '_'], " "),
            path: relative_display(path, root),
            kind: classify_key_doc(&stem),
        });
    }

    key_docs
}

fn classify_key_doc(stem: &str) -> KeyDocKind {
    if stem.contains("api") || stem.contains("endpoint") {
        KeyDocKind::Api
    } else if stem.contains("config") || stem.contains("setup") {
        KeyDocKind::Config
    } else if stem.contains("example") || stem.contains("demo") {
        KeyDocKind::Example
    } else {
        KeyDocKind::Guide
    }
}

/// First root-level file whose stem is `readme`, any casing.
pub fn find_readme(root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;

    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if file_stem_lower(&name) == "readme"
            && entry.file_type().map(|t| t.is_file()).unwrap_or(false)
        {
            return Some(entry.path());
        }
    }

    None
}

/// Join `relative` onto `root` and resolve `.`/`..` lexically, without
/// touching the filesystem. Callers must check the result stays under
/// `root`.
pub fn resolve_under(root: &Path, relative: &str) -> PathBuf {
    let joined = root.join(relative);
    let mut resolved = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::ParentDir => {
                resolved.pop();
            }
            Component::CurDir => {}
            other => resolved.push(other),
        }
    }

    resolved
}
