use docs_portal_schemas::CategoryDefinition;
use std::sync::OnceLock;

/// Canonical name of the catch-all category.
pub const OTHER_CATEGORY: &str = "other";

/// Icon used when a category is unrecognized.
const FALLBACK_ICON: &str = "Package";

/// The fixed taxonomy, in display order. Built once, validated once.
fn definitions() -> &'static [CategoryDefinition] {
    static TABLE: OnceLock<Vec<CategoryDefinition>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

fn build_table() -> Vec<CategoryDefinition> {
    let table = vec![
        def(
            "documentation",
            "Documentation",
            "Documentation, guides, and knowledge bases",
            &["doc", "docs", "guide", "wiki", "knowledge", "readme", "manual"],
            "BookOpen",
            &["docs", "documentation", "guides", "manuals"],
        ),
        def(
            "backend",
            "Backend Services",
            "Backend APIs, services, and server-side applications",
            &["backend", "api", "server", "service", "worker", "job", "queue"],
            "Server",
            &["backend", "backend-services", "api", "services"],
        ),
        def(
            "frontend",
            "Frontend Applications",
            "Web applications, UIs, and client-side projects",
            &["frontend", "web", "app", "ui", "dashboard", "portal", "site"],
            "Layout",
            &["frontend", "web-app", "webapp", "ui", "website"],
        ),
        def(
            "tools",
            "Developer Tools",
            "CLI tools, utilities, and development aids",
            &["cli", "tool", "util", "helper", "automation", "script"],
            "Wrench",
            &["tools", "utilities", "cli-tools", "dev-tools"],
        ),
        def(
            "infrastructure",
            "Infrastructure",
            "DevOps, deployment, and infrastructure projects",
            &["infra", "deploy", "devops", "ci", "cd", "docker", "k8s"],
            "Cloud",
            &["infrastructure", "infra", "devops", "deployment"],
        ),
        def(
            "workspace",
            "Workspace Configuration",
            "Workspace settings, configurations, and metadata",
            &["workspace", "config", "settings", "meta", "claude"],
            "Folder",
            &["workspace", "workspace-config", "settings"],
        ),
        def(
            "ai-agents",
            "AI & Agents",
            "AI services, agents, and machine learning projects",
            &["ai", "agent", "claude", "gpt", "ml", "llm", "bot"],
            "Bot",
            &["ai", "agents", "ai-agents", "ml"],
        ),
        def(
            "ecommerce",
            "E-Commerce",
            "Online stores, shopping platforms, and retail applications",
            &["store", "shop", "ecommerce", "cart", "product", "retail"],
            "ShoppingCart",
            &["ecommerce", "e-commerce", "store", "shop"],
        ),
        def(
            OTHER_CATEGORY,
            "Other",
            "Miscellaneous projects",
            &[],
            FALLBACK_ICON,
            &["other", "misc", "miscellaneous"],
        ),
    ];

    validate(&table);
    table
}

fn def(
    name: &str,
    display_name: &str,
    description: &str,
    keywords: &[&str],
    icon: &str,
    aliases: &[&str],
) -> CategoryDefinition {
    CategoryDefinition {
        name: name.to_string(),
        display_name: display_name.to_string(),
        description: description.to_string(),
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
        icon: icon.to_string(),
        aliases: aliases.iter().map(|a| a.to_string()).collect(),
    }
}

/// Construction-time invariants: unique names, no alias claimed twice, and
/// the catch-all present exactly once, in last position.
fn validate(table: &[CategoryDefinition]) {
    let mut names = std::collections::HashSet::new();
    let mut aliases = std::collections::HashSet::new();

    for definition in table {
        assert!(
            names.insert(definition.name.clone()),
            "duplicate category name: {}",
            definition.name
        );
        for alias in &definition.aliases {
            assert!(
                aliases.insert(alias.clone()),
                "alias {} claimed by two categories",
                alias
            );
        }
    }

    assert_eq!(
        table.last().map(|d| d.name.as_str()),
        Some(OTHER_CATEGORY),
        "catch-all category must be present and sort last"
    );
    assert!(
        table.last().is_some_and(|d| d.keywords.is_empty()),
        "catch-all category must not take part in keyword scoring"
    );
}

/// All category definitions in display order.
pub fn all_categories() -> &'static [CategoryDefinition] {
    definitions()
}

/// Look up a definition by canonical name.
pub fn category_definition(name: &str) -> Option<&'static CategoryDefinition> {
    definitions().iter().find(|d| d.name == name)
}

/// Map arbitrary input to a canonical category name. Total and idempotent:
/// anything unrecognized collapses to the catch-all.
pub fn normalize_category(input: &str) -> String {
    let normalized = input.trim().to_lowercase();

    for definition in definitions() {
        if definition.name == normalized || definition.aliases.iter().any(|a| *a == normalized) {
            return definition.name.clone();
        }
    }

    OTHER_CATEGORY.to_string()
}

/// Score each category's keywords against `"{name} {path}"` and return the
/// best match. Each keyword counts at most once; ties go to the earlier
/// table entry; a zero score everywhere means the catch-all.
pub fn auto_detect_category(project_name: &str, project_path: &str) -> String {
    let search = format!(
        "{} {}",
        project_name.to_lowercase(),
        project_path.to_lowercase()
    );

    let mut best: Option<(&CategoryDefinition, usize)> = None;
    for definition in definitions() {
        if definition.name == OTHER_CATEGORY {
            continue;
        }
        let score = definition
            .keywords
            .iter()
            .filter(|keyword| search.contains(keyword.as_str()))
            .count();
        if score > 0 && best.map_or(true, |(_, top)| score > top) {
            best = Some((definition, score));
        }
    }

    best.map(|(definition, _)| definition.name.clone())
        .unwrap_or_else(|| OTHER_CATEGORY.to_string())
}

/// `"{TitleCasedName} - {displayName}"`, with a generic fallback when the
/// category is unknown.
pub fn generate_description(project_name: &str, category: &str) -> String {
    let category_name = category_definition(category)
        .map(|d| d.display_name.as_str())
        .unwrap_or("Project");

    format!("{} - {}", title_case(project_name), category_name)
}

/// Icon name for a category, generic when unrecognized.
pub fn category_icon(category: &str) -> String {
    category_definition(category)
        .map(|d| d.icon.clone())
        .unwrap_or_else(|| FALLBACK_ICON.to_string())
}

/// Whether the input maps to a known definition. Always true in practice,
/// since normalization is total.
pub fn is_valid_category(name: &str) -> bool {
    let normalized = normalize_category(name);
    definitions().iter().any(|d| d.name == normalized)
}

/// Convert a kebab-case or snake_case slug to Title Case.
pub fn title_case(name: &str) -> String {
    name.replace(['-', '_'], " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let categories = all_categories();
        assert_eq!(categories.len(), 9);
        assert_eq!(categories[0].name, "documentation");
        assert_eq!(categories.last().unwrap().name, OTHER_CATEGORY);
    }

    #[test]
    fn test_normalize_matches_names_and_aliases() {
        assert_eq!(normalize_category("backend"), "backend");
        assert_eq!(normalize_category("Backend-Services"), "backend");
        assert_eq!(normalize_category("  E-COMMERCE  "), "ecommerce");
        assert_eq!(normalize_category("webapp"), "frontend");
        assert_eq!(normalize_category("misc"), "other");
    }

    #[test]
    fn test_normalize_is_total_and_idempotent() {
        for input in ["", "no-such-category", "BACKEND", "Ünïcode", "docs"] {
            let once = normalize_category(input);
            assert_eq!(normalize_category(&once), once);
            assert!(is_valid_category(&once));
        }
        assert_eq!(normalize_category(""), "other");
        assert_eq!(normalize_category("no-such-category"), "other");
    }

    #[test]
    fn test_auto_detect_backend() {
        assert_eq!(
            auto_detect_category("my-api-server", "/repos/my-api-server"),
            "backend"
        );
    }

    #[test]
    fn test_auto_detect_zero_score_is_other() {
        assert_eq!(auto_detect_category("xyzzy", "/mnt/xyzzy"), OTHER_CATEGORY);
    }

    #[test]
    fn test_auto_detect_ties_break_by_table_order() {
        // "docs" hits documentation ("doc", "docs") twice; "api" hits backend
        // once; documentation wins outright.
        assert_eq!(auto_detect_category("docs-api", "/x"), "documentation");

        // One keyword each for documentation ("doc") and backend ("server"):
        // documentation sits earlier in the table.
        assert_eq!(auto_detect_category("doc-server", "/x"), "documentation");
    }

    #[test]
    fn test_keyword_counts_once_per_keyword() {
        // "api" appears three times but contributes a single point, so the
        // two-keyword frontend match wins.
        assert_eq!(
            auto_detect_category("api-api-api", "/web/ui/api-api-api"),
            "frontend"
        );
    }

    #[test]
    fn test_generate_description() {
        assert_eq!(
            generate_description("wish-backend-x", "backend"),
            "Wish Backend X - Backend Services"
        );
        assert_eq!(
            generate_description("my_tool", "not-a-category"),
            "My Tool - Project"
        );
    }

    #[test]
    fn test_category_icon_fallback() {
        assert_eq!(category_icon("frontend"), "Layout");
        assert_eq!(category_icon("nope"), "Package");
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("doc-automation-hub"), "Doc Automation Hub");
        assert_eq!(title_case("snake_case_name"), "Snake Case Name");
        assert_eq!(title_case("plain"), "Plain");
    }
}
