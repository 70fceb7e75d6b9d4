use docs_portal_schemas::{CodeBlock, Heading, ParsedMarkdown, Section};
use regex::Regex;
use tracing::debug;

/// Default character limit for README previews.
pub const DEFAULT_PREVIEW_LIMIT: usize = 300;

/// Fenced-block languages scanned for install commands.
const SHELL_LANGUAGES: &[&str] = &["bash", "sh", "shell"];

/// Line-oriented structural parser for markdown documents.
///
/// Accepts any text and degrades gracefully: malformed input produces
/// progressively emptier output, never an error.
pub struct MarkdownParser {
    heading_re: Regex,
    fence_open_re: Regex,
    install_re: Regex,
    fence_strip_re: Regex,
    heading_strip_re: Regex,
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownParser {
    pub fn new() -> Self {
        Self {
            heading_re: Regex::new(r"^(#{1,6})\s+(.+)$").unwrap(),
            fence_open_re: Regex::new(r"^```(\w*)$").unwrap(),
            install_re: Regex::new(r"^\s*(npm|yarn|pnpm|pip|cargo|composer|gem|go get)\s+")
                .unwrap(),
            fence_strip_re: Regex::new(r"(?s)```.*?```").unwrap(),
            heading_strip_re: Regex::new(r"(?m)^#{1,6}\s+.+$").unwrap(),
        }
    }

    /// Extract headings, sections, code blocks, and install commands in a
    /// single pass over the lines.
    pub fn parse(&self, markdown: &str) -> ParsedMarkdown {
        let mut headings = Vec::new();
        let mut sections = Vec::new();
        let mut code_blocks = Vec::new();
        let mut install_commands: Vec<String> = Vec::new();

        let mut section_title = String::new();
        let mut section_content = String::new();
        let mut in_code_block = false;
        let mut block_language = String::new();
        let mut block_code = String::new();

        for line in markdown.lines() {
            if in_code_block {
                // Only a bare closing fence ends the block; anything else,
                // headings included, is code content. Nesting is not
                // supported.
                if line == "```" {
                    in_code_block = false;
                    if SHELL_LANGUAGES.contains(&block_language.as_str()) {
                        collect_install_commands(
                            &self.install_re,
                            &block_code,
                            &mut install_commands,
                        );
                    }
                    code_blocks.push(CodeBlock {
                        language: std::mem::take(&mut block_language),
                        code: std::mem::take(&mut block_code),
                    });
                } else {
                    if !block_code.is_empty() {
                        block_code.push('\n');
                    }
                    block_code.push_str(line);
                }
                continue;
            }

            if let Some(caps) = self.heading_re.captures(line) {
                let level = caps[1].len() as u8;
                let text = caps[2].trim().to_string();

                headings.push(Heading {
                    level,
                    text: text.clone(),
                    id: slugify(&text),
                });

                // A section survives only with both a title and content.
                if !section_title.is_empty() && !section_content.trim().is_empty() {
                    sections.push(Section {
                        title: std::mem::take(&mut section_title),
                        content: std::mem::take(&mut section_content),
                    });
                } else {
                    section_content.clear();
                }
                section_title = text;
                continue;
            }

            if let Some(caps) = self.fence_open_re.captures(line) {
                in_code_block = true;
                block_language = if caps[1].is_empty() {
                    "text".to_string()
                } else {
                    caps[1].to_string()
                };
                block_code.clear();
                continue;
            }

            if !section_content.is_empty() {
                section_content.push('\n');
            }
            section_content.push_str(line);
        }

        if in_code_block {
            // Lenient parsing: an unterminated fence is never flushed.
            debug!(
                "dropping unterminated {} fence ({} chars)",
                block_language,
                block_code.len()
            );
        }

        if !section_title.is_empty() && !section_content.trim().is_empty() {
            sections.push(Section {
                title: section_title,
                content: section_content,
            });
        }

        ParsedMarkdown {
            headings,
            sections,
            code_blocks,
            install_commands,
        }
    }

    /// Pull the first meaningful paragraph out of a README, skipping code
    /// blocks and headings, truncated to `limit` characters.
    pub fn extract_preview(&self, markdown: &str, limit: usize) -> String {
        let without_code = self.fence_strip_re.replace_all(markdown, "");
        let without_headings = self.heading_strip_re.replace_all(&without_code, "");

        let preview = without_headings
            .split("\n\n")
            .map(str::trim)
            .find(|p| p.len() > 20)
            .map(str::to_string)
            .unwrap_or_else(|| char_prefix(&without_headings, limit));

        let truncated = preview.chars().count() > limit;
        let mut out = char_prefix(&preview, limit).trim().to_string();
        if truncated {
            out.push_str("...");
        }
        out
    }
}

/// Parse markdown into its structural summary with a one-off parser.
pub fn parse_markdown_structure(markdown: &str) -> ParsedMarkdown {
    MarkdownParser::new().parse(markdown)
}

/// Extract a README preview with a one-off parser.
pub fn extract_readme_preview(markdown: &str, limit: usize) -> String {
    MarkdownParser::new().extract_preview(markdown, limit)
}

fn collect_install_commands(install_re: &Regex, code: &str, commands: &mut Vec<String>) {
    for line in code.lines() {
        if install_re.is_match(line) {
            let command = line.trim().to_string();
            if !commands.contains(&command) {
                commands.push(command);
            }
        }
    }
}

/// Lowercase, strip everything but word characters, whitespace, and hyphens,
/// then collapse whitespace runs to single hyphens.
fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

fn char_prefix(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
