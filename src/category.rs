//! Tool-name classification and preview formatting. The mapping from raw
//! names to categories and primary parameters is data, not code: adding a
//! tool means adding a table entry (built in, or merged from the startup
//! override file in `config`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::{Parameter, ToolInvocation};
use crate::util::{clip_to_width, first_line};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    FileOp,
    Command,
    Browser,
    Web,
    Other,
    Unknown,
}

/// Per-category fallback order for picking the preview parameter when the
/// table entry does not name one. The `Other` list is a fixed priority of
/// common names; first present wins even when several candidates coexist.
fn fallback_candidates(category: Category) -> &'static [&'static str] {
    match category {
        Category::FileOp => &["file_contents", "code_edit", "path"],
        Category::Command => &["command"],
        Category::Browser => &["url", "action", "instruction"],
        Category::Web => &["query", "url"],
        Category::Other => &["text", "content", "data", "input", "query"],
        Category::Unknown => &[],
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolEntry {
    pub name: String,
    pub category: Category,
    pub display_name: String,
    /// Parameter holding the tool's primary content, when one specific to
    /// this tool exists. Absent → the category fallback list applies.
    #[serde(default)]
    pub primary_parameter: Option<String>,
}

pub struct ToolTable {
    entries: HashMap<String, ToolEntry>,
}

impl ToolTable {
    pub fn builtin() -> Self {
        let mut table = Self {
            entries: HashMap::new(),
        };
        for &(name, category, display_name, primary) in BUILTIN_TOOLS {
            table.insert(ToolEntry {
                name: name.to_string(),
                category,
                display_name: display_name.to_string(),
                primary_parameter: primary.map(str::to_string),
            });
        }
        table
    }

    /// Insert or replace one entry. Later inserts win, so override files can
    /// shadow built-ins.
    pub fn insert(&mut self, entry: ToolEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-match lookup; names outside the table are `Unknown`, never an
    /// error.
    pub fn classify(&self, raw_name: &str) -> Category {
        self.entries
            .get(raw_name)
            .map(|entry| entry.category)
            .unwrap_or(Category::Unknown)
    }

    pub fn display_name_for(&self, raw_name: &str) -> String {
        self.entries
            .get(raw_name)
            .map(|entry| entry.display_name.clone())
            .unwrap_or_else(|| prettify_tool_name(raw_name))
    }

    /// Index of the parameter to treat as primary content, if any. Unknown
    /// tools never get one: they are shown as a static label only.
    pub fn primary_parameter_index(
        &self,
        raw_name: &str,
        parameters: &[Parameter],
    ) -> Option<usize> {
        let category = self.classify(raw_name);
        if category == Category::Unknown {
            return None;
        }

        if let Some(primary) = self
            .entries
            .get(raw_name)
            .and_then(|entry| entry.primary_parameter.as_deref())
        {
            if let Some(index) = parameters.iter().position(|p| p.name == primary) {
                return Some(index);
            }
        }

        for candidate in fallback_candidates(category) {
            if let Some(index) = parameters.iter().position(|p| p.name == *candidate) {
                return Some(index);
            }
        }
        None
    }
}

impl Default for ToolTable {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN_TOOLS: &[(&str, Category, &str, Option<&str>)] = &[
    ("create_file", Category::FileOp, "Create File", Some("file_contents")),
    ("write_file", Category::FileOp, "Write File", Some("file_contents")),
    ("edit_file", Category::FileOp, "Edit File", Some("code_edit")),
    ("read_file", Category::FileOp, "Read File", Some("path")),
    ("delete_file", Category::FileOp, "Delete File", Some("path")),
    ("rename_file", Category::FileOp, "Rename File", Some("new_path")),
    ("run_command", Category::Command, "Run Command", Some("command")),
    ("run_terminal_cmd", Category::Command, "Run Terminal Command", Some("command")),
    ("browser_action", Category::Browser, "Browser Action", None),
    ("navigate_browser", Category::Browser, "Navigate Browser", None),
    ("web_search", Category::Web, "Web Search", None),
    ("crawl_page", Category::Web, "Crawl Page", None),
    ("todo_write", Category::Other, "Update Todos", None),
    ("think", Category::Other, "Thinking", None),
];

/// "web_search" -> "Web Search"; used for names outside the table.
pub fn prettify_tool_name(raw_name: &str) -> String {
    raw_name
        .split(|ch| ch == '_' || ch == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(head) => head.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short one-line label for an invocation: display name plus the clipped
/// first line of its primary content, when present.
pub fn preview_label(invocation: &ToolInvocation, max_width: usize) -> String {
    let primary_line = invocation
        .primary_parameter
        .as_ref()
        .map(|p| first_line(p.value.trim()))
        .filter(|line| !line.is_empty());

    match primary_line {
        Some(line) => clip_to_width(&format!("{}: {line}", invocation.display_name), max_width),
        None => clip_to_width(&invocation.display_name, max_width),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_builtin_tools() {
        let table = ToolTable::builtin();
        assert_eq!(table.classify("edit_file"), Category::FileOp);
        assert_eq!(table.classify("run_command"), Category::Command);
        assert_eq!(table.classify("browser_action"), Category::Browser);
        assert_eq!(table.classify("web_search"), Category::Web);
        assert_eq!(table.classify("think"), Category::Other);
    }

    #[test]
    fn test_classify_unknown_never_errors() {
        let table = ToolTable::builtin();
        assert_eq!(table.classify("totally_new_tool"), Category::Unknown);
        assert_eq!(table.classify(""), Category::Unknown);
    }

    #[test]
    fn test_display_name_prettifies_unknown_tools() {
        let table = ToolTable::builtin();
        assert_eq!(table.display_name_for("edit_file"), "Edit File");
        assert_eq!(table.display_name_for("fetch-rss_feed"), "Fetch Rss Feed");
    }

    #[test]
    fn test_primary_parameter_prefers_the_tool_entry() {
        let table = ToolTable::builtin();
        let parameters = vec![
            Parameter::new("path", "src/lib.rs", true),
            Parameter::new("code_edit", "fn main() {}", true),
        ];
        // edit_file names code_edit even though path is a category candidate.
        assert_eq!(
            table.primary_parameter_index("edit_file", &parameters),
            Some(1)
        );
    }

    #[test]
    fn test_primary_parameter_category_fallback_order() {
        let table = ToolTable::builtin();
        let parameters = vec![
            Parameter::new("max_results", "10", true),
            Parameter::new("url", "https://example.com", true),
            Parameter::new("query", "rust streaming", true),
        ];
        // Web order is query before url, regardless of buffer order.
        assert_eq!(
            table.primary_parameter_index("web_search", &parameters),
            Some(2)
        );
    }

    #[test]
    fn test_unknown_tools_never_pick_a_primary_parameter() {
        let table = ToolTable::builtin();
        let parameters = vec![Parameter::new("command", "rm -rf /", true)];
        assert_eq!(
            table.primary_parameter_index("mystery_tool", &parameters),
            None
        );
    }

    #[test]
    fn test_insert_overrides_builtin_entry() {
        let mut table = ToolTable::builtin();
        table.insert(ToolEntry {
            name: "read_file".to_string(),
            category: Category::FileOp,
            display_name: "Open File".to_string(),
            primary_parameter: Some("path".to_string()),
        });
        assert_eq!(table.display_name_for("read_file"), "Open File");
    }

    #[test]
    fn test_preview_label_uses_first_line_of_primary() {
        let invocation = ToolInvocation {
            raw_name: "run_command".to_string(),
            display_name: "Run Command".to_string(),
            category: Category::Command,
            parameters: vec![Parameter::new("command", "ls -la\ngit status", false)],
            primary_parameter: Some(Parameter::new("command", "ls -la\ngit status", false)),
            complete: false,
        };
        assert_eq!(preview_label(&invocation, 64), "Run Command: ls -la");
        assert_eq!(preview_label(&invocation, 16), "Run Command: ls…");
    }

    #[test]
    fn test_preview_label_without_primary_is_just_the_display_name() {
        let invocation = ToolInvocation {
            raw_name: "mystery_tool".to_string(),
            display_name: "Mystery Tool".to_string(),
            category: Category::Unknown,
            parameters: Vec::new(),
            primary_parameter: None,
            complete: true,
        };
        assert_eq!(preview_label(&invocation, 64), "Mystery Tool");
    }
}
