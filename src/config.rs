use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::category::{ToolEntry, ToolTable};
use crate::util::env_override_usize;

const TOOL_TABLE_ENV: &str = "TOOLSCOPE_TOOL_TABLE";
const PREVIEW_WIDTH_ENV: &str = "TOOLSCOPE_PREVIEW_WIDTH";

const DEFAULT_PREVIEW_WIDTH: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    /// Optional JSON file of extra tool-table entries, merged over the
    /// built-ins at startup.
    pub tool_table_path: Option<PathBuf>,
    /// Cell budget for one-line preview labels.
    pub preview_label_width: usize,
}

impl Config {
    pub fn load() -> Result<Self> {
        let tool_table_path = std::env::var(TOOL_TABLE_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            tool_table_path,
            preview_label_width: env_override_usize(
                PREVIEW_WIDTH_ENV,
                DEFAULT_PREVIEW_WIDTH,
                16,
                256,
            ),
        })
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(path) = &self.tool_table_path {
            if !path.is_file() {
                bail!(
                    "Tool table file '{}' from {TOOL_TABLE_ENV} does not exist",
                    path.display()
                );
            }
        }
        Ok(())
    }

    /// Built-in table plus the entries of the override file, if configured.
    /// File entries shadow built-ins of the same name.
    pub fn load_tool_table(&self) -> Result<ToolTable> {
        let mut table = ToolTable::builtin();
        if let Some(path) = &self.tool_table_path {
            let raw = std::fs::read_to_string(path)?;
            let entries: Vec<ToolEntry> = serde_json::from_str(&raw)?;
            for entry in entries {
                table.insert(entry);
            }
        }
        Ok(table)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_table_path: None,
            preview_label_width: DEFAULT_PREVIEW_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Category;
    use std::io::Write;

    #[test]
    fn test_load_defaults_without_env() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::remove_var(TOOL_TABLE_ENV);
        std::env::remove_var(PREVIEW_WIDTH_ENV);

        let config = Config::load().expect("load");
        assert_eq!(config.tool_table_path, None);
        assert_eq!(config.preview_label_width, DEFAULT_PREVIEW_WIDTH);
        config.validate().expect("valid");
    }

    #[test]
    fn test_preview_width_override_is_clamped() {
        let _env_lock = crate::test_support::ENV_LOCK.blocking_lock();
        std::env::set_var(PREVIEW_WIDTH_ENV, "4");
        let config = Config::load().expect("load");
        assert_eq!(config.preview_label_width, 16);
        std::env::remove_var(PREVIEW_WIDTH_ENV);
    }

    #[test]
    fn test_validate_rejects_missing_table_file() {
        let config = Config {
            tool_table_path: Some(PathBuf::from("/nonexistent/tools.json")),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_tool_table_file_merges_over_builtins() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"[
                {{"name": "deploy_service", "category": "command",
                  "display_name": "Deploy Service", "primary_parameter": "command"}},
                {{"name": "read_file", "category": "file_op",
                  "display_name": "Open File"}}
            ]"#
        )
        .expect("write table");

        let config = Config {
            tool_table_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        config.validate().expect("file exists");
        let table = config.load_tool_table().expect("table");

        assert_eq!(table.classify("deploy_service"), Category::Command);
        assert_eq!(table.display_name_for("deploy_service"), "Deploy Service");
        // Shadowed built-in.
        assert_eq!(table.display_name_for("read_file"), "Open File");
        // Untouched built-in survives the merge.
        assert_eq!(table.classify("web_search"), Category::Web);
    }

    #[test]
    fn test_tool_table_file_with_bad_json_fails_loudly() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "not json").expect("write");

        let config = Config {
            tool_table_path: Some(file.path().to_path_buf()),
            ..Config::default()
        };
        assert!(config.load_tool_table().is_err());
    }
}
