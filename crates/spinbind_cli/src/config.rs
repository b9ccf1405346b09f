//! Widget description files
//!
//! A description file holds the props of one widget and, optionally, a
//! default simulation script:
//!
//! ```toml
//! steps = ["up", "input=12", "free"]
//!
//! [widget]
//! value = 10
//! max = 20
//! renderer = "bootstrap5"
//! ```
//!
//! Files ending in `.json` are read as JSON, everything else as TOML.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spinbind_binding::SpinProps;
use std::fs;
use std::path::Path;

/// Contents of a widget description file
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SpinbindFile {
    #[serde(default)]
    pub widget: SpinProps,
    /// Simulation steps used when none are given on the command line
    #[serde(default)]
    pub steps: Vec<String>,
}

impl SpinbindFile {
    /// Load a description file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, is_json(path))
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    fn parse(content: &str, json: bool) -> Result<Self> {
        let file = if json {
            serde_json::from_str(content)?
        } else {
            toml::from_str(content)?
        };
        Ok(file)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use spinbind_core::Renderer;

    #[test]
    fn test_parse_toml() {
        let file = SpinbindFile::parse(
            r#"
            steps = ["up", "down"]

            [widget]
            value = 10
            suffix = "%"
            renderer = "bootstrap5"
            "#,
            false,
        )
        .unwrap();
        assert_eq!(file.steps, vec!["up", "down"]);
        assert_eq!(file.widget.value, Some(10.0));
        assert_eq!(file.widget.renderer, Renderer::Bootstrap5);
    }

    #[test]
    fn test_parse_json() {
        let file = SpinbindFile::parse(r#"{"widget": {"defaultValue": 3}}"#, true).unwrap();
        assert_eq!(file.widget.default_value, Some(3.0));
        assert!(file.steps.is_empty());
    }

    #[test]
    fn test_extension_detection() {
        assert!(is_json(Path::new("widget.JSON")));
        assert!(!is_json(Path::new("widget.toml")));
        assert!(!is_json(Path::new("widget")));
    }
}
