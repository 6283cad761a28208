// Sat Jan 17 2026 - Alex

use crate::syntax::{SyntaxError, SyntaxNode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declaration stream of one source version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVersion {
    pub label: String,
    /// Header the declarations came from, used by binding emitters.
    #[serde(default)]
    pub header: Option<String>,
    pub nodes: Vec<SyntaxNode>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SourceFile {
    Full {
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        header: Option<String>,
        nodes: Vec<SyntaxNode>,
    },
    Bare(Vec<SyntaxNode>),
}

impl SourceVersion {
    pub fn new(label: &str, nodes: Vec<SyntaxNode>) -> Self {
        Self {
            label: label.to_string(),
            header: None,
            nodes,
        }
    }

    /// Parses either `{ "label", "header", "nodes": [...] }` or a bare node array.
    pub fn from_json(json: &str, default_label: &str) -> Result<Self, serde_json::Error> {
        let file: SourceFile = serde_json::from_str(json)?;
        Ok(match file {
            SourceFile::Full { label, header, nodes } => Self {
                label: label.unwrap_or_else(|| default_label.to_string()),
                header,
                nodes,
            },
            SourceFile::Bare(nodes) => Self::new(default_label, nodes),
        })
    }

    /// Loads a version file; the label defaults to the file stem.
    pub fn load(path: &Path) -> Result<Self, SyntaxError> {
        let text = fs::read_to_string(path).map_err(|source| SyntaxError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "version".to_string());
        let version = Self::from_json(&text, &stem).map_err(|source| SyntaxError::Json {
            path: path.display().to_string(),
            source,
        })?;
        log::debug!("Loaded {} declaration nodes from {}", version.nodes.len(), path.display());
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array_uses_default_label() {
        let json = r#"[{ "kind": "namespace", "name": "ns" }]"#;
        let version = SourceVersion::from_json(json, "v1").unwrap();
        assert_eq!(version.label, "v1");
        assert_eq!(version.nodes.len(), 1);
    }

    #[test]
    fn test_full_form_keeps_header() {
        let json = r#"{ "label": "v2", "header": "for_test.hpp", "nodes": [] }"#;
        let version = SourceVersion::from_json(json, "ignored").unwrap();
        assert_eq!(version.label, "v2");
        assert_eq!(version.header.as_deref(), Some("for_test.hpp"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SourceVersion::load(Path::new("/nonexistent/version.json")).unwrap_err();
        assert!(matches!(err, SyntaxError::Io { .. }));
    }
}
