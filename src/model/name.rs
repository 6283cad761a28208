// Fri Jan 16 2026 - Alex

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Scope segment used for an unnamed namespace.
pub const ANONYMOUS_SEGMENT: &str = "";

const ANONYMOUS_DISPLAY: &str = "(anonymous)";

/// Namespace-qualified identifier of a declaration.
///
/// The identity key of every entity in a [`DeclarationModel`](crate::model::DeclarationModel).
/// Ordering compares segment by segment, so sorted output reads the way the
/// names print.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct QualifiedName {
    scope: Vec<String>,
    name: String,
}

impl QualifiedName {
    pub fn new(scope: Vec<String>, name: impl Into<String>) -> Self {
        Self {
            scope,
            name: name.into(),
        }
    }

    pub fn global(name: impl Into<String>) -> Self {
        Self::new(Vec::new(), name)
    }

    /// Parses `a::b::C`; a leading `::` is ignored.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_start_matches("::");
        let mut segments: Vec<String> = trimmed
            .split("::")
            .map(|s| {
                let s = s.trim();
                if s == ANONYMOUS_DISPLAY {
                    ANONYMOUS_SEGMENT.to_string()
                } else {
                    s.to_string()
                }
            })
            .collect();
        let name = segments.pop().unwrap_or_default();
        Self::new(segments, name)
    }

    pub fn scope(&self) -> &[String] {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.scope
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
    }

    /// This name used as an enclosing scope.
    pub fn as_scope(&self) -> Vec<String> {
        let mut scope = self.scope.clone();
        scope.push(self.name.clone());
        scope
    }

    pub fn child(&self, name: impl Into<String>) -> Self {
        Self::new(self.as_scope(), name)
    }

    pub fn parent(&self) -> Option<Self> {
        let mut scope = self.scope.clone();
        let name = scope.pop()?;
        Some(Self::new(scope, name))
    }

    pub fn depth(&self) -> usize {
        self.scope.len()
    }

    /// True when any enclosing namespace is unnamed.
    pub fn in_anonymous_scope(&self) -> bool {
        self.scope.iter().any(|s| s == ANONYMOUS_SEGMENT)
    }

    pub fn to_path(&self) -> String {
        self.segments()
            .map(|s| if s == ANONYMOUS_SEGMENT { ANONYMOUS_DISPLAY } else { s })
            .collect::<Vec<_>>()
            .join("::")
    }
}

impl Ord for QualifiedName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.segments().cmp(other.segments())
    }
}

impl PartialOrd for QualifiedName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

impl From<String> for QualifiedName {
    fn from(path: String) -> Self {
        Self::parse(&path)
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_path()
    }
}

/// Formats a scope path for diagnostics; the global scope prints as `::`.
pub fn display_scope(scope: &[String]) -> String {
    if scope.is_empty() {
        return "::".to_string();
    }
    scope
        .iter()
        .map(|s| if s == ANONYMOUS_SEGMENT { ANONYMOUS_DISPLAY } else { s.as_str() })
        .collect::<Vec<_>>()
        .join("::")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let name = QualifiedName::parse("::for_test_namespace::inner_namespace::IntType");
        assert_eq!(name.name(), "IntType");
        assert_eq!(name.scope(), &["for_test_namespace".to_string(), "inner_namespace".to_string()]);
        assert_eq!(name.to_string(), "for_test_namespace::inner_namespace::IntType");
    }

    #[test]
    fn test_ordering_follows_segments() {
        let mut names = vec![
            QualifiedName::parse("ns"),
            QualifiedName::parse("a::x"),
            QualifiedName::parse("ns::S1"),
        ];
        names.sort();
        let printed: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        assert_eq!(printed, vec!["a::x", "ns", "ns::S1"]);
    }

    #[test]
    fn test_anonymous_scope() {
        let name = QualifiedName::new(vec!["ns".into(), ANONYMOUS_SEGMENT.into()], "hidden");
        assert!(name.in_anonymous_scope());
        assert_eq!(name.to_string(), "ns::(anonymous)::hidden");
        assert_eq!(QualifiedName::parse(&name.to_string()), name);
    }
}
