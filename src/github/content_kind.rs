// src/github/content_kind.rs
// =============================================================================
// Maps file extensions to the language tag used on the fenced code block.
//
// The table is closed: an extension that isn't listed gives None, which
// callers render as an untagged block. Matching is exact and case sensitive
// ("R" is R, "r" is unknown).
// =============================================================================

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    JavaScript,
    TypeScript,
    Html,
    Php,
    Markdown,
    Notebook,
    Julia,
    R,
    Python,
    Yaml,
    Dockerfile,
}

// (extension, kind) pairs recognised on import
const EXTENSIONS: &[(&str, ContentKind)] = &[
    ("js", ContentKind::JavaScript),
    ("ts", ContentKind::TypeScript),
    ("tsx", ContentKind::TypeScript),
    ("html", ContentKind::Html),
    ("php", ContentKind::Php),
    ("md", ContentKind::Markdown),
    ("ipynb", ContentKind::Notebook),
    ("jl", ContentKind::Julia),
    ("R", ContentKind::R),
    ("py", ContentKind::Python),
    ("yml", ContentKind::Yaml),
    ("dockerfile", ContentKind::Dockerfile),
];

impl ContentKind {
    pub fn from_extension(ext: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, kind)| *kind)
    }

    /// Language tag written after the opening ``` of a code block.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::JavaScript => "js",
            ContentKind::TypeScript => "typescript",
            ContentKind::Html => "html",
            ContentKind::Php => "php",
            ContentKind::Markdown => "markdown",
            ContentKind::Notebook => "ipynb",
            ContentKind::Julia => "julia",
            ContentKind::R => "R",
            ContentKind::Python => "python",
            ContentKind::Yaml => "yaml",
            ContentKind::Dockerfile => "dockerfile",
        }
    }
}

impl Serialize for ContentKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_extensions() {
        assert_eq!(ContentKind::from_extension("py"), Some(ContentKind::Python));
        assert_eq!(ContentKind::from_extension("md"), Some(ContentKind::Markdown));
        assert_eq!(ContentKind::from_extension("tsx"), Some(ContentKind::TypeScript));
        assert_eq!(ContentKind::Python.as_str(), "python");
        assert_eq!(ContentKind::Markdown.as_str(), "markdown");
    }

    #[test]
    fn test_unknown_extension_is_none() {
        assert_eq!(ContentKind::from_extension("unknownext"), None);
        assert_eq!(ContentKind::from_extension(""), None);
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert_eq!(ContentKind::from_extension("R"), Some(ContentKind::R));
        assert_eq!(ContentKind::from_extension("r"), None);
        assert_eq!(ContentKind::from_extension("PY"), None);
    }

    #[test]
    fn test_serializes_as_language_tag() {
        let json = serde_json::to_string(&ContentKind::TypeScript).unwrap();
        assert_eq!(json, "\"typescript\"");
    }
}
