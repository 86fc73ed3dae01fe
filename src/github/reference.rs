// src/github/reference.rs
// =============================================================================
// Parses the reference strings users type to point at a file on GitHub.
//
// Supported formats:
//   account::repository:path/to/file.py
//   repository:path/to/file.py          (default account)
//   path/to/file.py                     (default account and repository)
//
// Parsing never fails. A delimiter that splits the string into anything other
// than exactly two parts counts as "not there" and the text passes through
// unchanged. Checking for empty account/repository is the caller's job.
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Settings;

const ACCOUNT_DELIMITER: &str = "::";
const REPOSITORY_DELIMITER: &str = ":";

/// Where a file lives: account, repository and path inside the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub account: String,
    pub repository: String,
    pub path: String,
}

impl Reference {
    /// Resolves `raw` against the configured default account and repository.
    pub fn resolve(raw: &str, settings: &Settings) -> Self {
        // Step 1: "account::" prefix, or the default account
        let (account, rest) = split_exactly_once(raw, ACCOUNT_DELIMITER)
            .unwrap_or((settings.default_account.as_str(), raw));

        // Step 2: "repository:" prefix on what's left, or the default repository
        let (repository, path) = split_exactly_once(rest, REPOSITORY_DELIMITER)
            .unwrap_or((settings.default_repository.as_str(), rest));

        Reference {
            account: account.to_string(),
            repository: repository.to_string(),
            path: path.to_string(),
        }
    }

    /// Text after the final '.' of the path, if there is a '.' at all.
    pub fn extension(&self) -> Option<&str> {
        self.path.rsplit_once('.').map(|(_, ext)| ext)
    }

    /// File name shown on the refresh button.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }
}

// Returns both halves only when `delimiter` splits `text` into exactly two
// parts. "a::b::c" on "::" is three parts, so it yields None.
fn split_exactly_once<'a>(text: &'a str, delimiter: &str) -> Option<(&'a str, &'a str)> {
    let (head, tail) = text.split_once(delimiter)?;
    if tail.contains(delimiter) {
        None
    } else {
        Some((head, tail))
    }
}

// account::repository:path is both the display title and the form that gets
// parsed back out of a saved control
impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            self.account, ACCOUNT_DELIMITER, self.repository, REPOSITORY_DELIMITER, self.path
        )
    }
}
