// src/github/mod.rs
// =============================================================================
// Everything that talks to GitHub or describes what we got back from it.
//
// Submodules:
// - reference: Parses "account::repository:path" strings
// - content_kind: Maps file extensions to code block languages
// - client: The REST calls (repositories, commits, file contents)
// - commits: Per-repository commit cache and "latest commit" lookup
// - fetch: The full fetch -> decode -> classify pipeline
// =============================================================================

mod client;
mod commits;
mod content_kind;
mod fetch;
mod reference;

// Re-export the public API so callers can write `github::FileFetcher`
pub use client::{GitHubClient, Repository};
pub use commits::{Commit, CommitTracker};
pub use content_kind::ContentKind;
pub use fetch::{FileFetcher, RetrievedFile, NO_ACCOUNT, NO_EXTENSION, NO_REPOSITORY};
pub use reference::Reference;
