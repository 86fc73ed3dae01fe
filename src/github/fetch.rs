// src/github/fetch.rs
// =============================================================================
// Fetches the newest version of a file from GitHub.
//
// Pipeline for one reference:
// 1. Reject references with no account, no repository or no file extension
//    (nothing goes over the network in that case)
// 2. Refresh the commit list for the repository and pick the newest commit
// 3. Download the file pinned to that commit and decode it from base64
// 4. Work out the language from the extension
//
// Every failure is turned into a FetchFailure. Callers match on the result
// instead of catching errors, and each failure is logged once here.
// =============================================================================

use serde::Serialize;

use crate::config::Settings;
use crate::error::{FetchFailure, NetworkError};
use crate::github::client::{GitHubClient, Repository};
use crate::github::commits::{Commit, CommitTracker};
use crate::github::content_kind::ContentKind;
use crate::github::reference::Reference;

pub const NO_ACCOUNT: &str = "No GitHub account name provided and no default set.";
pub const NO_REPOSITORY: &str = "No repository name provided";
pub const NO_EXTENSION: &str = "No Delimiter";

/// A freshly downloaded file. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RetrievedFile {
    pub content: String,
    pub kind: Option<ContentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_commit_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_commit_message: Option<String>,
}

/// Owns the GitHub client and the commit cache for one session.
pub struct FileFetcher {
    client: GitHubClient,
    tracker: CommitTracker,
}

impl FileFetcher {
    pub fn new(settings: &Settings) -> Result<Self, NetworkError> {
        Ok(Self::with_client(GitHubClient::new(settings)?))
    }

    pub fn with_client(client: GitHubClient) -> Self {
        FileFetcher {
            client,
            tracker: CommitTracker::new(),
        }
    }

    pub fn tracker(&self) -> &CommitTracker {
        &self.tracker
    }

    /// Drops every cached commit list.
    pub fn clear(&mut self) {
        self.tracker.clear();
    }

    /// Runs the whole pipeline for one reference.
    pub async fn fetch(&mut self, reference: &Reference) -> Result<RetrievedFile, FetchFailure> {
        // Cheap checks first: a bad reference must not touch the network
        // or the commit cache
        let extension = validate(reference).inspect_err(|failure| {
            log::warn!("Rejected '{}': {}", reference, failure);
        })?;

        // Anything that goes wrong from here on is a network problem.
        // Convert it once, at this boundary, so callers only see FetchFailure
        self.download(reference, extension).await.map_err(|err| {
            let failure = FetchFailure::from(err);
            log::error!("Fetching '{}' failed: {}", reference, failure);
            failure
        })
    }

    async fn download(
        &mut self,
        reference: &Reference,
        extension: &str,
    ) -> Result<RetrievedFile, NetworkError> {
        let Reference {
            account,
            repository,
            path,
        } = reference;

        // Step 1: ask GitHub for the current commit list of the repository
        self.tracker
            .refresh(&self.client, account, repository)
            .await?;

        // Step 2: the newest commit wins. We clone it so the tracker isn't
        // borrowed while we make the next request
        let latest = self.tracker.latest(account, repository).cloned();
        if latest.is_none() {
            log::warn!("{}/{} has no commits, using the default branch", account, repository);
        }

        // Step 3: download the file as it was at that commit
        let content = self
            .client
            .get_contents(
                account,
                repository,
                path,
                latest.as_ref().map(|c| c.id.as_str()),
            )
            .await?;

        log::info!(
            "Fetched {} ({} bytes) at {}",
            reference,
            content.len(),
            latest.as_ref().map_or("HEAD", |c| c.id.as_str())
        );

        // Step 4: classify by extension. Unknown extensions are fine, they
        // just give an untagged code block
        Ok(RetrievedFile {
            content,
            kind: ContentKind::from_extension(extension),
            source_commit_id: latest.as_ref().map(|c| c.id.clone()),
            source_commit_message: latest.map(|c| c.message),
        })
    }

    /// Refreshes and returns the commit list of the reference's repository.
    pub async fn refresh_commits(
        &mut self,
        reference: &Reference,
    ) -> Result<&[Commit], FetchFailure> {
        validate_repository(reference)?;
        self.tracker
            .refresh(&self.client, &reference.account, &reference.repository)
            .await?;
        Ok(self
            .tracker
            .commits(&reference.account, &reference.repository)
            .unwrap_or_default())
    }

    /// Lists the repositories the token can see.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, FetchFailure> {
        Ok(self.client.list_repositories().await?)
    }
}

// Account and repository are both needed to build any repository URL
fn validate_repository(reference: &Reference) -> Result<(), FetchFailure> {
    if reference.account.is_empty() {
        return Err(FetchFailure::validation(NO_ACCOUNT));
    }
    if reference.repository.is_empty() {
        return Err(FetchFailure::validation(NO_REPOSITORY));
    }
    Ok(())
}

// Returns the extension on success
fn validate(reference: &Reference) -> Result<&str, FetchFailure> {
    validate_repository(reference)?;
    reference
        .extension()
        .ok_or_else(|| FetchFailure::validation(NO_EXTENSION))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why does fetch() take &mut self?
//    - Refreshing the commit list writes into the tracker's cache
//    - &mut self means only one fetch can use this FileFetcher at a time,
//      so two refreshes can never race on the same cache entry
//
// 2. Why two error types (NetworkError and FetchFailure)?
//    - NetworkError describes what went wrong on the wire
//    - FetchFailure is what the caller gets: a kind to match on plus a message
//    - map_err() converts one into the other exactly once, in fetch()
//
// 3. What is inspect_err()?
//    - It lets us look at an error (here: to log it) without changing it
//    - The ? right after still returns the error to the caller
//
// 4. Why .cloned() on the latest commit?
//    - latest() returns a reference into the tracker
//    - Holding that reference while calling self.client would keep the
//      tracker borrowed; an owned copy avoids the conflict
// -----------------------------------------------------------------------------
