// src/github/commits.rs
// =============================================================================
// Keeps track of the commits we know about for each repository.
//
// The cache maps (account, repository) to the commit list GitHub returned the
// last time we asked. A refresh always replaces the whole list; there is no
// merging, so the cache never holds two entries for the same repository.
//
// The "latest" commit is simply the newest one by author date among all known
// commits of the repository. It is not filtered by which file changed.
// =============================================================================

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::NetworkError;
use crate::github::client::GitHubClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Commit {
    pub id: String,
    pub authored_at: DateTime<Utc>,
    pub message: String,
}

// (account, repository), compared with exact string equality
type RepoKey = (String, String);

/// Commit lists per repository, owned by one tracker.
#[derive(Debug, Default)]
pub struct CommitTracker {
    cache: HashMap<RepoKey, Vec<Commit>>,
}

impl CommitTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-reads the commit history of `account/repository` from GitHub.
    ///
    /// On failure the previous entry (if any) is kept as it was.
    pub async fn refresh(
        &mut self,
        client: &GitHubClient,
        account: &str,
        repository: &str,
    ) -> Result<(), NetworkError> {
        // If the request fails, ? returns before we touch the cache
        let commits = client.list_commits(account, repository).await?;
        self.replace(account, repository, commits);
        Ok(())
    }

    /// Swaps in a new commit list for the repository.
    pub fn replace(&mut self, account: &str, repository: &str, commits: Vec<Commit>) {
        log::debug!(
            "Caching {} commit(s) for {}/{}",
            commits.len(),
            account,
            repository
        );
        // insert() overwrites an existing entry, so there's never more than
        // one list per repository
        self.cache
            .insert((account.to_string(), repository.to_string()), commits);
    }

    /// Newest commit by author date. Ties keep the commit GitHub listed first.
    pub fn latest(&self, account: &str, repository: &str) -> Option<&Commit> {
        // Walk the list once, keeping the newest commit seen so far. Using
        // >= means an equal timestamp never replaces the earlier commit
        self.commits(account, repository)?
            .iter()
            .fold(None, |newest: Option<&Commit>, commit| match newest {
                Some(n) if n.authored_at >= commit.authored_at => Some(n),
                _ => Some(commit),
            })
    }

    /// The cached list, or None if this repository was never refreshed.
    pub fn commits(&self, account: &str, repository: &str) -> Option<&[Commit]> {
        self.cache
            .get(&(account.to_string(), repository.to_string()))
            .map(Vec::as_slice)
    }

    /// Number of repositories with a cached commit list
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Forgets every repository, e.g. when the session ends.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a HashMap with a tuple key?
//    - Tuples of Strings implement Hash and Eq, so they work as keys
//    - The lookup in commits() builds a temporary key from the &str arguments
//
// 2. Why fold() instead of max_by_key()?
//    - max_by_key() returns the LAST of several equal maximums
//    - We want the first one GitHub listed, so fold() with >= keeps it
//
// 3. Why does latest() return Option<&Commit>?
//    - The repository may never have been refreshed, or may have no commits
//    - Returning a reference avoids copying the commit; callers clone if needed
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::config::Settings;

    fn commit(id: &str, secs: i64) -> Commit {
        Commit {
            id: id.to_string(),
            authored_at: Utc.timestamp_opt(secs, 0).unwrap(),
            message: format!("commit {}", id),
        }
    }

    #[test]
    fn test_latest_is_max_timestamp_regardless_of_order() {
        let mut tracker = CommitTracker::new();
        tracker.replace(
            "o",
            "r",
            vec![commit("t1", 100), commit("t2", 300), commit("t3", 200)],
        );

        assert_eq!(tracker.latest("o", "r").map(|c| c.id.as_str()), Some("t2"));
    }

    #[test]
    fn test_latest_compares_full_timestamps() {
        // same sub-second part, different seconds
        let mut tracker = CommitTracker::new();
        tracker.replace("o", "r", vec![commit("older", 1_000), commit("newer", 2_000)]);

        assert_eq!(tracker.latest("o", "r").unwrap().id, "newer");
    }

    #[test]
    fn test_latest_tie_keeps_first() {
        let mut tracker = CommitTracker::new();
        tracker.replace("o", "r", vec![commit("a", 500), commit("b", 500)]);

        assert_eq!(tracker.latest("o", "r").unwrap().id, "a");
    }

    #[test]
    fn test_latest_without_entry_is_none() {
        let mut tracker = CommitTracker::new();
        assert!(tracker.latest("o", "r").is_none());

        tracker.replace("o", "r", Vec::new());
        assert!(tracker.latest("o", "r").is_none());
    }

    #[test]
    fn test_replace_overwrites_only_its_own_entry() {
        let mut tracker = CommitTracker::new();
        tracker.replace("o", "r", vec![commit("old1", 1), commit("old2", 2)]);
        tracker.replace("o", "other", vec![commit("x", 5)]);

        tracker.replace("o", "r", vec![commit("new", 3)]);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.commits("o", "r").unwrap(), &[commit("new", 3)]);
        assert_eq!(tracker.commits("o", "other").unwrap(), &[commit("x", 5)]);
    }

    #[test]
    fn test_keys_are_exact_strings() {
        let mut tracker = CommitTracker::new();
        tracker.replace("Octocat", "Hello", vec![commit("a", 1)]);

        assert!(tracker.commits("octocat", "hello").is_none());
    }

    #[tokio::test]
    async fn test_refresh_twice_replaces_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/repos/o/r/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "url": "https://api.github.com/repos/o/r/commits/aaa",
                    "commit": { "message": "first", "author": { "date": "2024-01-01T00:00:00Z" } }
                },
                {
                    "url": "https://api.github.com/repos/o/r/commits/bbb",
                    "commit": { "message": "second", "author": { "date": "2024-02-01T00:00:00Z" } }
                }
            ])))
            .expect(2)
            .mount(&server)
            .await;

        let settings = Settings {
            access_token: "secret".to_string(),
            api_url: server.uri(),
            ..Settings::default()
        };
        let client = GitHubClient::new(&settings).unwrap();

        let mut tracker = CommitTracker::new();
        tracker.refresh(&client, "o", "r").await.unwrap();
        tracker.refresh(&client, "o", "r").await.unwrap();

        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.commits("o", "r").unwrap().len(), 2);
        assert_eq!(tracker.latest("o", "r").unwrap().id, "bbb");
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_entry() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let settings = Settings {
            api_url: server.uri(),
            ..Settings::default()
        };
        let client = GitHubClient::new(&settings).unwrap();

        let mut tracker = CommitTracker::new();
        tracker.replace("o", "r", vec![commit("kept", 1)]);

        assert!(tracker.refresh(&client, "o", "r").await.is_err());
        assert_eq!(tracker.latest("o", "r").unwrap().id, "kept");
    }
}
