// src/github/client.rs
// =============================================================================
// A small client for the three GitHub REST endpoints we need:
//
//   GET /user/repos?per_page=100                      list repositories
//   GET /repos/{account}/{repo}/commits               list commits
//   GET /repos/{account}/{repo}/contents/{path}?ref=  file contents
//
// Every request carries the access token from the settings. Any non-2xx
// answer becomes NetworkError::Status so callers can tell a 404 apart from
// everything else.
//
// Rust concepts:
// - serde: Deserialize GitHub's JSON straight into private "Raw" structs
// - url::Url: Build endpoints without worrying about escaping path segments
// =============================================================================

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Settings;
use crate::error::NetworkError;
use crate::github::commits::Commit;

// GitHub rejects requests without a User-Agent
const USER_AGENT: &str = concat!("gh-embed/", env!("CARGO_PKG_VERSION"));
const GITHUB_JSON: &str = "application/vnd.github+json";

/// A repository of the authenticated account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    base: Url,
    token: String,
}

impl GitHubClient {
    pub fn new(settings: &Settings) -> Result<Self, NetworkError> {
        let base = Url::parse(&settings.api_url)?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        let http = Client::builder().user_agent(USER_AGENT).build()?;

        Ok(GitHubClient {
            http,
            base,
            token: settings.access_token.clone(),
        })
    }

    /// Lists up to 100 repositories visible to the token's owner.
    pub async fn list_repositories(&self) -> Result<Vec<Repository>, NetworkError> {
        let mut url = self.endpoint(&["user", "repos"])?;
        url.query_pairs_mut().append_pair("per_page", "100");

        self.get_json(url).await
    }

    /// Lists the commits GitHub returns for the default branch.
    pub async fn list_commits(
        &self,
        account: &str,
        repository: &str,
    ) -> Result<Vec<Commit>, NetworkError> {
        let url = self.endpoint(&["repos", account, repository, "commits"])?;
        let raw: Vec<RawCommit> = self.get_json(url).await?;

        Ok(raw.into_iter().map(Commit::from).collect())
    }

    /// Fetches a file and returns its decoded text.
    ///
    /// `git_ref` pins the request to a commit; without it GitHub serves the
    /// default branch.
    pub async fn get_contents(
        &self,
        account: &str,
        repository: &str,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<String, NetworkError> {
        let mut segments = vec!["repos", account, repository, "contents"];
        segments.extend(path.split('/').filter(|s| !s.is_empty()));

        let mut url = self.endpoint(&segments)?;
        if let Some(git_ref) = git_ref {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }

        let raw: RawContents = self.get_json(url).await?;

        // Files over 1 MB come back with encoding "none" and an empty body
        if raw.encoding != "base64" {
            return Err(NetworkError::Decode(format!(
                "unsupported encoding '{}'",
                raw.encoding
            )));
        }
        decode_content(&raw.content)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, NetworkError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| NetworkError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, NetworkError> {
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(url.clone())
            .header(AUTHORIZATION, format!("token {}", self.token))
            .header(ACCEPT, GITHUB_JSON)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("GitHub answered {} for {}", status, url);
            return Err(NetworkError::Status {
                status,
                url: url.to_string(),
            });
        }

        Ok(response.json().await?)
    }
}

// GitHub wraps the base64 body at 60 columns, so whitespace is dropped first
fn decode_content(encoded: &str) -> Result<String, NetworkError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| NetworkError::Decode(e.to_string()))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[derive(Debug, Deserialize)]
struct RawContents {
    encoding: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    url: String,
    commit: RawCommitDetail,
}

#[derive(Debug, Deserialize)]
struct RawCommitDetail {
    message: String,
    author: RawSignature,
}

#[derive(Debug, Deserialize)]
struct RawSignature {
    date: DateTime<Utc>,
}

impl From<RawCommit> for Commit {
    fn from(raw: RawCommit) -> Self {
        // the id is the last segment of .../commits/<sha>
        let id = raw.url.rsplit('/').next().unwrap_or_default().to_string();

        Commit {
            id,
            authored_at: raw.commit.author.date,
            message: raw.commit.message.replace(['\n', '\r'], " "),
        }
    }
}
