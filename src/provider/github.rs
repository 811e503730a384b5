//! GitHub REST provider backed by `reqwest`.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::future::try_join_all;
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::{
    CreateIssue, CreatePullRequest, CreateRepository, ItemRef, Provider, ProviderError,
    ProviderResult, PushFiles, RepositoryRef,
};
use crate::session::{Credential, Principal};

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// REST API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// Mode for regular (non-executable) files in a git tree.
const FILE_MODE: &str = "100644";

/// GitHub client settings.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// API root, without trailing slash.
    pub api_base_url: String,
    /// User-Agent header; GitHub rejects requests without one.
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            user_agent: format!("mcp-gateway/{}", env!("CARGO_PKG_VERSION")),
            timeout: Duration::from_secs(30),
        }
    }
}

impl GitHubConfig {
    /// Point the client at a different API root (GitHub Enterprise, mocks).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Deserialize)]
struct UserResponse {
    login: String,
    id: u64,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct RepoResponse {
    name: String,
    html_url: String,
}

#[derive(Deserialize)]
struct NumberedResponse {
    number: u64,
    html_url: String,
}

#[derive(Deserialize)]
struct GitObject {
    sha: String,
}

#[derive(Deserialize)]
struct RefResponse {
    object: GitObject,
}

#[derive(Deserialize)]
struct CommitResponse {
    tree: GitObject,
}

/// [`Provider`] implementation for the GitHub REST API.
pub struct GitHubProvider {
    config: GitHubConfig,
    client: reqwest::Client,
}

impl GitHubProvider {
    /// Create a new GitHub provider.
    pub fn new(config: GitHubConfig) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self { config, client })
    }

    /// Get the client settings.
    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// Build an endpoint URL from raw path segments.
    ///
    /// Each segment is percent-encoded on its own, so `#`, `?` and `%` in
    /// owner, repository or branch names stay part of the path.
    fn endpoint<'a, I>(&self, segments: I) -> ProviderResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let base = &self.config.api_base_url;
        let mut url =
            Url::parse(base).map_err(|e| ProviderError::InvalidUrl(format!("{base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| ProviderError::InvalidUrl(base.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Endpoint under `/repos/{owner}/{repo}`.
    fn repo_endpoint<'a, I>(&self, owner: &'a str, repo: &'a str, rest: I) -> ProviderResult<Url>
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.endpoint(["repos", owner, repo].into_iter().chain(rest))
    }

    fn request(&self, method: Method, url: Url, credential: &Credential) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(credential.expose())
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ProviderResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            return serde_json::from_slice(&body).map_err(|e| ProviderError::Decode(e.to_string()));
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));

        if status == StatusCode::UNAUTHORIZED {
            Err(ProviderError::Unauthorized(message))
        } else {
            Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Path segments of `refs/heads/{branch}` below a git-data prefix.
///
/// Branch names may contain `/`, which separates ref path components.
fn branch_ref<'a>(prefix: &'a str, branch: &'a str) -> impl Iterator<Item = &'a str> {
    ["git", prefix, "heads"].into_iter().chain(branch.split('/'))
}

/// Pull the human-readable message out of a GitHub error body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("message").and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }
    let trimmed = body.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[async_trait]
impl Provider for GitHubProvider {
    async fn verify_credential(&self, credential: &Credential) -> ProviderResult<Principal> {
        let url = self.endpoint(["user"])?;
        let user: UserResponse = self
            .send(self.request(Method::GET, url, credential))
            .await
            .map_err(|e| match e {
                // token valid but lacking access to the user endpoint
                ProviderError::Api {
                    status: 403,
                    message,
                } => ProviderError::Unauthorized(message),
                other => other,
            })?;

        debug!(login = %user.login, "credential verified");
        Ok(Principal {
            login: user.login,
            id: user.id,
            name: user.name,
        })
    }

    async fn create_repository(
        &self,
        credential: &Credential,
        request: &CreateRepository,
    ) -> ProviderResult<RepositoryRef> {
        let url = self.endpoint(["user", "repos"])?;
        let repo: RepoResponse = self
            .send(self.request(Method::POST, url, credential).json(&json!({
                "name": request.name,
                "description": request.description,
                "private": request.private,
                "auto_init": true,
            })))
            .await?;

        info!(repo = %repo.name, "repository created");
        Ok(RepositoryRef {
            name: repo.name,
            url: repo.html_url,
        })
    }

    async fn push_files(
        &self,
        credential: &Credential,
        request: &PushFiles,
    ) -> ProviderResult<()> {
        let (owner, repo) = (request.owner.as_str(), request.repo.as_str());

        let head_url = self.repo_endpoint(owner, repo, branch_ref("ref", &request.branch))?;
        let head: RefResponse = self
            .send(self.request(Method::GET, head_url, credential))
            .await?;
        let parent_sha = head.object.sha;

        let parent_url = self.repo_endpoint(owner, repo, ["git", "commits", parent_sha.as_str()])?;
        let parent: CommitResponse = self
            .send(self.request(Method::GET, parent_url, credential))
            .await?;

        let blobs_url = self.repo_endpoint(owner, repo, ["git", "blobs"])?;
        let blobs: Vec<GitObject> = try_join_all(request.files.iter().map(|file| {
            self.send::<GitObject>(
                self.request(Method::POST, blobs_url.clone(), credential)
                    .json(&json!({
                        "content": STANDARD.encode(file.content.as_bytes()),
                        "encoding": "base64",
                    })),
            )
        }))
        .await?;

        let entries: Vec<Value> = request
            .files
            .iter()
            .zip(&blobs)
            .map(|(file, blob)| {
                json!({
                    "path": file.path,
                    "mode": FILE_MODE,
                    "type": "blob",
                    "sha": blob.sha,
                })
            })
            .collect();

        let tree_url = self.repo_endpoint(owner, repo, ["git", "trees"])?;
        let tree: GitObject = self
            .send(self.request(Method::POST, tree_url, credential).json(&json!({
                "base_tree": parent.tree.sha,
                "tree": entries,
            })))
            .await?;

        let commit_url = self.repo_endpoint(owner, repo, ["git", "commits"])?;
        let commit: GitObject = self
            .send(self.request(Method::POST, commit_url, credential).json(&json!({
                "message": request.message,
                "tree": tree.sha,
                "parents": [parent_sha],
            })))
            .await?;

        let update_url = self.repo_endpoint(owner, repo, branch_ref("refs", &request.branch))?;
        let _: Value = self
            .send(
                self.request(Method::PATCH, update_url, credential)
                    .json(&json!({ "sha": commit.sha })),
            )
            .await?;

        info!(
            repo = %format!("{owner}/{repo}"),
            branch = %request.branch,
            files = request.files.len(),
            "files pushed"
        );
        Ok(())
    }

    async fn create_issue(
        &self,
        credential: &Credential,
        request: &CreateIssue,
    ) -> ProviderResult<ItemRef> {
        let url = self.repo_endpoint(&request.owner, &request.repo, ["issues"])?;
        let issue: NumberedResponse = self
            .send(self.request(Method::POST, url, credential).json(&json!({
                "title": request.title,
                "body": request.body,
                "labels": request.labels,
            })))
            .await?;

        info!(
            repo = %format!("{}/{}", request.owner, request.repo),
            number = issue.number,
            "issue created"
        );
        Ok(ItemRef {
            number: issue.number,
            url: issue.html_url,
        })
    }

    async fn create_pull_request(
        &self,
        credential: &Credential,
        request: &CreatePullRequest,
    ) -> ProviderResult<ItemRef> {
        let url = self.repo_endpoint(&request.owner, &request.repo, ["pulls"])?;
        let pull: NumberedResponse = self
            .send(self.request(Method::POST, url, credential).json(&json!({
                "title": request.title,
                "body": request.body,
                "head": request.head,
                "base": request.base,
            })))
            .await?;

        info!(
            repo = %format!("{}/{}", request.owner, request.repo),
            number = pull.number,
            "pull request created"
        );
        Ok(ItemRef {
            number: pull.number,
            url: pull.html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::FileChange;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> GitHubProvider {
        GitHubProvider::new(GitHubConfig::default().with_base_url(server.uri())).unwrap()
    }

    fn token() -> Credential {
        Credential::new("ghp_test")
    }

    #[test]
    fn test_default_config() {
        let config = GitHubConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert!(config.user_agent.starts_with("mcp-gateway/"));
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_provider_keeps_config() {
        let config = GitHubConfig::default()
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(5));
        let provider = GitHubProvider::new(config).unwrap();

        assert_eq!(provider.config().api_base_url, "http://localhost:9999");
        assert_eq!(provider.config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(r#"{"message": "Bad credentials"}"#),
            Some("Bad credentials".to_string())
        );
        assert_eq!(error_message("  gateway down "), Some("gateway down".to_string()));
        assert_eq!(error_message(""), None);
    }

    #[tokio::test]
    async fn test_verify_credential_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "login": "alice",
                "id": 123,
                "name": "Alice Example"
            })))
            .mount(&server)
            .await;

        let principal = provider_for(&server)
            .verify_credential(&token())
            .await
            .unwrap();

        assert_eq!(principal.login, "alice");
        assert_eq!(principal.id, 123);
        assert_eq!(principal.name.as_deref(), Some("Alice Example"));
    }

    #[tokio::test]
    async fn test_verify_credential_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"message": "Bad credentials"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .verify_credential(&token())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Unauthorized(ref m) if m == "Bad credentials"));
    }

    #[tokio::test]
    async fn test_create_repository() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .and(body_partial_json(json!({
                "name": "demo",
                "private": true,
                "auto_init": true
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "name": "demo",
                "full_name": "alice/demo",
                "html_url": "https://github.com/alice/demo"
            })))
            .mount(&server)
            .await;

        let repo = provider_for(&server)
            .create_repository(
                &token(),
                &CreateRepository {
                    name: "demo".into(),
                    description: None,
                    private: true,
                },
            )
            .await
            .unwrap();

        assert_eq!(repo.name, "demo");
        assert_eq!(repo.url, "https://github.com/alice/demo");
    }

    #[tokio::test]
    async fn test_create_repository_conflict() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Repository creation failed."
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .create_repository(
                &token(),
                &CreateRepository {
                    name: "demo".into(),
                    description: None,
                    private: false,
                },
            )
            .await
            .unwrap_err();

        match err {
            ProviderError::Api { status, message } => {
                assert_eq!(status, 422);
                assert_eq!(message, "Repository creation failed.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_issue() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/alice/demo/issues"))
            .and(body_partial_json(json!({"title": "Bug", "labels": ["bug"]})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 1,
                "html_url": "https://github.com/alice/demo/issues/1"
            })))
            .mount(&server)
            .await;

        let issue = provider_for(&server)
            .create_issue(
                &token(),
                &CreateIssue {
                    owner: "alice".into(),
                    repo: "demo".into(),
                    title: "Bug".into(),
                    body: Some("broken".into()),
                    labels: vec!["bug".into()],
                },
            )
            .await
            .unwrap();

        assert_eq!(issue.number, 1);
        assert_eq!(issue.url, "https://github.com/alice/demo/issues/1");
    }

    #[tokio::test]
    async fn test_create_pull_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/repos/alice/demo/pulls"))
            .and(body_partial_json(json!({"head": "feature", "base": "main"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "number": 2,
                "html_url": "https://github.com/alice/demo/pull/2"
            })))
            .mount(&server)
            .await;

        let pull = provider_for(&server)
            .create_pull_request(
                &token(),
                &CreatePullRequest {
                    owner: "alice".into(),
                    repo: "demo".into(),
                    title: "Feature".into(),
                    body: None,
                    head: "feature".into(),
                    base: "main".into(),
                },
            )
            .await
            .unwrap();

        assert_eq!(pull.number, 2);
    }

    #[tokio::test]
    async fn test_push_files_walks_git_data_api() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/alice/demo/git/ref/heads/main"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"object": {"sha": "head-sha"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/repos/alice/demo/git/commits/head-sha"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tree": {"sha": "base-tree"}})),
            )
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/alice/demo/git/blobs"))
            .and(body_partial_json(json!({"encoding": "base64"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "blob-sha"})))
            .expect(2)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/alice/demo/git/trees"))
            .and(body_partial_json(json!({"base_tree": "base-tree"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "tree-sha"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/repos/alice/demo/git/commits"))
            .and(body_partial_json(json!({
                "tree": "tree-sha",
                "parents": ["head-sha"],
                "message": "add files"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "commit-sha"})))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("PATCH"))
            .and(path("/repos/alice/demo/git/refs/heads/main"))
            .and(body_partial_json(json!({"sha": "commit-sha"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ref": "refs/heads/main",
                "object": {"sha": "commit-sha"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        provider_for(&server)
            .push_files(
                &token(),
                &PushFiles {
                    owner: "alice".into(),
                    repo: "demo".into(),
                    branch: "main".into(),
                    files: vec![
                        FileChange {
                            path: "README.md".into(),
                            content: "# demo".into(),
                        },
                        FileChange {
                            path: "src/lib.rs".into(),
                            content: "pub fn demo() {}".into(),
                        },
                    ],
                    message: "add files".into(),
                },
            )
            .await
            .unwrap();
    }

    fn single_file_push(branch: &str) -> PushFiles {
        PushFiles {
            owner: "alice".into(),
            repo: "demo".into(),
            branch: branch.into(),
            files: vec![FileChange {
                path: "a.txt".into(),
                content: "a".into(),
            }],
            message: "m".into(),
        }
    }

    /// Mount the git-data endpoints shared by every push, reading and
    /// updating the branch through the given encoded ref path.
    async fn mount_push_flow(server: &MockServer, encoded_ref: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/repos/alice/demo/git/ref/heads/{encoded_ref}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"object": {"sha": "head-sha"}})),
            )
            .expect(1)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/repos/alice/demo/git/commits/head-sha"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"tree": {"sha": "base-tree"}})),
            )
            .mount(server)
            .await;
        for endpoint in ["blobs", "trees", "commits"] {
            Mock::given(method("POST"))
                .and(path(format!("/repos/alice/demo/git/{endpoint}")))
                .respond_with(ResponseTemplate::new(201).set_body_json(json!({"sha": "new-sha"})))
                .mount(server)
                .await;
        }
        Mock::given(method("PATCH"))
            .and(path(format!("/repos/alice/demo/git/refs/heads/{encoded_ref}")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"object": {"sha": "new-sha"}})),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_push_files_encodes_branch_name() {
        let server = MockServer::start().await;
        mount_push_flow(&server, "fix%2312").await;

        // the unencoded prefix must never be touched
        Mock::given(method("PATCH"))
            .and(path("/repos/alice/demo/git/refs/heads/fix"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;

        provider_for(&server)
            .push_files(&token(), &single_file_push("fix#12"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_push_files_keeps_slash_in_branch() {
        let server = MockServer::start().await;
        mount_push_flow(&server, "feature/login").await;

        provider_for(&server)
            .push_files(&token(), &single_file_push("feature/login"))
            .await
            .unwrap();
    }

    #[test]
    fn test_endpoint_encodes_segments() {
        let provider = GitHubProvider::new(
            GitHubConfig::default().with_base_url("https://github.example.com/api/v3/"),
        )
        .unwrap();

        let url = provider
            .repo_endpoint("alice", "what?100%", ["issues"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://github.example.com/api/v3/repos/alice/what%3F100%25/issues"
        );
    }

    #[test]
    fn test_endpoint_rejects_unusable_base() {
        let provider =
            GitHubProvider::new(GitHubConfig::default().with_base_url("mailto:ops@example.com"))
                .unwrap();
        assert!(matches!(
            provider.endpoint(["user"]),
            Err(ProviderError::InvalidUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_verify_credential_forbidden() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(json!({"message": "Resource not accessible by integration"})),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .verify_credential(&token())
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_push_files_missing_branch() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/alice/demo/git/ref/heads/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .push_files(&token(), &single_file_push("nope"))
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Api { status: 404, .. }));
    }
}
