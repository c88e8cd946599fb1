//! Xray Cloud catalog client
//!
//! Three endpoints relative to the API root:
//! - `authenticate` exchanges client credentials for a bearer token
//! - `graphql` runs the `getTests` query for one batch of keys
//! - `import/feature` uploads a feature file as multipart form data

use crate::wire::{parse_tests_response, parse_token, AuthenticateRequest, GraphQlRequest};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use scenario_sync_core::{AccessToken, Credentials, IssueKey, RemoteError, RemoteScenario, ScenarioCatalog};
use std::path::Path;
use std::time::Duration;

/// Connection establishment limit
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whole-request limit
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

const AUTHENTICATE_PATH: &str = "authenticate";
const GRAPHQL_PATH: &str = "graphql";
const IMPORT_FEATURE_PATH: &str = "import/feature";

/// HTTP implementation of [`ScenarioCatalog`]
#[derive(Debug, Clone)]
pub struct XrayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl XrayClient {
    /// Create a client rooted at `base_url`
    ///
    /// # Errors
    /// `RemoteError::InvalidEndpoint` if the URL does not parse,
    /// `RemoteError::Transport` if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RemoteError::transport("client setup", e))?;
        Self::with_http_client(base_url, http)
    }

    /// Create a client around an existing `reqwest::Client`
    ///
    /// # Errors
    /// `RemoteError::InvalidEndpoint` if the URL does not parse.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> Result<Self, RemoteError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// API root, always ending in `/`
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the API root
    ///
    /// # Errors
    /// `RemoteError::InvalidEndpoint` if the joined URL is invalid.
    pub fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        self.base_url
            .join(path)
            .map_err(|e| RemoteError::InvalidEndpoint(format!("{path}: {e}")))
    }
}

/// Parse `raw` and make sure relative joins stay under its path
fn normalize_base_url(raw: &str) -> Result<Url, RemoteError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    Url::parse(&with_slash).map_err(|e| RemoteError::InvalidEndpoint(format!("{trimmed}: {e}")))
}

/// Status and body of a response, the body read even on failure
async fn read_response(operation: &'static str, response: Response) -> Result<(u16, bool, String), RemoteError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| RemoteError::transport(operation, e))?;
    Ok((status.as_u16(), status.is_success(), body))
}

#[async_trait]
impl ScenarioCatalog for XrayClient {
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, RemoteError> {
        let url = self.endpoint(AUTHENTICATE_PATH)?;
        let request = AuthenticateRequest {
            client_id: &credentials.client_id,
            client_secret: &credentials.client_secret,
        };

        let response = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RemoteError::transport("authenticate", e))?;

        let (status, ok, body) = read_response("authenticate", response).await?;
        if !ok {
            return Err(RemoteError::AuthenticationFailed { status, body });
        }

        let token = parse_token(&body);
        if token.is_empty() {
            return Err(RemoteError::EmptyToken);
        }
        Ok(AccessToken::new(token))
    }

    async fn fetch_batch(
        &self,
        token: &AccessToken,
        keys: &[IssueKey],
    ) -> Result<Vec<RemoteScenario>, RemoteError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(GRAPHQL_PATH)?;

        let response = self
            .http
            .post(url)
            .bearer_auth(token.secret())
            .json(&GraphQlRequest::get_tests(keys))
            .send()
            .await
            .map_err(|e| RemoteError::transport("getTests", e))?;

        let (status, ok, body) = read_response("getTests", response).await?;
        if !ok {
            return Err(RemoteError::QueryFailed { status, body });
        }

        let scenarios = parse_tests_response(&body)?;
        tracing::debug!(requested = keys.len(), returned = scenarios.len(), "getTests batch complete");
        Ok(scenarios)
    }

    async fn import_feature(
        &self,
        token: &AccessToken,
        path: &Path,
        contents: Vec<u8>,
        project_key: Option<&str>,
    ) -> Result<String, RemoteError> {
        let mut url = self.endpoint(IMPORT_FEATURE_PATH)?;
        if let Some(project_key) = project_key {
            url.query_pairs_mut().append_pair("projectKey", project_key);
        }

        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
        let part = Part::bytes(contents)
            .file_name(file_name)
            .mime_str("text/plain")
            .map_err(|e| RemoteError::transport("import", e))?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(url)
            .bearer_auth(token.secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| RemoteError::transport("import", e))?;

        let (status, ok, body) = read_response("import", response).await?;
        if !ok {
            return Err(RemoteError::ImportFailed {
                path: path.to_path_buf(),
                status,
                body,
            });
        }

        tracing::info!(path = %path.display(), "imported feature file");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = XrayClient::new("https://xray.example.test/api/v2").unwrap();
        assert_eq!(client.base_url().as_str(), "https://xray.example.test/api/v2/");

        let client = XrayClient::new("https://xray.example.test/api/v2/").unwrap();
        assert_eq!(client.base_url().as_str(), "https://xray.example.test/api/v2/");
    }

    #[test]
    fn endpoints_resolve_under_api_root() {
        let client = XrayClient::new("https://xray.example.test/api/v2").unwrap();
        assert_eq!(
            client.endpoint(AUTHENTICATE_PATH).unwrap().as_str(),
            "https://xray.example.test/api/v2/authenticate"
        );
        assert_eq!(
            client.endpoint(IMPORT_FEATURE_PATH).unwrap().as_str(),
            "https://xray.example.test/api/v2/import/feature"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = XrayClient::new("not a url").unwrap_err();
        assert!(matches!(err, RemoteError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn empty_batch_skips_the_request() {
        // Nothing listens on port 9; a request would fail.
        let client = XrayClient::new("http://127.0.0.1:9/api").unwrap();
        let scenarios = client
            .fetch_batch(&AccessToken::new("t"), &[])
            .await
            .unwrap();
        assert!(scenarios.is_empty());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = XrayClient::with_http_client("http://127.0.0.1:9/api", http).unwrap();
        let err = client
            .authenticate(&Credentials::new("id", "secret"))
            .await
            .unwrap_err();
        assert!(matches!(err, RemoteError::Transport { operation: "authenticate", .. }));
    }
}
