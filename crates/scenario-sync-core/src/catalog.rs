//! Remote catalog boundary
//!
//! [`ScenarioCatalog`] is the seam between the reconciliation engine and the
//! remote test-management service. The engine only ever talks to the catalog
//! through this trait; the HTTP implementation lives in its own crate.

use crate::config::Credentials;
use crate::error::RemoteError;
use crate::issue_key::IssueKey;
use crate::types::RemoteScenario;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Maximum number of keys per remote query
pub const FETCH_BATCH_SIZE: usize = 50;

/// The one remote test classification sync compares and updates
pub const SUPPORTED_TEST_TYPE: &str = "cucumber";

/// Bearer token returned by authentication
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token
    #[inline]
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token for request headers
    #[inline]
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// Remote test-management catalog
///
/// Every call is a single request; none are retried.
#[async_trait]
pub trait ScenarioCatalog: Send + Sync {
    /// Exchange client credentials for a bearer token
    async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, RemoteError>;

    /// Fetch the remote records for one batch of keys
    ///
    /// Keys with no remote record are simply absent from the result.
    async fn fetch_batch(
        &self,
        token: &AccessToken,
        keys: &[IssueKey],
    ) -> Result<Vec<RemoteScenario>, RemoteError>;

    /// Import one feature file, returning the catalog's response body
    async fn import_feature(
        &self,
        token: &AccessToken,
        path: &Path,
        contents: Vec<u8>,
        project_key: Option<&str>,
    ) -> Result<String, RemoteError>;
}

/// Fetch remote scenarios for `keys` in batches of [`FETCH_BATCH_SIZE`]
///
/// Batches are issued one at a time in key order. Any failing batch aborts
/// the whole fetch and discards what earlier batches returned.
///
/// # Errors
/// The first `RemoteError` returned by the catalog.
pub async fn fetch_by_keys<C>(
    catalog: &C,
    token: &AccessToken,
    keys: &[IssueKey],
) -> Result<HashMap<IssueKey, RemoteScenario>, RemoteError>
where
    C: ScenarioCatalog + ?Sized,
{
    let mut remote = HashMap::with_capacity(keys.len());
    let total = keys.len().div_ceil(FETCH_BATCH_SIZE);

    for (index, batch) in keys.chunks(FETCH_BATCH_SIZE).enumerate() {
        tracing::debug!(batch = index + 1, total, size = batch.len(), "fetching remote scenarios");
        let fetched = catalog.fetch_batch(token, batch).await.inspect_err(|e| {
            tracing::error!(batch = index + 1, total, error = %e, "remote batch failed");
        })?;
        for scenario in fetched {
            remote.insert(scenario.issue_key.clone(), scenario);
        }
    }

    Ok(remote)
}
