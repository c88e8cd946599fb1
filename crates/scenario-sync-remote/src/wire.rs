//! Wire format of the catalog API
//!
//! Request and response bodies for authentication and the `getTests`
//! GraphQL query, plus the decoding rules applied to them.

use scenario_sync_core::{IssueKey, RemoteError, RemoteScenario};
use serde::{Deserialize, Serialize};

/// `getTests` query selecting key, Gherkin text and test type
pub const GET_TESTS_QUERY: &str = "query($jql: String!, $limit: Int!) {
  getTests(jql: $jql, limit: $limit) {
    results {
      issueKey
      gherkin
      testType { name }
    }
  }
}";

/// Test type reported when the catalog omits one
pub const UNKNOWN_TEST_TYPE: &str = "Unknown";

/// Body of the authenticate call
#[derive(Debug, Serialize)]
pub struct AuthenticateRequest<'a> {
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// GraphQL request envelope
#[derive(Debug, Serialize)]
pub struct GraphQlRequest {
    pub query: &'static str,
    pub variables: GetTestsVariables,
}

impl GraphQlRequest {
    /// `getTests` request for one batch of keys
    #[must_use]
    pub fn get_tests(keys: &[IssueKey]) -> Self {
        Self {
            query: GET_TESTS_QUERY,
            variables: GetTestsVariables {
                jql: issue_key_jql(keys),
                limit: keys.len(),
            },
        }
    }
}

/// Variables of the `getTests` query
#[derive(Debug, Serialize)]
pub struct GetTestsVariables {
    pub jql: String,
    pub limit: usize,
}

/// `issueKey in (A-1,A-2)` filter for a batch
#[must_use]
pub fn issue_key_jql(keys: &[IssueKey]) -> String {
    let joined: Vec<&str> = keys.iter().map(IssueKey::as_str).collect();
    format!("issueKey in ({})", joined.join(","))
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<GetTestsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct GetTestsData {
    #[serde(rename = "getTests")]
    get_tests: Option<TestPage>,
}

#[derive(Debug, Deserialize)]
struct TestPage {
    #[serde(default)]
    results: Vec<TestRecord>,
}

#[derive(Debug, Deserialize)]
struct TestRecord {
    #[serde(rename = "issueKey")]
    issue_key: String,
    gherkin: Option<String>,
    #[serde(rename = "testType")]
    test_type: Option<TestType>,
}

#[derive(Debug, Deserialize)]
struct TestType {
    name: Option<String>,
}

/// Decode a `getTests` response body
///
/// # Errors
/// `RemoteError::QueryRejected` when the body carries GraphQL errors,
/// `RemoteError::InvalidResponse` when it is not the expected JSON.
pub fn parse_tests_response(body: &str) -> Result<Vec<RemoteScenario>, RemoteError> {
    let response: GraphQlResponse = serde_json::from_str(body)
        .map_err(|e| RemoteError::invalid_response("getTests", e.to_string()))?;

    if !response.errors.is_empty() {
        let messages: Vec<&str> = response.errors.iter().map(|e| e.message.as_str()).collect();
        return Err(RemoteError::QueryRejected(messages.join("; ")));
    }

    let records = response
        .data
        .and_then(|data| data.get_tests)
        .map(|page| page.results)
        .unwrap_or_default();

    let mut scenarios = Vec::with_capacity(records.len());
    for record in records {
        let Ok(issue_key) = record.issue_key.parse::<IssueKey>() else {
            tracing::warn!(issue_key = %record.issue_key, "ignoring remote record with malformed key");
            continue;
        };
        let test_type = record
            .test_type
            .and_then(|t| t.name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| UNKNOWN_TEST_TYPE.to_string());
        scenarios.push(RemoteScenario::new(
            issue_key,
            record.gherkin.unwrap_or_default(),
            test_type,
        ));
    }
    Ok(scenarios)
}

/// Extract the bearer token from an authenticate response body
///
/// The catalog answers with a bare JSON string; surrounding quotes are
/// stripped when the body is not valid JSON.
#[must_use]
pub fn parse_token(body: &str) -> String {
    let trimmed = body.trim();
    serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| {
        let unquoted = trimmed.strip_prefix('"').unwrap_or(trimmed);
        unquoted.strip_suffix('"').unwrap_or(unquoted).to_string()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(raw: &[&str]) -> Vec<IssueKey> {
        raw.iter().map(|k| k.parse().unwrap()).collect()
    }

    #[test]
    fn builds_jql_filter_for_batch() {
        assert_eq!(issue_key_jql(&keys(&["ABC-1", "ABC-2"])), "issueKey in (ABC-1,ABC-2)");
    }

    #[test]
    fn get_tests_request_serializes_variables() {
        let request = GraphQlRequest::get_tests(&keys(&["ABC-1", "XYZ-9", "ABC-3"]));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["variables"]["jql"], "issueKey in (ABC-1,XYZ-9,ABC-3)");
        assert_eq!(json["variables"]["limit"], 3);
        assert!(json["query"].as_str().unwrap().contains("getTests(jql: $jql, limit: $limit)"));
    }

    #[test]
    fn parses_results_with_defaults() {
        let body = r#"{"data":{"getTests":{"results":[
            {"issueKey":"ABC-1","gherkin":"Scenario: one","testType":{"name":"Cucumber"}},
            {"issueKey":"ABC-2","gherkin":null,"testType":null}
        ]}}}"#;
        let scenarios = parse_tests_response(body).unwrap();
        assert_eq!(scenarios.len(), 2);
        assert_eq!(scenarios[0].gherkin, "Scenario: one");
        assert_eq!(scenarios[0].test_type, "Cucumber");
        assert_eq!(scenarios[1].gherkin, "");
        assert_eq!(scenarios[1].test_type, UNKNOWN_TEST_TYPE);
    }

    #[test]
    fn empty_data_yields_no_results() {
        assert!(parse_tests_response(r#"{"data":{"getTests":null}}"#).unwrap().is_empty());
        assert!(parse_tests_response(r#"{"data":null}"#).unwrap().is_empty());
    }

    #[test]
    fn graphql_errors_are_rejections() {
        let body = r#"{"data":null,"errors":[{"message":"bad jql"},{"message":"limit too high"}]}"#;
        let err = parse_tests_response(body).unwrap_err();
        assert!(matches!(err, RemoteError::QueryRejected(ref m) if m == "bad jql; limit too high"));
    }

    #[test]
    fn malformed_body_is_invalid_response() {
        let err = parse_tests_response("<html>").unwrap_err();
        assert!(matches!(err, RemoteError::InvalidResponse { operation: "getTests", .. }));
    }

    #[test]
    fn token_is_unquoted() {
        assert_eq!(parse_token("\"abc.def\""), "abc.def");
        assert_eq!(parse_token("  \"abc\"\n"), "abc");
        assert_eq!(parse_token("raw-token"), "raw-token");
        assert_eq!(parse_token("\"\""), "");
    }

    #[test]
    fn authenticate_body_uses_snake_case_fields() {
        let body = serde_json::to_string(&AuthenticateRequest {
            client_id: "id",
            client_secret: "secret",
        })
        .unwrap();
        assert_eq!(body, r#"{"client_id":"id","client_secret":"secret"}"#);
    }
}
