//! Parameter structs for all MCP tools.
//!
//! Field names follow the wire contract (camelCase). Numeric identifiers are
//! coerced permissively: hosts routinely send `projectId` as a string, so both
//! JSON numbers and numeric strings are accepted. Anything else fails
//! deserialization with a descriptive message instead of producing a bogus id.

use schemars::JsonSchema;
use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;

// ── get_aio_testcase ──

/// Parameters for the `get_aio_testcase` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetTestCaseParams {
    /// AIO project key.
    #[schemars(description = "AIO project key (e.g., 'AT')")]
    pub project_key: String,
    /// Test case key.
    #[schemars(description = "Test case key (e.g., 'AT-TC-9')")]
    pub test_case_key: String,
}

// ── search_aio_testcases ──

/// Parameters for the `search_aio_testcases` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchTestCasesParams {
    /// Numeric project id.
    #[schemars(description = "Numeric AIO project id (e.g., 10001)")]
    #[serde(deserialize_with = "numeric_id")]
    pub project_id: u64,
    /// Folder ids to restrict the search to (all folders if omitted).
    #[schemars(description = "Folder ids to restrict the search to (all folders if omitted)")]
    #[serde(default, deserialize_with = "numeric_id_list")]
    pub folder_ids: Vec<u64>,
}

// ── get_aio_folders ──

/// Parameters for the `get_aio_folders` tool.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetFoldersParams {
    /// Numeric project id.
    #[schemars(description = "Numeric AIO project id (e.g., 10001)")]
    #[serde(deserialize_with = "numeric_id")]
    pub project_id: u64,
}

// ── list_aio_projects ──

/// Parameters for the `list_aio_projects` tool (none).
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListProjectsParams {}

/// Coerce a JSON number or numeric string to an id.
fn coerce_id(value: &Value) -> Result<u64, String> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| format!("id must be a non-negative integer, got {n}")),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| format!("id must be numeric, got {s:?}")),
        other => Err(format!("id must be a number or numeric string, got {other}")),
    }
}

fn numeric_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    coerce_id(&value).map_err(DeError::custom)
}

fn numeric_id_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u64>, D::Error> {
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .iter()
        .map(coerce_id)
        .collect::<Result<_, _>>()
        .map_err(DeError::custom)
}
