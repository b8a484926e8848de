//! MCP ServerHandler implementation for the AIO Tests adapter.
//!
//! Exposes four tools, each mapping to exactly one upstream HTTP call:
//!
//! - `get_aio_testcase` — Fetch full detail for a test case by key
//! - `search_aio_testcases` — Search test cases in a project, optionally by folder
//! - `get_aio_folders` — Fetch a project's test-case folder tree
//! - `list_aio_projects` — List Jira projects as `{id, key, name}` summaries
//!
//! Successful results are a single text block of pretty-printed JSON. Upstream
//! failures surface as MCP internal errors carrying the upstream message;
//! unknown tool names are rejected by the router before any handler runs.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities,
    ServerInfo,
};
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde_json::{json, Value};

use crate::client::{AioClient, ApiError};
use crate::tools::*;

/// AIO MCP server handler. Stateless per call; holds only the shared
/// upstream client built from the startup config.
#[derive(Debug, Clone)]
pub struct AioMcpServer {
    tool_router: ToolRouter<Self>,
    client: AioClient,
}

impl AioMcpServer {
    /// Create a server around a configured upstream client.
    pub fn new(client: AioClient) -> Self {
        Self {
            tool_router: Self::tool_router(),
            client,
        }
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for AioMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "aio-mcp".to_string(),
                title: Some("AIO Tests MCP Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                description: Some(
                    "MCP server exposing AIO Tests (Jira TCMS) operations: test-case \
                     lookup, paged search, folder listing, and project listing"
                        .to_string(),
                ),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "AIO Tests is a test-case management add-on for Jira. \
                 Start with list_aio_projects to discover project ids and keys, \
                 get_aio_folders to see a project's folder tree, then \
                 search_aio_testcases (optionally restricted by folderIds) to find \
                 cases, and get_aio_testcase for full detail on a single case. \
                 Keys look like 'AT' (project) and 'AT-TC-9' (test case)."
                    .to_string(),
            ),
        }
    }
}

#[tool_router(router = tool_router)]
impl AioMcpServer {
    /// Fetch full detail for a single test case.
    #[tool(
        name = "get_aio_testcase",
        description = "Get full detail for an AIO test case: steps, preconditions, status, owner, and folder. Requires the project key and test case key (e.g., projectKey 'AT', testCaseKey 'AT-TC-9')."
    )]
    pub async fn get_aio_testcase(
        &self,
        Parameters(params): Parameters<GetTestCaseParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let detail = self
            .client
            .get_test_case(&params.project_key, &params.test_case_key)
            .await
            .map_err(api_error)?;
        json_result(&detail)
    }

    /// Search test cases in a project, optionally restricted to folders.
    #[tool(
        name = "search_aio_testcases",
        description = "Search test cases in an AIO project, newest case keys first (one page of up to 100). Optionally pass folderIds to restrict results to specific folders; use get_aio_folders to discover folder ids."
    )]
    pub async fn search_aio_testcases(
        &self,
        Parameters(params): Parameters<SearchTestCasesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let body = self
            .client
            .search_test_cases(params.project_id, &params.folder_ids)
            .await
            .map_err(api_error)?;
        // The paged endpoint wraps matches in a `values` array; hand the
        // array straight back when present.
        let payload = body.get("values").cloned().unwrap_or(body);
        json_result(&payload)
    }

    /// Fetch the test-case folder tree for a project.
    #[tool(
        name = "get_aio_folders",
        description = "Get the test-case folder tree for an AIO project. Requires the numeric project id; use list_aio_projects to find it."
    )]
    pub async fn get_aio_folders(
        &self,
        Parameters(params): Parameters<GetFoldersParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let folders = self
            .client
            .get_folders(params.project_id)
            .await
            .map_err(api_error)?;
        json_result(&folders)
    }

    /// List Jira projects visible to the configured credential.
    #[tool(
        name = "list_aio_projects",
        description = "List Jira projects visible to the configured credential as {id, key, name} summaries. Use this first to discover project ids and keys for the other tools."
    )]
    pub async fn list_aio_projects(
        &self,
        Parameters(_params): Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let body = self.client.list_projects().await.map_err(api_error)?;
        json_result(&project_summaries(&body)?)
    }
}

/// Project the upstream project list down to `{id, key, name}` per entry.
fn project_summaries(body: &Value) -> Result<Value, ErrorData> {
    let projects = body.as_array().ok_or_else(|| {
        ErrorData::internal_error("AIO API error: expected a project array from upstream", None)
    })?;
    let summaries = projects
        .iter()
        .map(|project| {
            json!({
                "id": project.get("id").cloned().unwrap_or(Value::Null),
                "key": project.get("key").cloned().unwrap_or(Value::Null),
                "name": project.get("name").cloned().unwrap_or(Value::Null),
            })
        })
        .collect();
    Ok(Value::Array(summaries))
}

/// Wrap a payload as a single pretty-printed JSON text block.
fn json_result(value: &Value) -> Result<CallToolResult, ErrorData> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorData::internal_error(format!("serialization failed: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

fn api_error(e: ApiError) -> ErrorData {
    tracing::error!(error = %e, "tool call failed");
    ErrorData::internal_error(format!("AIO API error: {e}"), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_summaries_drop_extra_fields() {
        let upstream = json!([
            { "id": 1, "key": "AT", "name": "Foo", "extra": "x", "avatarUrls": {} },
            { "id": 2, "key": "QA", "name": "Bar" }
        ]);
        let projected = project_summaries(&upstream).unwrap();
        assert_eq!(
            projected,
            json!([
                { "id": 1, "key": "AT", "name": "Foo" },
                { "id": 2, "key": "QA", "name": "Bar" }
            ])
        );
    }

    #[test]
    fn test_project_summaries_reject_non_array() {
        let err = project_summaries(&json!({"message": "nope"})).unwrap_err();
        assert!(err.message.contains("project array"));
    }
}
