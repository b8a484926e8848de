//! AIO MCP Server
//!
//! Model Context Protocol server exposing AIO Tests (the Jira test-case
//! management add-on) operations — test-case lookup, paged search, folder
//! listing, project listing — to LLM agents and developer IDEs.

use rmcp::ServiceExt;
use tracing_subscriber::EnvFilter;

use aio_mcp::client::AioClient;
use aio_mcp::config::AioConfig;
use aio_mcp::server::AioMcpServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aio_mcp=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let config = AioConfig::resolve()?;
    let client = AioClient::new(config)?;

    tracing::info!("aio-mcp starting (stdio transport)");

    let server = AioMcpServer::new(client);
    let transport = rmcp::transport::io::stdio();

    let service = server.serve(transport).await?;
    service.waiting().await?;

    Ok(())
}
