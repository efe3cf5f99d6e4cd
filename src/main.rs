use opdocs_mcp::config::Config;
use opdocs_mcp::{DocIndex, DocServer, DocState, corpus};
use rmcp::{ServiceExt, transport::stdio};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the MCP protocol
    opdocs_mcp::tracing::init();

    let config = Config::discover(std::env::args().nth(1).as_deref())?;
    let options = config.index_options();

    let index = match config.corpus_path() {
        Some(path) => corpus::load_corpus(&path, options)?,
        None => {
            tracing::warn!("No corpus configured, starting with an empty index");
            DocIndex::new(options)
        }
    };

    tracing::info!("Starting opdocs-mcp MCP server ({} entries)", index.len());

    let server = DocServer::new(DocState::new(index, config.server));
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!("Error serving MCP server: {:?}", e);
    })?;

    service.waiting().await?;

    Ok(())
}
