use std::sync::Arc;

use sprout::api::create_router;
use sprout::completion::CompletionClient;
use sprout::config::CONFIG;
use sprout::pipeline::KeywordPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    // First CONFIG access aborts startup when OPENAI_API_KEY is missing,
    // before the listener ever binds.
    let client = CompletionClient::from_config();
    let pipeline = Arc::new(KeywordPipeline::new(Arc::new(client)));
    let router = create_router(pipeline);

    let addr = format!("0.0.0.0:{}", CONFIG.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, router).await?;

    Ok(())
}
