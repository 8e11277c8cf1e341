//! Paper analyzer server binary
//!
//! Run with: cargo run -p paper-analyzer --bin paper-analyzer-server

use paper_analyzer::{config::AnalyzerConfig, server::AnalyzerServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paper_analyzer=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                 Research Paper Analyzer                   ║
║        Q&A, Summaries and Quizzes over your PDFs          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration (optional TOML file + environment)
    let config = AnalyzerConfig::load()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - LLM model: {}", config.llm.model);
    tracing::info!("  - Temperature: {}", config.llm.temperature);
    tracing::info!(
        "  - Chunk size: {} words ({} overlap)",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Session TTL: {}s", config.session.ttl_secs);

    let server = AnalyzerServer::new(config.clone())?;

    // Check Ollama
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    if server.state().refresh_model_ready().await {
        tracing::info!("Model '{}' is ready", config.llm.model);
    } else {
        tracing::warn!("Model '{}' not available at {}", config.llm.model, config.llm.base_url);
        tracing::warn!("Please start Ollama:");
        tracing::warn!("  1. Start: ollama serve");
        tracing::warn!("  2. Create the model: ollama create {} -f Modelfile", config.llm.model);
        tracing::warn!("  3. Or point {} at a running instance", paper_analyzer::config::OLLAMA_URL_ENV);
    }

    println!("\nServer starting...");
    println!("  UI: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/sessions              - Start a session");
    println!("  POST /api/sessions/:id/process  - Upload a PDF");
    println!("  POST /api/sessions/:id/ask      - Ask a question");
    println!("  POST /api/sessions/:id/summary  - Summarize");
    println!("  POST /api/sessions/:id/quiz     - Quiz");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
