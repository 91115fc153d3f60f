//! GapForge — knowledge-graph extraction and research-gap discovery server.

use std::path::PathBuf;
use std::sync::Arc;

use gapforge_server::{build_router, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var("GAPFORGE_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let exe_dir = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()));
            if let Some(dir) = exe_dir {
                let parent_data = dir.join("../data");
                if parent_data.exists() {
                    return parent_data;
                }
            }
            PathBuf::from("data")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" | "help" => {
                println!("GapForge — knowledge-graph extraction and research-gap discovery");
                println!();
                println!("Usage: gapforge [command]");
                println!();
                println!("Commands:");
                println!("  (none)    Start the server");
                println!("  help      Show this help message");
                println!();
                println!("Environment: GAPFORGE_DATA_DIR, PORT, GAPFORGE_EMBEDDER, GAPFORGE_SEMANTIC_THRESHOLD,");
                println!("             GAPFORGE_GAZETTEER, OPENAI_API_KEY, ANTHROPIC_API_KEY, GROQ_API_KEY");
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'gapforge help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = gapforge_core::GapforgeConfig::from_env(&data_dir)?;
    let port = config.port;

    let embedder = gapforge_infer::create_embedder(
        config.embedder,
        &config.data_paths.models,
        config.embedding_dim,
    );

    let state = Arc::new(AppState::new(config, embedder)?);
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("GapForge server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
