use std::sync::Arc;

use anyhow::Context;
use food_core::{FoodPipeline, LexiconAnnotator};
use food_web::{build_router, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Configuração via ambiente
    let bind_addr = std::env::var("FOODIE_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let annotator = match std::env::var("FOODIE_LEXICON") {
        Ok(path) => {
            info!("Carregando léxico de {}", path);
            LexiconAnnotator::from_path(&path).with_context(|| format!("léxico {}", path))?
        }
        Err(_) => LexiconAnnotator::builtin()?,
    };

    let state = Arc::new(AppState {
        pipeline: FoodPipeline::with_annotator(annotator),
    });
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("bind em {}", bind_addr))?;
    info!("🚀 Servidor FoodIE iniciado em http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
