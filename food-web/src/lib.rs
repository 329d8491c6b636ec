//! Servidor web Axum com WebSocket para visualização da extração de alimentos em tempo real

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use food_core::{
    corpus::sample_posts, AnnotatedDocument, AnnotatedToken, FoodEntity, FoodPipeline, PipelineEvent,
    TokenFlags,
};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Estado compartilhado da aplicação
pub struct AppState {
    pub pipeline: FoodPipeline,
}

#[derive(Deserialize)]
struct ExtractRequest {
    text: String,
}

/// Documento pré-anotado: aceita `{"tokens": [...]}` ou `{"document": [...]}`
#[derive(Deserialize)]
struct AnnotatedRequest {
    #[serde(alias = "document")]
    tokens: Vec<AnnotatedToken>,
}

/// Mensagem WebSocket recebida do cliente
#[derive(Deserialize)]
struct WsRequest {
    text: String,
}

#[derive(Serialize)]
struct FlaggedToken {
    #[serde(flatten)]
    token: AnnotatedToken,
    flags: TokenFlags,
}

#[derive(Serialize)]
struct ExtractResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    cleaned: Option<String>,
    tokens: Vec<FlaggedToken>,
    entities: Vec<FoodEntity>,
    texts: Vec<String>,
    processing_ms: u64,
}

#[derive(Serialize)]
struct SampleResponse {
    topic: &'static str,
    text: &'static str,
}

/// Monta o roteador com todas as rotas e camadas.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/extract", post(extract_handler))
        .route("/extract/annotated", post(extract_annotated_handler))
        .route("/samples", get(samples_handler))
        .route("/ws", get(ws_handler))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message.into() })),
    )
        .into_response()
}

fn flagged_tokens(doc: &AnnotatedDocument, flags: &[TokenFlags]) -> Vec<FlaggedToken> {
    doc.tokens()
        .iter()
        .zip(flags)
        .map(|(token, flags)| FlaggedToken {
            token: token.clone(),
            flags: *flags,
        })
        .collect()
}

/// Retorna a página principal HTML
async fn index_handler() -> impl IntoResponse {
    Html(include_str!("templates/index.html"))
}

/// Extração via HTTP POST (sem streaming)
async fn extract_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ExtractRequest>,
) -> Response {
    if req.text.trim().is_empty() {
        return bad_request("Texto vazio");
    }

    let start = std::time::Instant::now();
    let analysis = match state.pipeline.analyze(&req.text) {
        Ok(analysis) => analysis,
        Err(err) => return bad_request(err.to_string()),
    };

    Json(ExtractResponse {
        tokens: flagged_tokens(&analysis.document, &analysis.extraction.flags),
        texts: analysis.texts(),
        cleaned: Some(analysis.cleaned),
        entities: analysis.extraction.entities,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Extração sobre um documento já anotado (pula limpeza e anotação)
async fn extract_annotated_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnnotatedRequest>,
) -> Response {
    let doc = match AnnotatedDocument::new(req.tokens) {
        Ok(doc) => doc,
        Err(err) => return bad_request(err.to_string()),
    };

    let start = std::time::Instant::now();
    let extraction = state.pipeline.analyze_document(&doc);

    Json(ExtractResponse {
        cleaned: None,
        tokens: flagged_tokens(&doc, &extraction.flags),
        texts: extraction.texts(),
        entities: extraction.entities,
        processing_ms: start.elapsed().as_millis() as u64,
    })
    .into_response()
}

/// Retorna os posts de exemplo
async fn samples_handler() -> impl IntoResponse {
    let samples: Vec<SampleResponse> = sample_posts()
        .into_iter()
        .map(|p| SampleResponse {
            topic: p.topic,
            text: p.text,
        })
        .collect();
    Json(samples)
}

/// Roda `job` fora do runtime (o pipeline é síncrono) e junta os eventos emitidos.
/// Se a tarefa entrar em pânico, o fluxo termina com um evento `Error`.
async fn collect_events<F>(job: F) -> Vec<PipelineEvent>
where
    F: FnOnce(std::sync::mpsc::Sender<PipelineEvent>) + Send + 'static,
{
    let (tx, rx) = std::sync::mpsc::channel::<PipelineEvent>();
    let result = tokio::task::spawn_blocking(move || job(tx)).await;

    let mut events: Vec<PipelineEvent> = rx.try_iter().collect();
    if let Err(err) = result {
        warn!("Análise via WebSocket interrompida: {}", err);
        events.push(PipelineEvent::Error {
            message: "análise interrompida".to_string(),
        });
    }
    events
}

/// Upgrade HTTP → WebSocket
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket(socket, state))
}

/// Lógica do WebSocket: recebe texto, executa pipeline e envia eventos em tempo real
async fn handle_websocket(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket conectado");

    while let Some(Ok(msg)) = socket.recv().await {
        match msg {
            Message::Text(text) => {
                // Tenta parsear como JSON {text}; senão usa como texto puro
                let text_str = serde_json::from_str::<WsRequest>(&text)
                    .map(|req| req.text)
                    .unwrap_or_else(|_| text.to_string())
                    .trim()
                    .to_string();

                if text_str.is_empty() {
                    continue;
                }

                info!("Analisando via WebSocket: {} chars", text_str.len());

                let state_for_thread = Arc::clone(&state);
                let events = collect_events(move |tx| {
                    state_for_thread.pipeline.analyze_streaming(&text_str, tx);
                })
                .await;
                for event in &events {
                    if let Ok(json) = serde_json::to_string(event) {
                        if socket.send(Message::Text(json)).await.is_err() {
                            return; // cliente desconectou
                        }
                        // Pequena pausa para animação visual (passo a passo)
                        tokio::time::sleep(tokio::time::Duration::from_millis(35)).await;
                    }
                }
            }
            Message::Close(_) => {
                info!("WebSocket desconectado");
                return;
            }
            Message::Ping(payload) => {
                let _ = socket.send(Message::Pong(payload)).await;
            }
            _ => {}
        }
    }
}
