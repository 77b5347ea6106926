//! Axum-based API gateway: wires visitor chat, per-session conversation
//! history, and the query engine.
//!
//! The gateway is glue, not core: it owns the session registry, enforces the
//! query length policy at the boundary, and hands the serialize/restore blob
//! to whoever calls the export/import routes. The core crates never do I/O.

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use dashmap::DashMap;
use folio_engine::{QueryAnswerer, QueryProcessor};
use folio_knowledge::{KnowledgeBase, Profile};
use folio_memory::{ConversationManager, Greeting, Message};
use folio_shared::{CoreConfig, Sender};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CoreConfig::load().expect("load configuration");
    let profile = load_profile(&config.profile_path);
    let knowledge = Arc::new(KnowledgeBase::new(profile));
    let engine: Arc<dyn QueryAnswerer> = Arc::new(QueryProcessor::new(Arc::clone(&knowledge)));

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        knowledge,
        engine,
        sessions: Arc::new(DashMap::new()),
    };

    let app = router(state);
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("folio-gateway listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await.unwrap(), app)
        .await
        .unwrap();
}

/// Reads the profile document from disk; any failure falls back to the
/// bundled demo profile so the gateway always comes up answerable.
fn load_profile(path: &str) -> Profile {
    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(profile) => {
                tracing::info!(path, "loaded profile document");
                profile
            }
            Err(e) => {
                tracing::warn!(path, error = %e, "profile document malformed, using demo profile");
                Profile::demo()
            }
        },
        Err(e) => {
            tracing::warn!(path, error = %e, "profile document unavailable, using demo profile");
            Profile::demo()
        }
    }
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/status", get(status))
        .route("/api/v1/greeting", get(greeting))
        .route("/api/v1/chat", post(chat))
        .route("/api/v1/history/:session_id", get(history))
        .route("/api/v1/session/:session_id/clear", post(clear_session))
        .route("/api/v1/session/:session_id/export", get(export_session))
        .route("/api/v1/session/import", post(import_session))
        .with_state(state)
}

#[derive(Clone)]
struct AppState {
    config: Arc<CoreConfig>,
    knowledge: Arc<KnowledgeBase>,
    engine: Arc<dyn QueryAnswerer>,
    sessions: Arc<DashMap<String, ConversationManager>>,
}

async fn status(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "app": state.config.app_name,
        "categories": state.knowledge.categories(),
    }))
}

async fn greeting() -> axum::Json<Greeting> {
    axum::Json(Greeting::welcome())
}

#[derive(serde::Deserialize)]
struct ChatRequest {
    session_id: Option<String>,
    message: String,
}

#[derive(serde::Serialize)]
struct ChatResponse {
    session_id: String,
    response: String,
    suggestions: Vec<String>,
    timed_out: bool,
    error: bool,
}

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> axum::Json<ChatResponse> {
    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if req.message.chars().count() > state.config.max_query_len {
        tracing::debug!(
            target: "folio::gateway",
            session_id = %session_id,
            len = req.message.chars().count(),
            "rejected over-length query"
        );
        return axum::Json(ChatResponse {
            session_id,
            response: "That message is a bit long for me — could you shorten it to one \
                       question?"
                .to_string(),
            suggestions: folio_engine::default_suggestions(),
            timed_out: false,
            error: false,
        });
    }

    // append the user message and take the context window; the entry guard
    // must be released before awaiting the engine
    let context = {
        let mut session = state
            .sessions
            .entry(session_id.clone())
            .or_insert_with(|| ConversationManager::with_capacity(state.config.max_messages));
        session.add_message(&req.message, Sender::User, None);
        session.context(None)
    };

    let answer = state
        .engine
        .answer_with_deadline(&req.message, &context, state.config.reply_timeout_ms)
        .await;

    if let Some(mut session) = state.sessions.get_mut(&session_id) {
        session.add_message(&answer.response, Sender::Bot, None);
    }

    axum::Json(ChatResponse {
        session_id,
        response: answer.response,
        suggestions: answer.suggestions,
        timed_out: answer.timed_out,
        error: answer.error,
    })
}

async fn history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<axum::Json<Vec<Message>>, StatusCode> {
    state
        .sessions
        .get(&session_id)
        .map(|session| axum::Json(session.history()))
        .ok_or(StatusCode::NOT_FOUND)
}

async fn clear_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<axum::Json<serde_json::Value>, StatusCode> {
    let mut session = state
        .sessions
        .get_mut(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    session.clear();
    Ok(axum::Json(serde_json::json!({ "status": "cleared" })))
}

async fn export_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<axum::Json<serde_json::Value>, StatusCode> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or(StatusCode::NOT_FOUND)?;
    Ok(axum::Json(serde_json::json!({
        "session_id": session_id,
        "state": session.serialize(),
    })))
}

#[derive(serde::Deserialize)]
struct ImportRequest {
    session_id: Option<String>,
    state: String,
}

async fn import_session(
    State(state): State<AppState>,
    Json(req): Json<ImportRequest>,
) -> Result<axum::Json<serde_json::Value>, StatusCode> {
    let session_id = req
        .session_id
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut manager = ConversationManager::with_capacity(state.config.max_messages);
    if !manager.restore(&req.state) {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.sessions.insert(session_id.clone(), manager);
    Ok(axum::Json(serde_json::json!({
        "status": "restored",
        "session_id": session_id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let config = CoreConfig {
            app_name: "Folio Assistant".to_string(),
            port: 0,
            profile_path: String::new(),
            max_messages: 100,
            reply_timeout_ms: 2000,
            max_query_len: 500,
        };
        let knowledge = Arc::new(KnowledgeBase::new(Profile::demo()));
        let engine: Arc<dyn QueryAnswerer> =
            Arc::new(QueryProcessor::with_seed(Arc::clone(&knowledge), 42));
        AppState {
            config: Arc::new(config),
            knowledge,
            engine,
            sessions: Arc::new(DashMap::new()),
        }
    }

    async fn post_json(
        app: &Router,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_status_reports_app_identity_and_categories() {
        let app = router(test_state());
        let (status, json) = get_json(&app, "/api/v1/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["app"], "Folio Assistant");
        assert_eq!(json["categories"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_greeting_is_a_bot_message_with_suggestions() {
        let app = router(test_state());
        let (status, json) = get_json(&app, "/api/v1/greeting").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["sender"], "bot");
        assert_eq!(json["suggestions"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_chat_answers_skills_question() {
        let app = router(test_state());
        let (status, json) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "message": "What technologies do you know?" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["timed_out"], false);
        assert_eq!(json["error"], false);
        assert!(!json["session_id"].as_str().unwrap().is_empty());
        let response = json["response"].as_str().unwrap();
        assert!(response.contains("Test Automation"));
        assert!(response.contains("Playwright"));
        assert!(!json["suggestions"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_appends_user_and_bot_messages_in_order() {
        let app = router(test_state());
        let (_, first) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "message": "What skills do you have?" }),
        )
        .await;
        let session_id = first["session_id"].as_str().unwrap().to_string();
        post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "session_id": session_id, "message": "How can I contact you?" }),
        )
        .await;

        let (status, history) = get_json(&app, &format!("/api/v1/history/{session_id}")).await;
        assert_eq!(status, StatusCode::OK);
        let messages = history.as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0]["sender"], "user");
        assert_eq!(messages[1]["sender"], "bot");
        assert_eq!(messages[2]["sender"], "user");
        assert_eq!(messages[3]["sender"], "bot");
        assert_eq!(messages[2]["content"], "How can I contact you?");
    }

    #[tokio::test]
    async fn test_history_unknown_session_is_not_found() {
        let app = router(test_state());
        let (status, _) = get_json(&app, "/api/v1/history/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_clear_empties_history_but_ids_keep_increasing() {
        let app = router(test_state());
        let (_, first) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "message": "What skills do you have?" }),
        )
        .await;
        let session_id = first["session_id"].as_str().unwrap().to_string();

        let (status, _) =
            post_json(&app, &format!("/api/v1/session/{session_id}/clear"), serde_json::json!({}))
                .await;
        assert_eq!(status, StatusCode::OK);

        post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "session_id": session_id, "message": "projects?" }),
        )
        .await;
        let (_, history) = get_json(&app, &format!("/api/v1/history/{session_id}")).await;
        let messages = history.as_array().unwrap();
        assert_eq!(messages.len(), 2);
        // ids continue past the cleared pair
        assert_eq!(messages[0]["id"], "msg-3");
    }

    #[tokio::test]
    async fn test_export_import_round_trips_history() {
        let app = router(test_state());
        let (_, first) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "message": "Tell me about your projects" }),
        )
        .await;
        let session_id = first["session_id"].as_str().unwrap().to_string();

        let (status, exported) =
            get_json(&app, &format!("/api/v1/session/{session_id}/export")).await;
        assert_eq!(status, StatusCode::OK);
        let blob = exported["state"].as_str().unwrap().to_string();

        let (status, imported) = post_json(
            &app,
            "/api/v1/session/import",
            serde_json::json!({ "session_id": "restored", "state": blob }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(imported["status"], "restored");

        let (_, original) = get_json(&app, &format!("/api/v1/history/{session_id}")).await;
        let (_, restored) = get_json(&app, "/api/v1/history/restored").await;
        assert_eq!(original, restored);
    }

    #[tokio::test]
    async fn test_import_rejects_malformed_blob() {
        let app = router(test_state());
        let (status, _) = post_json(
            &app,
            "/api/v1/session/import",
            serde_json::json!({ "state": "not a conversation" }),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_missing_message_is_a_client_error() {
        let app = router(test_state());
        let (status, _) =
            post_json(&app, "/api/v1/chat", serde_json::json!({ "session_id": "s1" })).await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_over_length_query_gets_polite_reply_without_history() {
        let app = router(test_state());
        let long = "x".repeat(501);
        let (status, json) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "session_id": "long", "message": long }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["response"].as_str().unwrap().contains("shorten"));
        // nothing was appended for the rejected message
        let (status, _) = get_json(&app, "/api/v1/history/long").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gibberish_chat_offers_general_suggestions() {
        let app = router(test_state());
        let (_, json) = post_json(
            &app,
            "/api/v1/chat",
            serde_json::json!({ "message": "asdkjfh qwoiuer" }),
        )
        .await;
        let suggestions: Vec<String> = json["suggestions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap().to_string())
            .collect();
        assert_eq!(suggestions, folio_engine::default_suggestions());
    }
}
