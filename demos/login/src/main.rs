use std::net::SocketAddr;
use std::time::Duration;

use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router, middleware};
use chrono::TimeDelta;
use serde::Deserialize;
use sessionup::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

/// Two managers over one store: short sessions by default, long ones when
/// the user ticks "remember me".
#[derive(Clone)]
struct AppState {
    sessions: Manager<MemoryStore>,
    remembered: Manager<MemoryStore>,
}

impl AppState {
    fn new(secure: bool) -> Self {
        let sessions = Manager::builder(MemoryStore::new())
            .secure(secure)
            .expires_in(TimeDelta::hours(12))
            .build();
        let remembered = sessions
            .to_builder()
            .expires_in(TimeDelta::days(30))
            .build();
        Self { sessions, remembered }
    }
}

#[derive(Deserialize)]
struct Login {
    user: String,
    #[serde(default)]
    remember: bool,
}

fn failure(err: SessionError) -> Response {
    tracing::error!(error = %err, "session operation failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "session store unavailable").into_response()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn home(session: Option<AuthSession>) -> String {
    match session {
        Some(AuthSession(s)) => format!("welcome back, {}", s.user_key),
        None => "hello, stranger".into(),
    }
}

/// Accepts any user name. Checking credentials is the application's job.
async fn login(State(state): State<AppState>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let Ok(bytes) = to_bytes(body, 4096).await else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let Ok(Login { user, remember }) = serde_json::from_slice::<Login>(&bytes) else {
        return StatusCode::UNPROCESSABLE_ENTITY.into_response();
    };

    let manager = if remember { &state.remembered } else { &state.sessions };
    let mut headers = HeaderMap::new();
    match manager.init(&parts, &mut headers, &user).await {
        Ok(session) => (headers, Json(session)).into_response(),
        Err(err) => failure(err),
    }
}

async fn me(AuthSession(session): AuthSession) -> Json<Session> {
    Json(session)
}

async fn list(
    State(state): State<AppState>,
    AuthSession(me): AuthSession,
    request: Request,
) -> Response {
    let (parts, _) = request.into_parts();
    match state.sessions.fetch_all(&parts.extensions, &me.user_key).await {
        Ok(Some(sessions)) => Json(sessions).into_response(),
        Ok(None) => Json(Vec::<Session>::new()).into_response(),
        Err(err) => failure(err),
    }
}

async fn logout(State(state): State<AppState>, request: Request) -> Response {
    let (parts, _) = request.into_parts();
    let mut headers = HeaderMap::new();
    match state.sessions.revoke(&parts.extensions, &mut headers).await {
        Ok(()) => (headers, StatusCode::NO_CONTENT).into_response(),
        Err(err) => failure(err),
    }
}

async fn logout_others(
    State(state): State<AppState>,
    AuthSession(me): AuthSession,
    request: Request,
) -> Response {
    let (parts, _) = request.into_parts();
    match state.sessions.revoke_other(&parts.extensions, &me.user_key).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => failure(err),
    }
}

async fn logout_all(State(state): State<AppState>, AuthSession(me): AuthSession) -> Response {
    let mut headers = HeaderMap::new();
    match state.sessions.revoke_all(&mut headers, &me.user_key).await {
        Ok(()) => (headers, StatusCode::NO_CONTENT).into_response(),
        Err(err) => failure(err),
    }
}

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

fn app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .route("/sessions", get(list))
        .route("/logout", post(logout))
        .route("/logout/others", post(logout_others))
        .route("/logout/all", post(logout_all))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            auth::<MemoryStore>,
        ));

    let public_routes = Router::new()
        .route("/", get(home))
        .route_layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            public::<MemoryStore>,
        ));

    Router::new()
        .route("/login", post(login))
        .merge(protected)
        .merge(public_routes)
        .with_state(state)
}

/// Periodically drops expired sessions from the in-memory store.
fn spawn_pruner(manager: Manager<MemoryStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let removed = manager.store().prune_expired().await;
            if !removed.is_empty() {
                tracing::info!(count = removed.len(), "expired sessions pruned");
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "login=debug,sessionup=debug".into()),
        )
        .init();

    let addr = std::env::var("SESSIONUP_DEMO_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".into());
    // Plain-HTTP local runs need non-Secure cookies.
    let secure = std::env::var("SESSIONUP_DEMO_SECURE").is_ok_and(|v| v == "1" || v == "true");

    let state = AppState::new(secure);
    spawn_pruner(state.sessions.clone(), Duration::from_secs(60));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(%addr, secure, "login demo listening");

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
