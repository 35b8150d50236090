//! # rostra-api Handlers
//!
//! This module coordinates the flow between HTTP requests and the
//! service layer. Handlers stay thin: resolve the identity, hand off to
//! a manager, map the result.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use rostra_core::models::{Argument, Debate, Identity, LeaderboardEntry, NewDebate, Side};
use rostra_core::traits::{AuthProvider, DebateRepo};
use rostra_core::DomainError;
use rostra_services::{
    Arguments, DebateView, Leaderboard, Lifecycle, Participation, Voting, Window,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

/// State shared across all handlers: the managers plus the auth
/// collaborator. Built once at startup from the chosen adapters.
pub struct AppState {
    pub auth: Arc<dyn AuthProvider>,
    pub lifecycle: Lifecycle,
    pub participation: Participation,
    pub arguments: Arguments,
    pub voting: Voting,
    pub leaderboard: Leaderboard,
}

impl AppState {
    pub fn new(repo: Arc<dyn DebateRepo>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            auth,
            lifecycle: Lifecycle::new(repo.clone()),
            participation: Participation::new(repo.clone()),
            arguments: Arguments::new(repo.clone()),
            voting: Voting::new(repo.clone()),
            leaderboard: Leaderboard::new(repo),
        }
    }
}

/// Wraps `DomainError` so every failure category maps to its own HTTP
/// status and a JSON error body. Storage details never leave the server.
pub struct ApiError(DomainError);

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::DebateExpired => StatusCode::GONE,
            DomainError::EditWindowExpired => StatusCode::FORBIDDEN,
            DomainError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let message = match &self.0 {
            DomainError::Storage(detail) => {
                tracing::error!(%detail, "storage failure");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Resolves the request's identity, if any, from the bearer token.
fn identity(state: &AppState, headers: &HeaderMap) -> Option<Identity> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    state.auth.authenticate(token)
}

pub async fn index() -> &'static str {
    "Rostra API. Try GET /debates"
}

pub async fn create_debate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(input): Json<NewDebate>,
) -> ApiResult<Json<Debate>> {
    let who = identity(&state, &headers);
    let debate = state.lifecycle.create_debate(who.as_ref(), input).await?;
    Ok(Json(debate))
}

pub async fn list_debates(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Debate>>> {
    Ok(Json(state.lifecycle.list().await?))
}

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub async fn search_debates(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<Vec<Debate>>> {
    Ok(Json(state.lifecycle.search(&query.q).await?))
}

pub async fn debate_detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DebateView>> {
    Ok(Json(state.lifecycle.debate_view(id, Utc::now()).await?))
}

#[derive(Deserialize)]
pub struct JoinRequest {
    pub side: Side,
}

pub async fn join_debate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<JoinRequest>,
) -> ApiResult<StatusCode> {
    let who = identity(&state, &headers);
    state.participation.join(who.as_ref(), id, request.side).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct PostArgumentRequest {
    pub content: String,
    pub side: Side,
    pub author_id: Uuid,
}

pub async fn post_argument(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<PostArgumentRequest>,
) -> ApiResult<Json<Argument>> {
    let who = identity(&state, &headers);
    // The body names an author, but the session is authoritative.
    if let Some(who) = &who {
        if request.author_id != who.user_id {
            return Err(DomainError::Forbidden(
                "arguments can only be posted as yourself".to_string(),
            )
            .into());
        }
    }
    let argument = state
        .arguments
        .post(who.as_ref(), id, request.side, &request.content)
        .await?;
    Ok(Json(argument))
}

#[derive(Deserialize)]
pub struct EditArgumentRequest {
    pub content: String,
}

pub async fn edit_argument(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(request): Json<EditArgumentRequest>,
) -> ApiResult<Json<Argument>> {
    let who = identity(&state, &headers);
    let argument = state.arguments.edit(who.as_ref(), id, &request.content).await?;
    Ok(Json(argument))
}

pub async fn delete_argument(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let who = identity(&state, &headers);
    state.arguments.delete(who.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct VoteRequest {
    pub argument_id: Uuid,
    pub user_id: Uuid,
}

pub async fn cast_vote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<VoteRequest>,
) -> ApiResult<StatusCode> {
    let who = identity(&state, &headers);
    state
        .voting
        .vote(who.as_ref(), request.argument_id, request.user_id)
        .await?;
    Ok(StatusCode::CREATED)
}

#[derive(Deserialize)]
pub struct LeaderboardQuery {
    #[serde(default)]
    pub window: Window,
}

pub async fn leaderboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LeaderboardQuery>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    Ok(Json(state.leaderboard.entries(query.window, Utc::now()).await?))
}
