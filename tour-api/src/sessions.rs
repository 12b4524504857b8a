use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tour_offer::{AggregatorView, TourContext, TourOptionAggregator};
use tour_shared::{BookingIntent, Participants};
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub tour_id: i64,
    pub contract_id: String,
    pub travel_date: String,
    pub adults: Option<u32>,
    pub children: Option<u32>,
    pub infants: Option<u32>,
}

impl CreateSessionRequest {
    fn participants(&self) -> Participants {
        let defaults = Participants::default();
        Participants {
            adults: self.adults.unwrap_or(defaults.adults),
            children: self.children.unwrap_or(defaults.children),
            infants: self.infants.unwrap_or(defaults.infants),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChangeDateRequest {
    pub travel_date: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectSlotRequest {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct BookRequest {
    pub tour_option_id: i64,
}

/// `wait=true` holds the response until pending availability checks finish
#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    #[serde(default)]
    pub wait: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
    #[serde(flatten)]
    pub view: AggregatorView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    pub location: String,
    pub intent: BookingIntent,
    pub estimated_total: Decimal,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{id}", get(get_session).delete(close_session))
        .route("/v1/sessions/{id}/date", put(change_date))
        .route("/v1/sessions/{id}/slot", put(select_slot))
        .route("/v1/sessions/{id}/book", post(book_now))
}

// ============================================================================
// Handlers
// ============================================================================

async fn session(state: &AppState, id: &Uuid) -> Result<Arc<TourOptionAggregator>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFoundError(format!("Session {} not found", id)))
}

async fn respond(
    session_id: Uuid,
    aggregator: &TourOptionAggregator,
    query: &ViewQuery,
) -> Json<SessionResponse> {
    if query.wait {
        aggregator.settle().await;
    }
    Json(SessionResponse {
        session_id,
        view: aggregator.view().await,
    })
}

/// POST /v1/sessions
/// Open the availability page for a tour and load its options
async fn create_session(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let context = TourContext::new(req.tour_id, req.contract_id.clone(), req.travel_date.clone())
        .with_participants(req.participants());

    let aggregator = Arc::new(TourOptionAggregator::new(state.supplier.clone(), context));
    let slots = aggregator.refresh().await?;

    let session_id = state.sessions.insert(aggregator.clone()).await;
    info!(%session_id, tour_id = req.tour_id, slots, "Session opened");

    Ok(respond(session_id, &aggregator, &query).await)
}

/// GET /v1/sessions/{id}
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
) -> Result<Json<SessionResponse>, AppError> {
    let aggregator = session(&state, &id).await?;
    Ok(respond(id, &aggregator, &query).await)
}

/// PUT /v1/sessions/{id}/date
/// Refetch for another date; all availability is checked again
async fn change_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
    Json(req): Json<ChangeDateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let aggregator = session(&state, &id).await?;
    aggregator.change_date(&req.travel_date).await?;
    Ok(respond(id, &aggregator, &query).await)
}

/// PUT /v1/sessions/{id}/slot
async fn select_slot(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ViewQuery>,
    Json(req): Json<SelectSlotRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let aggregator = session(&state, &id).await?;
    aggregator.select_slot(&req.time).await?;
    Ok(respond(id, &aggregator, &query).await)
}

/// POST /v1/sessions/{id}/book
/// Hand off to the booking form, only for an option confirmed available
async fn book_now(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookResponse>, AppError> {
    let aggregator = session(&state, &id).await?;
    let intent = aggregator.book_now(req.tour_option_id).await?;
    let participants = aggregator.context().await.participants;

    Ok(Json(BookResponse {
        location: intent.handoff_location(&state.booking.form_path),
        estimated_total: intent.estimated_total(&participants),
        intent,
    }))
}

/// DELETE /v1/sessions/{id}
async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(&id).await {
        info!(session_id = %id, "Session closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!("Session {} not found", id)))
    }
}
