use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Extension, Json, Router,
};
use rail_shared::{Ticket, TicketBookingRequest};
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath};
use crate::middleware::{enforce_role, Claims, Role, RoleGuard};
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    let user = from_fn_with_state(RoleGuard::new(&state.auth, Role::User), enforce_role);

    let authenticated = Router::new()
        .route("/api/tickets/book", post(book_ticket))
        .route("/api/tickets/my-tickets", get(my_tickets))
        .route_layer(user);

    // Cancellation carries no role check
    authenticated.route("/api/tickets/cancel/{id}", post(cancel_ticket))
}

/// POST /api/tickets/book
async fn book_ticket(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ApiJson(req): ApiJson<TicketBookingRequest>,
) -> Result<Json<Ticket>, AppError> {
    Ok(Json(state.booking.book_ticket(&claims.sub, req).await?))
}

/// GET /api/tickets/my-tickets
async fn my_tickets(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Ticket>>, AppError> {
    Ok(Json(state.booking.tickets_for_user(&claims.sub).await?))
}

/// POST /api/tickets/cancel/{id}
async fn cancel_ticket(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.booking.cancel_ticket(id).await?;
    Ok(StatusCode::OK)
}
