use crate::backend::{BookingBackend, BookingError};
use crate::configuration::Configuration;
use crate::types::{
    AvailabilityRequest, CancelRequest, DayAvailability, ReservationConfirmation,
    ReservationPreview, ReservationRequest, WorkIntervalRequest,
};
use axum::body::Body;
use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use axum::{routing::post, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct AppState<T: BookingBackend, C: Configuration> {
    booking: T,
    configuration: C,
}

/// Authenticated caller identity, installed by the identity middleware.
/// Token verification itself lives upstream; this service only consumes
/// the identity the gateway forwards.
#[derive(Debug, Clone, Copy)]
pub struct ClientIdentity(pub Uuid);

/// Wire form of every failure: a stable machine-checkable kind plus a
/// human-readable message. Internal error detail never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
            BookingError::Conflict(_) => StatusCode::CONFLICT,
            BookingError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            kind: self.kind().into(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn create_app<T: BookingBackend, C: Configuration>(backend: T, configuration: C) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let state = AppState {
        booking: backend,
        configuration,
    };

    let public = Router::new()
        .route("/availability", post(query_availability::<T, C>))
        .route("/reservations/preview", post(preview_reservation::<T, C>));

    let client = Router::new()
        .route("/reservations", post(commit_reservation::<T, C>))
        .route("/reservations/cancel", post(cancel_reservation::<T, C>))
        .route_layer(middleware::from_fn(client_auth));

    let admin = Router::new()
        .route("/work_intervals", post(add_work_interval::<T, C>))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_auth::<T, C>));

    Router::new()
        .merge(public)
        .merge(client)
        .merge(admin)
        .with_state(state)
        .layer(cors)
}

async fn client_auth(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    let Some(header) = request.headers().get("x-client-id") else {
        return Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string()));
    };
    let client_id = header
        .to_str()
        .ok()
        .and_then(|value| Uuid::parse_str(value).ok())
        .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;
    request.extensions_mut().insert(ClientIdentity(client_id));
    Ok(next.run(request).await)
}

async fn admin_auth<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, (StatusCode, String)> {
    match request.headers().get("x-admin-password") {
        Some(header) if header.to_str().unwrap_or("") == state.configuration.password() => {
            Ok(next.run(request).await)
        }
        Some(_) => Err((StatusCode::UNAUTHORIZED, "Unauthorized".to_string())),
        None => Err((StatusCode::UNAUTHORIZED, "Missing credentials".to_string())),
    }
}

/// Boundary validation: malformed requests are rejected before any store
/// access.
fn validated<R: Validate>(request: R) -> Result<R, BookingError> {
    request
        .validate()
        .map_err(|err| BookingError::InvalidRequest(err.to_string()))?;
    Ok(request)
}

async fn query_availability<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(request): Json<AvailabilityRequest>,
) -> Result<Json<DayAvailability>, BookingError> {
    let request = validated(request)?;
    state.booking.availability(&request).map(Json)
}

async fn preview_reservation<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<ReservationPreview>, BookingError> {
    let request = validated(request)?;
    state.booking.preview_reservation(&request).map(Json)
}

async fn commit_reservation<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Extension(ClientIdentity(client_id)): Extension<ClientIdentity>,
    Json(request): Json<ReservationRequest>,
) -> Result<Json<ReservationConfirmation>, BookingError> {
    let request = validated(request)?;
    state.booking.commit_reservation(client_id, &request).map(Json)
}

async fn cancel_reservation<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Extension(ClientIdentity(client_id)): Extension<ClientIdentity>,
    Json(request): Json<CancelRequest>,
) -> Result<(StatusCode, String), BookingError> {
    state
        .booking
        .cancel_reservation(client_id, request.appointment_id)?;
    Ok((StatusCode::OK, "Reservation cancelled successfully".to_string()))
}

async fn add_work_interval<T: BookingBackend, C: Configuration>(
    State(state): State<AppState<T, C>>,
    Json(request): Json<WorkIntervalRequest>,
) -> Result<(StatusCode, String), BookingError> {
    let request = validated(request)?;
    state.booking.add_work_interval(&request)?;
    Ok((StatusCode::OK, "Work interval added successfully".to_string()))
}
