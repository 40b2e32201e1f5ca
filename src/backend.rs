use crate::types::{
    AvailabilityRequest, DayAvailability, ReservationConfirmation, ReservationPreview,
    ReservationRequest, WorkIntervalRequest,
};
use uuid::Uuid;

/// Failure taxonomy surfaced by every booking operation. The kind is
/// stable and machine checkable, the message is for humans. No internal
/// detail (queries, stack traces) ever travels through here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// Malformed or semantically inconsistent input, safe to fix and retry.
    #[error("{0}")]
    InvalidRequest(String),
    /// The referenced entity does not exist (or is not visible to the caller).
    #[error("{0}")]
    NotFound(String),
    /// A state based rule rejected the request: unavailable slot, wrong
    /// status, missed cancellation window.
    #[error("{0}")]
    Conflict(String),
    /// Unexpected storage or transaction failure. The transaction was
    /// rolled back, nothing was persisted.
    #[error("{0}")]
    ServerError(String),
}

impl BookingError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid-request",
            Self::NotFound(_) => "not-found",
            Self::Conflict(_) => "conflict",
            Self::ServerError(_) => "server-error",
        }
    }
}

/// Storage-facing surface of the booking engine. Implementations re-read
/// current store state on every call; no booking data is cached between
/// requests.
pub trait BookingBackend: Clone + Send + Sync + 'static {
    /// Free start windows for a stylist, day and set of services.
    fn availability(&self, request: &AvailabilityRequest) -> Result<DayAvailability, BookingError>;

    /// Non-binding dry run of a reservation. Never writes.
    fn preview_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationPreview, BookingError>;

    /// Binding reservation. Re-derives every fact inside one atomic
    /// transaction; concurrent commits for the same stylist and day are
    /// serialized so overlapping appointments cannot both land.
    fn commit_reservation(
        &self,
        client_id: Uuid,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BookingError>;

    /// Mark a reserved appointment cancelled, owner only, at least 24
    /// hours before its start.
    fn cancel_reservation(
        &self,
        client_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<(), BookingError>;

    /// Extend a stylist's working hours. Rejects intervals overlapping an
    /// existing one for the same stylist and day.
    fn add_work_interval(&self, request: &WorkIntervalRequest) -> Result<(), BookingError>;
}
