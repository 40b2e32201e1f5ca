//! Reservation and cancellation rules shared by the preview and commit
//! paths.
//!
//! Preview and commit are independent entry points over these functions.
//! Commit never trusts anything computed during a preview; it re-derives
//! every fact from the rows it reads inside its own transaction.

use crate::availability::{self, MinuteRange};
use crate::backend::BookingError;
use crate::types::{ReservationPreview, ReservationRequest, Service, WorkInterval};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

pub const CANCELLATION_NOTICE_HOURS: i64 = 24;

/// Everything the commit path needs to insert an appointment and the
/// preview path needs to display one, derived from current store state.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationPlan {
    pub stylist_name: String,
    pub services: Vec<Service>,
    pub total_duration_minutes: i32,
    pub total_price_cents: i32,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

impl ReservationPlan {
    /// Run the reservation checks over rows read from the store: service
    /// resolution, capability match, working-hours containment, duration
    /// and price totals, then the overlap check against every reserved
    /// appointment of that stylist and day.
    pub fn assemble(
        stylist_name: String,
        fetched_services: Vec<Service>,
        qualified_service_ids: &[Uuid],
        intervals: &[WorkInterval],
        booked: &[MinuteRange],
        request: &ReservationRequest,
    ) -> Result<Self, BookingError> {
        let services = resolve_services(&request.service_ids, fetched_services)?;
        check_capabilities(qualified_service_ids, &services)?;
        check_working_hours(intervals, request.start_time)?;
        let total_duration_minutes = total_duration_minutes(&services)?;
        let start_minute = availability::minute_of_day(request.start_time);
        check_slot_free(booked, start_minute, total_duration_minutes as u32)?;

        let start_at = start_instant(request.day, request.start_time);
        Ok(Self {
            stylist_name,
            total_price_cents: total_price_cents(&services),
            total_duration_minutes,
            start_at,
            end_at: start_at + Duration::minutes(total_duration_minutes as i64),
            services,
        })
    }

    pub fn into_preview(self, notes: Option<String>) -> ReservationPreview {
        ReservationPreview {
            stylist_name: self.stylist_name,
            services: self.services,
            start_at: self.start_at,
            end_at: self.end_at,
            total_duration_minutes: self.total_duration_minutes,
            total_price_cents: self.total_price_cents,
            notes,
        }
    }
}

/// Match the requested ids against the services the store returned, in
/// request order. The store fetch deduplicates, so a duplicate or unknown
/// id surfaces as a count mismatch.
pub fn resolve_services(
    requested: &[Uuid],
    fetched: Vec<Service>,
) -> Result<Vec<Service>, BookingError> {
    let ordered: Vec<Service> = requested
        .iter()
        .filter_map(|id| fetched.iter().find(|service| service.id == *id).cloned())
        .collect();
    if ordered.len() != requested.len() {
        return Err(BookingError::InvalidRequest(
            "unknown or duplicate service id in request".into(),
        ));
    }
    Ok(ordered)
}

/// The stylist must be qualified for every requested service, counted
/// exactly.
pub fn check_capabilities(
    qualified_service_ids: &[Uuid],
    services: &[Service],
) -> Result<(), BookingError> {
    let covered = services
        .iter()
        .filter(|service| qualified_service_ids.contains(&service.id))
        .count();
    if covered != services.len() {
        return Err(BookingError::InvalidRequest(
            "stylist does not perform all requested services".into(),
        ));
    }
    Ok(())
}

pub fn total_duration_minutes(services: &[Service]) -> Result<i32, BookingError> {
    let total: i32 = services.iter().map(|service| service.duration_minutes).sum();
    if total <= 0 {
        return Err(BookingError::InvalidRequest(
            "requested services have no bookable duration".into(),
        ));
    }
    Ok(total)
}

pub fn total_price_cents(services: &[Service]) -> i32 {
    services.iter().map(|service| service.price_cents).sum()
}

/// The requested start must lie within one of the stylist's work intervals
/// for the day, `[interval.start, interval.end)`.
pub fn check_working_hours(
    intervals: &[WorkInterval],
    start: NaiveTime,
) -> Result<(), BookingError> {
    let minute = availability::minute_of_day(start);
    let covered = intervals
        .iter()
        .any(|interval| MinuteRange::from_times(interval.start, interval.end).contains_start(minute));
    if !covered {
        return Err(BookingError::Conflict(
            "stylist unavailable at requested time".into(),
        ));
    }
    Ok(())
}

/// Half-open overlap check of the requested slot against every reserved
/// appointment's occupied range.
pub fn check_slot_free(
    booked: &[MinuteRange],
    start_minute: u32,
    duration_minutes: u32,
) -> Result<(), BookingError> {
    let requested = MinuteRange::new(start_minute, start_minute + duration_minutes);
    if booked.iter().any(|taken| availability::overlaps(*taken, requested)) {
        return Err(BookingError::Conflict("requested slot unavailable".into()));
    }
    Ok(())
}

/// A new work interval must be well formed and must not overlap any
/// existing interval of the same stylist and day.
pub fn check_interval_insert(
    existing: &[WorkInterval],
    start: NaiveTime,
    end: NaiveTime,
) -> Result<(), BookingError> {
    if start >= end {
        return Err(BookingError::InvalidRequest(
            "work interval must start before it ends".into(),
        ));
    }
    let candidate = MinuteRange::from_times(start, end);
    let clashes = existing
        .iter()
        .any(|interval| availability::overlaps(MinuteRange::from_times(interval.start, interval.end), candidate));
    if clashes {
        return Err(BookingError::Conflict(
            "work interval overlaps an existing one".into(),
        ));
    }
    Ok(())
}

pub fn start_instant(day: NaiveDate, start: NaiveTime) -> DateTime<Utc> {
    day.and_time(start).and_utc()
}

/// The minute range an appointment occupies on its day.
pub fn booked_range(start_at: DateTime<Utc>, duration_minutes: i32) -> MinuteRange {
    let start = availability::minute_of_day(start_at.time());
    MinuteRange::new(start, start + duration_minutes.max(0) as u32)
}

/// Cancellation requires the full notice period between now and the
/// appointment start.
pub fn cancellation_allowed(start_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    start_at - now >= Duration::hours(CANCELLATION_NOTICE_HOURS)
}
