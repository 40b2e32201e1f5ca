use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use chrono::{NaiveTime, TimeZone, Utc};
use uuid::Uuid;

use crate::backend::{BookingBackend, BookingError};
use crate::configuration::Configuration;
use crate::types::{
    AppointmentStatus, AvailabilityRequest, DayAvailability, FreeWindow, ReservationConfirmation,
    ReservationPreview, ReservationRequest, Service, WorkIntervalRequest,
};

pub struct MockBookingBackendInner {
    pub fail_with: Mutex<Option<BookingError>>,
    pub calls_to_availability: AtomicU64,
    pub calls_to_preview_reservation: AtomicU64,
    pub calls_to_commit_reservation: AtomicU64,
    pub calls_to_cancel_reservation: AtomicU64,
    pub calls_to_add_work_interval: AtomicU64,
    pub last_client_id: Mutex<Option<Uuid>>,
}

#[derive(Clone)]
pub struct MockBookingBackend(pub Arc<MockBookingBackendInner>);

impl MockBookingBackend {
    pub fn new() -> Self {
        Self(Arc::new(MockBookingBackendInner {
            fail_with: Mutex::default(),
            calls_to_availability: AtomicU64::default(),
            calls_to_preview_reservation: AtomicU64::default(),
            calls_to_commit_reservation: AtomicU64::default(),
            calls_to_cancel_reservation: AtomicU64::default(),
            calls_to_add_work_interval: AtomicU64::default(),
            last_client_id: Mutex::default(),
        }))
    }

    pub fn fail_with(&self, error: BookingError) {
        *self.0.fail_with.lock().unwrap() = Some(error);
    }

    fn result(&self) -> Result<(), BookingError> {
        match self.0.fail_with.lock().unwrap().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    pub fn canned_availability() -> DayAvailability {
        DayAvailability {
            total_duration_minutes: 30,
            windows: vec![FreeWindow {
                earliest_start: Self::time(9, 0),
                latest_start: Self::time(11, 30),
            }],
            reason: None,
        }
    }

    pub fn canned_preview() -> ReservationPreview {
        let start_at = Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap();
        ReservationPreview {
            stylist_name: "Maja".into(),
            services: vec![Service {
                id: Uuid::nil(),
                name: "Haircut".into(),
                price_cents: 2500,
                duration_minutes: 30,
                description: String::new(),
            }],
            start_at,
            end_at: start_at + chrono::Duration::minutes(30),
            total_duration_minutes: 30,
            total_price_cents: 2500,
            notes: None,
        }
    }

    pub fn canned_confirmation() -> ReservationConfirmation {
        ReservationConfirmation {
            appointment_id: Uuid::nil(),
            status: AppointmentStatus::Reserved,
        }
    }
}

impl BookingBackend for MockBookingBackend {
    fn availability(&self, _request: &AvailabilityRequest) -> Result<DayAvailability, BookingError> {
        self.0.calls_to_availability.fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(Self::canned_availability())
    }

    fn preview_reservation(
        &self,
        _request: &ReservationRequest,
    ) -> Result<ReservationPreview, BookingError> {
        self.0
            .calls_to_preview_reservation
            .fetch_add(1, Ordering::SeqCst);
        self.result()?;
        Ok(Self::canned_preview())
    }

    fn commit_reservation(
        &self,
        client_id: Uuid,
        _request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BookingError> {
        self.0
            .calls_to_commit_reservation
            .fetch_add(1, Ordering::SeqCst);
        *self.0.last_client_id.lock().unwrap() = Some(client_id);
        self.result()?;
        Ok(Self::canned_confirmation())
    }

    fn cancel_reservation(
        &self,
        client_id: Uuid,
        _appointment_id: Uuid,
    ) -> Result<(), BookingError> {
        self.0
            .calls_to_cancel_reservation
            .fetch_add(1, Ordering::SeqCst);
        *self.0.last_client_id.lock().unwrap() = Some(client_id);
        self.result()
    }

    fn add_work_interval(&self, _request: &WorkIntervalRequest) -> Result<(), BookingError> {
        self.0
            .calls_to_add_work_interval
            .fetch_add(1, Ordering::SeqCst);
        self.result()
    }
}

#[derive(Clone)]
pub struct TestConfiguration;

impl Configuration for TestConfiguration {
    fn password(&self) -> String {
        "123".into()
    }

    fn port(&self) -> String {
        "0".into()
    }

    fn database_url(&self) -> Option<String> {
        None
    }
}
