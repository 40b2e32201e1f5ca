use crate::availability::{self, MinuteRange};
use crate::backend::{BookingBackend, BookingError};
use crate::reservation::{self, ReservationPlan};
use crate::types::{
    Appointment, AppointmentStatus, AvailabilityRequest, DayAvailability, ReservationConfirmation,
    ReservationPreview, ReservationRequest, Service, Stylist, WorkInterval, WorkIntervalRequest,
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct BookedAppointment {
    appointment: Appointment,
    service_ids: Vec<Uuid>,
}

#[derive(Debug, Default)]
struct SalonData {
    stylists: HashMap<Uuid, Stylist>,
    services: HashMap<Uuid, Service>,
    capabilities: Vec<(Uuid, Uuid)>,
    work_intervals: Vec<WorkInterval>,
    appointments: HashMap<Uuid, BookedAppointment>,
}

impl SalonData {
    fn stylist(&self, id: Uuid) -> Result<&Stylist, BookingError> {
        self.stylists
            .get(&id)
            .ok_or_else(|| BookingError::NotFound("stylist not found".into()))
    }

    /// The unique services matching the requested ids, like a store fetch
    /// with `id IN (...)`.
    fn fetch_services(&self, requested: &[Uuid]) -> Vec<Service> {
        let mut seen = Vec::new();
        let mut fetched = Vec::new();
        for id in requested {
            if seen.contains(id) {
                continue;
            }
            seen.push(*id);
            if let Some(service) = self.services.get(id) {
                fetched.push(service.clone());
            }
        }
        fetched
    }

    fn qualified_service_ids(&self, stylist_id: Uuid) -> Vec<Uuid> {
        self.capabilities
            .iter()
            .filter(|(stylist, _)| *stylist == stylist_id)
            .map(|(_, service)| *service)
            .collect()
    }

    fn day_intervals(&self, stylist_id: Uuid, day: NaiveDate) -> Vec<WorkInterval> {
        self.work_intervals
            .iter()
            .filter(|interval| interval.stylist_id == stylist_id && interval.day == day)
            .cloned()
            .collect()
    }

    /// Occupied minute ranges of every reserved appointment for the
    /// stylist and day, each spanning the sum of its services' durations.
    fn reserved_ranges(&self, stylist_id: Uuid, day: NaiveDate) -> Vec<MinuteRange> {
        self.appointments
            .values()
            .filter(|booked| {
                booked.appointment.stylist_id == stylist_id
                    && booked.appointment.status == AppointmentStatus::Reserved
                    && booked.appointment.start_at.date_naive() == day
            })
            .map(|booked| {
                let duration: i32 = booked
                    .service_ids
                    .iter()
                    .filter_map(|id| self.services.get(id))
                    .map(|service| service.duration_minutes)
                    .sum();
                reservation::booked_range(booked.appointment.start_at, duration)
            })
            .collect()
    }

    fn plan(&self, request: &ReservationRequest) -> Result<ReservationPlan, BookingError> {
        let stylist = self.stylist(request.stylist_id)?;
        ReservationPlan::assemble(
            stylist.name.clone(),
            self.fetch_services(&request.service_ids),
            &self.qualified_service_ids(request.stylist_id),
            &self.day_intervals(request.stylist_id, request.day),
            &self.reserved_ranges(request.stylist_id, request.day),
            request,
        )
    }
}

/// In-memory backend. Every operation works under the one store mutex, so
/// commits are serialized per store and the no-overlap invariant holds
/// under concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct LocalBookings {
    data: Arc<Mutex<SalonData>>,
}

impl LocalBookings {
    pub fn add_stylist(&self, name: &str) -> Uuid {
        let id = Uuid::new_v4();
        let mut data = self.data.lock().unwrap();
        data.stylists.insert(id, Stylist { id, name: name.into() });
        id
    }

    pub fn add_service(
        &self,
        name: &str,
        price_cents: i32,
        duration_minutes: i32,
        description: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        let mut data = self.data.lock().unwrap();
        data.services.insert(
            id,
            Service {
                id,
                name: name.into(),
                price_cents,
                duration_minutes,
                description: description.into(),
            },
        );
        id
    }

    pub fn add_capability(&self, stylist_id: Uuid, service_id: Uuid) {
        let mut data = self.data.lock().unwrap();
        data.capabilities.push((stylist_id, service_id));
    }

    fn push_work_interval(&self, stylist_id: Uuid, day: NaiveDate, start: NaiveTime, end: NaiveTime) {
        let mut data = self.data.lock().unwrap();
        data.work_intervals.push(WorkInterval {
            id: Uuid::new_v4(),
            stylist_id,
            day,
            start,
            end,
        });
    }

    pub fn insert_example_data(&self) {
        const NUMBER_OF_EXAMPLE_DAYS: i64 = 5;

        let maja = self.add_stylist("Maja");
        let luka = self.add_stylist("Luka");

        let haircut = self.add_service("Haircut", 2500, 30, "Wash, cut and blow dry");
        let coloring = self.add_service("Coloring", 6000, 90, "Full head color");
        let beard_trim = self.add_service("Beard trim", 1500, 15, "Shape and trim");

        self.add_capability(maja, haircut);
        self.add_capability(maja, coloring);
        self.add_capability(luka, haircut);
        self.add_capability(luka, beard_trim);

        let opening = NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN);
        let closing = NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN);
        for offset in 1..=NUMBER_OF_EXAMPLE_DAYS {
            let day = Utc::now().date_naive() + Duration::days(offset);
            self.push_work_interval(maja, day, opening, closing);
            self.push_work_interval(luka, day, opening, closing);
        }
    }
}

impl BookingBackend for LocalBookings {
    fn availability(&self, request: &AvailabilityRequest) -> Result<DayAvailability, BookingError> {
        let data = self.data.lock().unwrap();
        data.stylist(request.stylist_id)?;
        let services = reservation::resolve_services(
            &request.service_ids,
            data.fetch_services(&request.service_ids),
        )?;
        reservation::check_capabilities(
            &data.qualified_service_ids(request.stylist_id),
            &services,
        )?;
        let total_duration = reservation::total_duration_minutes(&services)?;

        let intervals = data.day_intervals(request.stylist_id, request.day);
        let booked = data.reserved_ranges(request.stylist_id, request.day);
        Ok(availability::day_availability(&intervals, &booked, total_duration))
    }

    fn preview_reservation(
        &self,
        request: &ReservationRequest,
    ) -> Result<ReservationPreview, BookingError> {
        let data = self.data.lock().unwrap();
        let plan = data.plan(request)?;
        Ok(plan.into_preview(request.notes.clone()))
    }

    fn commit_reservation(
        &self,
        client_id: Uuid,
        request: &ReservationRequest,
    ) -> Result<ReservationConfirmation, BookingError> {
        let mut data = self.data.lock().unwrap();
        let plan = data.plan(request)?;

        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id,
            stylist_id: request.stylist_id,
            start_at: plan.start_at,
            status: AppointmentStatus::Reserved,
            notes: request.notes.clone().unwrap_or_default(),
        };
        let appointment_id = appointment.id;
        data.appointments.insert(
            appointment_id,
            BookedAppointment {
                appointment,
                service_ids: request.service_ids.clone(),
            },
        );
        info!(%appointment_id, "reservation committed");

        Ok(ReservationConfirmation {
            appointment_id,
            status: AppointmentStatus::Reserved,
        })
    }

    fn cancel_reservation(
        &self,
        client_id: Uuid,
        appointment_id: Uuid,
    ) -> Result<(), BookingError> {
        let mut data = self.data.lock().unwrap();
        let booked = data
            .appointments
            .get_mut(&appointment_id)
            // ownership is folded into not-found so non-owners learn nothing
            .filter(|booked| booked.appointment.client_id == client_id)
            .ok_or_else(|| BookingError::NotFound("appointment not found".into()))?;

        if booked.appointment.status != AppointmentStatus::Reserved {
            return Err(BookingError::Conflict("appointment is not reserved".into()));
        }
        if !reservation::cancellation_allowed(booked.appointment.start_at, Utc::now()) {
            return Err(BookingError::Conflict(
                "appointments can only be cancelled at least 24 hours in advance".into(),
            ));
        }
        booked.appointment.status = AppointmentStatus::Cancelled;
        Ok(())
    }

    fn add_work_interval(&self, request: &WorkIntervalRequest) -> Result<(), BookingError> {
        let mut data = self.data.lock().unwrap();
        data.stylist(request.stylist_id)?;
        let existing = data.day_intervals(request.stylist_id, request.day);
        reservation::check_interval_insert(&existing, request.start_time, request.end_time)?;
        data.work_intervals.push(WorkInterval {
            id: Uuid::new_v4(),
            stylist_id: request.stylist_id,
            day: request.day,
            start: request.start_time,
            end: request.end_time,
        });
        Ok(())
    }
}
