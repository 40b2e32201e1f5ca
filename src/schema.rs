diesel::table! {
    stylists (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    services (id) {
        id -> Uuid,
        name -> Text,
        price_cents -> Int4,
        duration_minutes -> Int4,
        description -> Text,
    }
}

diesel::table! {
    stylist_services (stylist_id, service_id) {
        stylist_id -> Uuid,
        service_id -> Uuid,
    }
}

diesel::table! {
    work_intervals (id) {
        id -> Uuid,
        stylist_id -> Uuid,
        day -> Date,
        start_time -> Time,
        end_time -> Time,
    }
}

diesel::table! {
    appointments (id) {
        id -> Uuid,
        client_id -> Uuid,
        stylist_id -> Uuid,
        start_at -> Timestamptz,
        status -> Text,
        notes -> Text,
    }
}

diesel::table! {
    appointment_services (appointment_id, service_id) {
        appointment_id -> Uuid,
        service_id -> Uuid,
    }
}

diesel::joinable!(appointment_services -> appointments (appointment_id));
diesel::joinable!(appointment_services -> services (service_id));
diesel::joinable!(stylist_services -> stylists (stylist_id));
diesel::joinable!(stylist_services -> services (service_id));
diesel::joinable!(work_intervals -> stylists (stylist_id));
diesel::joinable!(appointments -> stylists (stylist_id));

diesel::allow_tables_to_appear_in_same_query!(
    appointment_services,
    appointments,
    services,
    stylist_services,
    stylists,
    work_intervals,
);
