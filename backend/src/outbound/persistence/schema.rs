//! Diesel table definitions mirroring `migrations/`.
//!
//! Regenerate with `diesel print-schema` after changing a migration; keep the
//! column doc comments.

diesel::table! {
    /// Customer and administrator accounts.
    users (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        /// Lower-cased at registration; unique.
        #[max_length = 255]
        email -> Varchar,
        /// bcrypt hash, never the plaintext.
        #[max_length = 255]
        password_hash -> Varchar,
        is_admin -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Services the shop offers.
    specialties (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        description -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Barbers; `active = false` hides them from public listings.
    barbers (id) {
        id -> Int4,
        #[max_length = 100]
        name -> Varchar,
        age -> Int4,
        hire_date -> Date,
        active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Which barber offers which specialty.
    barber_specialties (barber_id, specialty_id) {
        barber_id -> Int4,
        specialty_id -> Int4,
    }
}

diesel::table! {
    /// Bookings. A partial unique index keeps one `scheduled` row per
    /// (barber, date, time).
    appointments (id) {
        id -> Int4,
        user_id -> Int4,
        barber_id -> Int4,
        specialty_id -> Int4,
        appointment_date -> Date,
        appointment_time -> Time,
        #[max_length = 20]
        status -> Varchar,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(appointments -> barbers (barber_id));
diesel::joinable!(appointments -> specialties (specialty_id));
diesel::joinable!(appointments -> users (user_id));
diesel::joinable!(barber_specialties -> barbers (barber_id));
diesel::joinable!(barber_specialties -> specialties (specialty_id));

diesel::allow_tables_to_appear_in_same_query!(
    appointments,
    barber_specialties,
    barbers,
    specialties,
    users,
);
