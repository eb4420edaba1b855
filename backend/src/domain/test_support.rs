//! Shared fixtures for domain service tests.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use mockable::Clock;

use super::{
    Appointment, AppointmentId, AppointmentStatus, AuthenticatedUser, BarberId, SpecialtyId,
    UserId,
};

/// Clock pinned to a local wall-clock instant.
pub(crate) struct FixtureClock {
    now: NaiveDateTime,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        Local
            .from_local_datetime(&self.now)
            .earliest()
            .expect("fixture instant exists in the local zone")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).expect("valid time")
}

/// Clock reading `day` at `h:m` local time.
pub(crate) fn clock_at(day: NaiveDate, h: u32, m: u32) -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        now: day.and_time(time(h, m)),
    })
}

pub(crate) fn customer(id: i32) -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: UserId::new(id),
        email: format!("customer{id}@example.com"),
        is_admin: false,
    }
}

pub(crate) fn admin() -> AuthenticatedUser {
    AuthenticatedUser {
        user_id: UserId::new(1),
        email: "admin@clickbeard.com".to_owned(),
        is_admin: true,
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(crate) fn appointment(
    id: i32,
    owner: i32,
    day: NaiveDate,
    at: NaiveTime,
    status: AppointmentStatus,
) -> Appointment {
    Appointment {
        id: AppointmentId::new(id),
        user_id: UserId::new(owner),
        barber_id: BarberId::new(1),
        specialty_id: SpecialtyId::new(1),
        appointment_date: day,
        appointment_time: at,
        status,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}
