//! In-process store implementing every repository port.
//!
//! Used when no `DATABASE_URL` is configured and by the integration tests.
//! It mirrors the PostgreSQL constraints: one `scheduled` row per slot,
//! unique emails and specialty names, and restrictive deletes.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use mockable::Clock;

use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, BarberRepository, BarberRepositoryError,
    SpecialtyRepository, SpecialtyRepositoryError, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, AppointmentListing, AppointmentStatus, Barber,
    BarberId, BarberPatch, NewAppointment, NewBarber, NewSpecialty, NewUser, Specialty,
    SpecialtyId, SpecialtyPatch, StoredCredentials, User, UserId,
};

const POISONED: &str = "memory store lock poisoned";

#[derive(Default)]
struct State {
    users: BTreeMap<UserId, StoredCredentials>,
    specialties: BTreeMap<SpecialtyId, Specialty>,
    barbers: BTreeMap<BarberId, Barber>,
    links: BTreeSet<(BarberId, SpecialtyId)>,
    appointments: BTreeMap<AppointmentId, Appointment>,
    sequences: Sequences,
}

/// One counter per table, like the `SERIAL` columns.
#[derive(Default)]
struct Sequences {
    users: i32,
    specialties: i32,
    barbers: i32,
    appointments: i32,
}

fn advance(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

impl State {

    fn specialties_of(&self, barber_id: BarberId) -> Vec<Specialty> {
        let mut found: Vec<Specialty> = self
            .links
            .iter()
            .filter(|(barber, _)| *barber == barber_id)
            .filter_map(|(_, specialty)| self.specialties.get(specialty).cloned())
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        found
    }

    fn slot_taken(&self, barber_id: BarberId, date: NaiveDate, time: NaiveTime) -> bool {
        self.appointments.values().any(|a| {
            a.is_scheduled()
                && a.barber_id == barber_id
                && a.appointment_date == date
                && a.appointment_time == time
        })
    }

    fn details(&self, appointment: &Appointment) -> Option<AppointmentDetails> {
        let barber = self.barbers.get(&appointment.barber_id)?;
        let specialty = self.specialties.get(&appointment.specialty_id)?;
        let user = &self.users.get(&appointment.user_id)?.user;
        Some(AppointmentDetails {
            appointment: appointment.clone(),
            barber_name: barber.name.clone(),
            specialty_name: specialty.name.clone(),
            user_name: user.name.clone(),
            user_email: user.email.clone(),
        })
    }
}

fn sorted_by_name(mut barbers: Vec<Barber>) -> Vec<Barber> {
    barbers.sort_by(|a, b| a.name.cmp(&b.name));
    barbers
}

/// Shared in-memory store. Clone the `Arc` to hand it to each service.
pub struct MemoryStore {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State::default()),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state
            .users
            .values()
            .find(|stored| stored.user.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserRepositoryError> {
        let state = self.lock().map_err(UserRepositoryError::connection)?;
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn create(&self, user: &NewUser) -> Result<User, UserRepositoryError> {
        let mut state = self.lock().map_err(UserRepositoryError::connection)?;
        if state.users.values().any(|s| s.user.email == user.email) {
            return Err(UserRepositoryError::duplicate_email());
        }
        let stored = User {
            id: UserId::new(advance(&mut state.sequences.users)),
            name: user.name.clone(),
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: self.clock.utc(),
        };
        state.users.insert(
            stored.id,
            StoredCredentials {
                user: stored.clone(),
                password_hash: user.password_hash.clone(),
            },
        );
        Ok(stored)
    }
}

#[async_trait]
impl SpecialtyRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Specialty>, SpecialtyRepositoryError> {
        let state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        let mut all: Vec<Specialty> = state.specialties.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(
        &self,
        id: SpecialtyId,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        Ok(state.specialties.get(&id).cloned())
    }

    async fn missing_ids(
        &self,
        ids: &[SpecialtyId],
    ) -> Result<Vec<SpecialtyId>, SpecialtyRepositoryError> {
        let state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| !state.specialties.contains_key(id))
            .collect())
    }

    async fn create(&self, specialty: &NewSpecialty) -> Result<Specialty, SpecialtyRepositoryError> {
        let mut state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        if state.specialties.values().any(|s| s.name == specialty.name) {
            return Err(SpecialtyRepositoryError::duplicate_name());
        }
        let stored = Specialty {
            id: SpecialtyId::new(advance(&mut state.sequences.specialties)),
            name: specialty.name.clone(),
            description: specialty.description.clone(),
            created_at: self.clock.utc(),
        };
        state.specialties.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        id: SpecialtyId,
        patch: &SpecialtyPatch,
    ) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let mut state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        let name_clash = patch.name.as_ref().is_some_and(|name| {
            state
                .specialties
                .values()
                .any(|s| s.id != id && &s.name == name)
        });
        if name_clash {
            return Err(SpecialtyRepositoryError::duplicate_name());
        }
        let Some(stored) = state.specialties.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            stored.name.clone_from(name);
        }
        if let Some(description) = &patch.description {
            stored.description = Some(description.clone());
        }
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: SpecialtyId) -> Result<Option<Specialty>, SpecialtyRepositoryError> {
        let mut state = self.lock().map_err(SpecialtyRepositoryError::connection)?;
        let referenced = state.links.iter().any(|(_, s)| *s == id)
            || state.appointments.values().any(|a| a.specialty_id == id);
        if referenced && state.specialties.contains_key(&id) {
            return Err(SpecialtyRepositoryError::in_use());
        }
        Ok(state.specialties.remove(&id))
    }
}

#[async_trait]
impl BarberRepository for MemoryStore {
    async fn list_active(&self) -> Result<Vec<Barber>, BarberRepositoryError> {
        let state = self.lock().map_err(BarberRepositoryError::connection)?;
        Ok(sorted_by_name(
            state.barbers.values().filter(|b| b.active).cloned().collect(),
        ))
    }

    async fn find_by_id(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError> {
        let state = self.lock().map_err(BarberRepositoryError::connection)?;
        Ok(state.barbers.get(&id).cloned())
    }

    async fn specialties_of(&self, id: BarberId) -> Result<Vec<Specialty>, BarberRepositoryError> {
        let state = self.lock().map_err(BarberRepositoryError::connection)?;
        Ok(state.specialties_of(id))
    }

    async fn list_by_specialty(
        &self,
        specialty_id: SpecialtyId,
    ) -> Result<Vec<Barber>, BarberRepositoryError> {
        let state = self.lock().map_err(BarberRepositoryError::connection)?;
        Ok(sorted_by_name(
            state
                .barbers
                .values()
                .filter(|b| b.active && state.links.contains(&(b.id, specialty_id)))
                .cloned()
                .collect(),
        ))
    }

    async fn offers_specialty(
        &self,
        barber_id: BarberId,
        specialty_id: SpecialtyId,
    ) -> Result<bool, BarberRepositoryError> {
        let state = self.lock().map_err(BarberRepositoryError::connection)?;
        Ok(state.links.contains(&(barber_id, specialty_id)))
    }

    async fn create(&self, barber: &NewBarber) -> Result<Barber, BarberRepositoryError> {
        let mut state = self.lock().map_err(BarberRepositoryError::connection)?;
        if let Some(unknown) = barber
            .specialty_ids
            .iter()
            .find(|id| !state.specialties.contains_key(id))
        {
            return Err(BarberRepositoryError::query(format!(
                "foreign key violation: specialty {unknown}"
            )));
        }
        let stored = Barber {
            id: BarberId::new(advance(&mut state.sequences.barbers)),
            name: barber.name.clone(),
            age: barber.age,
            hire_date: barber.hire_date,
            active: true,
            created_at: self.clock.utc(),
        };
        state.barbers.insert(stored.id, stored.clone());
        for specialty in &barber.specialty_ids {
            state.links.insert((stored.id, *specialty));
        }
        Ok(stored)
    }

    async fn update(
        &self,
        id: BarberId,
        patch: &BarberPatch,
    ) -> Result<Option<Barber>, BarberRepositoryError> {
        let mut state = self.lock().map_err(BarberRepositoryError::connection)?;
        let Some(stored) = state.barbers.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = &patch.name {
            stored.name.clone_from(name);
        }
        if let Some(age) = patch.age {
            stored.age = age;
        }
        if let Some(hire_date) = patch.hire_date {
            stored.hire_date = hire_date;
        }
        if let Some(active) = patch.active {
            stored.active = active;
        }
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: BarberId) -> Result<Option<Barber>, BarberRepositoryError> {
        let mut state = self.lock().map_err(BarberRepositoryError::connection)?;
        if state.appointments.values().any(|a| a.barber_id == id) {
            return Err(BarberRepositoryError::in_use());
        }
        state.links.retain(|(barber, _)| *barber != id);
        Ok(state.barbers.remove(&id))
    }

    async fn replace_specialties(
        &self,
        id: BarberId,
        specialty_ids: &[SpecialtyId],
    ) -> Result<Vec<Specialty>, BarberRepositoryError> {
        let mut state = self.lock().map_err(BarberRepositoryError::connection)?;
        if let Some(unknown) = specialty_ids
            .iter()
            .find(|sid| !state.specialties.contains_key(sid))
        {
            return Err(BarberRepositoryError::query(format!(
                "foreign key violation: specialty {unknown}"
            )));
        }
        state.links.retain(|(barber, _)| *barber != id);
        for specialty in specialty_ids {
            state.links.insert((id, *specialty));
        }
        Ok(state.specialties_of(id))
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn booked_times(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
    ) -> Result<Vec<NaiveTime>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        let mut times: Vec<NaiveTime> = state
            .appointments
            .values()
            .filter(|a| a.is_scheduled() && a.barber_id == barber_id && a.appointment_date == date)
            .map(|a| a.appointment_time)
            .collect();
        times.sort();
        Ok(times)
    }

    async fn is_slot_taken(
        &self,
        barber_id: BarberId,
        date: NaiveDate,
        time: NaiveTime,
    ) -> Result<bool, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        Ok(state.slot_taken(barber_id, date, time))
    }

    async fn insert(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, AppointmentRepositoryError> {
        let mut state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        // Checked under the same lock as the insert, like the unique index.
        if state.slot_taken(
            appointment.barber_id,
            appointment.appointment_date,
            appointment.appointment_time,
        ) {
            return Err(AppointmentRepositoryError::slot_taken());
        }
        let references_exist = state.users.contains_key(&appointment.user_id)
            && state.barbers.contains_key(&appointment.barber_id)
            && state.specialties.contains_key(&appointment.specialty_id);
        if !references_exist {
            return Err(AppointmentRepositoryError::query("foreign key violation"));
        }
        let now = self.clock.utc();
        let stored = Appointment {
            id: AppointmentId::new(advance(&mut state.sequences.appointments)),
            user_id: appointment.user_id,
            barber_id: appointment.barber_id,
            specialty_id: appointment.specialty_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        };
        state.appointments.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn find_by_id(
        &self,
        id: AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        Ok(state.appointments.get(&id).cloned())
    }

    async fn transition(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let mut state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        let now = self.clock.utc();
        Ok(state
            .appointments
            .get_mut(&id)
            .filter(|a| a.is_scheduled())
            .map(|a| {
                a.status = status;
                a.updated_at = now;
                a.clone()
            }))
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        let mut rows: Vec<AppointmentDetails> = state
            .appointments
            .values()
            .filter(|a| a.user_id == user_id)
            .filter_map(|a| state.details(a))
            .collect();
        rows.sort_by(|a, b| b.appointment.starts_at().cmp(&a.appointment.starts_at()));
        Ok(rows)
    }

    async fn list(
        &self,
        listing: AppointmentListing,
    ) -> Result<Vec<AppointmentDetails>, AppointmentRepositoryError> {
        let state = self.lock().map_err(AppointmentRepositoryError::connection)?;
        let keep = |a: &Appointment| match listing {
            AppointmentListing::All { date, status } => {
                date.is_none_or(|d| a.appointment_date == d)
                    && status.is_none_or(|s| a.status == s)
            }
            AppointmentListing::ScheduledOn(day) => a.is_scheduled() && a.appointment_date == day,
            AppointmentListing::ScheduledAfter(day) => {
                a.is_scheduled() && a.appointment_date > day
            }
        };
        let mut rows: Vec<AppointmentDetails> = state
            .appointments
            .values()
            .filter(|a| keep(a))
            .filter_map(|a| state.details(a))
            .collect();
        rows.sort_by_key(|row| row.appointment.starts_at());
        Ok(rows)
    }
}
