//! Barbers, specialties and the link between them.

use chrono::{DateTime, NaiveDate, Utc};

use super::{BarberId, SpecialtyId};

/// Youngest age accepted for a barber.
pub const MIN_BARBER_AGE: i32 = 18;
/// Oldest age accepted for a barber.
pub const MAX_BARBER_AGE: i32 = 100;

/// True when `age` lies within the accepted range.
#[must_use]
pub fn is_valid_barber_age(age: i32) -> bool {
    (MIN_BARBER_AGE..=MAX_BARBER_AGE).contains(&age)
}

/// A service offered by the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specialty {
    pub id: SpecialtyId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new specialty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSpecialty {
    pub name: String,
    pub description: Option<String>,
}

/// Partial specialty update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialtyPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SpecialtyPatch {
    /// True when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// A barber working at the shop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    pub age: i32,
    pub hire_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Barber together with the specialties they offer, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarberProfile {
    pub barber: Barber,
    pub specialties: Vec<Specialty>,
}

/// Fields for a new barber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBarber {
    pub name: String,
    pub age: i32,
    pub hire_date: NaiveDate,
    pub specialty_ids: Vec<SpecialtyId>,
}

/// Partial barber update; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BarberPatch {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    pub active: Option<bool>,
}

/// Deduplicate specialty ids, preserving first occurrence order.
#[must_use]
pub fn unique_specialty_ids(ids: &[SpecialtyId]) -> Vec<SpecialtyId> {
    let mut unique: Vec<SpecialtyId> = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}
