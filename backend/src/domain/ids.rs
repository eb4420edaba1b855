//! Integer identifiers for persisted aggregates.
//!
//! Rows use `SERIAL` keys, so identifiers wrap an `i32`. Wrapping them keeps a
//! barber id from being passed where a specialty id is expected.

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(i32);

        impl $name {
            /// Wrap a raw key.
            #[must_use]
            pub const fn new(raw: i32) -> Self {
                Self(raw)
            }

            /// Raw key value.
            #[must_use]
            pub const fn get(self) -> i32 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

define_id!(
    /// Identifier of a customer or administrator account.
    UserId
);
define_id!(
    /// Identifier of a barber.
    BarberId
);
define_id!(
    /// Identifier of a specialty (haircut, beard, ...).
    SpecialtyId
);
define_id!(
    /// Identifier of an appointment.
    AppointmentId
);
