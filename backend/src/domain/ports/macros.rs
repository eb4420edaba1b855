//! Helper macro generating port error enums with snake_case constructors.
//!
//! Each variant becomes a `thiserror` variant plus a constructor whose fields
//! accept anything convertible into the declared type, so adapters can write
//! `BarberRepositoryError::query("boom")`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum SampleRepositoryError {
            Connection { message: String } => "connection failed: {message}",
            SlotTaken => "slot already booked",
            Missing { table: String, id: i32 } => "{table} {id} missing",
        }
    }

    #[test]
    fn string_fields_accept_str() {
        let err = SampleRepositoryError::connection("refused");
        assert_eq!(err.to_string(), "connection failed: refused");
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(
            SampleRepositoryError::slot_taken(),
            SampleRepositoryError::SlotTaken
        );
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = SampleRepositoryError::missing("barbers", 4);
        assert_eq!(err.to_string(), "barbers 4 missing");
    }
}
