//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api` endpoint, the error envelope schemas
//! and the bearer token security scheme. Swagger UI serves it in debug
//! builds and `cargo run --bin openapi-dump` prints it for tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerAuth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Token returned by POST /api/auth/login or /api/auth/register.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "ClickBeard API",
        description = "Barbershop scheduling: accounts, barbers, specialties and appointments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerAuth" = [])),
    paths(
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::profile,
        crate::inbound::http::specialties::list_specialties,
        crate::inbound::http::specialties::get_specialty,
        crate::inbound::http::specialties::create_specialty,
        crate::inbound::http::specialties::update_specialty,
        crate::inbound::http::specialties::delete_specialty,
        crate::inbound::http::barbers::list_barbers,
        crate::inbound::http::barbers::barbers_by_specialty,
        crate::inbound::http::barbers::get_barber,
        crate::inbound::http::barbers::create_barber,
        crate::inbound::http::barbers::update_barber,
        crate::inbound::http::barbers::delete_barber,
        crate::inbound::http::barbers::barber_specialties,
        crate::inbound::http::barbers::replace_barber_specialties,
        crate::inbound::http::appointments::available_slots,
        crate::inbound::http::appointments::book_appointment,
        crate::inbound::http::appointments::my_appointments,
        crate::inbound::http::appointments::cancel_appointment,
        crate::inbound::http::appointments::complete_appointment,
        crate::inbound::http::appointments::all_appointments,
        crate::inbound::http::appointments::today_appointments,
        crate::inbound::http::appointments::future_appointments,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "health", description = "Status and orchestration probes"),
        (name = "auth", description = "Registration, login and profile"),
        (name = "specialties", description = "Service catalogue"),
        (name = "barbers", description = "Barbers and the specialties they offer"),
        (name = "appointments", description = "Booking, cancellation and schedules")
    )
)]
pub struct ApiDoc;
