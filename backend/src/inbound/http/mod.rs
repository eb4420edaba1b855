//! HTTP inbound adapter exposing the REST API under `/api`.

pub mod accounts;
pub mod appointments;
pub mod auth;
pub mod barbers;
pub mod cache_control;
pub mod error;
pub mod health;
pub mod schemas;
pub mod specialties;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

use self::validation::invalid_body_error;

/// Register every `/api` route plus body and query error handling.
///
/// Routes with a fixed segment (`/barbers/specialty/..`,
/// `/appointments/available-slots`) are registered before their
/// `{id}` siblings.
///
/// # Examples
///
/// ```no_run
/// use actix_web::{App, web};
/// use clickbeard::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| invalid_body_error(&err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| invalid_body_error(&err.to_string()).into()),
    )
    .service(health::status)
    .service(accounts::register)
    .service(accounts::login)
    .service(accounts::profile)
    .service(specialties::list_specialties)
    .service(specialties::get_specialty)
    .service(specialties::create_specialty)
    .service(specialties::update_specialty)
    .service(specialties::delete_specialty)
    .service(barbers::list_barbers)
    .service(barbers::barbers_by_specialty)
    .service(barbers::barber_specialties)
    .service(barbers::replace_barber_specialties)
    .service(barbers::get_barber)
    .service(barbers::create_barber)
    .service(barbers::update_barber)
    .service(barbers::delete_barber)
    .service(appointments::available_slots)
    .service(appointments::my_appointments)
    .service(appointments::all_appointments)
    .service(appointments::today_appointments)
    .service(appointments::future_appointments)
    .service(appointments::book_appointment)
    .service(appointments::cancel_appointment)
    .service(appointments::complete_appointment);
}
