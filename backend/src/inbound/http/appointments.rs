//! Appointment booking, lifecycle and listing endpoints.
//!
//! ```text
//! GET /api/appointments/available-slots?barberId=1&date=2025-06-02
//! POST /api/appointments {"barber_id":1,"specialty_id":2,"appointment_date":"2025-06-02","appointment_time":"09:30"}
//! GET /api/appointments/my-appointments
//! PATCH /api/appointments/{id}/cancel
//! PATCH /api/appointments/{id}/complete
//! GET /api/appointments/all?date=2025-06-02&status=scheduled
//! GET /api/appointments/today
//! GET /api/appointments/future
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{AppointmentFilter, BookAppointmentRequest};
use crate::domain::{
    Appointment, AppointmentDetails, AppointmentId, BarberId, Error, SpecialtyId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::cache_control::private_no_cache_header;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, INVALID_ID, IdInput, missing_field_error, parse_date, parse_id, parse_id_input,
    parse_status, parse_time,
};

const APPOINTMENT_CANCELLED: &str = "Agendamento cancelado com sucesso";
const APPOINTMENT_COMPLETED: &str = "Agendamento marcado como concluído";
const SLOTS_FIELDS_REQUIRED: &str = "Barbeiro e data são obrigatórios";
const INVALID_BARBER_ID: &str = "ID de barbeiro inválido";
const BOOKING_FIELDS_REQUIRED: &str = "Todos os campos são obrigatórios";
const INVALID_BOOKING_IDS: &str = "IDs inválidos";

/// Appointment payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentResponse {
    pub id: i32,
    pub user_id: i32,
    pub barber_id: i32,
    pub specialty_id: i32,
    #[schema(example = "2025-06-02")]
    pub appointment_date: NaiveDate,
    #[schema(value_type = String, example = "09:30:00")]
    pub appointment_time: NaiveTime,
    #[schema(example = "scheduled")]
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Appointment> for AppointmentResponse {
    fn from(value: Appointment) -> Self {
        Self {
            id: value.id.get(),
            user_id: value.user_id.get(),
            barber_id: value.barber_id.get(),
            specialty_id: value.specialty_id.get(),
            appointment_date: value.appointment_date,
            appointment_time: value.appointment_time,
            status: value.status.as_str().to_owned(),
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Appointment with barber, specialty and customer names.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentDetailsResponse {
    #[serde(flatten)]
    pub appointment: AppointmentResponse,
    pub barber_name: String,
    pub specialty_name: String,
    pub user_name: String,
    pub user_email: String,
}

impl From<AppointmentDetails> for AppointmentDetailsResponse {
    fn from(value: AppointmentDetails) -> Self {
        Self {
            appointment: value.appointment.into(),
            barber_name: value.barber_name,
            specialty_name: value.specialty_name,
            user_name: value.user_name,
            user_email: value.user_email,
        }
    }
}

/// Lifecycle transition confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentTransitionResponse {
    pub message: String,
    pub appointment: AppointmentResponse,
}

/// Query for free slots.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AvailableSlotsQuery {
    /// Barber to check.
    pub barber_id: Option<String>,
    /// Day to check, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Optional filters for the full listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilterQuery {
    /// Only this day, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `scheduled`, `cancelled` or `completed`.
    pub status: Option<String>,
}

/// Booking body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct BookAppointmentBody {
    #[schema(value_type = Option<i32>)]
    pub barber_id: Option<IdInput>,
    #[schema(value_type = Option<i32>)]
    pub specialty_id: Option<IdInput>,
    #[schema(example = "2025-06-02")]
    pub appointment_date: Option<String>,
    #[schema(example = "09:30")]
    pub appointment_time: Option<String>,
}

impl TryFrom<BookAppointmentBody> for BookAppointmentRequest {
    type Error = Error;

    fn try_from(value: BookAppointmentBody) -> Result<Self, Self::Error> {
        let (Some(barber_id), Some(specialty_id), Some(date), Some(time)) = (
            value.barber_id,
            value.specialty_id,
            value.appointment_date,
            value.appointment_time,
        ) else {
            return Err(missing_field_error(
                FieldName::new("appointment"),
                BOOKING_FIELDS_REQUIRED,
            ));
        };
        Ok(Self {
            barber_id: BarberId::new(parse_id_input(
                &barber_id,
                FieldName::new("barber_id"),
                INVALID_BOOKING_IDS,
            )?),
            specialty_id: SpecialtyId::new(parse_id_input(
                &specialty_id,
                FieldName::new("specialty_id"),
                INVALID_BOOKING_IDS,
            )?),
            appointment_date: parse_date(&date, FieldName::new("appointment_date"))?,
            appointment_time: parse_time(&time, FieldName::new("appointment_time"))?,
        })
    }
}

impl TryFrom<AppointmentFilterQuery> for AppointmentFilter {
    type Error = Error;

    fn try_from(value: AppointmentFilterQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            date: value
                .date
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| parse_date(&raw, FieldName::new("date")))
                .transpose()?,
            status: value
                .status
                .filter(|raw| !raw.trim().is_empty())
                .map(|raw| parse_status(&raw, FieldName::new("status")))
                .transpose()?,
        })
    }
}

fn appointment_id(raw: &str) -> ApiResult<AppointmentId> {
    parse_id(raw, FieldName::new("id"), INVALID_ID).map(AppointmentId::new)
}

fn listing(details: Vec<AppointmentDetails>) -> HttpResponse {
    let body: Vec<AppointmentDetailsResponse> = details.into_iter().map(Into::into).collect();
    HttpResponse::Ok()
        .insert_header(private_no_cache_header())
        .json(body)
}

/// Free start times for a barber on a day: the 20-slot grid minus
/// scheduled bookings.
#[utoipa::path(
    get,
    path = "/api/appointments/available-slots",
    params(AvailableSlotsQuery),
    responses(
        (status = 200, description = "Free slots as HH:MM:SS", body = [String]),
        (status = 400, description = "Missing or invalid parameters", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "availableSlots",
    security(("BearerAuth" = []))
)]
#[get("/appointments/available-slots")]
pub async fn available_slots(
    state: web::Data<HttpState>,
    _caller: Caller,
    query: web::Query<AvailableSlotsQuery>,
) -> ApiResult<web::Json<Vec<String>>> {
    let AvailableSlotsQuery { barber_id, date } = query.into_inner();
    let (Some(barber_id), Some(date)) = (
        barber_id.filter(|raw| !raw.is_empty()),
        date.filter(|raw| !raw.is_empty()),
    ) else {
        return Err(missing_field_error(
            FieldName::new("barberId"),
            SLOTS_FIELDS_REQUIRED,
        ));
    };
    let barber_id = parse_id(&barber_id, FieldName::new("barberId"), INVALID_BARBER_ID)?;
    let date = parse_date(&date, FieldName::new("date"))?;
    let slots = state
        .appointments_query
        .available_slots(BarberId::new(barber_id), date)
        .await?;
    Ok(web::Json(
        slots
            .into_iter()
            .map(|slot| slot.format("%H:%M:%S").to_string())
            .collect(),
    ))
}

/// Book a slot for the caller.
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = BookAppointmentBody,
    responses(
        (status = 201, description = "Booked", body = AppointmentResponse),
        (status = 400, description = "Invalid request or slot unavailable", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "bookAppointment",
    security(("BearerAuth" = []))
)]
#[post("/appointments")]
pub async fn book_appointment(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<BookAppointmentBody>,
) -> ApiResult<HttpResponse> {
    let request = BookAppointmentRequest::try_from(payload.into_inner())?;
    let appointment = state.appointments.book(caller.user(), request).await?;
    Ok(HttpResponse::Created().json(AppointmentResponse::from(appointment)))
}

/// The caller's appointments, newest first.
#[utoipa::path(
    get,
    path = "/api/appointments/my-appointments",
    responses(
        (status = 200, description = "Caller's appointments", body = [AppointmentDetailsResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "myAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments/my-appointments")]
pub async fn my_appointments(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let details = state
        .appointments_query
        .my_appointments(caller.user())
        .await?;
    Ok(listing(details))
}

/// Cancel an appointment at least two hours ahead.
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/cancel",
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Cancelled", body = AppointmentTransitionResponse),
        (status = 400, description = "Not scheduled or too late", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "cancelAppointment",
    security(("BearerAuth" = []))
)]
#[patch("/appointments/{id}/cancel")]
pub async fn cancel_appointment(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentTransitionResponse>> {
    let id = appointment_id(&path)?;
    let appointment = state.appointments.cancel(caller.user(), id).await?;
    Ok(web::Json(AppointmentTransitionResponse {
        message: APPOINTMENT_CANCELLED.to_owned(),
        appointment: appointment.into(),
    }))
}

/// Mark an appointment as served (administrators only).
#[utoipa::path(
    patch,
    path = "/api/appointments/{id}/complete",
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Completed", body = AppointmentTransitionResponse),
        (status = 400, description = "Not scheduled", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "completeAppointment",
    security(("BearerAuth" = []))
)]
#[patch("/appointments/{id}/complete")]
pub async fn complete_appointment(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentTransitionResponse>> {
    let id = appointment_id(&path)?;
    let appointment = state.appointments.complete(caller.user(), id).await?;
    Ok(web::Json(AppointmentTransitionResponse {
        message: APPOINTMENT_COMPLETED.to_owned(),
        appointment: appointment.into(),
    }))
}

/// Every appointment, optionally filtered (administrators only).
#[utoipa::path(
    get,
    path = "/api/appointments/all",
    params(AppointmentFilterQuery),
    responses(
        (status = 200, description = "Appointments by date and time", body = [AppointmentDetailsResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "allAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments/all")]
pub async fn all_appointments(
    state: web::Data<HttpState>,
    caller: Caller,
    query: web::Query<AppointmentFilterQuery>,
) -> ApiResult<HttpResponse> {
    let filter = AppointmentFilter::try_from(query.into_inner())?;
    let details = state.appointments_query.all(caller.user(), filter).await?;
    Ok(listing(details))
}

/// Scheduled appointments for today (administrators only).
#[utoipa::path(
    get,
    path = "/api/appointments/today",
    responses(
        (status = 200, description = "Today's schedule", body = [AppointmentDetailsResponse]),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "todayAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments/today")]
pub async fn today_appointments(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let details = state.appointments_query.today(caller.user()).await?;
    Ok(listing(details))
}

/// Scheduled appointments after today (administrators only).
#[utoipa::path(
    get,
    path = "/api/appointments/future",
    responses(
        (status = 200, description = "Upcoming schedule", body = [AppointmentDetailsResponse]),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["appointments"],
    operation_id = "futureAppointments",
    security(("BearerAuth" = []))
)]
#[get("/appointments/future")]
pub async fn future_appointments(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<HttpResponse> {
    let details = state.appointments_query.future(caller.user()).await?;
    Ok(listing(details))
}

#[cfg(test)]
#[path = "appointments_tests.rs"]
mod tests;
