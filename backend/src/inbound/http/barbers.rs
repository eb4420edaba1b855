//! Barber endpoints.
//!
//! ```text
//! GET /api/barbers
//! GET /api/barbers/{id}
//! GET /api/barbers/specialty/{specialtyId}
//! POST /api/barbers {"name":"Carlos","age":30,"hire_date":"2020-01-15","specialty_ids":[1,2]}
//! PUT /api/barbers/{id} {"active":false}
//! DELETE /api/barbers/{id}
//! GET /api/barbers/{id}/specialties
//! PUT /api/barbers/{id}/specialties {"specialty_ids":[1,3]}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::{
    Barber, BarberId, BarberPatch, BarberProfile, Error, NewBarber, SpecialtyId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::specialties::SpecialtyResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, INVALID_ID, IdInput, missing_field_error, parse_date, parse_id, parse_id_input,
};

const BARBER_DELETED: &str = "Barbeiro deletado com sucesso";
const SPECIALTIES_UPDATED: &str = "Especialidades atualizadas com sucesso";
const FIELDS_REQUIRED: &str = "Nome, idade e data de contratação são obrigatórios";
const SPECIALTY_IDS_NOT_ARRAY: &str = "specialty_ids deve ser um array de IDs de especialidades";
const INVALID_SPECIALTY_IDS: &str = "IDs de especialidades inválidos";
const INVALID_SPECIALTY_ID: &str = "ID de especialidade inválido";

/// Barber payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BarberResponse {
    pub id: i32,
    #[schema(example = "Carlos Silva")]
    pub name: String,
    pub age: i32,
    pub hire_date: NaiveDate,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Barber> for BarberResponse {
    fn from(value: Barber) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            age: value.age,
            hire_date: value.hire_date,
            active: value.active,
            created_at: value.created_at,
        }
    }
}

/// Barber with the specialties they offer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BarberProfileResponse {
    #[serde(flatten)]
    pub barber: BarberResponse,
    pub specialties: Vec<SpecialtyResponse>,
}

impl From<BarberProfile> for BarberProfileResponse {
    fn from(value: BarberProfile) -> Self {
        Self {
            barber: value.barber.into(),
            specialties: value.specialties.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body for creating a barber.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateBarberRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    #[schema(example = "2020-01-15")]
    pub hire_date: Option<String>,
    #[schema(value_type = Option<Vec<i32>>)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialty_ids: Option<Vec<IdInput>>,
}

/// Body for a partial barber update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateBarberRequest {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub hire_date: Option<String>,
    pub active: Option<bool>,
}

/// Body replacing a barber's specialty set.
///
/// The field is kept loosely typed so a non-array gets the dedicated
/// message instead of a generic parse failure.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReplaceSpecialtiesRequest {
    #[schema(value_type = Vec<i32>)]
    pub specialty_ids: Option<Value>,
}

/// Deletion confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BarberDeletedResponse {
    pub message: String,
    pub barber: BarberResponse,
}

/// The specialty set after replacement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpecialtiesUpdatedResponse {
    pub message: String,
    pub specialties: Vec<SpecialtyResponse>,
}

fn barber_id(raw: &str) -> ApiResult<BarberId> {
    parse_id(raw, FieldName::new("id"), INVALID_ID).map(BarberId::new)
}

fn specialty_ids(inputs: &[IdInput], message: &str) -> ApiResult<Vec<SpecialtyId>> {
    let field = FieldName::new("specialty_ids");
    inputs
        .iter()
        .map(|input| parse_id_input(input, field, message).map(SpecialtyId::new))
        .collect()
}

fn specialty_ids_from_value(value: Option<Value>) -> ApiResult<Vec<SpecialtyId>> {
    let field = FieldName::new("specialty_ids");
    let Some(Value::Array(items)) = value else {
        return Err(missing_field_error(field, SPECIALTY_IDS_NOT_ARRAY));
    };
    let inputs = items
        .into_iter()
        .map(serde_json::from_value::<IdInput>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| Error::invalid_request(INVALID_SPECIALTY_IDS))?;
    specialty_ids(&inputs, INVALID_SPECIALTY_IDS)
}

impl TryFrom<CreateBarberRequest> for NewBarber {
    type Error = Error;

    fn try_from(value: CreateBarberRequest) -> Result<Self, Self::Error> {
        let (Some(name), Some(age), Some(hire_date)) = (value.name, value.age, value.hire_date)
        else {
            return Err(missing_field_error(FieldName::new("name"), FIELDS_REQUIRED));
        };
        if name.trim().is_empty() || hire_date.trim().is_empty() {
            return Err(missing_field_error(FieldName::new("name"), FIELDS_REQUIRED));
        }
        Ok(Self {
            name,
            age,
            hire_date: parse_date(&hire_date, FieldName::new("hire_date"))?,
            specialty_ids: specialty_ids(
                value.specialty_ids.as_deref().unwrap_or_default(),
                INVALID_SPECIALTY_IDS,
            )?,
        })
    }
}

impl TryFrom<UpdateBarberRequest> for BarberPatch {
    type Error = Error;

    fn try_from(value: UpdateBarberRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value.name,
            age: value.age,
            hire_date: value
                .hire_date
                .map(|raw| parse_date(&raw, FieldName::new("hire_date")))
                .transpose()?,
            active: value.active,
        })
    }
}

/// Active barbers ordered by name.
#[utoipa::path(
    get,
    path = "/api/barbers",
    responses(
        (status = 200, description = "Active barbers", body = [BarberResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "listBarbers",
    security(("BearerAuth" = []))
)]
#[get("/barbers")]
pub async fn list_barbers(
    state: web::Data<HttpState>,
    _caller: Caller,
) -> ApiResult<web::Json<Vec<BarberResponse>>> {
    let barbers = state.barbers_query.list_active().await?;
    Ok(web::Json(barbers.into_iter().map(Into::into).collect()))
}

/// Active barbers offering a specialty.
#[utoipa::path(
    get,
    path = "/api/barbers/specialty/{specialtyId}",
    params(("specialtyId" = i32, Path, description = "Specialty id")),
    responses(
        (status = 200, description = "Barbers offering the specialty", body = [BarberResponse]),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "listBarbersBySpecialty",
    security(("BearerAuth" = []))
)]
#[get("/barbers/specialty/{specialty_id}")]
pub async fn barbers_by_specialty(
    state: web::Data<HttpState>,
    _caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<BarberResponse>>> {
    let id = parse_id(&path, FieldName::new("specialtyId"), INVALID_SPECIALTY_ID)?;
    let barbers = state
        .barbers_query
        .by_specialty(SpecialtyId::new(id))
        .await?;
    Ok(web::Json(barbers.into_iter().map(Into::into).collect()))
}

/// A barber with their specialties.
#[utoipa::path(
    get,
    path = "/api/barbers/{id}",
    params(("id" = i32, Path, description = "Barber id")),
    responses(
        (status = 200, description = "Barber", body = BarberProfileResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "getBarber",
    security(("BearerAuth" = []))
)]
#[get("/barbers/{id}")]
pub async fn get_barber(
    state: web::Data<HttpState>,
    _caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BarberProfileResponse>> {
    let profile = state.barbers_query.profile(barber_id(&path)?).await?;
    Ok(web::Json(profile.into()))
}

/// Create a barber (administrators only).
#[utoipa::path(
    post,
    path = "/api/barbers",
    request_body = CreateBarberRequest,
    responses(
        (status = 201, description = "Created", body = BarberResponse),
        (status = 400, description = "Missing fields, invalid age or unknown specialties", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "createBarber",
    security(("BearerAuth" = []))
)]
#[post("/barbers")]
pub async fn create_barber(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreateBarberRequest>,
) -> ApiResult<HttpResponse> {
    let barber = NewBarber::try_from(payload.into_inner())?;
    let created = state.barbers.create(caller.user(), barber).await?;
    Ok(HttpResponse::Created().json(BarberResponse::from(created)))
}

/// Partially update a barber (administrators only).
#[utoipa::path(
    put,
    path = "/api/barbers/{id}",
    params(("id" = i32, Path, description = "Barber id")),
    request_body = UpdateBarberRequest,
    responses(
        (status = 200, description = "Updated", body = BarberResponse),
        (status = 400, description = "Invalid age", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "updateBarber",
    security(("BearerAuth" = []))
)]
#[put("/barbers/{id}")]
pub async fn update_barber(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<UpdateBarberRequest>,
) -> ApiResult<web::Json<BarberResponse>> {
    let id = barber_id(&path)?;
    let patch = BarberPatch::try_from(payload.into_inner())?;
    let barber = state.barbers.update(caller.user(), id, patch).await?;
    Ok(web::Json(barber.into()))
}

/// Delete a barber without appointments (administrators only).
#[utoipa::path(
    delete,
    path = "/api/barbers/{id}",
    params(("id" = i32, Path, description = "Barber id")),
    responses(
        (status = 200, description = "Deleted", body = BarberDeletedResponse),
        (status = 400, description = "Barber has appointments", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "deleteBarber",
    security(("BearerAuth" = []))
)]
#[delete("/barbers/{id}")]
pub async fn delete_barber(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<BarberDeletedResponse>> {
    let id = barber_id(&path)?;
    let barber = state.barbers.delete(caller.user(), id).await?;
    Ok(web::Json(BarberDeletedResponse {
        message: BARBER_DELETED.to_owned(),
        barber: barber.into(),
    }))
}

/// A barber's specialties (administrators only).
#[utoipa::path(
    get,
    path = "/api/barbers/{id}/specialties",
    params(("id" = i32, Path, description = "Barber id")),
    responses(
        (status = 200, description = "Specialties", body = [SpecialtyResponse]),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Barber not found", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "getBarberSpecialties",
    security(("BearerAuth" = []))
)]
#[get("/barbers/{id}/specialties")]
pub async fn barber_specialties(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<SpecialtyResponse>>> {
    let id = barber_id(&path)?;
    let specialties = state.barbers_query.specialties(caller.user(), id).await?;
    Ok(web::Json(specialties.into_iter().map(Into::into).collect()))
}

/// Replace a barber's specialty set (administrators only).
#[utoipa::path(
    put,
    path = "/api/barbers/{id}/specialties",
    params(("id" = i32, Path, description = "Barber id")),
    request_body = ReplaceSpecialtiesRequest,
    responses(
        (status = 200, description = "Specialties replaced", body = SpecialtiesUpdatedResponse),
        (status = 400, description = "Not an array, invalid or unknown ids", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Barber not found", body = ErrorSchema)
    ),
    tags = ["barbers"],
    operation_id = "replaceBarberSpecialties",
    security(("BearerAuth" = []))
)]
#[put("/barbers/{id}/specialties")]
pub async fn replace_barber_specialties(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<ReplaceSpecialtiesRequest>,
) -> ApiResult<web::Json<SpecialtiesUpdatedResponse>> {
    let id = barber_id(&path)?;
    let ids = specialty_ids_from_value(payload.into_inner().specialty_ids)?;
    let specialties = state
        .barbers
        .replace_specialties(caller.user(), id, ids)
        .await?;
    Ok(web::Json(SpecialtiesUpdatedResponse {
        message: SPECIALTIES_UPDATED.to_owned(),
        specialties: specialties.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Specialty, UserId};
    use crate::inbound::http::test_utils::{
        BEARER, TestPorts, admin, customer, date, fixture_timestamp,
    };
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    fn carlos() -> Barber {
        Barber {
            id: BarberId::new(1),
            name: "Carlos Silva".to_owned(),
            age: 30,
            hire_date: date(2020, 1, 15),
            active: true,
            created_at: fixture_timestamp(),
        }
    }

    fn barba() -> Specialty {
        Specialty {
            id: SpecialtyId::new(2),
            name: "Barba".to_owned(),
            description: None,
            created_at: fixture_timestamp(),
        }
    }

    async fn call(ports: TestPorts, req: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_data())
                .service(list_barbers)
                .service(barbers_by_specialty)
                .service(get_barber)
                .service(create_barber)
                .service(update_barber)
                .service(delete_barber)
                .service(barber_specialties)
                .service(replace_barber_specialties),
        )
        .await;
        let res = actix_test::call_service(&app, req.insert_header((AUTHORIZATION, BEARER)).to_request())
            .await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_flattens_barber_fields() {
        let mut ports = TestPorts::default().authenticate_as(customer(2));
        ports
            .barbers_query
            .expect_profile()
            .withf(|id| *id == BarberId::new(1))
            .return_once(|_| {
                Ok(BarberProfile {
                    barber: carlos(),
                    specialties: vec![barba()],
                })
            });

        let (status, body) = call(ports, actix_test::TestRequest::get().uri("/barbers/1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Carlos Silva");
        assert_eq!(body["hire_date"], "2020-01-15");
        assert_eq!(body["specialties"][0]["name"], "Barba");
    }

    #[rstest]
    #[actix_web::test]
    async fn by_specialty_routes_ahead_of_id_lookup() {
        let mut ports = TestPorts::default().authenticate_as(customer(2));
        ports
            .barbers_query
            .expect_by_specialty()
            .withf(|id| *id == SpecialtyId::new(2))
            .return_once(|_| Ok(vec![carlos()]));

        let (status, body) =
            call(ports, actix_test::TestRequest::get().uri("/barbers/specialty/2")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], 1);
    }

    #[rstest]
    #[case(json!({"age": 30, "hire_date": "2020-01-15"}))]
    #[case(json!({"name": "Carlos", "hire_date": "2020-01-15"}))]
    #[case(json!({"name": "Carlos", "age": 30}))]
    #[case(json!({"name": "  ", "age": 30, "hire_date": "2020-01-15"}))]
    #[actix_web::test]
    async fn create_requires_name_age_and_hire_date(#[case] payload: Value) {
        let ports = TestPorts::default().authenticate_as(admin());

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post().uri("/barbers").set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], FIELDS_REQUIRED);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_accepts_numeric_string_specialty_ids() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .barbers
            .expect_create()
            .withf(|_, barber| {
                barber.specialty_ids == vec![SpecialtyId::new(1), SpecialtyId::new(2)]
                    && barber.hire_date == date(2020, 1, 15)
            })
            .return_once(|_, _| Ok(carlos()));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post().uri("/barbers").set_json(json!({
                "name": "Carlos Silva",
                "age": 30,
                "hire_date": "2020-01-15",
                "specialty_ids": [1, "2"]
            })),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_reports_barbers_with_appointments() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports.barbers.expect_delete().return_once(|_, _| {
            Err(Error::conflict(
                "Não é possível deletar este barbeiro pois ele possui agendamentos",
            ))
        });

        let (status, body) = call(ports, actix_test::TestRequest::delete().uri("/barbers/1")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Não é possível deletar este barbeiro pois ele possui agendamentos"
        );
    }

    #[rstest]
    #[case(json!({"specialty_ids": "1,2"}), SPECIALTY_IDS_NOT_ARRAY)]
    #[case(json!({}), SPECIALTY_IDS_NOT_ARRAY)]
    #[case(json!({"specialty_ids": [1, "x"]}), INVALID_SPECIALTY_IDS)]
    #[case(json!({"specialty_ids": [1, null]}), INVALID_SPECIALTY_IDS)]
    #[actix_web::test]
    async fn replace_validates_the_id_array(#[case] payload: Value, #[case] message: &str) {
        let ports = TestPorts::default().authenticate_as(admin());

        let (status, body) = call(
            ports,
            actix_test::TestRequest::put()
                .uri("/barbers/1/specialties")
                .set_json(payload),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], message);
    }

    #[rstest]
    #[actix_web::test]
    async fn replace_returns_the_new_set() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .barbers
            .expect_replace_specialties()
            .withf(|caller, id, ids| {
                caller.user_id == UserId::new(1)
                    && *id == BarberId::new(1)
                    && ids == &vec![SpecialtyId::new(2)]
            })
            .return_once(|_, _, _| Ok(vec![barba()]));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::put()
                .uri("/barbers/1/specialties")
                .set_json(json!({"specialty_ids": [2]})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], SPECIALTIES_UPDATED);
        assert_eq!(body["specialties"][0]["id"], 2);
    }
}
