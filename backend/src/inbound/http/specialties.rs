//! Specialty catalogue endpoints.
//!
//! ```text
//! GET /api/specialties
//! GET /api/specialties/{id}
//! POST /api/specialties {"name":"Corte","description":"Corte tradicional"}
//! PUT /api/specialties/{id} {"description":"Corte com tesoura"}
//! DELETE /api/specialties/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{NewSpecialty, Specialty, SpecialtyId, SpecialtyPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, INVALID_ID, parse_id};

const SPECIALTY_DELETED: &str = "Especialidade deletada com sucesso";

/// Specialty payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpecialtyResponse {
    pub id: i32,
    #[schema(example = "Corte")]
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Specialty> for SpecialtyResponse {
    fn from(value: Specialty) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            description: value.description,
            created_at: value.created_at,
        }
    }
}

/// Body for creating a specialty.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateSpecialtyRequest {
    #[schema(example = "Barba")]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Body for a partial specialty update.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateSpecialtyRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Deletion confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpecialtyDeletedResponse {
    pub message: String,
    pub specialty: SpecialtyResponse,
}

pub(crate) fn specialty_id(raw: &str) -> ApiResult<SpecialtyId> {
    parse_id(raw, FieldName::new("id"), INVALID_ID).map(SpecialtyId::new)
}

/// List every specialty ordered by name.
#[utoipa::path(
    get,
    path = "/api/specialties",
    responses(
        (status = 200, description = "Specialties", body = [SpecialtyResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["specialties"],
    operation_id = "listSpecialties",
    security(("BearerAuth" = []))
)]
#[get("/specialties")]
pub async fn list_specialties(
    state: web::Data<HttpState>,
    _caller: Caller,
) -> ApiResult<web::Json<Vec<SpecialtyResponse>>> {
    let specialties = state.specialties_query.list().await?;
    Ok(web::Json(specialties.into_iter().map(Into::into).collect()))
}

/// Fetch one specialty.
#[utoipa::path(
    get,
    path = "/api/specialties/{id}",
    params(("id" = i32, Path, description = "Specialty id")),
    responses(
        (status = 200, description = "Specialty", body = SpecialtyResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["specialties"],
    operation_id = "getSpecialty",
    security(("BearerAuth" = []))
)]
#[get("/specialties/{id}")]
pub async fn get_specialty(
    state: web::Data<HttpState>,
    _caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<SpecialtyResponse>> {
    let id = specialty_id(&path)?;
    let specialty = state.specialties_query.get(id).await?;
    Ok(web::Json(specialty.into()))
}

/// Create a specialty (administrators only).
#[utoipa::path(
    post,
    path = "/api/specialties",
    request_body = CreateSpecialtyRequest,
    responses(
        (status = 201, description = "Created", body = SpecialtyResponse),
        (status = 400, description = "Missing name or duplicate", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["specialties"],
    operation_id = "createSpecialty",
    security(("BearerAuth" = []))
)]
#[post("/specialties")]
pub async fn create_specialty(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CreateSpecialtyRequest>,
) -> ApiResult<HttpResponse> {
    let CreateSpecialtyRequest { name, description } = payload.into_inner();
    let specialty = state
        .specialties
        .create(
            caller.user(),
            NewSpecialty {
                name: name.unwrap_or_default(),
                description,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(SpecialtyResponse::from(specialty)))
}

/// Partially update a specialty (administrators only).
#[utoipa::path(
    put,
    path = "/api/specialties/{id}",
    params(("id" = i32, Path, description = "Specialty id")),
    request_body = UpdateSpecialtyRequest,
    responses(
        (status = 200, description = "Updated", body = SpecialtyResponse),
        (status = 400, description = "Empty update or duplicate name", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["specialties"],
    operation_id = "updateSpecialty",
    security(("BearerAuth" = []))
)]
#[put("/specialties/{id}")]
pub async fn update_specialty(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
    payload: web::Json<UpdateSpecialtyRequest>,
) -> ApiResult<web::Json<SpecialtyResponse>> {
    let id = specialty_id(&path)?;
    let UpdateSpecialtyRequest { name, description } = payload.into_inner();
    let specialty = state
        .specialties
        .update(caller.user(), id, SpecialtyPatch { name, description })
        .await?;
    Ok(web::Json(specialty.into()))
}

/// Delete an unused specialty (administrators only).
#[utoipa::path(
    delete,
    path = "/api/specialties/{id}",
    params(("id" = i32, Path, description = "Specialty id")),
    responses(
        (status = 200, description = "Deleted", body = SpecialtyDeletedResponse),
        (status = 400, description = "Specialty in use", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["specialties"],
    operation_id = "deleteSpecialty",
    security(("BearerAuth" = []))
)]
#[delete("/specialties/{id}")]
pub async fn delete_specialty(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<String>,
) -> ApiResult<web::Json<SpecialtyDeletedResponse>> {
    let id = specialty_id(&path)?;
    let specialty = state.specialties.delete(caller.user(), id).await?;
    Ok(web::Json(SpecialtyDeletedResponse {
        message: SPECIALTY_DELETED.to_owned(),
        specialty: specialty.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::{BEARER, TestPorts, admin, customer, fixture_timestamp};
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn corte() -> Specialty {
        Specialty {
            id: SpecialtyId::new(1),
            name: "Corte".to_owned(),
            description: Some("Corte tradicional".to_owned()),
            created_at: fixture_timestamp(),
        }
    }

    async fn call(ports: TestPorts, req: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_data())
                .service(list_specialties)
                .service(get_specialty)
                .service(create_specialty)
                .service(update_specialty)
                .service(delete_specialty),
        )
        .await;
        let res = actix_test::call_service(&app, req.insert_header((AUTHORIZATION, BEARER)).to_request())
            .await;
        let status = res.status();
        (status, actix_test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn list_serialises_snake_case_rows() {
        let mut ports = TestPorts::default().authenticate_as(customer(2));
        ports
            .specialties_query
            .expect_list()
            .return_once(|| Ok(vec![corte()]));

        let (status, body) = call(ports, actix_test::TestRequest::get().uri("/specialties")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["name"], "Corte");
        assert_eq!(body[0]["created_at"], "2025-06-01T12:00:00Z");
    }

    #[rstest]
    #[case("abc")]
    #[case("0")]
    #[actix_web::test]
    async fn malformed_ids_are_rejected_before_lookup(#[case] raw: &str) {
        let ports = TestPorts::default().authenticate_as(customer(2));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::get().uri(&format!("/specialties/{raw}")),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], INVALID_ID);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_passes_missing_name_as_blank() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .specialties
            .expect_create()
            .withf(|_, specialty| specialty.name.is_empty())
            .return_once(|_, _| Err(Error::invalid_request("Nome é obrigatório")));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/specialties")
                .set_json(json!({"description": "sem nome"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Nome é obrigatório");
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_names_surface_as_bad_request() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .specialties
            .expect_create()
            .return_once(|_, _| Err(Error::conflict("Especialidade já existe")));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post()
                .uri("/specialties")
                .set_json(json!({"name": "Corte"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Especialidade já existe");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_wraps_the_row_with_a_message() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .specialties
            .expect_delete()
            .withf(|_, id| *id == SpecialtyId::new(1))
            .return_once(|_, _| Ok(corte()));

        let (status, body) =
            call(ports, actix_test::TestRequest::delete().uri("/specialties/1")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], SPECIALTY_DELETED);
        assert_eq!(body["specialty"]["id"], 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn update_forwards_only_present_fields() {
        let mut ports = TestPorts::default().authenticate_as(admin());
        ports
            .specialties
            .expect_update()
            .withf(|_, _, patch| patch.name.is_none() && patch.description.is_some())
            .return_once(|_, _, _| Ok(corte()));

        let (status, _) = call(
            ports,
            actix_test::TestRequest::put()
                .uri("/specialties/1")
                .set_json(json!({"description": "Corte tradicional"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
    }
}
