//! Account endpoints: registration, login and the caller's profile.
//!
//! ```text
//! POST /api/auth/register {"name":"João","email":"joao@email.com","password":"senha123"}
//! POST /api/auth/login {"email":"joao@email.com","password":"senha123"}
//! GET /api/auth/profile
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthSession, LoginCredentials, Registration, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Registration request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "João Silva")]
    pub name: Option<String>,
    #[schema(example = "joao@email.com")]
    pub email: Option<String>,
    #[schema(example = "senha123")]
    pub password: Option<String>,
}

impl From<RegisterRequest> for Registration {
    fn from(value: RegisterRequest) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            password: value.password.unwrap_or_default(),
        }
    }
}

/// Login request body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "joao@email.com")]
    pub email: Option<String>,
    #[schema(example = "senha123")]
    pub password: Option<String>,
}

impl From<LoginRequest> for LoginCredentials {
    fn from(value: LoginRequest) -> Self {
        Self {
            email: value.email.unwrap_or_default(),
            password: value.password.unwrap_or_default(),
        }
    }
}

/// Public account payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Account plus the bearer token to use on later requests.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.user.into(),
            token: session.token,
        }
    }
}

/// Register a customer account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Missing fields, short password or email taken", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let session = state
        .accounts
        .register(payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(AuthResponse::from(session)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Missing fields", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<AuthResponse>> {
    let session = state.accounts.login(payload.into_inner().into()).await?;
    Ok(web::Json(session.into()))
}

/// The authenticated caller's account.
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Account no longer exists", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "profile",
    security(("BearerAuth" = []))
)]
#[get("/auth/profile")]
pub async fn profile(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.accounts.profile(caller.user()).await?;
    Ok(web::Json(user.into()))
}
