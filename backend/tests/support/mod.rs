//! Shared helpers for HTTP integration tests.
//!
//! Each test builds the full `/api` surface over the in-memory store with a
//! clock pinned to Monday 2025-06-02 08:00 shop time.

use std::sync::Arc;
use std::time::Duration;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::{Method, StatusCode, header};
use actix_web::{App, test, web};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use mockable::Clock;
use serde_json::{Value, json};

use clickbeard::Trace;
use clickbeard::domain::{Registration, TRACE_ID_HEADER};
use clickbeard::inbound::http::configure_api;
use clickbeard::inbound::http::state::{HttpState, HttpStateAdapters};
use clickbeard::outbound::auth::{BcryptPasswordHasher, JwtTokenService};
use clickbeard::outbound::memory::MemoryStore;

pub const ADMIN_EMAIL: &str = "admin@clickbeard.com";
pub const ADMIN_PASSWORD: &str = "admin123";
const SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";

/// Clock pinned to a local wall-clock instant.
pub struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        Local
            .from_local_datetime(&self.0)
            .earliest()
            .expect("instant exists in the local zone")
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local().with_timezone(&Utc)
    }
}

/// Monday 2025-06-02, the day the shop clock reads.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 2).expect("valid date")
}

/// HTTP state over a fresh in-memory store, with an administrator seeded.
pub async fn seeded_state() -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(
        today().and_hms_opt(8, 0, 0).expect("valid time"),
    ));
    let store = Arc::new(MemoryStore::new(Arc::clone(&clock)));
    let state = HttpState::from_adapters(HttpStateAdapters {
        users: Arc::clone(&store),
        specialties: Arc::clone(&store),
        barbers: Arc::clone(&store),
        appointments: store,
        hasher: Arc::new(BcryptPasswordHasher::new(4)),
        tokens: Arc::new(JwtTokenService::new(
            SECRET,
            Duration::from_secs(3600),
            Arc::clone(&clock),
        )),
        clock,
    });
    state
        .accounts
        .ensure_admin(Registration {
            name: "Administrador".to_owned(),
            email: ADMIN_EMAIL.to_owned(),
            password: ADMIN_PASSWORD.to_owned(),
        })
        .await
        .expect("admin seeded");
    web::Data::new(state)
}

/// The application as the server mounts it, minus probes and docs.
pub fn app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(state)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
}

/// Status, trace id header and JSON body of one exchange.
pub struct Captured {
    pub status: StatusCode,
    pub trace_id: Option<String>,
    pub body: Value,
}

/// Send a JSON request, optionally authenticated.
pub async fn send<S, B>(
    app: &S,
    method: Method,
    path: &str,
    token: Option<&str>,
    payload: Option<Value>,
) -> Captured
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let mut request = test::TestRequest::default().method(method).uri(path);
    if let Some(token) = token {
        request = request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    if let Some(payload) = payload {
        request = request.set_json(payload);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let trace_id = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    Captured {
        status,
        trace_id,
        body,
    }
}

/// Log in and return the bearer token.
pub async fn login<S, B>(app: &S, email: &str, password: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": password})),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
    token_of(&res.body)
}

/// Register a customer and return the bearer token.
pub async fn register<S, B>(app: &S, name: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"name": name, "email": email, "password": "secret123"})),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
    token_of(&res.body)
}

fn token_of(body: &Value) -> String {
    body["token"].as_str().expect("token in body").to_owned()
}

/// Create a specialty as the administrator and return its id.
pub async fn create_specialty<S, B>(app: &S, admin: &str, name: &str) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = send(
        app,
        Method::POST,
        "/api/specialties",
        Some(admin),
        Some(json!({"name": name})),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    res.body["id"].as_i64().expect("specialty id")
}

/// Create a barber offering `specialties` and return its id.
pub async fn create_barber<S, B>(app: &S, admin: &str, name: &str, specialties: &[i64]) -> i64
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = send(
        app,
        Method::POST,
        "/api/barbers",
        Some(admin),
        Some(json!({
            "name": name,
            "age": 30,
            "hire_date": "2020-01-15",
            "specialty_ids": specialties,
        })),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    res.body["id"].as_i64().expect("barber id")
}
