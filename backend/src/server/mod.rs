//! Server construction and middleware wiring.

mod config;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use settings::{ServerSettings, SettingsError};
pub use state_builders::build_http_state;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use clickbeard::Trace;
#[cfg(debug_assertions)]
use clickbeard::doc::ApiDoc;
use clickbeard::domain::Error;
use clickbeard::domain::ports::AdminBootstrap;
use clickbeard::inbound::http::configure_api;
use clickbeard::inbound::http::health::{HealthState, live, ready};
use clickbeard::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(web::scope("/api").configure(configure_api))
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Create the configured administrator unless the email is already taken.
///
/// # Errors
///
/// Propagates the domain error when the account cannot be validated or
/// stored.
pub async fn bootstrap_admin(
    http_state: &HttpState,
    settings: &ServerSettings,
) -> Result<(), Error> {
    let Some(registration) = settings.admin_registration() else {
        return Ok(());
    };
    match http_state.accounts.ensure_admin(registration).await? {
        AdminBootstrap::Created(user) => info!(user_id = %user.id, "administrator ready"),
        AdminBootstrap::AlreadyPresent => info!("administrator already registered"),
    }
    Ok(())
}

/// Construct an Actix HTTP server over prepared state.
///
/// Marks `health_state` ready once the socket is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    config: &ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
