use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, Error};

use crate::middleware::{
    cors_middleware, RequestTrace, SecurityHeaders, StructuredLogger, TraceSpan,
};
use crate::routes;
use crate::state::AppState;

/// Assemble the gateway application.
///
/// Shared by `main` and the integration tests so both run the same
/// middleware stack. `RequestTrace` is outermost, so every response
/// (including CORS rejections) carries `x-request-id`.
pub fn create_app(
    state: web::Data<AppState>,
    cors_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(cors_middleware(cors_origins))
        .wrap(SecurityHeaders)
        .wrap(StructuredLogger)
        .wrap(TraceSpan)
        .wrap(RequestTrace)
        .app_data(state)
        .configure(routes::configure)
}
