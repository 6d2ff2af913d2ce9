//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct which generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the shared
//! error schema, and the session cookie security scheme. The generated
//! document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::feedback::{FeedbackPayload, FeedbackResponse};
use crate::inbound::http::users::{LoginRequest, ProfileResponse, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Feedback backend API",
        description = "Session-authenticated CRUD for user accounts and their feedback entries."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::profile,
        crate::inbound::http::users::delete_account,
        crate::inbound::http::feedback::create_feedback,
        crate::inbound::http::feedback::list_feedback,
        crate::inbound::http::feedback::get_feedback,
        crate::inbound::http::feedback::update_feedback,
        crate::inbound::http::feedback::delete_feedback,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        UserResponse,
        ProfileResponse,
        FeedbackPayload,
        FeedbackResponse,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "users", description = "Account registration, sessions, and profiles"),
        (name = "feedback", description = "Feedback entries owned by accounts"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
