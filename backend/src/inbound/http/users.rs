//! Account API handlers.
//!
//! ```text
//! POST   /api/v1/register         {"username":"alice","password":"secret1",...}
//! POST   /api/v1/login            {"username":"alice","password":"secret1"}
//! POST   /api/v1/logout
//! GET    /api/v1/users/{username}
//! DELETE /api/v1/users/{username}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    EmailAddress, Error, LoginCredentials, LoginValidationError, NewAccount, PersonName, User,
    Username, can_access_own_profile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::feedback::FeedbackResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Public view of an account. Never carries the stored credential.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            username: user.username().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            full_name: user.full_name(),
        }
    }
}

/// Profile view: the account plus its own feedback entries.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub feedback: Vec<FeedbackResponse>,
}

fn validation_error(field: &str, error: &impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn invalid_credentials() -> Error {
    // Deliberately identical for unknown usernames and wrong passwords.
    Error::unauthorized("invalid credentials")
}

fn parse_register_request(payload: RegisterRequest) -> ApiResult<NewAccount> {
    let username =
        Username::new(payload.username).map_err(|err| validation_error("username", &err))?;
    let email =
        EmailAddress::new(payload.email).map_err(|err| validation_error("email", &err))?;
    let first_name = PersonName::new(payload.first_name)
        .map_err(|err| validation_error("firstName", &err))?;
    let last_name =
        PersonName::new(payload.last_name).map_err(|err| validation_error("lastName", &err))?;

    NewAccount::new(username, &payload.password, email, first_name, last_name)
        .map_err(|err| validation_error("password", &err))
}

fn parse_target_username(raw: String) -> ApiResult<Username> {
    Username::new(raw).map_err(|err| validation_error("username", &err))
}

/// Register a new account and establish a session for it.
///
/// The new user stays logged in after registering, so the response already
/// carries the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let account = parse_register_request(payload.into_inner())?;
    let user = state.accounts.register(account).await?;
    session.persist_identity(user.username())?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Authenticate and establish a session.
///
/// The failure response never reveals whether the username exists.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = match LoginCredentials::try_from_parts(&payload.username, &payload.password) {
        Ok(credentials) => credentials,
        Err(LoginValidationError::EmptyPassword) => {
            return Err(validation_error(
                "password",
                &LoginValidationError::EmptyPassword,
            ));
        }
        // A malformed username cannot name an account; respond exactly like
        // a failed credential check.
        Err(LoginValidationError::InvalidUsername) => return Err(invalid_credentials()),
    };

    match state.accounts.authenticate(&credentials).await? {
        Some(user) => {
            session.persist_identity(user.username())?;
            Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
        }
        None => Err(invalid_credentials()),
    }
}

/// Clear the session. Logging out without a session is a no-op.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session cleared"),
    ),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> ApiResult<HttpResponse> {
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}

/// Show a user's profile with their feedback entries. Owner only.
#[utoipa::path(
    get,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Profile to view")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not the profile owner", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "getProfile"
)]
#[get("/users/{username}")]
pub async fn profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let target = parse_target_username(path.into_inner())?;
    let identity = session.identity()?;
    if !can_access_own_profile(identity.as_ref(), &target) {
        return Err(Error::unauthorized("you may only view your own profile"));
    }

    let user = state.accounts.profile(&target).await?;
    let entries = state.feedback.list_for_owner(&target).await?;
    Ok(web::Json(ProfileResponse {
        user: UserResponse::from(&user),
        feedback: entries.iter().map(FeedbackResponse::from).collect(),
    }))
}

/// Delete an account and, by cascade, all feedback it owns. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{username}",
    params(("username" = String, Path, description = "Account to delete")),
    responses(
        (status = 204, description = "Account deleted"),
        (status = 401, description = "Not the account owner", body = Error),
        (status = 404, description = "No such user", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteAccount"
)]
#[delete("/users/{username}")]
pub async fn delete_account(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let target = parse_target_username(path.into_inner())?;
    let identity = session.identity()?;
    if !can_access_own_profile(identity.as_ref(), &target) {
        return Err(Error::unauthorized("you may only delete your own account"));
    }

    state.accounts.delete(&target).await?;
    session.clear();
    Ok(HttpResponse::NoContent().finish())
}
