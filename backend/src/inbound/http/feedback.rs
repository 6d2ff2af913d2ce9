//! Feedback API handlers.
//!
//! ```text
//! POST   /api/v1/users/{username}/feedback   {"title":"T","content":"C"}
//! GET    /api/v1/feedback
//! GET    /api/v1/feedback/{id}
//! PUT    /api/v1/feedback/{id}               {"title":"T","content":"C"}
//! DELETE /api/v1/feedback/{id}
//! ```
//!
//! The listing endpoints require any session; mutation endpoints require the
//! session identity to own the targeted entry. A missing entry is reported
//! before ownership is checked, mirroring resolve-then-authorise ordering.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, Feedback, FeedbackContent, FeedbackId, FeedbackTitle, NewFeedback, Username,
    can_access_own_profile, can_modify_feedback,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Request body shared by create and update.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub title: String,
    pub content: String,
}

/// Public view of a feedback entry.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub owner: String,
}

impl From<&Feedback> for FeedbackResponse {
    fn from(entry: &Feedback) -> Self {
        Self {
            id: entry.id().as_i32(),
            title: entry.title().to_string(),
            content: entry.content().to_string(),
            owner: entry.owner().to_string(),
        }
    }
}

fn validation_error(field: &str, error: &impl std::fmt::Display) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

fn parse_payload(payload: FeedbackPayload) -> ApiResult<(FeedbackTitle, FeedbackContent)> {
    let title =
        FeedbackTitle::new(payload.title).map_err(|err| validation_error("title", &err))?;
    let content =
        FeedbackContent::new(payload.content).map_err(|err| validation_error("content", &err))?;
    Ok((title, content))
}

/// Post a feedback entry under the given profile. Owner only.
#[utoipa::path(
    post,
    path = "/api/v1/users/{username}/feedback",
    params(("username" = String, Path, description = "Profile to post under")),
    request_body = FeedbackPayload,
    responses(
        (status = 201, description = "Entry created", body = FeedbackResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not the profile owner", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "createFeedback"
)]
#[post("/users/{username}/feedback")]
pub async fn create_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<FeedbackPayload>,
) -> ApiResult<HttpResponse> {
    let owner = Username::new(path.into_inner())
        .map_err(|err| validation_error("username", &err))?;
    let identity = session.identity()?;
    if !can_access_own_profile(identity.as_ref(), &owner) {
        return Err(Error::unauthorized("you may only post feedback as yourself"));
    }

    let (title, content) = parse_payload(payload.into_inner())?;
    let created = state
        .feedback
        .create(NewFeedback {
            title,
            content,
            owner,
        })
        .await?;
    Ok(HttpResponse::Created().json(FeedbackResponse::from(&created)))
}

/// List every feedback entry. Requires a session.
#[utoipa::path(
    get,
    path = "/api/v1/feedback",
    responses(
        (status = 200, description = "All entries", body = [FeedbackResponse]),
        (status = 401, description = "Login required", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "listFeedback"
)]
#[get("/feedback")]
pub async fn list_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<FeedbackResponse>>> {
    session.require_identity()?;
    let entries = state.feedback.list_all().await?;
    Ok(web::Json(
        entries.iter().map(FeedbackResponse::from).collect(),
    ))
}

/// Fetch a single feedback entry. Requires a session.
#[utoipa::path(
    get,
    path = "/api/v1/feedback/{id}",
    params(("id" = i32, Path, description = "Entry identifier")),
    responses(
        (status = 200, description = "Entry", body = FeedbackResponse),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such entry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "getFeedback"
)]
#[get("/feedback/{id}")]
pub async fn get_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<web::Json<FeedbackResponse>> {
    session.require_identity()?;
    let entry = state.feedback.get(FeedbackId::new(path.into_inner())).await?;
    Ok(web::Json(FeedbackResponse::from(&entry)))
}

/// Replace title and content of an entry. Owner only; no mutation happens
/// when the ownership check fails.
#[utoipa::path(
    put,
    path = "/api/v1/feedback/{id}",
    params(("id" = i32, Path, description = "Entry identifier")),
    request_body = FeedbackPayload,
    responses(
        (status = 200, description = "Updated entry", body = FeedbackResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Not the owner", body = Error),
        (status = 404, description = "No such entry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "updateFeedback"
)]
#[put("/feedback/{id}")]
pub async fn update_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
    payload: web::Json<FeedbackPayload>,
) -> ApiResult<web::Json<FeedbackResponse>> {
    let id = FeedbackId::new(path.into_inner());
    let identity = session.identity()?;
    let existing = state.feedback.get(id).await?;
    if !can_modify_feedback(identity.as_ref(), &existing) {
        return Err(Error::unauthorized("only the owner may edit this entry"));
    }

    let (title, content) = parse_payload(payload.into_inner())?;
    let updated = state.feedback.update(id, title, content).await?;
    Ok(web::Json(FeedbackResponse::from(&updated)))
}

/// Delete an entry. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/feedback/{id}",
    params(("id" = i32, Path, description = "Entry identifier")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Not the owner", body = Error),
        (status = 404, description = "No such entry", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["feedback"],
    operation_id = "deleteFeedback"
)]
#[delete("/feedback/{id}")]
pub async fn delete_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    let id = FeedbackId::new(path.into_inner());
    let identity = session.identity()?;
    let existing = state.feedback.get(id).await?;
    if !can_modify_feedback(identity.as_ref(), &existing) {
        return Err(Error::unauthorized("only the owner may delete this entry"));
    }

    state.feedback.delete(id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test, web};
    use serde_json::Value;

    use super::*;
    use crate::domain::{AccountService, FeedbackService};
    use crate::inbound::http::users::{RegisterRequest, register};
    use crate::test_support::InMemoryStore;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let store = Arc::new(InMemoryStore::default());
        let state = HttpState::new(
            AccountService::new(store.clone()),
            FeedbackService::new(store),
        );
        App::new()
            .app_data(web::Data::new(state))
            .wrap(crate::test_support::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(register)
                    .service(create_feedback)
                    .service(list_feedback)
                    .service(get_feedback)
                    .service(update_feedback)
                    .service(delete_feedback),
            )
    }

    async fn register_and_get_cookie(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        username: &str,
        email: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri("/api/v1/register")
                .set_json(RegisterRequest {
                    username: username.into(),
                    password: "secret1".into(),
                    email: email.into(),
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        res.response()
            .cookies()
            .find(|c| c.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    async fn create_entry(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        cookie: actix_web::cookie::Cookie<'static>,
        username: &str,
    ) -> i32 {
        let res = actix_test::call_service(
            app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/users/{username}/feedback"))
                .cookie(cookie)
                .set_json(FeedbackPayload {
                    title: "T".into(),
                    content: "C".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(res).await;
        i32::try_from(body.get("id").and_then(Value::as_i64).expect("entry id"))
            .expect("id fits in i32")
    }

    #[actix_web::test]
    async fn owner_creates_and_lists_entries() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_get_cookie(&app, "alice", "a@x.com").await;
        create_entry(&app, cookie.clone(), "alice").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/feedback")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        let entries = body.as_array().expect("array of entries");
        assert_eq!(entries.len(), 1);
        assert_eq!(
            entries.first().and_then(|e| e.get("owner")).and_then(Value::as_str),
            Some("alice")
        );
    }

    #[actix_web::test]
    async fn listing_requires_a_session() {
        let app = actix_test::init_service(test_app()).await;
        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/feedback")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn posting_under_someone_elses_profile_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        register_and_get_cookie(&app, "alice", "a@x.com").await;
        let bob_cookie = register_and_get_cookie(&app, "bob", "b@x.com").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/users/alice/feedback")
                .cookie(bob_cookie)
                .set_json(FeedbackPayload {
                    title: "T".into(),
                    content: "C".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn non_owner_update_is_rejected_and_mutates_nothing() {
        let app = actix_test::init_service(test_app()).await;
        let alice_cookie = register_and_get_cookie(&app, "alice", "a@x.com").await;
        let bob_cookie = register_and_get_cookie(&app, "bob", "b@x.com").await;
        let id = create_entry(&app, alice_cookie.clone(), "alice").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/feedback/{id}"))
                .cookie(bob_cookie)
                .set_json(FeedbackPayload {
                    title: "hijacked".into(),
                    content: "hijacked".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/feedback/{id}"))
                .cookie(alice_cookie)
                .to_request(),
        )
        .await;
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("title").and_then(Value::as_str), Some("T"));
        assert_eq!(body.get("content").and_then(Value::as_str), Some("C"));
    }

    #[actix_web::test]
    async fn owner_updates_their_entry() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_get_cookie(&app, "alice", "a@x.com").await;
        let id = create_entry(&app, cookie.clone(), "alice").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri(&format!("/api/v1/feedback/{id}"))
                .cookie(cookie)
                .set_json(FeedbackPayload {
                    title: "T2".into(),
                    content: "C2".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("title").and_then(Value::as_str), Some("T2"));
        assert_eq!(body.get("owner").and_then(Value::as_str), Some("alice"));
    }

    #[actix_web::test]
    async fn missing_entries_are_not_found_before_ownership() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_get_cookie(&app, "alice", "a@x.com").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri("/api/v1/feedback/999")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn owner_deletes_their_entry() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = register_and_get_cookie(&app, "alice", "a@x.com").await;
        let id = create_entry(&app, cookie.clone(), "alice").await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/feedback/{id}"))
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/feedback/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
