use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::auth::{AuthError, Credentials, JwtAuth};
use crate::AppState;
use aukiolo::components::suggestions::models::{
    HoursCorrectionProposal, ListFilter, NewSuggestion,
};
use aukiolo::error::Error;

/// Wrapper mapping domain errors onto API responses
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::SuggestionNotFound(_) => StatusCode::NOT_FOUND,
            Error::DuplicatePending(_) | Error::InvalidTransition { .. } => StatusCode::CONFLICT,
            Error::MissingJustification => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("Request failed: {:?}", self.0);
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// Handler for API health check
pub async fn health_handler() -> &'static str {
    "OK"
}

/// Handler for logins, issues a JWT as both cookie and body
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Response {
    match state
        .auth_service
        .authenticate(&credentials.username, &credentials.password)
    {
        Ok(token) => {
            info!("User {} successfully authenticated", credentials.username);
            let cookie = Cookie::build(("auth_token", token.clone()))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .build();
            (jar.add(cookie), Json(json!({ "token": token }))).into_response()
        }
        Err(AuthError::Unauthorized) => {
            error!("Failed login attempt for user: {}", credentials.username);
            let jar = jar.remove(Cookie::build(("auth_token", "")).path("/").build());
            (
                StatusCode::UNAUTHORIZED,
                jar,
                Json(json!({ "error": "Invalid credentials" })),
            )
                .into_response()
        }
        Err(err) => {
            error!("Authentication error: {:?}", err);
            err.into_response()
        }
    }
}

/// Handler for a hospital's stored weekly hours
pub async fn hospital_hours_handler(
    State(state): State<AppState>,
    Path(hospital_id): Path<String>,
) -> Result<Response, ApiError> {
    match state.hours.get_schedule(&hospital_id).await? {
        Some(doc) => {
            let display = doc.formatted();
            Ok(Json(json!({
                "hospitalId": hospital_id,
                "schedule": doc,
                "display": display,
            }))
            .into_response())
        }
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": format!("No operating hours stored for hospital {}", hospital_id)
            })),
        )
            .into_response()),
    }
}

/// Handler for a hospital's live open status
///
/// "Now" is derived in the directory's configured timezone, not the
/// server's, so a UTC host still answers for Seoul clinics correctly.
pub async fn hospital_status_handler(
    State(state): State<AppState>,
    Path(hospital_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let tz = {
        let config = state.config.read().await;
        config.directory_tz()
    };
    let now = Utc::now().with_timezone(&tz).naive_local();

    let status = state.hours.status_at(&hospital_id, now).await?;
    Ok(Json(json!({
        "hospitalId": hospital_id,
        "status": status,
        "label": status.label(),
        "checkedAt": now.format("%Y-%m-%dT%H:%M:%S").to_string(),
    })))
}

/// Handler for submitting an hours correction
pub async fn submit_suggestion_handler(
    State(state): State<AppState>,
    Json(submission): Json<NewSuggestion>,
) -> Result<impl IntoResponse, ApiError> {
    let proposal = state.suggestions.submit(submission).await?;
    Ok((StatusCode::CREATED, Json(proposal)))
}

/// Query parameters for the admin listing
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub status: Option<ListFilter>,
}

/// Handler for the admin listing of corrections, newest first
pub async fn list_suggestions_handler(
    State(state): State<AppState>,
    Extension(_auth): Extension<JwtAuth>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<HoursCorrectionProposal>>, ApiError> {
    let proposals = state
        .suggestions
        .list(params.status.unwrap_or_default())
        .await?;
    Ok(Json(proposals))
}

/// Handler for approving a correction, applying it to the live schedule
pub async fn approve_suggestion_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
) -> Result<Json<HoursCorrectionProposal>, ApiError> {
    let proposal = state.suggestions.approve(id, auth.reviewer()).await?;
    Ok(Json(proposal))
}

/// Body for a rejection, carrying the reviewer's reason
#[derive(Debug, Deserialize)]
pub struct RejectBody {
    #[serde(default)]
    pub reason: String,
}

/// Handler for rejecting a correction with a reviewer note
pub async fn reject_suggestion_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<JwtAuth>,
    Path(id): Path<String>,
    Json(body): Json<RejectBody>,
) -> Result<Json<HoursCorrectionProposal>, ApiError> {
    let proposal = state
        .suggestions
        .reject(id, auth.reviewer(), body.reason)
        .await?;
    Ok(Json(proposal))
}
