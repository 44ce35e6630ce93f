use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest, HttpResponse};
use std::future::{ready, Ready};
use validator::Validate;

use crate::error::AllocationError;
use crate::models::{LoginRequest, LoginResponse, Session};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/login", web::post().to(login));
}

/// Login endpoint
///
/// POST /api/v1/auth/login
///
/// Request body:
/// ```json
/// { "username": "dr.smith", "password": "..." }
/// ```
async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, AllocationError> {
    req.validate()?;

    let issued = state.auth.login(&req.username, &req.password)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: issued.token,
        physician_id: issued.session.physician_id,
        role: issued.session.role,
        expires_at: issued.expires_at,
    }))
}

/// Sessions come from the `Authorization: Bearer <token>` header
impl FromRequest for Session {
    type Error = AllocationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(session_from_request(req))
    }
}

fn session_from_request(req: &HttpRequest) -> Result<Session, AllocationError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AllocationError::Internal("application state missing".to_string()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AllocationError::Unauthorized("missing bearer token".to_string()))?;

    state.auth.verify(token)
}
