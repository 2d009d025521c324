use axum::{
    extract::State,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use shopfront_auth::{API_KEY_HEADER, AuthGate, AuthResult};

use crate::app::errors::ApiError;
use crate::context::CallerContext;

#[derive(Debug, Clone)]
pub struct AuthState {
    pub gate: AuthGate,
}

/// Rejects requests whose `X-API-Key` is absent or wrong with the same 401.
pub async fn api_key_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    match authorize(&state.gate, req.headers()) {
        AuthResult::Authorized(credential) => {
            req.extensions_mut().insert(CallerContext::new(credential));
            Ok(next.run(req).await)
        }
        AuthResult::Missing | AuthResult::Invalid(_) => Err(ApiError::Unauthorized),
    }
}

/// Run the gate against the designated header.
pub fn authorize(gate: &AuthGate, headers: &HeaderMap) -> AuthResult {
    match extract_api_key(headers) {
        ApiKeyHeader::Absent => gate.authorize(None),
        ApiKeyHeader::Present(value) => gate.authorize(Some(value)),
        ApiKeyHeader::Unreadable => {
            tracing::warn!(
                event = "auth_failure",
                reason = "unreadable_api_key",
                "api key header is not visible ascii"
            );
            AuthResult::Invalid(String::new())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ApiKeyHeader<'a> {
    Absent,
    Present(&'a str),
    Unreadable,
}

fn extract_api_key(headers: &HeaderMap) -> ApiKeyHeader<'_> {
    match headers.get(API_KEY_HEADER) {
        None => ApiKeyHeader::Absent,
        Some(value) => match value.to_str() {
            Ok(v) => ApiKeyHeader::Present(v),
            Err(_) => ApiKeyHeader::Unreadable,
        },
    }
}
