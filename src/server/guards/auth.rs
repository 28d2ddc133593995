use crate::server::router::FlashdeckState;
use crate::service::Principal;
use crate::utils::jwt::jwt_subject;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use serde_json::json;
use subtle::ConstantTimeEq;

const GATEWAY_KEY_HEADER: &str = "x-gateway-key";

/// The caller, as identified by the bearer token's `sub` claim.
///
/// Token signatures are verified by the identity-aware gateway in front of this
/// service; here the payload is only decoded, so every request must first prove
/// it came through that gateway with `basic.gateway_key`.
#[derive(Debug, Clone)]
pub struct Caller(pub Principal);

impl FromRequestParts<FlashdeckState> for Caller {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &FlashdeckState,
    ) -> Result<Self, Self::Rejection> {
        // An unset key rejects every request.
        let expected = state.gateway_key.as_ref();
        if expected.trim().is_empty() {
            return Err(AuthError::GatewayKeyUnset);
        }
        let presented = parts
            .headers
            .get(GATEWAY_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(AuthError::MissingGatewayKey)?;
        if !bool::from(presented.as_bytes().ct_eq(expected.as_bytes())) {
            return Err(AuthError::InvalidGatewayKey);
        }

        let token = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .map(|auth| auth.token().to_string())
            .ok_or(AuthError::MissingToken)?;

        jwt_subject(&token)
            .map(|sub| Caller(Principal::new(sub)))
            .ok_or(AuthError::InvalidToken)
    }
}

#[derive(Debug)]
pub enum AuthError {
    GatewayKeyUnset,
    MissingGatewayKey,
    InvalidGatewayKey,
    MissingToken,
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let reason = match self {
            AuthError::GatewayKeyUnset => "Gateway key is not configured",
            AuthError::MissingGatewayKey => "Missing gateway key",
            AuthError::InvalidGatewayKey => "Invalid gateway key",
            AuthError::MissingToken => "Missing bearer token",
            AuthError::InvalidToken => "Bearer token carries no subject",
        };
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "status": StatusCode::UNAUTHORIZED.as_u16(), "message": reason })),
        )
            .into_response()
    }
}
