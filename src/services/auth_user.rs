use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{error, warn};

use crate::routes::error::ApiError;
use crate::settings::Settings;

/// Marker extractor: the request carried the configured Basic credentials.
pub struct AuthUser;

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let settings = parts
            .extensions
            .get::<Arc<Settings>>()
            .cloned()
            .ok_or_else(|| {
                error!("Settings extension missing from request");
                ApiError::Internal("Server misconfigured".to_string())
            })?;

        let (username, password) = basic_credentials(&parts.headers).ok_or_else(|| {
            warn!("Missing or malformed Basic credentials");
            ApiError::Unauthorized
        })?;

        // Evaluate both so a wrong username takes as long as a wrong password.
        let ok_user = constant_time_compare(&username, &settings.app_basic_user);
        let ok_pass = constant_time_compare(&password, &settings.app_basic_pass);

        if !(ok_user && ok_pass) {
            warn!("{}", rejection_message(&username));
            return Err(ApiError::Unauthorized);
        }

        Ok(AuthUser)
    }
}

/// Decodes `Authorization: Basic <base64(user:pass)>`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let auth = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = auth.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;

    Some((username.to_string(), password.to_string()))
}

/// The username is client-supplied, so it is logged quoted and escaped.
fn rejection_message(username: &str) -> String {
    format!("Rejected Basic credentials for user {:?}", username)
}

/// Constant-time string comparison; only the length short-circuits.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
