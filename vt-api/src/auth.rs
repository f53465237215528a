//! Identity resolution middleware
//!
//! Every protected route runs through here before any core operation. The
//! bearer token is exchanged against the external identity resolver's
//! user-info endpoint for a stable email identity; with no resolver
//! configured the service runs in development mode and trusts the
//! `X-User-Email` header instead.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::warn;
use vt_common::config::ServiceConfig;
use vt_common::{Error, Result};

use crate::error::ApiError;
use crate::AppState;

/// Resolved identity of the calling user, injected into request extensions
#[derive(Debug, Clone)]
pub struct Identity {
    pub email: String,
}

/// User-info payload returned by the identity resolver
#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
}

/// Client for the external identity resolver
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    /// Full user-info URL; `None` means development mode
    user_info_url: Option<String>,
}

impl AuthClient {
    /// Build from resolved service configuration
    pub fn from_config(config: &ServiceConfig) -> Self {
        let user_info_url = config.auth_base_url.as_ref().map(|base| {
            format!(
                "{}/{}",
                base.trim_end_matches('/'),
                config.auth_user_info_path.trim_start_matches('/')
            )
        });
        Self {
            http: reqwest::Client::new(),
            user_info_url,
        }
    }

    /// Development-mode client: identity comes from the X-User-Email header
    pub fn disabled() -> Self {
        Self {
            http: reqwest::Client::new(),
            user_info_url: None,
        }
    }

    pub fn is_dev_mode(&self) -> bool {
        self.user_info_url.is_none()
    }

    /// Resolve an identity from the request's credentials
    ///
    /// `bearer` is the token from the Authorization header, `dev_email` the
    /// X-User-Email header value. Exactly one path applies depending on
    /// whether a resolver is configured.
    pub async fn resolve(&self, bearer: Option<&str>, dev_email: Option<&str>) -> Result<Identity> {
        let Some(url) = &self.user_info_url else {
            // Development mode
            return match dev_email {
                Some(email) if !email.is_empty() => Ok(Identity {
                    email: email.to_string(),
                }),
                _ => Err(Error::Unauthenticated(
                    "X-User-Email header not provided".to_string(),
                )),
            };
        };

        let token = bearer.ok_or_else(|| {
            Error::Unauthenticated("Authorization bearer token not provided".to_string())
        })?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Identity resolver unreachable: {e}")))?;

        if !response.status().is_success() {
            warn!("Identity resolver rejected token: {}", response.status());
            return Err(Error::Unauthenticated(
                "Could not validate credentials".to_string(),
            ));
        }

        let info: UserInfo = response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Malformed user-info response: {e}")))?;

        match info.email {
            Some(email) if !email.is_empty() => Ok(Identity { email }),
            _ => Err(Error::Unauthenticated(
                "Identity resolver returned no email".to_string(),
            )),
        }
    }
}

/// Authentication middleware for protected routes
///
/// Resolves the caller's identity and injects it into request extensions;
/// handlers read it back via `Extension<Identity>`. Returns 401 before any
/// core operation when resolution fails.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> std::result::Result<Response, ApiError> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|s| s.to_string());

    let dev_email = request
        .headers()
        .get("x-user-email")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());

    let identity = state
        .auth
        .resolve(bearer.as_deref(), dev_email.as_deref())
        .await?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
