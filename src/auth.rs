//! Bearer-token authentication.
//!
//! Tokens are issued by the external auth service and signed with the shared
//! secret from [`ServerConfig`]. The claims double as the request identity.

use std::future::{Ready, ready};

use actix_web::dev::Payload;
use actix_web::error::InternalError;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, web};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// Cookie consulted when no `Authorization` header is present.
pub const TOKEN_COOKIE: &str = "token";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub sub: String,
    pub email: String,
    pub hub_id: i32,
    pub name: String,
    pub roles: Vec<String>,
    pub exp: usize,
}

impl AuthenticatedUser {
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
    }

    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }
}

/// Whether `roles` contains `role`.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Requires the access role plus any of `roles`. Admins pass every check and
/// an empty `roles` slice only checks access.
pub fn ensure_any_role(user: &AuthenticatedUser, roles: &[&str]) -> ServiceResult<()> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }
    if roles.is_empty()
        || check_role(SERVICE_ADMIN_ROLE, &user.roles)
        || roles.iter().any(|role| check_role(role, &user.roles))
    {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if role == SERVICE_ACCESS_ROLE {
        ensure_any_role(user, &[])
    } else {
        ensure_any_role(user, &[role])
    }
}

fn unauthorized(reason: &str) -> actix_web::Error {
    InternalError::from_response(
        reason.to_string(),
        HttpResponse::Unauthorized().json(json!({ "error": reason })),
    )
    .into()
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "))
        })
        .map(|token| token.trim().to_string());

    from_header.or_else(|| req.cookie(TOKEN_COOKIE).map(|c| c.value().to_string()))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, actix_web::Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        log::error!("Server configuration is not registered as app data");
        return Err(actix_web::error::ErrorInternalServerError(
            "authentication is not configured",
        ));
    };

    let token = bearer_token(req).ok_or_else(|| unauthorized("missing credentials"))?;

    AuthenticatedUser::from_jwt(&token, &config.secret).map_err(|err| {
        log::info!("Rejected token: {err}");
        unauthorized("invalid credentials")
    })
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SERVICE_HR_ROLE;

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "1".to_string(),
            email: "jane@example.com".to_string(),
            hub_id: 1,
            name: "Jane".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: 4_102_444_800,
        }
    }

    #[test]
    fn token_round_trips_with_shared_secret() {
        let original = user(&[SERVICE_ACCESS_ROLE]);
        let token = original.to_jwt("secret").unwrap();

        assert_eq!(AuthenticatedUser::from_jwt(&token, "secret").unwrap(), original);
        assert!(AuthenticatedUser::from_jwt(&token, "other").is_err());
    }

    #[test]
    fn access_role_is_always_required() {
        let hr_only = user(&[SERVICE_HR_ROLE]);
        assert!(matches!(
            ensure_role(&hr_only, SERVICE_HR_ROLE),
            Err(ServiceError::Unauthorized)
        ));

        let hr = user(&[SERVICE_ACCESS_ROLE, SERVICE_HR_ROLE]);
        assert!(ensure_role(&hr, SERVICE_HR_ROLE).is_ok());
        assert!(ensure_any_role(&hr, &[SERVICE_ADMIN_ROLE, SERVICE_HR_ROLE]).is_ok());
        assert!(ensure_role(&hr, SERVICE_ADMIN_ROLE).is_err());

        let admin = user(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE]);
        assert!(ensure_role(&admin, SERVICE_HR_ROLE).is_ok());
    }
}
