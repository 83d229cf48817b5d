use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::EntityTrait;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::Admins,
    error::{AppError, AppResult},
    models::Role,
    state::AppState,
};

pub const LOGIN_ROUTE: &str = "/auth";
pub const HOME_ROUTE: &str = "/";

/// Authenticated caller. Admin membership is looked up on every request so a
/// change in the `admins` table takes effect without a new token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn role(&self) -> Role {
        if self.is_admin { Role::Admin } else { Role::Buyer }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", content = "to", rename_all = "snake_case")]
pub enum Access {
    Allow,
    Redirect(String),
}

/// Access rules of a storefront route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteGuard {
    pub require_auth: bool,
    pub require_admin: bool,
}

impl RouteGuard {
    pub const PUBLIC: RouteGuard = RouteGuard {
        require_auth: false,
        require_admin: false,
    };
    pub const SIGNED_IN: RouteGuard = RouteGuard {
        require_auth: true,
        require_admin: false,
    };
    pub const ADMIN: RouteGuard = RouteGuard {
        require_auth: true,
        require_admin: true,
    };

    /// Guest-only routes (`require_auth == false`) send signed-in users home.
    pub fn evaluate(&self, user: Option<&AuthUser>) -> Access {
        match user {
            None if self.require_auth || self.require_admin => {
                Access::Redirect(LOGIN_ROUTE.to_string())
            }
            None => Access::Allow,
            Some(user) if self.require_admin && !user.is_admin => {
                Access::Redirect(HOME_ROUTE.to_string())
            }
            Some(_) if !self.require_auth => Access::Redirect(HOME_ROUTE.to_string()),
            Some(_) => Access::Allow,
        }
    }

    /// Same decision expressed as an API error.
    pub fn check(&self, user: Option<&AuthUser>) -> AppResult<()> {
        match self.evaluate(user) {
            Access::Allow => Ok(()),
            Access::Redirect(to) if to == LOGIN_ROUTE => Err(AppError::Unauthorized),
            Access::Redirect(_) => Err(AppError::Forbidden),
        }
    }
}

pub fn ensure_admin(user: &AuthUser) -> AppResult<()> {
    RouteGuard::ADMIN.check(Some(user))
}

pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    let decoded = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::Unauthorized)?;
    Ok(decoded.claims)
}

pub async fn is_admin(state: &AppState, user_id: Uuid) -> AppResult<bool> {
    let membership = Admins::find_by_id(user_id).one(&state.orm).await?;
    Ok(membership.is_some())
}

fn bearer_token(parts: &Parts) -> AppResult<Option<&str>> {
    let Some(auth_header) = parts.headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::BadRequest("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::BadRequest("Invalid Authorization scheme".into()))?;
    Ok(Some(token.trim()))
}

async fn authenticate(token: &str, state: &AppState) -> AppResult<AuthUser> {
    let claims = decode_token(token, &state.config.jwt_secret)?;
    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;
    let is_admin = is_admin(state, user_id).await?;

    Ok(AuthUser {
        user_id,
        email: claims.email,
        is_admin,
    })
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.ok_or(AppError::Unauthorized)?;
        authenticate(token, state).await
    }
}

impl OptionalFromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        match bearer_token(parts)? {
            Some(token) => authenticate(token, state).await.map(Some),
            None => Ok(None),
        }
    }
}
