use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{middleware::auth::Access, models::AppUser};

#[derive(Deserialize, Debug, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: AppUser,
}

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub exp: usize,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GuardQuery {
    #[serde(default)]
    pub require_admin: bool,
    /// Guest-only pages such as the sign-in screen.
    #[serde(default)]
    pub guest_only: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GuardResponse {
    pub access: Access,
    pub user: Option<AppUser>,
}
