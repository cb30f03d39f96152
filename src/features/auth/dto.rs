use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::model::AuthenticatedUser;

/// DTO for /auth/me response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
    /// Whether the add/edit/delete/pin controls should be offered
    pub can_manage: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        let can_manage = user.is_admin();
        Self {
            account_id: user.account_id,
            sub: user.sub,
            roles: user.roles,
            can_manage,
        }
    }
}
