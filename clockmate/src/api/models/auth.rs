//! API request/response models for signup and PIN login.

use crate::{
    api::extract::StringOrNumber,
    db::models::employees::EmployeeCredential,
    types::{EmployeeId, Role},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST auth/signup`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Exactly 6 digits
    #[schema(value_type = Option<String>, example = "123456")]
    pub pin: Option<StringOrNumber>,
}

/// Body of `POST auth/login` and `POST auth/pin-login`
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PinLoginRequest {
    /// 6 digits for employees, 8 for admins
    #[schema(value_type = Option<String>, example = "123456")]
    pub pin: Option<StringOrNumber>,
}

/// The authenticated account. The PIN hash is never included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user_id: EmployeeId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<EmployeeCredential> for LoginResponse {
    fn from(credential: EmployeeCredential) -> Self {
        Self {
            user_id: credential.id,
            name: credential.name,
            email: credential.email,
            role: credential.role,
        }
    }
}
