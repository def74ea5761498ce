use serde::Deserialize;

use rbac_auth::{AccountUpdate, NewAccount, Role};

// -------------------------
// Request DTOs
// -------------------------

// Password-carrying requests do not derive `Debug`.

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl From<CreateUserRequest> for NewAccount {
    fn from(req: CreateUserRequest) -> Self {
        NewAccount {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<UpdateUserRequest> for AccountUpdate {
    fn from(req: UpdateUserRequest) -> Self {
        AccountUpdate {
            name: req.name,
            email: req.email,
            role: req.role,
        }
    }
}
