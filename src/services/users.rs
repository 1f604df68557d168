//! Users service: `{ id, name, email, createdAt }`.

use axum::Router;
use serde::{Deserialize, Serialize};

use crate::services::store::{created_at, new_record_id};
use crate::services::{crud_router, Resource, ServiceError};

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BASE_PATH: &str = "/users";
pub const BANNER: &str = "Users Service is running";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl Resource for User {
    type Create = UserPayload;
    type Update = UserPayload;

    const NOT_FOUND: &'static str = "User not found";

    fn id(&self) -> &str {
        &self.id
    }

    fn create(payload: UserPayload, existing: &[Self]) -> Result<Self, ServiceError> {
        let (Some(name), Some(email)) = (non_empty(payload.name), non_empty(payload.email)) else {
            return Err(ServiceError::BadRequest("Name and email are required".into()));
        };

        if existing.iter().any(|u| u.email == email) {
            return Err(ServiceError::BadRequest("Email already registered".into()));
        }

        Ok(User {
            id: new_record_id(),
            name,
            email,
            created_at: created_at(),
        })
    }

    fn apply_update(&mut self, payload: UserPayload) -> Result<(), ServiceError> {
        if let Some(name) = non_empty(payload.name) {
            self.name = name;
        }
        if let Some(email) = non_empty(payload.email) {
            self.email = email;
        }
        Ok(())
    }
}

/// Users router mounted at `base_path`.
pub fn router(base_path: &str) -> Router {
    crud_router::<User>(base_path, BANNER)
}
