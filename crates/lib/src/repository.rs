use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Paths of the backend endpoints, relative to the configured base URL.
pub mod endpoints {
    pub const VERSION_CHECK: &str = "api/version/check";
    pub const OFFICES: &str = "api/orgunits/status";
    pub const GOVERNMENTS: &str = "api/lookups/governments";
    pub const VALIDATE_NATIONAL_ID: &str = "api/citizen/validate-national-id";
    pub const CATEGORIES_BY_OFFICE: &str = "api/reservation/categories";
    pub const TYPES_BY_CATEGORY: &str = "api/reservation/types";
    pub const OFFICE_AGENDA: &str = "api/reservation/agenda";
    pub const CREATE_RESERVATION: &str = "api/reservation/create";
    pub const INQUIRE_RESERVATIONS: &str = "api/reservation/inquire";
}

/// Raw JSON transport to the backend.
///
/// Non-2xx answers surface as [`crate::Error::Http`], network and decoding
/// failures as [`crate::Error::Transport`]. Application-level status codes
/// inside the body are left to the caller.
#[async_trait]
pub trait Repository: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value>;

    async fn post(&self, path: &str, body: Value, authenticated: bool) -> Result<Value>;
}
