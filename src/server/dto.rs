use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::planets::FieldErrors;
use crate::types::Field;

#[derive(Debug, Default, Deserialize)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: Field<String>,
    #[serde(default)]
    pub password: Field<String>,
}

impl CredentialsRequest {
    /// Returns `(username, password)` once both are present strings.
    pub fn into_parts(self) -> Result<(String, String), FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = required_string("username", self.username, &mut errors);
        let password = required_string("password", self.password, &mut errors);
        errors.into_result((username, password))
    }
}

fn required_string(field: &str, value: Field<String>, errors: &mut FieldErrors) -> String {
    match value {
        Field::Present(value) => return value,
        Field::Absent => errors.add(field, "This field is required."),
        Field::Null => errors.add(field, "This field may not be null."),
        Field::Invalid => errors.add(field, "Not a valid string."),
    }
    String::new()
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}
