pub mod helpers;
mod middleware;
mod password;
mod token;
mod users;

pub use helpers::{authenticate_user, issue_token, validate_token};
pub use middleware::{AuthError, RequireAuth};
pub use password::{hash_password, verify_password};
pub use token::{NewToken, TokenGenerator, token_lookup};
pub use users::{create_user, validate_username};
