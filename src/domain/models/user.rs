use serde::Serialize;
use super::auth::Role;

/// Caller identity resolved from a session token.
#[derive(Debug, Serialize, Clone)]
pub struct User {
    pub id: String,
    pub role: Role,
}

impl User {
    pub fn is_operator(&self) -> bool {
        self.role == Role::Operator
    }
}
