use serde::Serialize;

use super::Role;

/// One message in a conversation. Fields are private so a turn cannot be
/// edited after it has been appended to a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub(crate) fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_system(&self) -> bool {
        self.role == Role::System
    }
}
