use crate::core::field::{FieldValue, ToFieldValue};
use serde::{Deserialize, Serialize};

/// Dashboard role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
        }
    }
}

impl ToFieldValue for Role {
    fn to_field_value(&self) -> FieldValue {
        FieldValue::String(self.as_str().to_string())
    }
}

impl_record!(
    /// A dashboard account; plain data, nothing authenticates against it
    User, "user", "users",
    display: username,
    indexed: ["username"],
    {
        #[validate(length(min = 1, message = "must not be empty"))]
        username: String => "username",

        #[serde(default)]
        role: Role => "role",
    }
);

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        let (id, created_at, updated_at) = Self::identity();
        Self {
            id,
            username: username.into(),
            role,
            created_at,
            updated_at,
        }
    }
}
