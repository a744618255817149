//! Users as issued by the identity provider.

use crate::bug::ParseLevelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a user is allowed to do is decided by their role alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Admin,
    Developer,
    Tester,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Developer => "developer",
            Role::Tester => "tester",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "developer" => Ok(Role::Developer),
            "tester" => Ok(Role::Tester),
            _ => Err(ParseLevelError {
                kind: "role",
                value: s.to_string(),
                expected: "admin, developer, tester",
            }),
        }
    }
}

/// An authenticated identity. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl User {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parses_case_insensitively_and_rejects_unknown() {
        assert_eq!(" Developer ".parse::<Role>(), Ok(Role::Developer));
        assert_eq!("TESTER".parse::<Role>(), Ok(Role::Tester));

        let err = "owner".parse::<Role>().expect_err("unknown role");
        assert_eq!(
            err.to_string(),
            "unknown role `owner` (expected one of: admin, developer, tester)"
        );
    }
}
