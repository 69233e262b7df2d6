use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(Error::Validation(format!("unknown role: {}", s))),
        }
    }
}

/// An account as seen outside the credential store. Never carries password material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: i32,
    #[serde(rename = "DNI")]
    pub dni: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct Credential {
    pub password: String,
    pub salt: String,
}

#[derive(Debug, Clone)]
pub struct Insert {
    pub dni: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub salt: String,
    pub role: Role,
}

#[derive(Debug, Default, Clone)]
pub struct Patch {
    pub dni: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
    pub salt: Option<String>,
}

impl Patch {
    pub fn is_empty(&self) -> bool {
        self.dni.is_none() && self.name.is_none() && self.lastname.is_none() && self.email.is_none() && self.role.is_none() && self.password.is_none()
    }
}

/// The whitelisted fields an administrator may overwrite on an account.
#[derive(Debug, Default, Deserialize)]
pub struct Fields {
    #[serde(rename = "DNI")]
    pub dni: Option<String>,
    pub name: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Registration {
    #[serde(rename = "DNI", default)]
    pub dni: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct WithExp {
    #[serde(flatten)]
    pub user: User,
    pub exp: i64,
}

#[derive(Debug, Serialize)]
pub struct Profile {
    #[serde(rename = "DNI")]
    pub dni: String,
    pub name: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    pub exp: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("user".parse::<Role>().unwrap(), Role::User);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_user_serialization_has_no_credentials() {
        let user = User {
            id: 1,
            dni: "30111222".into(),
            name: "Ana".into(),
            lastname: "Gómez".into(),
            email: "ana@example.org".into(),
            role: Role::User,
        };
        let value = serde_json::to_value(WithExp { user, exp: 20 }).unwrap();
        assert_eq!(value["DNI"], "30111222");
        assert_eq!(value["exp"], 20);
        assert_eq!(value["role"], "user");
        assert!(value.get("password").is_none());
        assert!(value.get("salt").is_none());
    }
}
