use serde::{Deserialize, Serialize};

/// Portal role carried by a session identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    Doctor,
    Manager,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Manager => "manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "manager" => Some(Role::Manager),
            _ => None,
        }
    }
}

/// Identity established by a successful login.
///
/// Lives only in the session store for the session lifetime; never
/// written to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub role: Role,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        assert_eq!(Role::from_str("patient"), Some(Role::Patient));
        assert_eq!(Role::from_str("doctor"), Some(Role::Doctor));
        assert_eq!(Role::from_str("manager"), Some(Role::Manager));
        assert_eq!(Role::from_str("admin"), None);
        assert_eq!(Role::Patient.as_str(), "patient");
        assert_eq!(Role::Doctor.as_str(), "doctor");
        assert_eq!(Role::Manager.as_str(), "manager");
    }

    #[test]
    fn role_serializes_snake_case() {
        let json = serde_json::to_string(&Role::Doctor).unwrap();
        assert_eq!(json, "\"doctor\"");
    }
}
