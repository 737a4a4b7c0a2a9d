//! Session-to-operation access gate.
//!
//! Default-deny: a missing identity and a role mismatch both produce
//! the same `AccessDenied`, so callers cannot tell the two causes
//! apart. The HTTP layer renders every denial as one "restricted"
//! response.

use crate::models::{Identity, Role};

/// Role requirement for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    /// Any logged-in identity.
    Authenticated,
    /// Exactly this role.
    Exactly(Role),
}

/// Denial marker. Carries no cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("restricted")]
pub struct AccessDenied;

/// Check an optional session identity against a requirement.
pub fn require(
    identity: Option<&Identity>,
    requirement: RoleRequirement,
) -> Result<&Identity, AccessDenied> {
    let identity = identity.ok_or(AccessDenied)?;
    match requirement {
        RoleRequirement::Authenticated => Ok(identity),
        RoleRequirement::Exactly(role) if identity.role == role => Ok(identity),
        RoleRequirement::Exactly(_) => Err(AccessDenied),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Identity {
        Identity {
            role: Role::Doctor,
            name: "Doctor Wu".into(),
        }
    }

    fn patient() -> Identity {
        Identity {
            role: Role::Patient,
            name: "Liao".into(),
        }
    }

    #[test]
    fn missing_identity_is_denied() {
        assert_eq!(
            require(None, RoleRequirement::Authenticated),
            Err(AccessDenied)
        );
        assert_eq!(
            require(None, RoleRequirement::Exactly(Role::Doctor)),
            Err(AccessDenied)
        );
    }

    #[test]
    fn any_role_passes_authenticated() {
        let id = patient();
        assert!(require(Some(&id), RoleRequirement::Authenticated).is_ok());
        let id = doctor();
        assert!(require(Some(&id), RoleRequirement::Authenticated).is_ok());
    }

    #[test]
    fn exact_role_match_passes() {
        let id = doctor();
        let granted = require(Some(&id), RoleRequirement::Exactly(Role::Doctor)).unwrap();
        assert_eq!(granted.name, "Doctor Wu");
    }

    #[test]
    fn role_mismatch_is_denied_like_missing_identity() {
        let id = patient();
        let mismatch = require(Some(&id), RoleRequirement::Exactly(Role::Doctor));
        let missing = require(None, RoleRequirement::Exactly(Role::Doctor));
        // The two denial causes must be indistinguishable
        assert_eq!(mismatch, missing);
    }
}
