use shared_models::auth::{Identity, Role};
use shared_models::error::AppError;

/// What an endpoint demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Authenticated,
    Only(&'static [Role]),
}

impl Access {
    pub const PATIENT: Access = Access::Only(&[Role::Patient]);
    pub const DOCTOR: Access = Access::Only(&[Role::Doctor]);
    pub const ADMIN: Access = Access::Only(&[Role::Admin]);
}

/// Pure allow/deny decision. No identity is `Unauthorized`; an identity
/// outside the role set is `Forbidden`.
pub fn authorize(identity: Option<&Identity>, access: Access) -> Result<Identity, AppError> {
    let identity = identity
        .copied()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    match access {
        Access::Authenticated => Ok(identity),
        Access::Only(roles) if roles.contains(&identity.role()) => Ok(identity),
        Access::Only(_) => Err(AppError::Forbidden(format!(
            "Access denied for role '{}'",
            identity.role()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    #[test]
    fn missing_identity_is_unauthorized() {
        assert_matches!(authorize(None, Access::Authenticated), Err(AppError::Unauthorized(_)));
        assert_matches!(authorize(None, Access::ADMIN), Err(AppError::Unauthorized(_)));
    }

    #[test]
    fn role_sets_are_exclusive() {
        let doctor = Identity::Doctor { account_id: Uuid::new_v4() };
        let patient = Identity::Patient { account_id: Uuid::new_v4() };

        assert_eq!(authorize(Some(&doctor), Access::DOCTOR).unwrap(), doctor);
        assert_matches!(authorize(Some(&doctor), Access::PATIENT), Err(AppError::Forbidden(_)));
        assert_matches!(authorize(Some(&patient), Access::ADMIN), Err(AppError::Forbidden(_)));
        assert_eq!(authorize(Some(&patient), Access::Authenticated).unwrap(), patient);
    }

    #[test]
    fn multi_role_set() {
        let admin = Identity::Admin { account_id: Uuid::new_v4() };
        let access = Access::Only(&[Role::Doctor, Role::Admin]);
        assert!(authorize(Some(&admin), access).is_ok());
    }
}
