// Authorization guard
//
// Every organization-scoped handler goes through `authorize` or
// `authorize_organization`; the role policy lives only in `evaluate`.

use crate::auth::models::{AuthorizationDecision, DenyReason, Principal, Role};
use crate::error::ApiError;
use tracing::{debug, warn};
use uuid::Uuid;

/// Pure policy: global roles reach every organization, everyone else only
/// their home organization.
pub fn evaluate(principal: &Principal, target: Uuid) -> AuthorizationDecision {
    if principal.role.has_global_access() {
        return AuthorizationDecision::Allow;
    }
    match principal.organization_id {
        Some(home) if home == target => AuthorizationDecision::Allow,
        Some(_) => AuthorizationDecision::Deny(DenyReason::ForeignOrganization),
        None => AuthorizationDecision::Deny(DenyReason::NoHomeOrganization),
    }
}

/// Parse a raw organization identifier (usually a path segment)
pub fn parse_target(raw: &str) -> Result<Uuid, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidTarget(raw.to_string()));
    }
    Uuid::parse_str(trimmed).map_err(|_| ApiError::InvalidTarget(raw.to_string()))
}

/// Validate the raw target first, then apply the role policy.
/// Returns the parsed organization id on success.
pub fn authorize(principal: &Principal, raw_target: &str) -> Result<Uuid, ApiError> {
    let target = parse_target(raw_target)?;
    authorize_organization(principal, target)?;
    Ok(target)
}

/// Apply the role policy to an already-typed organization id
pub fn authorize_organization(principal: &Principal, target: Uuid) -> Result<(), ApiError> {
    match evaluate(principal, target) {
        AuthorizationDecision::Allow => {
            debug!(
                "Authorization successful: user_id={}, role={}, organization_id={}",
                principal.user_id, principal.role, target
            );
            Ok(())
        }
        AuthorizationDecision::Deny(reason) => {
            warn!(
                "Authorization failed: user_id={}, role={}, organization_id={}, reason={}",
                principal.user_id, principal.role, target, reason
            );
            Err(ApiError::InsufficientPermissions)
        }
    }
}

/// Cross-organization operations ("all organizations" as the target)
pub fn authorize_global(principal: &Principal) -> Result<(), ApiError> {
    if principal.role.has_global_access() {
        Ok(())
    } else {
        warn!(
            "Global access denied: user_id={}, role={}",
            principal.user_id, principal.role
        );
        Err(ApiError::InsufficientPermissions)
    }
}

/// Endpoints with a fixed list of permitted roles
pub fn require_role(principal: &Principal, allowed: &[Role]) -> Result<(), ApiError> {
    if allowed.contains(&principal.role) {
        Ok(())
    } else {
        warn!(
            "Authorization failed: user_id={}, role={}, reason={}",
            principal.user_id,
            principal.role,
            DenyReason::RoleNotPermitted
        );
        Err(ApiError::InsufficientPermissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn principal(role: Role, org: Option<Uuid>) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            organization_id: org,
        }
    }

    fn local_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::Admin), Just(Role::Franqueado), Just(Role::User)]
    }

    fn global_role() -> impl Strategy<Value = Role> {
        prop_oneof![Just(Role::SuperAdmin), Just(Role::FranchiseAdmin)]
    }

    fn uuid_strategy() -> impl Strategy<Value = Uuid> {
        any::<u128>().prop_map(Uuid::from_u128)
    }

    #[test]
    fn test_own_organization_is_allowed() {
        let org = Uuid::new_v4();
        let caller = principal(Role::User, Some(org));
        assert_eq!(authorize(&caller, &org.to_string()).unwrap(), org);
    }

    #[test]
    fn test_foreign_organization_is_denied() {
        let caller = principal(Role::Admin, Some(Uuid::new_v4()));
        let err = authorize(&caller, &Uuid::new_v4().to_string()).unwrap_err();
        assert!(matches!(err, ApiError::InsufficientPermissions));
    }

    #[test]
    fn test_local_role_without_home_is_denied() {
        let caller = principal(Role::Franqueado, None);
        assert_eq!(
            evaluate(&caller, Uuid::new_v4()),
            AuthorizationDecision::Deny(DenyReason::NoHomeOrganization)
        );
    }

    #[test]
    fn test_invalid_target_checked_before_role() {
        // even a super admin gets InvalidTarget, never a default allow
        let caller = principal(Role::SuperAdmin, None);
        for raw in ["", "   ", "org-1", "12345"] {
            let err = authorize(&caller, raw).unwrap_err();
            assert!(matches!(err, ApiError::InvalidTarget(_)), "raw={:?}", raw);
        }
    }

    #[test]
    fn test_authorize_global() {
        assert!(authorize_global(&principal(Role::SuperAdmin, None)).is_ok());
        assert!(authorize_global(&principal(Role::FranchiseAdmin, Some(Uuid::new_v4()))).is_ok());
        for role in [Role::Admin, Role::Franqueado, Role::User] {
            let err = authorize_global(&principal(role, Some(Uuid::new_v4()))).unwrap_err();
            assert!(matches!(err, ApiError::InsufficientPermissions));
        }
    }

    #[test]
    fn test_require_role() {
        let allowed = [Role::Admin, Role::Franqueado];
        assert!(require_role(&principal(Role::Admin, None), &allowed).is_ok());
        assert!(require_role(&principal(Role::Franqueado, None), &allowed).is_ok());
        assert!(require_role(&principal(Role::SuperAdmin, None), &allowed).is_err());
        assert!(require_role(&principal(Role::User, None), &allowed).is_err());
    }

    proptest! {
        #[test]
        fn prop_local_roles_denied_foreign_org(
            role in local_role(),
            home in uuid_strategy(),
            target in uuid_strategy(),
        ) {
            prop_assume!(home != target);
            let caller = principal(role, Some(home));
            prop_assert_eq!(
                evaluate(&caller, target),
                AuthorizationDecision::Deny(DenyReason::ForeignOrganization)
            );
            prop_assert!(matches!(
                authorize(&caller, &target.to_string()),
                Err(ApiError::InsufficientPermissions)
            ));
        }

        #[test]
        fn prop_global_roles_allowed_anywhere(
            role in global_role(),
            home in proptest::option::of(uuid_strategy()),
            target in uuid_strategy(),
        ) {
            let caller = principal(role, home);
            prop_assert!(evaluate(&caller, target).is_allowed());
            prop_assert_eq!(authorize(&caller, &target.to_string()).unwrap(), target);
        }

        #[test]
        fn prop_every_role_allowed_in_home_org(role_idx in 0usize..5, home in uuid_strategy()) {
            let caller = principal(Role::ALL[role_idx], Some(home));
            prop_assert!(evaluate(&caller, home).is_allowed());
        }
    }
}
