//! Ownership-based authorization
//!
//! Only the user recorded as a resource's owner may mutate it. Existence is
//! checked before ownership, so a missing resource is always `NotFound` no
//! matter who asks.

use crate::error::ApiError;
use job_tracker_shared::AuthError;

/// A record with an owning username
pub trait Owned {
    fn owner(&self) -> &str;
}

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Decide whether `actor` may mutate a resource owned by `owner`
///
/// Both names get the lowercase normalization applied at registration.
pub fn authorize_mutation(actor: &str, owner: &str) -> Decision {
    if actor.to_lowercase() == owner.to_lowercase() {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Resolve a looked-up resource for mutation by `actor`
///
/// `None` becomes `NotFound`; a resource owned by someone else becomes
/// `Forbidden`.
pub fn authorize_owned<T: Owned>(
    resource: Option<T>,
    actor: &str,
    kind: &str,
    action: &str,
) -> Result<T, ApiError> {
    let resource = resource.ok_or_else(|| ApiError::NotFound(format!("{} not found", kind)))?;

    match authorize_mutation(actor, resource.owner()) {
        Decision::Allow => Ok(resource),
        Decision::Deny => {
            tracing::warn!(actor = %actor, kind = %kind, action = %action, "Ownership check denied");
            metrics::counter!("job_mutation_denied_total", "reason" => "forbidden").increment(1);
            Err(AuthError::Forbidden(format!(
                "You are not allowed to {} this {}",
                action,
                kind.to_lowercase()
            ))
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        owner: String,
    }

    impl Owned for Doc {
        fn owner(&self) -> &str {
            &self.owner
        }
    }

    fn doc(owner: &str) -> Doc {
        Doc {
            owner: owner.to_string(),
        }
    }

    #[test]
    fn test_owner_is_allowed() {
        assert_eq!(authorize_mutation("alicej", "alicej"), Decision::Allow);
    }

    #[test]
    fn test_comparison_is_case_normalized() {
        assert_eq!(authorize_mutation("AliceJ", "alicej"), Decision::Allow);
    }

    #[test]
    fn test_other_user_is_denied() {
        assert_eq!(authorize_mutation("bob", "alicej"), Decision::Deny);
        assert_eq!(authorize_mutation("alice", "alicej"), Decision::Deny);
    }

    #[test]
    fn test_missing_resource_is_not_found_for_anyone() {
        let result = authorize_owned::<Doc>(None, "alicej", "Job", "update");
        assert!(matches!(result, Err(ApiError::NotFound(_))));

        let result = authorize_owned::<Doc>(None, "bob", "Job", "delete");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_foreign_resource_is_forbidden() {
        let result = authorize_owned(Some(doc("alicej")), "bob", "Job", "delete");
        match result {
            Err(ApiError::Forbidden(msg)) => {
                assert_eq!(msg, "You are not allowed to delete this job")
            }
            other => panic!("expected Forbidden, got {:?}", other.map(|d| d.owner)),
        }
    }

    #[test]
    fn test_own_resource_is_returned() {
        let result = authorize_owned(Some(doc("alicej")), "alicej", "Job", "update").unwrap();
        assert_eq!(result.owner(), "alicej");
    }
}
