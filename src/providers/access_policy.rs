//! Stateless access decisions over an explicitly passed caller.
//!
//! Every coordinator operation evaluates one [`AccessRequirement`] before it
//! touches a store. A missing caller yields `Unauthenticated`; an unmet
//! requirement yields `Forbidden`.

use crate::errors::InternalError;
use crate::errors::internal::AuthorizationError;
use crate::types::internal::caller::Caller;
use crate::types::internal::context::RequestContext;
use crate::types::internal::role::Role;

/// Identity a self-match is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    UserId(&'a str),
    Email(&'a str),
}

impl Target<'_> {
    fn matches(&self, caller: &Caller) -> bool {
        match self {
            Target::UserId(id) => caller.user_id == *id,
            Target::Email(email) => caller.email.eq_ignore_ascii_case(email),
        }
    }
}

/// Declarative requirement attached to an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRequirement<'a> {
    Public,
    Authenticated,
    HasRole(Role),
    HasAnyRole(&'a [Role]),
    /// Caller is the target, or holds one of the roles
    SelfOrAnyRole(Target<'a>, &'a [Role]),
}

impl AccessRequirement<'_> {
    /// Decide whether `caller` satisfies this requirement
    pub fn is_satisfied_by(&self, caller: &Caller) -> bool {
        match self {
            AccessRequirement::Public | AccessRequirement::Authenticated => true,
            AccessRequirement::HasRole(role) => caller.has_role(*role),
            AccessRequirement::HasAnyRole(roles) => caller.has_any_role(roles),
            AccessRequirement::SelfOrAnyRole(target, roles) => {
                target.matches(caller) || caller.has_any_role(roles)
            }
        }
    }
}

/// Evaluate `requirement` for the caller carried by `ctx`
///
/// Returns the caller on success. `Public` requirements succeed without a
/// caller and return `Ok(None)`.
pub fn evaluate<'c>(
    ctx: &'c RequestContext,
    requirement: AccessRequirement<'_>,
    operation: &str,
) -> Result<Option<&'c Caller>, InternalError> {
    if requirement == AccessRequirement::Public {
        return Ok(ctx.caller.as_ref());
    }

    let caller = ctx.caller.as_ref().ok_or(AuthorizationError::Unauthenticated)?;

    if !requirement.is_satisfied_by(caller) {
        return Err(AuthorizationError::forbidden(&caller.user_id, operation).into());
    }

    Ok(Some(caller))
}

/// Like [`evaluate`] for requirements that always need a caller
pub fn authorize<'c>(
    ctx: &'c RequestContext,
    requirement: AccessRequirement<'_>,
    operation: &str,
) -> Result<&'c Caller, InternalError> {
    evaluate(ctx, requirement, operation)?
        .ok_or_else(|| AuthorizationError::Unauthenticated.into())
}

/// Resolve the author recorded on new feedback
///
/// Only an administrator may name a third-party author; everyone else,
/// and an administrator who names nobody, is recorded as the author.
pub fn effective_author(caller: &Caller, submitted_author_id: Option<&str>) -> String {
    match submitted_author_id.map(str::trim) {
        Some(author_id) if !author_id.is_empty() && caller.is_admin() => author_id.to_string(),
        _ => caller.user_id.clone(),
    }
}
