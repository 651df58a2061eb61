use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Closed registry of roles a user may hold
///
/// Role names are persisted in the `roles` table and checked against this
/// registry at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Elevated role: may act on behalf of others and bypass self-only checks
    Admin,
    /// Broader read access than a collaborator, no override powers
    Manager,
    Collaborator,
}

/// Set of roles held by one user
pub type RoleSet = BTreeSet<Role>;

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Collaborator];

    /// Persisted name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ROLE_ADMIN",
            Role::Manager => "ROLE_MANAGER",
            Role::Collaborator => "ROLE_COLLABORATOR",
        }
    }

    /// Roles allowed to read across users
    pub const READ_ANY: &'static [Role] = &[Role::Admin, Role::Manager];
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// Convert a role set to its persisted names, in registry order
pub fn role_names(roles: &RoleSet) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_string()).collect()
}

/// Parse submitted role names against the registry
///
/// # Errors
/// Returns the first name the registry does not know
pub fn parse_role_names<S: AsRef<str>>(names: &[S]) -> Result<RoleSet, String> {
    names.iter().map(|name| name.as_ref().trim().parse::<Role>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_names_round_trip_through_registry() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn test_unknown_role_name_is_rejected() {
        assert_eq!("ROLE_OWNER".parse::<Role>(), Err("ROLE_OWNER".to_string()));
        assert!("role_admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_parse_role_names() {
        assert_eq!(
            parse_role_names(&["ROLE_MANAGER", " ROLE_ADMIN", "ROLE_MANAGER"]),
            Ok(RoleSet::from([Role::Admin, Role::Manager]))
        );
        assert_eq!(parse_role_names(&["ROLE_ADMIN", "ROLE_ROOT"]), Err("ROLE_ROOT".to_string()));
    }

    #[test]
    fn test_role_names_are_ordered() {
        let roles = RoleSet::from([Role::Collaborator, Role::Admin]);
        assert_eq!(role_names(&roles), vec!["ROLE_ADMIN", "ROLE_COLLABORATOR"]);
    }
}
