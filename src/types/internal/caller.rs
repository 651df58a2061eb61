use super::role::{Role, RoleSet};

/// Verified identity of the caller, resolved from a validated token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub email: String,
    pub roles: RoleSet,
}

impl Caller {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.roles.contains(role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin)
    }
}
