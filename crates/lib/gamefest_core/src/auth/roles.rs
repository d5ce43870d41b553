//! Admin roles and the allowlists guarding privileged operations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Admin account role, in descending order of privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Superuser,
    EliteBoard,
    TopBoard,
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Superuser, Role::EliteBoard, Role::TopBoard, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Superuser => "superuser",
            Role::EliteBoard => "elite_board",
            Role::TopBoard => "top_board",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        Self::ALL.into_iter().find(|r| r.as_str() == value)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// View and delete teams, scores and uploaded files.
pub const TEAM_ADMINS: &[Role] = &[Role::Admin, Role::Superuser, Role::EliteBoard];

/// List admin accounts.
pub const USER_VIEWERS: &[Role] = &[Role::Superuser, Role::EliteBoard];

/// Create, update and delete admin accounts.
pub const USER_MANAGERS: &[Role] = &[Role::Superuser];

/// Whether `role` appears in `allowlist`.
pub fn is_allowed(role: Role, allowlist: &[Role]) -> bool {
    allowlist.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_str() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("root"), None);
    }

    #[test]
    fn top_board_holds_no_privileged_access() {
        assert!(!is_allowed(Role::TopBoard, TEAM_ADMINS));
        assert!(!is_allowed(Role::TopBoard, USER_VIEWERS));
        assert!(!is_allowed(Role::TopBoard, USER_MANAGERS));
    }

    #[test]
    fn only_superuser_manages_users() {
        assert!(is_allowed(Role::Superuser, USER_MANAGERS));
        assert!(!is_allowed(Role::EliteBoard, USER_MANAGERS));
        assert!(is_allowed(Role::EliteBoard, USER_VIEWERS));
        assert!(!is_allowed(Role::Admin, USER_VIEWERS));
        assert!(is_allowed(Role::Admin, TEAM_ADMINS));
    }
}
