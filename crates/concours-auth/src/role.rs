//! Role enum and capability sets

use serde::{Deserialize, Serialize};

/// Role assigned to a portal account
///
/// The set is closed: a role string outside it fails deserialization, which
/// downstream code treats as "no capability".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access
    Admin,
    /// Scores vehicles during judging
    Judge,
    /// Manages show registration and voter numbers
    Registrar,
    /// Sells products at the show
    Vendor,
    /// Regular attendee account
    User,
}

impl Role {
    /// All roles, in display order
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Judge,
        Role::Registrar,
        Role::Vendor,
        Role::User,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Judge => "judge",
            Role::Registrar => "registrar",
            Role::Vendor => "vendor",
            Role::User => "user",
        }
    }

    /// Parse a stored role string; unknown strings yield `None`
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "admin" => Some(Role::Admin),
            "judge" => Some(Role::Judge),
            "registrar" => Some(Role::Registrar),
            "vendor" => Some(Role::Vendor),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Role::Admin => 1 << 0,
            Role::Judge => 1 << 1,
            Role::Registrar => 1 << 2,
            Role::Vendor => 1 << 3,
            Role::User => 1 << 4,
        }
    }
}

/// A set of roles permitted to exercise a capability
///
/// Routes declare the set they require; the gate checks membership of the
/// session principal's single role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSet(u8);

impl RoleSet {
    /// No roles (deny everything)
    pub const NONE: RoleSet = RoleSet(0);

    /// Any authenticated principal
    pub const ANY: RoleSet = RoleSet(0b0001_1111);

    /// Administrators only
    pub const ADMIN: RoleSet = RoleSet(Role::Admin.bit());

    /// Privileged show staff: admin, judge, registrar, vendor
    pub const STAFF: RoleSet = RoleSet(
        Role::Admin.bit() | Role::Judge.bit() | Role::Registrar.bit() | Role::Vendor.bit(),
    );

    /// Build a set from an explicit list of roles
    pub const fn of(roles: &[Role]) -> RoleSet {
        let mut bits = 0u8;
        let mut i = 0;
        while i < roles.len() {
            bits |= roles[i].bit();
            i += 1;
        }
        RoleSet(bits)
    }

    pub const fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        for role in Role::ALL {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_unknown_role_string_rejected() {
        assert_eq!(Role::parse("superadmin"), None);
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("Admin"), None); // case sensitive
    }

    #[test]
    fn test_role_serde_lowercase() {
        let json = serde_json::to_string(&Role::Registrar).unwrap();
        assert_eq!(json, "\"registrar\"");

        let parsed: Role = serde_json::from_str("\"vendor\"").unwrap();
        assert_eq!(parsed, Role::Vendor);

        // Unknown role fails deserialization (no capability)
        let bad: Result<Role, _> = serde_json::from_str("\"owner\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_roleset_any_contains_all() {
        for role in Role::ALL {
            assert!(RoleSet::ANY.contains(role));
        }
    }

    #[test]
    fn test_roleset_admin_only() {
        assert!(RoleSet::ADMIN.contains(Role::Admin));
        assert!(!RoleSet::ADMIN.contains(Role::Judge));
        assert!(!RoleSet::ADMIN.contains(Role::User));
    }

    #[test]
    fn test_roleset_staff_excludes_user() {
        for role in [Role::Admin, Role::Judge, Role::Registrar, Role::Vendor] {
            assert!(RoleSet::STAFF.contains(role));
        }
        assert!(!RoleSet::STAFF.contains(Role::User));
    }

    #[test]
    fn test_roleset_of_explicit_list() {
        let set = RoleSet::of(&[Role::Judge, Role::Admin]);
        assert!(set.contains(Role::Judge));
        assert!(set.contains(Role::Admin));
        assert!(!set.contains(Role::Registrar));
        assert!(!set.contains(Role::User));
    }

    #[test]
    fn test_roleset_none_denies_everything() {
        for role in Role::ALL {
            assert!(!RoleSet::NONE.contains(role));
        }
        assert!(RoleSet::NONE.is_empty());
    }
}
