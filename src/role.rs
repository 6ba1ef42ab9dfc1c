//! User roles and the authorization matrix.

use std::fmt;
use std::str::FromStr;

use crate::status::Department;

/// Account roles. The two manager roles see the whole order list; each
/// worker role is restricted to its own department queue.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[n(0)]
    Superadmin,
    #[n(1)]
    AdminMarketplace,
    #[n(2)]
    Setting,
    #[n(3)]
    Print,
    #[n(4)]
    Press,
    #[n(5)]
    Jahit,
    #[n(6)]
    Packing,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Superadmin,
        Role::AdminMarketplace,
        Role::Setting,
        Role::Print,
        Role::Press,
        Role::Jahit,
        Role::Packing,
    ];

    /// The department a worker role is bound to. Managers have none.
    pub fn department(self) -> Option<Department> {
        match self {
            Role::Superadmin | Role::AdminMarketplace => None,
            Role::Setting => Some(Department::Setting),
            Role::Print => Some(Department::Print),
            Role::Press => Some(Department::Press),
            Role::Jahit => Some(Department::Jahit),
            Role::Packing => Some(Department::Packing),
        }
    }

    pub fn is_manager(self) -> bool {
        matches!(self, Role::Superadmin | Role::AdminMarketplace)
    }

    /// May start and complete work in the given department's queue.
    /// Superadmin may act as any department.
    pub fn may_work(self, dept: Department) -> bool {
        match self {
            Role::Superadmin => true,
            Role::AdminMarketplace => false,
            _ => self.department() == Some(dept),
        }
    }

    pub fn may_create_orders(self) -> bool {
        self.is_manager()
    }

    /// Exception transitions (cancel, return) and the manual status override
    /// are reserved for the manager roles.
    pub fn may_cancel(self) -> bool {
        self.is_manager()
    }

    pub fn may_return(self) -> bool {
        self.is_manager()
    }

    pub fn may_override_status(self) -> bool {
        self.is_manager()
    }

    /// Final READY_TO_SHIP -> COMPLETED confirmation.
    pub fn may_confirm_completion(self) -> bool {
        self.is_manager()
    }

    pub fn may_delete(self) -> bool {
        self == Role::Superadmin
    }

    pub fn may_edit_catalog(self) -> bool {
        self == Role::Superadmin
    }

    pub fn may_view_reports(self) -> bool {
        self == Role::Superadmin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Superadmin => "SUPERADMIN",
            Role::AdminMarketplace => "ADMIN_MARKETPLACE",
            Role::Setting => "SETTING",
            Role::Print => "PRINT",
            Role::Press => "PRESS",
            Role::Jahit => "JAHIT",
            Role::Packing => "PACKING",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Superadmin => "Super Admin",
            Role::AdminMarketplace => "Admin Marketplace",
            Role::Setting => "Tim Setting (Design)",
            Role::Print => "Tim Print",
            Role::Press => "Tim Press",
            Role::Jahit => "Tim Jahit",
            Role::Packing => "Tim Packing & Shipping",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| ParseRoleError(s.to_string()))
    }
}
