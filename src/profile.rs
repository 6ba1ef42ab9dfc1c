//! User accounts as the lifecycle core sees them: a role and a display name,
//! looked up by user id at session start.

use crate::role::Role;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    #[n(0)]
    pub id: String, // opaque ref, bech32-encoded uuid7
    #[n(1)]
    pub role: Role,
    #[n(2)]
    pub fullname: String,
}

impl UserProfile {
    pub fn new(id: String, role: Role, fullname: &str) -> Self {
        Self {
            id,
            role,
            fullname: fullname.to_string(),
        }
    }

    /// Name written into order history entries. Accounts created without a
    /// fullname show up as "Tanpa Nama".
    pub fn display_name(&self) -> &str {
        if self.fullname.is_empty() {
            "Tanpa Nama"
        } else {
            &self.fullname
        }
    }
}
