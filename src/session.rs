//! Client session state: the last-viewed screen and the unsent order draft.
//! Both are explicit serialize/deserialize boundaries around session start
//! and end rather than ambient storage; the draft is cleared on successful
//! submission and everything is cleared on logout.

use std::fmt;
use std::sync::Arc;

use crate::order::OrderDetails;
use crate::role::Role;

/// Screens of the admin panel.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    #[n(0)]
    Dashboard,
    #[n(1)]
    InputOrder,
    #[n(2)]
    OrderList,
    #[n(3)]
    Catalog,
    #[n(4)]
    Report,
    #[n(5)]
    Tasks,
}

impl ViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::Dashboard => "DASHBOARD",
            ViewType::InputOrder => "INPUT_ORDER",
            ViewType::OrderList => "ORDER_LIST",
            ViewType::Catalog => "CATALOG",
            ViewType::Report => "REPORT",
            ViewType::Tasks => "TASKS",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a user lands after sign-in. Worker roles always land on their task
/// queue regardless of what was saved; managers get their saved screen,
/// defaulting to the dashboard.
pub fn landing_view(role: Role, saved: Option<ViewType>) -> ViewType {
    if !role.is_manager() {
        return ViewType::Tasks;
    }
    saved.unwrap_or(ViewType::Dashboard)
}

/// Per-user session persistence on top of the shared database.
pub struct SessionStore {
    instance: Arc<sled::Db>,
}

impl SessionStore {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn view_key(user_id: &str) -> String {
        format!("view/{user_id}")
    }

    fn draft_key(user_id: &str) -> String {
        format!("draft/{user_id}")
    }

    pub fn save_last_view(&self, user_id: &str, view: ViewType) -> anyhow::Result<()> {
        self.instance
            .insert(Self::view_key(user_id).as_bytes(), minicbor::to_vec(view)?)?;
        Ok(())
    }

    pub fn last_view(&self, user_id: &str) -> anyhow::Result<Option<ViewType>> {
        match self.instance.get(Self::view_key(user_id).as_bytes())? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn save_draft(&self, user_id: &str, draft: &OrderDetails) -> anyhow::Result<()> {
        self.instance
            .insert(Self::draft_key(user_id).as_bytes(), minicbor::to_vec(draft)?)?;
        Ok(())
    }

    pub fn load_draft(&self, user_id: &str) -> anyhow::Result<Option<OrderDetails>> {
        match self.instance.get(Self::draft_key(user_id).as_bytes())? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Called after a successful order submission.
    pub fn clear_draft(&self, user_id: &str) -> anyhow::Result<()> {
        self.instance.remove(Self::draft_key(user_id).as_bytes())?;
        Ok(())
    }

    /// Called on logout: drops both the saved view and any unsent draft.
    pub fn clear(&self, user_id: &str) -> anyhow::Result<()> {
        self.instance.remove(Self::view_key(user_id).as_bytes())?;
        self.instance.remove(Self::draft_key(user_id).as_bytes())?;
        Ok(())
    }
}
