use crate::role::Role;
use crate::status::OrderStatus;

/// Draft validation failures, raised before anything touches the store.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum OrderError {
    #[error("order id is required")]
    MissingOrderId,
    #[error("product is required")]
    MissingProduct,
    #[error("marketplace is required")]
    MissingMarketplace,
    #[error("quantity must be at least 1")]
    InvalidQuantity,
}

/// A lifecycle transition refused by the state machine.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TransitionError {
    #[error("order already reached terminal status {0}")]
    Terminal(OrderStatus),
    #[error("start requires status {expected}, found {found}")]
    NotPending {
        expected: OrderStatus,
        found: OrderStatus,
    },
    #[error("completion requires status {expected}, found {found}")]
    NotInProgress {
        expected: OrderStatus,
        found: OrderStatus,
    },
    #[error("return transition requires a return date")]
    MissingReturnDate,
}

/// An operation refused by the role matrix before any store access.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("role {role} is not permitted to {action}")]
pub struct AccessDenied {
    pub role: Role,
    pub action: &'static str,
}

/// Catalog validation failures.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product name is required")]
    MissingName,
}
