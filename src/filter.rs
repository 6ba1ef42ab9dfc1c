//! Order-list filtering: the search box, the dropdown filters and the two
//! quick toggles, combined conjunctively.

use crate::order::{DateStamp, Order, OrderType};
use crate::status::OrderStatus;

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Matched case-insensitively against order id, resi, product name and
    /// back name.
    pub search: Option<String>,
    pub status: Option<OrderStatus>,
    pub marketplace: Option<String>,
    pub order_type: Option<OrderType>,
    /// Inclusive order-date range; either bound may be open.
    pub start_date: Option<DateStamp>,
    pub end_date: Option<DateStamp>,
    /// Only jersey orders carrying a back name or number.
    pub only_custom: bool,
    /// Only overdue orders.
    pub only_urgent: bool,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order, today: DateStamp) -> bool {
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            let hit = order.order_id.to_lowercase().contains(&term)
                || order
                    .resi
                    .as_deref()
                    .is_some_and(|r| r.to_lowercase().contains(&term))
                || order.product_name.to_lowercase().contains(&term)
                || order
                    .back_name
                    .as_deref()
                    .is_some_and(|b| b.to_lowercase().contains(&term));
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        if self
            .marketplace
            .as_deref()
            .is_some_and(|m| m != order.marketplace)
        {
            return false;
        }
        if self.order_type.is_some_and(|t| t != order.order_type) {
            return false;
        }
        if self.start_date.is_some_and(|d| order.order_date < d) {
            return false;
        }
        if self.end_date.is_some_and(|d| order.order_date > d) {
            return false;
        }
        if self.only_custom && !order.is_custom() {
            return false;
        }
        if self.only_urgent && !order.is_overdue(today) {
            return false;
        }
        true
    }

    pub fn apply<'a>(&self, orders: &'a [Order], today: DateStamp) -> Vec<&'a Order> {
        orders.iter().filter(|o| self.matches(o, today)).collect()
    }
}
