//! Derived views over the loaded order collection: dashboard counters,
//! report-range statistics and the per-department queues. Nothing here is
//! persisted; everything is recomputed from the current snapshot.

use crate::order::{DateStamp, HistoryEntry, Order, OrderType};
use crate::status::{Department, OrderStatus};

/// How many finished handoffs the worker view lists per department.
const HANDOFF_LOG_LIMIT: usize = 10;

/// Headline numbers for a reporting period (order date range, inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportStats {
    pub total: usize,
    pub completed: usize,
    pub production_qty: u64,
    pub stock_qty: u64,
    pub total_qty: u64,
}

pub fn range_stats(orders: &[Order], start: DateStamp, end: DateStamp) -> ReportStats {
    let mut stats = ReportStats::default();
    for order in in_range(orders, start, end) {
        stats.total += 1;
        if order.status == OrderStatus::Completed {
            stats.completed += 1;
        }
        let qty = u64::from(order.quantity);
        match order.order_type {
            OrderType::PreOrder => stats.production_qty += qty,
            OrderType::Stock => stats.stock_qty += qty,
        }
        stats.total_qty += qty;
    }
    stats
}

/// Per-marketplace rollup for a reporting period, busiest marketplace first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketplaceSummary {
    pub marketplace: String,
    pub count: usize,
    pub qty: u64,
    pub done: usize,
    pub pending: usize,
}

pub fn marketplace_summary(
    orders: &[Order],
    start: DateStamp,
    end: DateStamp,
) -> Vec<MarketplaceSummary> {
    let mut rows: Vec<MarketplaceSummary> = Vec::new();
    for order in in_range(orders, start, end) {
        let idx = match rows.iter().position(|r| r.marketplace == order.marketplace) {
            Some(idx) => idx,
            None => {
                rows.push(MarketplaceSummary {
                    marketplace: order.marketplace.clone(),
                    count: 0,
                    qty: 0,
                    done: 0,
                    pending: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[idx];
        row.count += 1;
        row.qty += u64::from(order.quantity);
        if order.status == OrderStatus::Completed {
            row.done += 1;
        } else if !order.status.is_terminal() {
            row.pending += 1;
        }
    }
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

/// One dashboard tile: a labelled group of pipeline stages and how many
/// orders currently sit in them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSummary {
    pub label: &'static str,
    pub active: usize,
}

pub fn stage_summaries(orders: &[Order]) -> [StageSummary; 4] {
    let count = |stages: &[OrderStatus]| orders.iter().filter(|o| stages.contains(&o.status)).count();

    [
        StageSummary {
            label: "Antrian Setting",
            active: count(&[OrderStatus::PendingSetting, OrderStatus::InSetting]),
        },
        StageSummary {
            label: "Proses Print/Press",
            active: count(&[
                OrderStatus::PendingPrint,
                OrderStatus::InPrint,
                OrderStatus::PendingPress,
                OrderStatus::InPress,
            ]),
        },
        StageSummary {
            label: "Proses Jahit",
            active: count(&[OrderStatus::PendingJahit, OrderStatus::InJahit]),
        },
        StageSummary {
            label: "Packing & Siap",
            active: count(&[
                OrderStatus::PendingPacking,
                OrderStatus::InPacking,
                OrderStatus::ReadyToShip,
            ]),
        },
    ]
}

/// Orders past their order date and still in flight, for the dashboard's
/// deadline panel.
pub fn production_debt<'a>(orders: &'a [Order], today: DateStamp) -> Vec<&'a Order> {
    orders.iter().filter(|o| o.is_overdue(today)).collect()
}

/// A department's queue is exactly the orders sitting in its pending or
/// in-progress state.
pub fn department_queue<'a>(orders: &'a [Order], dept: Department) -> Vec<&'a Order> {
    orders
        .iter()
        .filter(|o| dept.worked_here(o.status))
        .collect()
}

/// Orders this department has handed off, most recent handoff first. An
/// order counts once, by its latest history entry carrying the department's
/// `next` status.
pub fn department_handoffs<'a>(
    orders: &'a [Order],
    dept: Department,
) -> Vec<(&'a Order, &'a HistoryEntry)> {
    let next = dept.stages().next;
    let mut handoffs: Vec<(&Order, &HistoryEntry)> = orders
        .iter()
        .filter_map(|o| {
            o.history
                .iter()
                .rev()
                .find(|h| h.status == next)
                .map(|h| (o, h))
        })
        .collect();
    handoffs.sort_by(|a, b| b.1.updated_at.cmp(&a.1.updated_at));
    handoffs.truncate(HANDOFF_LOG_LIMIT);
    handoffs
}

fn in_range<'a>(
    orders: &'a [Order],
    start: DateStamp,
    end: DateStamp,
) -> impl Iterator<Item = &'a Order> {
    orders
        .iter()
        .filter(move |o| o.order_date >= start && o.order_date <= end)
}
