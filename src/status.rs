//! Order lifecycle states and the department stage table.

use std::fmt;
use std::str::FromStr;

/// The fourteen lifecycle states an order moves through. Five production
/// departments each own a pending/in-progress pair; the remaining four are
/// the shipping handoff and the terminal outcomes.
#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum OrderStatus {
    #[n(0)]
    PendingSetting,
    #[n(1)]
    InSetting,
    #[n(2)]
    PendingPrint,
    #[n(3)]
    InPrint,
    #[n(4)]
    PendingPress,
    #[n(5)]
    InPress,
    #[n(6)]
    PendingJahit,
    #[n(7)]
    InJahit,
    #[n(8)]
    PendingPacking,
    #[n(9)]
    InPacking,
    #[n(10)]
    ReadyToShip,
    #[n(11)]
    Completed,
    #[n(12)]
    Canceled,
    #[n(13)]
    Returned,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 14] = [
        OrderStatus::PendingSetting,
        OrderStatus::InSetting,
        OrderStatus::PendingPrint,
        OrderStatus::InPrint,
        OrderStatus::PendingPress,
        OrderStatus::InPress,
        OrderStatus::PendingJahit,
        OrderStatus::InJahit,
        OrderStatus::PendingPacking,
        OrderStatus::InPacking,
        OrderStatus::ReadyToShip,
        OrderStatus::Completed,
        OrderStatus::Canceled,
        OrderStatus::Returned,
    ];

    /// Terminal states accept no further transition of any kind.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Canceled | OrderStatus::Returned
        )
    }

    /// Canonical wire name, matching the values stored by the legacy system.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingSetting => "PENDING_SETTING",
            OrderStatus::InSetting => "IN_SETTING",
            OrderStatus::PendingPrint => "PENDING_PRINT",
            OrderStatus::InPrint => "IN_PRINT",
            OrderStatus::PendingPress => "PENDING_PRESS",
            OrderStatus::InPress => "IN_PRESS",
            OrderStatus::PendingJahit => "PENDING_JAHIT",
            OrderStatus::InJahit => "IN_JAHIT",
            OrderStatus::PendingPacking => "PENDING_PACKING",
            OrderStatus::InPacking => "IN_PACKING",
            OrderStatus::ReadyToShip => "READY_TO_SHIP",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Canceled => "CANCELED",
            OrderStatus::Returned => "RETURNED",
        }
    }

    /// Display label shown to operators.
    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::PendingSetting => "Menunggu Setting",
            OrderStatus::InSetting => "Proses Setting",
            OrderStatus::PendingPrint => "Menunggu Print",
            OrderStatus::InPrint => "Proses Print",
            OrderStatus::PendingPress => "Menunggu Press",
            OrderStatus::InPress => "Proses Press",
            OrderStatus::PendingJahit => "Menunggu Jahit",
            OrderStatus::InJahit => "Proses Jahit",
            OrderStatus::PendingPacking => "Menunggu Packing",
            OrderStatus::InPacking => "Proses Packing",
            OrderStatus::ReadyToShip => "Siap Dikirim",
            OrderStatus::Completed => "Selesai",
            OrderStatus::Canceled => "Dibatalkan (Cancel)",
            OrderStatus::Returned => "Dikembalikan (Return)",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown order status: {0}")]
pub struct ParseStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseStatusError(s.to_string()))
    }
}

/// The five production departments, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Department {
    Setting,
    Print,
    Press,
    Jahit,
    Packing,
}

/// Stage triple owned by one department: the queue it pulls from, the state
/// it works in, and the state it hands off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTriple {
    pub pending: OrderStatus,
    pub in_progress: OrderStatus,
    pub next: OrderStatus,
}

impl Department {
    pub const ALL: [Department; 5] = [
        Department::Setting,
        Department::Print,
        Department::Press,
        Department::Jahit,
        Department::Packing,
    ];

    /// The static stage table. Adding or removing a department is a
    /// compile-time checked change to this match.
    pub fn stages(self) -> StageTriple {
        match self {
            Department::Setting => StageTriple {
                pending: OrderStatus::PendingSetting,
                in_progress: OrderStatus::InSetting,
                next: OrderStatus::PendingPrint,
            },
            Department::Print => StageTriple {
                pending: OrderStatus::PendingPrint,
                in_progress: OrderStatus::InPrint,
                next: OrderStatus::PendingPress,
            },
            Department::Press => StageTriple {
                pending: OrderStatus::PendingPress,
                in_progress: OrderStatus::InPress,
                next: OrderStatus::PendingJahit,
            },
            Department::Jahit => StageTriple {
                pending: OrderStatus::PendingJahit,
                in_progress: OrderStatus::InJahit,
                next: OrderStatus::PendingPacking,
            },
            Department::Packing => StageTriple {
                pending: OrderStatus::PendingPacking,
                in_progress: OrderStatus::InPacking,
                next: OrderStatus::ReadyToShip,
            },
        }
    }

    /// True when the status sits in this department's queue.
    pub fn worked_here(self, status: OrderStatus) -> bool {
        let stages = self.stages();
        status == stages.pending || status == stages.in_progress
    }

    /// The department whose queue owns the given status, if any.
    pub fn owning(status: OrderStatus) -> Option<Department> {
        Department::ALL.into_iter().find(|d| d.worked_here(status))
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Department::Setting => f.write_str("SETTING"),
            Department::Print => f.write_str("PRINT"),
            Department::Press => f.write_str("PRESS"),
            Department::Jahit => f.write_str("JAHIT"),
            Department::Packing => f.write_str("PACKING"),
        }
    }
}
