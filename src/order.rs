//! Core order record, draft builder and lifecycle transitions.

use std::fmt;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{OrderError, TransitionError};
use crate::status::{Department, OrderStatus};
use crate::utils;

/// Marketplaces the shop sells on.
pub const MARKETPLACES: [&str; 8] = [
    "Shopee Erfo.id",
    "Shopee Safashion",
    "Shopee Benghar",
    "Tiktok Shop Erfo",
    "Tiktok Shop Safashion",
    "Lazada Erfo",
    "WhatsApp",
    "Offline",
];

/// Couriers offered on the input form.
pub const EXPEDITIONS: [&str; 5] = ["J&T Express", "SPX", "JNE", "ANTERAJA", "SICEPAT"];

/// Garment sizes.
pub const SIZES: [&str; 9] = ["XS", "S", "M", "L", "XL", "XXL", "3XL", "4XL", "5XL"];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeStamp(DateTime<Utc>);

impl TimeStamp {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DateTime<Utc>> for TimeStamp {
    fn from(value: DateTime<Utc>) -> Self {
        TimeStamp(value)
    }
}

impl fmt::Display for TimeStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl<C> minicbor::Encode<C> for TimeStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

/// A calendar date with no time component. Order dates and return dates are
/// plain dates; the `YYYY-MM-DD` string form is also the wire encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateStamp(NaiveDate);

impl DateStamp {
    pub fn today() -> Self {
        Self(Utc::now().date_naive())
    }
    pub fn new_with(year: i32, month: u32, day: u32) -> Self {
        Self(NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(DateStamp)
    }
}

impl fmt::Display for DateStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl<C> minicbor::Encode<C> for DateStamp {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.to_string())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for DateStamp {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let s = d.str()?;

        DateStamp::parse(s)
            .map_err(|_| minicbor::decode::Error::message("failed to parse calendar date"))
    }
}

/// Pre-orders walk the full production pipeline; stock items go straight to
/// the packing queue.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    #[n(0)]
    PreOrder,
    #[n(1)]
    Stock,
}

impl OrderType {
    pub fn initial_status(self) -> OrderStatus {
        match self {
            OrderType::PreOrder => OrderStatus::PendingSetting,
            OrderType::Stock => OrderStatus::PendingPacking,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderType::PreOrder => "Produksi",
            OrderType::Stock => "Stok",
        }
    }
}

/// One audit-trail entry: who moved the order to which status and when.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    #[n(0)]
    pub status: OrderStatus,
    #[n(1)]
    pub updated_by: String,
    #[n(2)]
    pub updated_at: TimeStamp,
}

/// One manufacturing job. The history is append-only: it is written once at
/// creation and grows by exactly one entry per transition, and its last
/// entry's status always equals `status`.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Order {
    #[n(0)]
    pub id: String, // opaque internal ref, bech32-encoded uuid7
    #[n(1)]
    pub order_id: String, // human-entered marketplace invoice id
    #[n(2)]
    pub resi: Option<String>, // courier tracking number
    #[n(3)]
    pub product_id: String,
    #[n(4)]
    pub product_name: String, // snapshot; survives catalog deletion
    #[n(5)]
    pub size: String,
    #[n(6)]
    pub quantity: u32,
    #[n(7)]
    pub order_date: DateStamp,
    #[n(8)]
    pub expedition: String,
    #[n(9)]
    pub marketplace: String,
    #[n(10)]
    pub order_type: OrderType,
    #[n(11)]
    pub status: OrderStatus,
    #[n(12)]
    pub return_date: Option<DateStamp>,
    #[n(13)]
    pub back_name: Option<String>,
    #[n(14)]
    pub back_number: Option<String>,
    #[n(15)]
    pub history: Vec<HistoryEntry>,
}

impl Order {
    fn push_history(&mut self, status: OrderStatus, actor: &str) {
        self.status = status;
        self.history.push(HistoryEntry {
            status,
            updated_by: actor.to_string(),
            updated_at: TimeStamp::new(),
        });
    }

    fn ensure_open(&self) -> Result<(), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }
        Ok(())
    }

    /// An operator picks the order up from the department queue.
    pub fn start_stage(&mut self, dept: Department, actor: &str) -> Result<(), TransitionError> {
        self.ensure_open()?;
        let stages = dept.stages();
        if self.status != stages.pending {
            return Err(TransitionError::NotPending {
                expected: stages.pending,
                found: self.status,
            });
        }
        self.push_history(stages.in_progress, actor);
        Ok(())
    }

    /// The department finishes its work and hands the order to the next
    /// queue (or to READY_TO_SHIP for packing).
    pub fn complete_stage(&mut self, dept: Department, actor: &str) -> Result<(), TransitionError> {
        self.ensure_open()?;
        let stages = dept.stages();
        if self.status != stages.in_progress {
            return Err(TransitionError::NotInProgress {
                expected: stages.in_progress,
                found: self.status,
            });
        }
        self.push_history(stages.next, actor);
        Ok(())
    }

    /// Cancel from any non-terminal status. Terminal.
    pub fn cancel(&mut self, actor: &str) -> Result<(), TransitionError> {
        self.ensure_open()?;
        self.push_history(OrderStatus::Canceled, actor);
        Ok(())
    }

    /// Return from any non-terminal status. Terminal, and the supplied date
    /// is recorded on the order.
    pub fn mark_returned(
        &mut self,
        return_date: DateStamp,
        actor: &str,
    ) -> Result<(), TransitionError> {
        self.ensure_open()?;
        self.return_date = Some(return_date);
        self.push_history(OrderStatus::Returned, actor);
        Ok(())
    }

    /// Manual shipped confirmation: READY_TO_SHIP -> COMPLETED.
    pub fn confirm_completed(&mut self, actor: &str) -> Result<(), TransitionError> {
        self.ensure_open()?;
        if self.status != OrderStatus::ReadyToShip {
            return Err(TransitionError::NotInProgress {
                expected: OrderStatus::ReadyToShip,
                found: self.status,
            });
        }
        self.push_history(OrderStatus::Completed, actor);
        Ok(())
    }

    /// Manager override from the order-list status picker. Still refuses
    /// terminal-locked orders and RETURNED without a date.
    pub fn set_status(
        &mut self,
        status: OrderStatus,
        return_date: Option<DateStamp>,
        actor: &str,
    ) -> Result<(), TransitionError> {
        self.ensure_open()?;
        if status == OrderStatus::Returned && return_date.is_none() {
            return Err(TransitionError::MissingReturnDate);
        }
        if let Some(date) = return_date {
            self.return_date = Some(date);
        }
        self.push_history(status, actor);
        Ok(())
    }

    /// Derived, recomputed on every render: ordered before today and not yet
    /// through the pipeline.
    pub fn is_overdue(&self, today: DateStamp) -> bool {
        self.order_date < today && !self.status.is_terminal()
    }

    /// True when the order carries jersey customization.
    pub fn is_custom(&self) -> bool {
        self.back_name.is_some() || self.back_number.is_some()
    }
}

// Also used for constructing drafts: the unsent input form is exactly this
// struct, serialized per user until submission.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    #[n(0)]
    order_id: Option<String>,
    #[n(1)]
    resi: Option<String>,
    #[n(2)]
    product_id: Option<String>,
    #[n(3)]
    product_name: Option<String>,
    #[n(4)]
    size: Option<String>,
    #[n(5)]
    quantity: u32,
    #[n(6)]
    order_date: Option<DateStamp>,
    #[n(7)]
    expedition: Option<String>,
    #[n(8)]
    marketplace: Option<String>,
    #[n(9)]
    order_type: Option<OrderType>,
    #[n(10)]
    back_name: Option<String>,
    #[n(11)]
    back_number: Option<String>,
}

impl OrderDetails {
    /// Construct a new builder object, this becomes the basis for a draft
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_order_id(mut self, order_id: &str) -> Self {
        self.order_id = Some(order_id.to_string());
        self
    }
    pub fn set_resi(mut self, resi: &str) -> Self {
        self.resi = Some(resi.to_string());
        self
    }
    /// Reference a catalog product; the name is kept as a snapshot.
    pub fn set_product(mut self, product_id: &str, product_name: &str) -> Self {
        self.product_id = Some(product_id.to_string());
        self.product_name = Some(product_name.to_string());
        self
    }
    /// A one-off product with no catalog entry.
    pub fn set_custom_product(mut self, product_name: &str) -> Self {
        self.product_id = Some("custom".to_string());
        self.product_name = Some(product_name.to_string());
        self
    }
    pub fn set_size(mut self, size: &str) -> Self {
        self.size = Some(size.to_string());
        self
    }
    pub fn set_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }
    pub fn set_order_date(mut self, date: DateStamp) -> Self {
        self.order_date = Some(date);
        self
    }
    pub fn set_expedition(mut self, expedition: &str) -> Self {
        self.expedition = Some(expedition.to_string());
        self
    }
    pub fn set_marketplace(mut self, marketplace: &str) -> Self {
        self.marketplace = Some(marketplace.to_string());
        self
    }
    pub fn set_order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }
    pub fn set_back_name(mut self, back_name: &str) -> Self {
        self.back_name = Some(back_name.to_string());
        self
    }
    pub fn set_back_number(mut self, back_number: &str) -> Self {
        self.back_number = Some(back_number.to_string());
        self
    }

    /// Checks required fields, then mints the order: fresh internal ref,
    /// initial status from the order type, single-entry history attributed
    /// to `actor`.
    pub fn build(&self, actor: &str) -> anyhow::Result<Order> {
        if self.order_id.as_deref().unwrap_or("").is_empty() {
            return Err(OrderError::MissingOrderId.into());
        }
        if self.product_name.as_deref().unwrap_or("").is_empty() {
            return Err(OrderError::MissingProduct.into());
        }
        if self.marketplace.as_deref().unwrap_or("").is_empty() {
            return Err(OrderError::MissingMarketplace.into());
        }
        if self.quantity == 0 {
            return Err(OrderError::InvalidQuantity.into());
        }

        let order_type = self.order_type.unwrap_or(OrderType::PreOrder);
        let status = order_type.initial_status();

        Ok(Order {
            id: utils::new_order_ref()?,
            order_id: self.order_id.clone().unwrap_or_default(),
            resi: self.resi.clone().filter(|s| !s.is_empty()),
            product_id: self
                .product_id
                .clone()
                .unwrap_or_else(|| "custom".to_string()),
            product_name: self.product_name.clone().unwrap_or_default(),
            size: self.size.clone().unwrap_or_else(|| "L".to_string()),
            quantity: self.quantity,
            order_date: self.order_date.unwrap_or_else(DateStamp::today),
            expedition: self
                .expedition
                .clone()
                .unwrap_or_else(|| "J&T Express".to_string()),
            marketplace: self.marketplace.clone().unwrap_or_default(),
            order_type,
            status,
            return_date: None,
            back_name: self.back_name.clone().filter(|s| !s.is_empty()),
            back_number: self.back_number.clone().filter(|s| !s.is_empty()),
            history: vec![HistoryEntry {
                status,
                updated_by: actor.to_string(),
                updated_at: TimeStamp::new(),
            }],
        })
    }
}
