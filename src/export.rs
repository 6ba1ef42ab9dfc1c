//! Spreadsheet export: a pure transform of the currently filtered order set
//! into CSV bytes. No store interaction, no effect on persisted state.

use crate::order::{DateStamp, Order};

/// Column layout of the legacy spreadsheet export, kept byte-compatible so
/// existing recap sheets keep importing cleanly.
pub const CSV_HEADERS: [&str; 13] = [
    "ID Pesanan",
    "Marketplace",
    "Kurir",
    "Resi",
    "Nama Produk",
    "Nama Player",
    "No Player",
    "Ukuran",
    "Qty",
    "Tgl Order",
    "Tipe",
    "Status Akhir",
    "Tgl Return",
];

/// Renders one CSV document: UTF-8 BOM, header row, one row per order.
/// Text fields are quoted, missing optionals become "-".
pub fn orders_to_csv(orders: &[&Order]) -> String {
    let mut csv = String::from("\u{feff}");
    csv.push_str(&CSV_HEADERS.join(","));

    for order in orders {
        csv.push('\n');
        let fields = [
            quoted(&order.order_id),
            quoted(&order.marketplace),
            quoted(&dash_if_empty(&order.expedition)),
            quoted(order.resi.as_deref().unwrap_or("-")),
            quoted(&order.product_name),
            quoted(order.back_name.as_deref().unwrap_or("-")),
            quoted(order.back_number.as_deref().unwrap_or("-")),
            quoted(&order.size),
            order.quantity.to_string(),
            quoted(&order.order_date.to_string()),
            quoted(order.order_type.label()),
            quoted(order.status.label()),
            quoted(
                &order
                    .return_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            ),
        ];
        csv.push_str(&fields.join(","));
    }
    csv
}

pub fn orders_to_csv_bytes(orders: &[&Order]) -> Vec<u8> {
    orders_to_csv(orders).into_bytes()
}

fn quoted(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('"');
    for ch in field.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

fn dash_if_empty(field: &str) -> String {
    if field.is_empty() {
        "-".to_string()
    } else {
        field.to_string()
    }
}

/// Suggested download name, stamped with the export date.
pub fn export_filename(today: DateStamp) -> String {
    format!("ERFOLGS_EXPORT_{today}.csv")
}
