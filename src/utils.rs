//! Identifier helpers.

use bech32::Bech32m;
use uuid7::uuid7;

// HRPs double as sled key prefixes, keeping the entity keyspaces disjoint.
pub const ORDER_HRP: &str = "order_";
pub const PRODUCT_HRP: &str = "prod_";
pub const USER_HRP: &str = "user_";

// construct a unique id then encode using bech32
pub fn new_uuid_to_bech32(hrp: &str) -> anyhow::Result<String> {
    let hrp = bech32::Hrp::parse(hrp)?;
    let encode = bech32::encode::<Bech32m>(hrp, uuid7().as_bytes())?;
    Ok(encode)
}

/// Fresh opaque ref for an order record.
pub fn new_order_ref() -> anyhow::Result<String> {
    new_uuid_to_bech32(ORDER_HRP)
}

/// Fresh opaque ref for a catalog product.
pub fn new_product_ref() -> anyhow::Result<String> {
    new_uuid_to_bech32(PRODUCT_HRP)
}

/// Fresh opaque ref for a user profile.
pub fn new_user_ref() -> anyhow::Result<String> {
    new_uuid_to_bech32(USER_HRP)
}
