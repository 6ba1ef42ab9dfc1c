//! Service layer API for production workflow operations.
//!
//! Every mutation follows the same discipline: authorize against the role
//! matrix, validate, apply to a loaded copy, then persist the full record as
//! one atomic write. A refused operation never touches the store, and a
//! failed write leaves nothing mutated in memory, so callers only ever cache
//! confirmed state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Product, ProductDetails};
use crate::error::AccessDenied;
use crate::order::{DateStamp, Order, OrderDetails};
use crate::profile::UserProfile;
use crate::role::Role;
use crate::status::{Department, OrderStatus};
use crate::utils;

fn authorize(allowed: bool, role: Role, action: &'static str) -> Result<(), AccessDenied> {
    if allowed {
        Ok(())
    } else {
        warn!(%role, action, "refused by role matrix");
        Err(AccessDenied { role, action })
    }
}

pub struct OrderService {
    instance: Arc<sled::Db>,
}

impl OrderService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Load one order from the database.
    fn load_order(&self, order_ref: &str) -> anyhow::Result<Order> {
        let bytes = self
            .instance
            .get(order_ref.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("unknown order ref: {order_ref}"))?;
        Ok(minicbor::decode(&bytes)?)
    }

    /// Write the full record (status + history + return date in one value)
    /// back in a single atomic insert.
    fn persist(&self, order: &Order) -> anyhow::Result<()> {
        self.instance
            .insert(order.id.as_bytes(), minicbor::to_vec(order)?)?;
        Ok(())
    }

    /// Validate a draft and insert the new order.
    pub fn create_order(
        &self,
        details: &OrderDetails,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(profile.role.may_create_orders(), profile.role, "create orders")?;

        let order = details.build(profile.display_name())?;
        self.persist(&order)?;

        info!(
            order_ref = %order.id,
            order_id = %order.order_id,
            status = %order.status,
            "order created"
        );
        Ok(order)
    }

    pub fn get_order(&self, order_ref: &str) -> anyhow::Result<Order> {
        self.load_order(order_ref)
    }

    /// All orders, newest order date first.
    pub fn list_orders(&self) -> anyhow::Result<Vec<Order>> {
        let mut orders = Vec::new();
        for entry in self.instance.scan_prefix(utils::ORDER_HRP.as_bytes()) {
            let (_, bytes) = entry?;
            orders.push(minicbor::decode(&bytes)?);
        }
        orders.sort_by(|a: &Order, b: &Order| b.order_date.cmp(&a.order_date));
        debug!(count = orders.len(), "orders loaded");
        Ok(orders)
    }

    /// The orders a department currently sees: its pending and in-progress
    /// states, nothing else.
    pub fn department_queue(
        &self,
        dept: Department,
        profile: &UserProfile,
    ) -> anyhow::Result<Vec<Order>> {
        authorize(profile.role.may_work(dept), profile.role, "view this queue")?;

        let mut orders = self.list_orders()?;
        orders.retain(|o| dept.worked_here(o.status));
        Ok(orders)
    }

    /// Operator picks an order up from its queue.
    pub fn start_stage(
        &self,
        order_ref: &str,
        dept: Department,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(profile.role.may_work(dept), profile.role, "work this stage")?;

        let mut order = self.load_order(order_ref)?;
        order.start_stage(dept, profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, %dept, status = %order.status, "stage started");
        Ok(order)
    }

    /// Operator finishes the stage; the order moves to the next queue.
    pub fn complete_stage(
        &self,
        order_ref: &str,
        dept: Department,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(profile.role.may_work(dept), profile.role, "work this stage")?;

        let mut order = self.load_order(order_ref)?;
        order.complete_stage(dept, profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, %dept, status = %order.status, "stage completed");
        Ok(order)
    }

    pub fn cancel_order(&self, order_ref: &str, profile: &UserProfile) -> anyhow::Result<Order> {
        authorize(profile.role.may_cancel(), profile.role, "cancel orders")?;

        let mut order = self.load_order(order_ref)?;
        order.cancel(profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, "order canceled");
        Ok(order)
    }

    /// Return an order. The supplied date is recorded and the order locks.
    pub fn return_order(
        &self,
        order_ref: &str,
        return_date: DateStamp,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(profile.role.may_return(), profile.role, "return orders")?;

        let mut order = self.load_order(order_ref)?;
        order.mark_returned(return_date, profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, %return_date, "order returned");
        Ok(order)
    }

    /// Final confirmation once the courier has the parcel.
    pub fn confirm_completed(
        &self,
        order_ref: &str,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(
            profile.role.may_confirm_completion(),
            profile.role,
            "confirm completion",
        )?;

        let mut order = self.load_order(order_ref)?;
        order.confirm_completed(profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, "order completed");
        Ok(order)
    }

    /// Manager override from the order-list status picker.
    pub fn override_status(
        &self,
        order_ref: &str,
        status: OrderStatus,
        return_date: Option<DateStamp>,
        profile: &UserProfile,
    ) -> anyhow::Result<Order> {
        authorize(
            profile.role.may_override_status(),
            profile.role,
            "override order status",
        )?;

        let mut order = self.load_order(order_ref)?;
        order.set_status(status, return_date, profile.display_name())?;
        self.persist(&order)?;

        info!(order_ref, %status, "status overridden");
        Ok(order)
    }

    pub fn delete_order(&self, order_ref: &str, profile: &UserProfile) -> anyhow::Result<()> {
        authorize(profile.role.may_delete(), profile.role, "delete orders")?;

        if self.instance.remove(order_ref.as_bytes())?.is_none() {
            return Err(anyhow::anyhow!("unknown order ref: {order_ref}"));
        }
        info!(order_ref, "order deleted");
        Ok(())
    }
}

pub struct CatalogService {
    instance: Arc<sled::Db>,
}

impl CatalogService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    fn persist(&self, product: &Product) -> anyhow::Result<()> {
        self.instance
            .insert(product.id.as_bytes(), minicbor::to_vec(product)?)?;
        Ok(())
    }

    pub fn add_product(
        &self,
        details: &ProductDetails,
        profile: &UserProfile,
    ) -> anyhow::Result<Product> {
        authorize(profile.role.may_edit_catalog(), profile.role, "edit the catalog")?;

        let product = details.build()?;
        self.persist(&product)?;

        info!(product_ref = %product.id, name = %product.name, "product added");
        Ok(product)
    }

    pub fn update_product(&self, product: &Product, profile: &UserProfile) -> anyhow::Result<()> {
        authorize(profile.role.may_edit_catalog(), profile.role, "edit the catalog")?;

        if self.instance.get(product.id.as_bytes())?.is_none() {
            return Err(anyhow::anyhow!("unknown product ref: {}", product.id));
        }
        self.persist(product)?;

        info!(product_ref = %product.id, "product updated");
        Ok(())
    }

    /// Delete a product. Orders keep their denormalized name snapshot; no
    /// reference check is performed.
    pub fn delete_product(&self, product_ref: &str, profile: &UserProfile) -> anyhow::Result<()> {
        authorize(profile.role.may_edit_catalog(), profile.role, "edit the catalog")?;

        if self.instance.remove(product_ref.as_bytes())?.is_none() {
            return Err(anyhow::anyhow!("unknown product ref: {product_ref}"));
        }
        info!(product_ref, "product deleted");
        Ok(())
    }

    pub fn get_product(&self, product_ref: &str) -> anyhow::Result<Option<Product>> {
        match self.instance.get(product_ref.as_bytes())? {
            Some(bytes) => Ok(Some(minicbor::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The whole catalog, ordered by product name.
    pub fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        let mut products = Vec::new();
        for entry in self.instance.scan_prefix(utils::PRODUCT_HRP.as_bytes()) {
            let (_, bytes) = entry?;
            products.push(minicbor::decode(&bytes)?);
        }
        products.sort_by(|a: &Product, b: &Product| a.name.cmp(&b.name));
        Ok(products)
    }
}

pub struct ProfileService {
    instance: Arc<sled::Db>,
}

impl ProfileService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    pub fn save_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        self.instance
            .insert(profile.id.as_bytes(), minicbor::to_vec(profile)?)?;
        Ok(())
    }

    /// Role and display-name lookup at session start.
    pub fn fetch_profile(&self, user_id: &str) -> anyhow::Result<UserProfile> {
        let bytes = self
            .instance
            .get(user_id.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("unknown user id: {user_id}"))?;
        Ok(minicbor::decode(&bytes)?)
    }
}
