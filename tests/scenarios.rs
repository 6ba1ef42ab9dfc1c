//! End-to-end workflow scenarios over a real database.

use std::sync::Arc;

use anyhow::Context;
use production_tracking::{
    catalog::{Category, ProductDetails},
    error::{AccessDenied, TransitionError},
    order::{DateStamp, OrderDetails, OrderType},
    profile::UserProfile,
    role::Role,
    service::{CatalogService, OrderService, ProfileService},
    session::{SessionStore, ViewType},
    status::{Department, OrderStatus},
    utils,
};
use tempfile::tempdir;

// Sled locks the database path, so every test opens its own db under a
// tempdir and cleanup comes for free when the dir drops.
fn open_db(dir: &tempfile::TempDir, name: &str) -> anyhow::Result<Arc<sled::Db>> {
    let db = sled::open(dir.path().join(name))?;
    db.clear()?;
    Ok(Arc::new(db))
}

fn profile(role: Role, name: &str) -> anyhow::Result<UserProfile> {
    Ok(UserProfile::new(utils::new_user_ref()?, role, name))
}

fn pre_order_draft() -> OrderDetails {
    OrderDetails::new()
        .set_order_id("ERF-9922")
        .set_custom_product("Jersey Esport 2024")
        .set_marketplace("Shopee Erfo.id")
        .set_size("L")
        .set_quantity(2)
}

#[test]
fn walk_a_pre_order_through_the_whole_pipeline() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "walk_pipeline.db")?;
    let service = OrderService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    let order = service
        .create_order(&pre_order_draft(), &admin)
        .context("Order failed on create: ")?;

    assert_eq!(order.status, OrderStatus::PendingSetting);
    assert_eq!(order.quantity, 2);
    assert_eq!(order.size, "L");
    assert_eq!(order.history.len(), 1);

    // the setting operator picks it up and finishes it
    let setter = profile(Role::Setting, "Budi")?;
    let order = service.start_stage(&order.id, Department::Setting, &setter)?;
    assert_eq!(order.status, OrderStatus::InSetting);
    assert_eq!(order.history.len(), 2);

    let order = service.complete_stage(&order.id, Department::Setting, &setter)?;
    assert_eq!(order.status, OrderStatus::PendingPrint);
    assert_eq!(order.history.len(), 3);
    assert_eq!(order.history.last().unwrap().updated_by, "Budi");

    // remaining departments hand it down the line
    for (dept, name) in [
        (Department::Print, "Sari"),
        (Department::Press, "Agus"),
        (Department::Jahit, "Lina"),
        (Department::Packing, "Dewi"),
    ] {
        let worker = profile(
            match dept {
                Department::Print => Role::Print,
                Department::Press => Role::Press,
                Department::Jahit => Role::Jahit,
                _ => Role::Packing,
            },
            name,
        )?;
        service.start_stage(&order.id, dept, &worker)?;
        service.complete_stage(&order.id, dept, &worker)?;
    }

    let order = service.get_order(&order.id)?;
    assert_eq!(order.status, OrderStatus::ReadyToShip);

    // final shipped confirmation by a manager
    let order = service.confirm_completed(&order.id, &admin)?;
    assert_eq!(order.status, OrderStatus::Completed);
    assert_eq!(order.history.len(), 12);
    assert_eq!(order.history.last().unwrap().status, OrderStatus::Completed);

    Ok(())
}

#[test]
fn stock_orders_enter_packing_directly() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "stock_bypass.db")?;
    let service = OrderService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    let superadmin = profile(Role::Superadmin, "Owner")?;

    let order = service.create_order(
        &pre_order_draft().set_order_type(OrderType::Stock),
        &admin,
    )?;
    assert_eq!(order.status, OrderStatus::PendingPacking);

    // it must be invisible to every production department
    for dept in [
        Department::Setting,
        Department::Print,
        Department::Press,
        Department::Jahit,
    ] {
        let queue = service.department_queue(dept, &superadmin)?;
        assert!(queue.is_empty(), "stock order leaked into {dept} queue");
    }

    let packing = service.department_queue(Department::Packing, &superadmin)?;
    assert_eq!(packing.len(), 1);
    assert_eq!(packing[0].id, order.id);

    Ok(())
}

#[test]
fn cancel_mid_production_locks_the_order() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "cancel_mid_production.db")?;
    let service = OrderService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    let presser = profile(Role::Press, "Agus")?;
    let superadmin = profile(Role::Superadmin, "Owner")?;

    let order = service.create_order(&pre_order_draft(), &admin)?;
    // drive it into the press stage
    let order = service.override_status(&order.id, OrderStatus::PendingPress, None, &superadmin)?;
    let order = service.start_stage(&order.id, Department::Press, &presser)?;
    assert_eq!(order.status, OrderStatus::InPress);
    let before = order.history.len();

    let order = service.cancel_order(&order.id, &admin)?;
    assert_eq!(order.status, OrderStatus::Canceled);
    assert_eq!(order.history.len(), before + 1);

    // no further movement of any kind
    let err = service
        .start_stage(&order.id, Department::Press, &presser)
        .unwrap_err();
    assert_eq!(
        err.downcast::<TransitionError>()?,
        TransitionError::Terminal(OrderStatus::Canceled)
    );
    assert!(service.complete_stage(&order.id, Department::Press, &presser).is_err());
    assert!(service
        .override_status(&order.id, OrderStatus::PendingSetting, None, &superadmin)
        .is_err());

    Ok(())
}

#[test]
fn returns_require_a_date_and_lock_hard() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "return_lock.db")?;
    let service = OrderService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    let superadmin = profile(Role::Superadmin, "Owner")?;

    // the status picker cannot reach RETURNED without a date
    let order = service.create_order(&pre_order_draft(), &admin)?;
    let err = service
        .override_status(&order.id, OrderStatus::Returned, None, &superadmin)
        .unwrap_err();
    assert_eq!(
        err.downcast::<TransitionError>()?,
        TransitionError::MissingReturnDate
    );
    // the refused attempt wrote nothing
    let reloaded = service.get_order(&order.id)?;
    assert_eq!(reloaded.status, OrderStatus::PendingSetting);
    assert_eq!(reloaded.history.len(), 1);

    let return_date = DateStamp::new_with(2024, 6, 20);
    let order = service.return_order(&order.id, return_date, &admin)?;
    assert_eq!(order.status, OrderStatus::Returned);
    assert_eq!(order.return_date, Some(return_date));

    // once returned, nothing moves it again
    assert!(service.cancel_order(&order.id, &admin).is_err());
    assert!(service
        .override_status(&order.id, OrderStatus::Completed, None, &superadmin)
        .is_err());

    Ok(())
}

#[test]
fn role_matrix_is_enforced_before_any_write() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "role_matrix.db")?;
    let service = OrderService::new(db.clone());
    let catalog = CatalogService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    let setter = profile(Role::Setting, "Budi")?;

    let order = service.create_order(&pre_order_draft(), &admin)?;

    // a worker cannot create, cancel, delete or act outside their department
    assert!(service
        .create_order(&pre_order_draft(), &setter)
        .unwrap_err()
        .downcast::<AccessDenied>()
        .is_ok());
    assert!(service.cancel_order(&order.id, &setter).is_err());
    assert!(service.delete_order(&order.id, &setter).is_err());
    assert!(service.start_stage(&order.id, Department::Print, &setter).is_err());
    assert!(service.department_queue(Department::Print, &setter).is_err());

    // the marketplace admin manages orders but not the catalog or deletion
    assert!(service.delete_order(&order.id, &admin).is_err());
    assert!(catalog
        .add_product(
            &ProductDetails::new().set_name("Jersey Esport 2024"),
            &admin
        )
        .is_err());
    assert!(!admin.role.may_view_reports());

    // every refused call left the order untouched
    let untouched = service.get_order(&order.id)?;
    assert_eq!(untouched.status, OrderStatus::PendingSetting);
    assert_eq!(untouched.history.len(), 1);

    Ok(())
}

#[test]
fn catalog_deletion_keeps_order_snapshots() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "catalog_snapshot.db")?;
    let orders = OrderService::new(db.clone());
    let catalog = CatalogService::new(db);

    let superadmin = profile(Role::Superadmin, "Owner")?;

    let product = catalog.add_product(
        &ProductDetails::new()
            .set_name("Jersey Esport 2024")
            .set_category(Category::Jersey)
            .set_image("https://example.com/jersey.jpg"),
        &superadmin,
    )?;

    let order = orders.create_order(
        &OrderDetails::new()
            .set_order_id("ERF-100")
            .set_product(&product.id, &product.name)
            .set_marketplace("Offline")
            .set_quantity(1),
        &superadmin,
    )?;
    assert_eq!(order.product_id, product.id);

    // a catalog edit does not touch the order snapshot either
    let mut renamed = product.clone();
    renamed.name = "Jersey Esport 2025".to_string();
    catalog.update_product(&renamed, &superadmin)?;
    assert_eq!(
        catalog.get_product(&product.id)?.map(|p| p.name),
        Some("Jersey Esport 2025".to_string())
    );

    catalog.delete_product(&product.id, &superadmin)?;
    assert!(catalog.get_product(&product.id)?.is_none());
    assert!(catalog.update_product(&renamed, &superadmin).is_err());

    // the dangling snapshot is accepted by design
    let order = orders.get_order(&order.id)?;
    assert_eq!(order.product_name, "Jersey Esport 2024");
    assert_eq!(order.product_id, product.id);

    Ok(())
}

#[test]
fn catalog_listing_is_ordered_by_name() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "catalog_order.db")?;
    let catalog = CatalogService::new(db);

    let superadmin = profile(Role::Superadmin, "Owner")?;
    for (name, category) in [
        ("Kemeja PDH", Category::Kemeja),
        ("Jaket Varsity", Category::Jaket),
        ("Kaos Polos", Category::Kaos),
    ] {
        catalog.add_product(
            &ProductDetails::new().set_name(name).set_category(category),
            &superadmin,
        )?;
    }

    let names: Vec<String> = catalog
        .list_products()?
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Jaket Varsity", "Kaos Polos", "Kemeja PDH"]);

    Ok(())
}

#[test]
fn order_listing_is_newest_first() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "order_listing.db")?;
    let service = OrderService::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    for (order_id, day) in [("ERF-1", 5), ("ERF-3", 12), ("ERF-2", 8)] {
        service.create_order(
            &pre_order_draft()
                .set_order_id(order_id)
                .set_order_date(DateStamp::new_with(2024, 6, day)),
            &admin,
        )?;
    }

    let ids: Vec<String> = service
        .list_orders()?
        .into_iter()
        .map(|o| o.order_id)
        .collect();
    assert_eq!(ids, vec!["ERF-3", "ERF-2", "ERF-1"]);

    Ok(())
}

#[test]
fn drafts_and_last_view_survive_until_cleared() -> anyhow::Result<()> {
    let temp_dir = tempdir()?;
    let db = open_db(&temp_dir, "session_state.db")?;
    let orders = OrderService::new(db.clone());
    let profiles = ProfileService::new(db.clone());
    let session = SessionStore::new(db);

    let admin = profile(Role::AdminMarketplace, "Rina")?;
    profiles.save_profile(&admin)?;
    let admin = profiles.fetch_profile(&admin.id)?;

    // the half-filled form survives a reload
    let draft = pre_order_draft();
    session.save_draft(&admin.id, &draft)?;
    assert_eq!(session.load_draft(&admin.id)?, Some(draft.clone()));

    session.save_last_view(&admin.id, ViewType::OrderList)?;
    assert_eq!(session.last_view(&admin.id)?, Some(ViewType::OrderList));

    // successful submission clears the draft, keeps the view
    orders.create_order(&draft, &admin)?;
    session.clear_draft(&admin.id)?;
    assert_eq!(session.load_draft(&admin.id)?, None);
    assert_eq!(session.last_view(&admin.id)?, Some(ViewType::OrderList));

    // logout clears everything
    session.clear(&admin.id)?;
    assert_eq!(session.last_view(&admin.id)?, None);

    Ok(())
}
