//! Order business logic - Records completed orders.
//!
//! An order is one `orders` row plus one `order_details` row per dish, written in a
//! single database transaction so a failure part-way through leaves no partial order.
//! The recorder trusts its caller: it does not check that the dish list is non-empty
//! or that the total matches the dish prices.

use crate::{
    entities::{OrderDetail, dish, order, order_detail},
    errors::Result,
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::{info, instrument};

/// Persists an order with the supplied total and one line (quantity 1) per dish.
///
/// The order date is taken from the current UTC time.
///
/// # Arguments
/// * `dishes` - Dishes on the order, one line each
/// * `total` - Order total, stored as given
///
/// # Errors
/// Returns an error if any insert fails; in that case nothing is committed.
#[instrument(skip(db, dishes), fields(lines = dishes.len()))]
pub async fn save_order(
    db: &DatabaseConnection,
    dishes: &[dish::Model],
    total: f64,
) -> Result<order::Model> {
    let txn = db.begin().await?;

    let order = order::ActiveModel {
        total_amount: Set(total),
        order_date: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for dish in dishes {
        order_detail::ActiveModel {
            order_id: Set(order.id),
            dish_id: Set(Some(dish.id)),
            quantity: Set(1),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;

    info!(
        "Saved order #{} with {} dish(es), total {:.2}",
        order.id,
        dishes.len(),
        order.total_amount
    );
    Ok(order)
}

/// Retrieves the lines of an order in insertion order.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn order_lines(
    db: &DatabaseConnection,
    order_id: i64,
) -> Result<Vec<order_detail::Model>> {
    OrderDetail::find()
        .filter(order_detail::Column::OrderId.eq(order_id))
        .order_by_asc(order_detail::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}
