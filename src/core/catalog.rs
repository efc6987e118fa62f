//! Catalog business logic - Handles all dish-related operations.
//!
//! This module provides functions for listing, adding, and deleting dishes, and for
//! seeding the sample menu into an empty catalog. Deletion is unconditional: it does
//! not check that the dish exists and leaves order history in place.

use crate::{
    config::settings::SeedDish,
    entities::{Dish, dish},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, prelude::*};
use tracing::{debug, info, instrument};

/// Retrieves every dish in insertion order (ascending id).
///
/// The returned vector is a snapshot; callers re-fetch after any mutation.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_dishes(db: &DatabaseConnection) -> Result<Vec<dish::Model>> {
    Dish::find()
        .order_by_asc(dish::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a specific dish by its unique ID.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn find_dish(db: &DatabaseConnection, dish_id: i64) -> Result<Option<dish::Model>> {
    Dish::find_by_id(dish_id).one(db).await.map_err(Into::into)
}

/// Checks a dish name and price before anything is written.
///
/// # Errors
/// Returns `Error::Validation` for a blank name and `Error::InvalidPrice` for a price
/// that is not finite or not positive.
pub fn validate_dish(name: &str, price: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Dish name cannot be empty".to_string(),
        });
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(Error::InvalidPrice { price });
    }
    Ok(())
}

/// Creates a new dish, performing input validation.
///
/// The name is stored trimmed. The returned model carries the store-assigned id.
///
/// # Errors
/// Returns an error if:
/// - The dish name is empty or whitespace-only
/// - The price is not finite or not positive
/// - The database insert operation fails
#[instrument(skip(db))]
pub async fn add_dish(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
    image_path: &str,
) -> Result<dish::Model> {
    validate_dish(name, price)?;
    let name = name.trim();

    let dish = dish::ActiveModel {
        name: Set(name.to_string()),
        price: Set(price),
        image_path: Set(image_path.to_string()),
        ..Default::default()
    };
    let created = dish.insert(db).await?;
    info!("Added dish '{}' with id {}", created.name, created.id);
    Ok(created)
}

/// Deletes a dish by id and returns the number of rows removed.
///
/// An unknown id is not an error; the call simply removes nothing. Order lines that
/// referenced the dish keep their row with a NULL dish reference.
///
/// # Errors
/// Returns an error if the database delete operation fails.
#[instrument(skip(db))]
pub async fn delete_dish(db: &DatabaseConnection, dish_id: i64) -> Result<u64> {
    let result = Dish::delete_by_id(dish_id).exec(db).await?;
    debug!("Deleted {} row(s) for dish {}", result.rows_affected, dish_id);
    Ok(result.rows_affected)
}

/// Inserts the given sample dishes if, and only if, the catalog is empty.
///
/// Returns the number of dishes inserted (0 when the catalog already had rows).
/// Entries are validated like [`add_dish`] input, and one bad entry inserts nothing.
///
/// # Errors
/// Returns a validation error for a bad entry, or an error if the count query or the
/// insert fails.
#[instrument(skip(db, seed))]
pub async fn seed_sample_dishes(db: &DatabaseConnection, seed: &[SeedDish]) -> Result<usize> {
    let existing = Dish::find().count(db).await?;
    if existing > 0 {
        debug!("Catalog already has {} dishes, skipping seed.", existing);
        return Ok(0);
    }
    if seed.is_empty() {
        return Ok(0);
    }
    for entry in seed {
        validate_dish(&entry.name, entry.price)?;
    }

    let rows = seed.iter().map(|s| dish::ActiveModel {
        name: Set(s.name.trim().to_string()),
        price: Set(s.price),
        image_path: Set(s.image.clone()),
        ..Default::default()
    });
    Dish::insert_many(rows).exec(db).await?;

    info!("Seeded {} sample dishes.", seed.len());
    Ok(seed.len())
}
