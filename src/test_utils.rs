//! Shared test utilities for the order desk.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test dishes with sensible defaults.

use crate::{core::catalog, entities, errors::Result};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Creates a test dish with sensible defaults.
///
/// # Defaults
/// * price: 10.0
/// * `image_path`: `"images/default.jpg"`
pub async fn create_test_dish(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::dish::Model> {
    catalog::add_dish(db, name, 10.0, "images/default.jpg").await
}

/// Creates a test dish with a custom price.
pub async fn create_custom_dish(
    db: &DatabaseConnection,
    name: &str,
    price: f64,
) -> Result<entities::dish::Model> {
    catalog::add_dish(db, name, price, "images/default.jpg").await
}

/// Sets up a database holding the default sample menu.
/// Returns (db, dishes) with the dishes in catalog order.
pub async fn setup_with_dishes() -> Result<(DatabaseConnection, Vec<entities::dish::Model>)> {
    let db = setup_test_db().await?;
    let seed = crate::config::settings::AppConfig::default().dishes;
    catalog::seed_sample_dishes(&db, &seed).await?;
    let dishes = catalog::list_dishes(&db).await?;
    Ok((db, dishes))
}
