//! Selection aggregation and the per-session order state.
//!
//! The catalog snapshot and the selected flags are owned by an [`OrderSession`]; the
//! flags live in an id-keyed map beside the snapshot rather than on the dish records.
//! Totals are recomputed from scratch on every call to [`OrderSession::summary`].

use crate::{
    core::{catalog, order},
    entities::{dish, order as order_entity},
    errors::{Error, Result},
};
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{debug, info};

/// Selected flags keyed by dish id. Ids absent from the map are unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    flags: HashMap<i64, bool>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the dish is currently selected.
    #[must_use]
    pub fn is_selected(&self, dish_id: i64) -> bool {
        self.flags.get(&dish_id).copied().unwrap_or(false)
    }

    /// Sets the flag for a dish.
    pub fn set(&mut self, dish_id: i64, selected: bool) {
        self.flags.insert(dish_id, selected);
    }

    /// Flips the flag for a dish and returns the new value.
    pub fn toggle(&mut self, dish_id: i64) -> bool {
        let flag = self.flags.entry(dish_id).or_insert(false);
        *flag = !*flag;
        *flag
    }

    /// Unselects everything.
    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

/// The selected dishes of a catalog snapshot and the sum of their prices.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSummary<'a> {
    /// Selected dishes, in catalog order
    pub dishes: Vec<&'a dish::Model>,
    /// Sum of the selected dish prices
    pub total: f64,
}

impl SelectionSummary<'_> {
    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dishes.is_empty()
    }
}

/// Folds a catalog snapshot into the selected dishes and their total price.
#[must_use]
pub fn aggregate<'a>(catalog: &'a [dish::Model], selection: &Selection) -> SelectionSummary<'a> {
    let dishes: Vec<&dish::Model> = catalog
        .iter()
        .filter(|d| selection.is_selected(d.id))
        .collect();
    // Folding from +0.0 keeps an empty selection from printing as -0.00
    let total = dishes.iter().fold(0.0, |acc, d| acc + d.price);
    SelectionSummary { dishes, total }
}

/// Catalog snapshot plus selection state for one user session.
#[derive(Debug, Clone, Default)]
pub struct OrderSession {
    catalog: Vec<dish::Model>,
    selection: Selection,
}

impl OrderSession {
    /// Creates a session over an already-fetched catalog, with nothing selected.
    #[must_use]
    pub fn with_catalog(catalog: Vec<dish::Model>) -> Self {
        Self {
            catalog,
            selection: Selection::new(),
        }
    }

    /// Creates a session from a fresh catalog load.
    pub async fn load(db: &DatabaseConnection) -> Result<Self> {
        let catalog = catalog::list_dishes(db).await?;
        Ok(Self::with_catalog(catalog))
    }

    /// Replaces the snapshot with a fresh catalog load and clears the selection.
    pub async fn reload(&mut self, db: &DatabaseConnection) -> Result<()> {
        self.catalog = catalog::list_dishes(db).await?;
        self.selection.clear();
        debug!("Catalog reloaded with {} dishes", self.catalog.len());
        Ok(())
    }

    /// The current catalog snapshot.
    #[must_use]
    pub fn catalog(&self) -> &[dish::Model] {
        &self.catalog
    }

    /// Looks up a dish in the snapshot.
    #[must_use]
    pub fn dish(&self, dish_id: i64) -> Option<&dish::Model> {
        self.catalog.iter().find(|d| d.id == dish_id)
    }

    /// Whether the dish is selected.
    #[must_use]
    pub fn is_selected(&self, dish_id: i64) -> bool {
        self.selection.is_selected(dish_id)
    }

    /// Flips the selection of a dish in the snapshot and returns the new flag.
    ///
    /// # Errors
    /// Returns `Error::DishNotFound` if the id is not part of the snapshot.
    pub fn toggle(&mut self, dish_id: i64) -> Result<bool> {
        self.ensure_listed(dish_id)?;
        Ok(self.selection.toggle(dish_id))
    }

    /// Sets the selection of a dish in the snapshot.
    ///
    /// # Errors
    /// Returns `Error::DishNotFound` if the id is not part of the snapshot.
    pub fn set_selected(&mut self, dish_id: i64, selected: bool) -> Result<()> {
        self.ensure_listed(dish_id)?;
        self.selection.set(dish_id, selected);
        Ok(())
    }

    /// Unselects every dish.
    pub fn clear(&mut self) {
        self.selection.clear();
    }

    /// Selected dishes and their total.
    #[must_use]
    pub fn summary(&self) -> SelectionSummary<'_> {
        aggregate(&self.catalog, &self.selection)
    }

    /// Records the current selection as an order.
    ///
    /// Once the order is saved the selection is cleared, then the catalog is reloaded.
    ///
    /// # Errors
    /// Returns `Error::EmptySelection` without touching the database when nothing is
    /// selected, or a database error if saving or reloading fails.
    pub async fn submit(&mut self, db: &DatabaseConnection) -> Result<order_entity::Model> {
        let summary = self.summary();
        if summary.is_empty() {
            return Err(Error::EmptySelection);
        }

        let dishes: Vec<dish::Model> = summary.dishes.into_iter().cloned().collect();
        let saved = order::save_order(db, &dishes, summary.total).await?;
        info!("Order #{} submitted", saved.id);

        // Cleared before the reload so a failed reload cannot resubmit the same order
        self.selection.clear();
        self.reload(db).await?;
        Ok(saved)
    }

    fn ensure_listed(&self, dish_id: i64) -> Result<()> {
        if self.dish(dish_id).is_some() {
            Ok(())
        } else {
            Err(Error::DishNotFound { id: dish_id })
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{export::format_price, history::list_order_history};
    use crate::entities::Order;
    use crate::test_utils::*;
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait};

    fn dish(id: i64, price: f64) -> dish::Model {
        dish::Model {
            id,
            name: format!("Dish {id}"),
            price,
            image_path: format!("images/{id}.jpg"),
        }
    }

    fn expected_total(catalog: &[dish::Model], selection: &Selection) -> f64 {
        catalog
            .iter()
            .filter(|d| selection.is_selected(d.id))
            .map(|d| d.price)
            .sum()
    }

    #[test]
    fn test_aggregate_nothing_selected() {
        let catalog = vec![dish(1, 5.0), dish(2, 7.5)];
        let summary = aggregate(&catalog, &Selection::new());
        assert!(summary.is_empty());
        assert_eq!(summary.total, 0.0);
        assert!(summary.total.is_sign_positive());
        assert_eq!(format_price(summary.total, "₽"), "0.00 ₽");
    }

    #[test]
    fn test_aggregate_empty_catalog() {
        let summary = aggregate(&[], &Selection::new());
        assert!(summary.is_empty());
        assert_eq!(summary.total, 0.0);
    }

    #[test]
    fn test_total_tracks_every_toggle() {
        let catalog = vec![dish(1, 12.99), dish(2, 15.50), dish(3, 8.75), dish(4, 25.99)];
        let mut selection = Selection::new();

        for id in [1, 3, 4, 3, 2, 1, 1, 4] {
            selection.toggle(id);
            let summary = aggregate(&catalog, &selection);
            assert_eq!(summary.total, expected_total(&catalog, &selection));
            assert!(summary.dishes.iter().all(|d| selection.is_selected(d.id)));
        }

        // Final state: 1 and 2 selected
        let summary = aggregate(&catalog, &selection);
        let ids: Vec<i64> = summary.dishes.iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(summary.total, 12.99 + 15.50);
    }

    #[test]
    fn test_selection_of_unknown_id_is_ignored_by_aggregate() {
        let catalog = vec![dish(1, 3.0)];
        let mut selection = Selection::new();
        selection.set(99, true);
        assert!(aggregate(&catalog, &selection).is_empty());
    }

    #[test]
    fn test_session_toggle_unknown_dish() {
        let mut session = OrderSession::with_catalog(vec![dish(1, 3.0)]);
        assert!(matches!(
            session.toggle(2),
            Err(Error::DishNotFound { id: 2 })
        ));
        assert!(matches!(
            session.set_selected(2, true),
            Err(Error::DishNotFound { id: 2 })
        ));
    }

    #[test]
    fn test_session_clear() {
        let mut session = OrderSession::with_catalog(vec![dish(1, 3.0), dish(2, 4.0)]);
        assert!(session.toggle(1).unwrap());
        session.set_selected(2, true).unwrap();
        assert_eq!(session.summary().total, 7.0);

        session.clear();
        assert!(session.summary().is_empty());
        assert!(!session.is_selected(1));
    }

    #[tokio::test]
    async fn test_submit_empty_selection_leaves_store_unchanged() -> Result<()> {
        let (db, _dishes) = setup_with_dishes().await?;
        let mut session = OrderSession::load(&db).await?;

        let result = session.submit(&db).await;
        assert!(matches!(result, Err(Error::EmptySelection)));
        assert_eq!(Order::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_submit_records_order_and_resets() -> Result<()> {
        let (db, dishes) = setup_with_dishes().await?;
        let mut session = OrderSession::load(&db).await?;

        session.toggle(dishes[0].id)?;
        session.toggle(dishes[2].id)?;
        let expected = dishes[0].price + dishes[2].price;
        assert_eq!(session.summary().total, expected);

        let saved = session.submit(&db).await?;
        assert_eq!(saved.total_amount, expected);

        // Selection is cleared and the snapshot is fresh
        assert!(session.summary().is_empty());
        assert_eq!(session.summary().total, 0.0);
        assert_eq!(session.catalog().len(), dishes.len());

        let history = list_order_history(&db).await?;
        assert_eq!(history[0].order_id, saved.id);
        assert_eq!(history[0].total_amount, expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_reload_after_submit_keeps_selection_cleared() -> Result<()> {
        let (db, dishes) = setup_with_dishes().await?;
        let mut session = OrderSession::load(&db).await?;
        session.toggle(dishes[0].id)?;

        // A name stored as a blob makes the next catalog load fail to decode
        db.execute_unprepared(
            "INSERT INTO dishes (name, price, image_path) VALUES (X'00', 1.0, 'x.jpg')",
        )
        .await?;

        assert!(session.submit(&db).await.is_err());
        assert_eq!(Order::find().count(&db).await?, 1);
        assert!(session.summary().is_empty());
        assert!(matches!(
            session.submit(&db).await,
            Err(Error::EmptySelection)
        ));
        assert_eq!(Order::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_dishes_and_clears_flags() -> Result<()> {
        let (db, dishes) = setup_with_dishes().await?;
        let mut session = OrderSession::load(&db).await?;
        session.toggle(dishes[1].id)?;

        let added = create_test_dish(&db, "Dessert").await?;
        assert!(session.dish(added.id).is_none());

        session.reload(&db).await?;
        assert!(session.dish(added.id).is_some());
        assert!(!session.is_selected(dishes[1].id));

        Ok(())
    }
}
