//! Order history - the denormalized view shown in the history table and exported to CSV.

use crate::{
    entities::{Order, order, order_detail},
    errors::Result,
};
use sea_orm::{
    FromQueryResult, JoinType, QueryOrder, QuerySelect, RelationTrait, prelude::*,
    sea_query::Expr,
};

/// One row of order history: an order with the names of its dishes joined by `", "`.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct HistoryEntry {
    /// Order id
    pub order_id: i64,
    /// Frozen order total
    pub total_amount: f64,
    /// When the order was placed
    pub order_date: DateTimeUtc,
    /// Comma-joined dish names; `None` when no line resolves to a dish
    pub dish_names: Option<String>,
}

/// Lists every order, newest first, with its dish names aggregated.
///
/// Orders are outer-joined to their lines and dishes, so an order without lines (or
/// whose dishes were all deleted) still appears with `dish_names` set to `None`. The
/// order of names inside `dish_names` is unspecified.
///
/// # Errors
/// Returns an error if the database query fails.
pub async fn list_order_history(db: &DatabaseConnection) -> Result<Vec<HistoryEntry>> {
    Order::find()
        .select_only()
        .column_as(order::Column::Id, "order_id")
        .column(order::Column::TotalAmount)
        .column(order::Column::OrderDate)
        .column_as(
            Expr::cust("GROUP_CONCAT(\"dishes\".\"name\", ', ')"),
            "dish_names",
        )
        .join(JoinType::LeftJoin, order::Relation::OrderDetails.def())
        .join(JoinType::LeftJoin, order_detail::Relation::Dish.def())
        .group_by(order::Column::Id)
        .order_by_desc(order::Column::OrderDate)
        .order_by_desc(order::Column::Id)
        .into_model::<HistoryEntry>()
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::{
        catalog,
        order::{order_lines, save_order},
    };
    use crate::test_utils::*;
    use sea_orm::Set;

    fn split_names(entry: &HistoryEntry) -> Vec<String> {
        let mut names: Vec<String> = entry
            .dish_names
            .as_deref()
            .unwrap_or_default()
            .split(", ")
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_empty_history() -> Result<()> {
        let db = setup_test_db().await?;
        assert!(list_order_history(&db).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_saved_order_appears_first() -> Result<()> {
        let (db, dishes) = setup_with_dishes().await?;

        save_order(&db, &dishes[..1], dishes[0].price).await?;
        let picked = vec![dishes[1].clone(), dishes[2].clone()];
        let total = picked[0].price + picked[1].price;
        let latest = save_order(&db, &picked, total).await?;

        let history = list_order_history(&db).await?;
        assert_eq!(history.len(), 2);

        let newest = &history[0];
        assert_eq!(newest.order_id, latest.id);
        assert_eq!(newest.total_amount, total);
        assert_eq!(newest.order_date, latest.order_date);

        let mut expected: Vec<String> = picked.iter().map(|d| d.name.clone()).collect();
        expected.sort();
        assert_eq!(split_names(newest), expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_order_without_lines_still_listed() -> Result<()> {
        let db = setup_test_db().await?;

        let bare = save_order(&db, &[], 0.0).await?;

        let history = list_order_history(&db).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order_id, bare.id);
        assert_eq!(history[0].dish_names, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_deleted_dish_keeps_order_in_history() -> Result<()> {
        let (db, dishes) = setup_with_dishes().await?;
        let picked = vec![dishes[0].clone(), dishes[1].clone()];
        let total = picked[0].price + picked[1].price;
        let saved = save_order(&db, &picked, total).await?;

        catalog::delete_dish(&db, dishes[0].id).await?;

        let history = list_order_history(&db).await?;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order_id, saved.id);
        assert_eq!(history[0].total_amount, total);
        assert_eq!(split_names(&history[0]), vec![dishes[1].name.clone()]);

        // The line survives with its dish reference cleared
        let mut dish_ids: Vec<Option<i64>> = order_lines(&db, saved.id)
            .await?
            .iter()
            .map(|line| line.dish_id)
            .collect();
        dish_ids.sort_unstable();
        assert_eq!(dish_ids, vec![None, Some(dishes[1].id)]);

        Ok(())
    }

    #[tokio::test]
    async fn test_history_ordered_by_date_descending() -> Result<()> {
        let db = setup_test_db().await?;

        // Insert out of chronological order to make sure the date drives the sort
        let later = chrono::Utc::now();
        let earlier = later - chrono::Duration::days(1);
        for (total, date) in [(2.0, later), (1.0, earlier)] {
            order::ActiveModel {
                total_amount: Set(total),
                order_date: Set(date),
                ..Default::default()
            }
            .insert(&db)
            .await?;
        }

        let history = list_order_history(&db).await?;
        let totals: Vec<f64> = history.iter().map(|h| h.total_amount).collect();
        assert_eq!(totals, vec![2.0, 1.0]);

        Ok(())
    }
}
