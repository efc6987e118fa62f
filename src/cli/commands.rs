//! One-shot command handlers.
//!
//! Each handler loads what it needs, performs one operation and prints the outcome.
//! Selection-based commands build an [`OrderSession`] from a fresh catalog load, so
//! unknown ids are rejected exactly as they would be in the interactive shell.

use super::AppData;
use crate::{
    core::{
        catalog,
        export::{self, ReceiptFormat},
        history, images,
        selection::OrderSession,
    },
    entities::dish,
    errors::{Error, Result},
};
use std::{io::Write, path::Path};
use tracing::info;

/// Turns a validation error into the message shown to the user.
#[must_use]
pub fn describe_rejection(error: &Error) -> String {
    match error {
        Error::EmptySelection => "Select at least one dish!".to_string(),
        Error::DishNotFound { id } => format!("No dish with id {id} in the catalog."),
        Error::InvalidPrice { price } => format!("Price must be a positive number (got {price})."),
        other => other.to_string(),
    }
}

/// Prints the catalog with prices and image availability.
pub async fn menu<W: Write>(data: &AppData, out: &mut W) -> Result<()> {
    let dishes = catalog::list_dishes(&data.database).await?;
    if dishes.is_empty() {
        writeln!(out, "The catalog is empty.")?;
        return Ok(());
    }
    for dish in &dishes {
        write_dish_line(out, dish, &data.config.currency)?;
    }
    Ok(())
}

pub(crate) fn write_dish_line<W: Write>(
    out: &mut W,
    dish: &dish::Model,
    currency: &str,
) -> Result<()> {
    let image_note = if images::image_available(&dish.image_path) {
        String::new()
    } else {
        "  [no image]".to_string()
    };
    writeln!(
        out,
        "#{:<4} {:<24} {:>12}{}",
        dish.id,
        dish.name,
        export::format_price(dish.price, currency),
        image_note
    )?;
    Ok(())
}

/// Copies the optional image and adds a dish.
pub async fn add<W: Write>(
    data: &AppData,
    name: &str,
    price: f64,
    image: Option<&Path>,
    out: &mut W,
) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Enter a dish name!".to_string(),
        });
    }
    // Nothing is copied for a dish that would be rejected
    catalog::validate_dish(name, price)?;

    let image_path = images::store_dish_image(
        image,
        name,
        &data.config.images_dir,
        &data.config.default_image,
    );
    let dish = catalog::add_dish(&data.database, name, price, &image_path).await?;

    writeln!(out, "✅ Dish '{}' added! ID: {}", dish.name, dish.id)?;
    Ok(())
}

/// Deletes a dish that is present in the catalog.
pub async fn delete<W: Write>(data: &AppData, dish_id: i64, out: &mut W) -> Result<()> {
    let Some(dish) = catalog::find_dish(&data.database, dish_id).await? else {
        return Err(Error::DishNotFound { id: dish_id });
    };

    catalog::delete_dish(&data.database, dish.id).await?;
    writeln!(out, "✅ Dish '{}' deleted!", dish.name)?;
    Ok(())
}

/// Selects the given dishes, records the order and optionally writes its receipt.
pub async fn order<W: Write>(
    data: &AppData,
    ids: &[i64],
    receipt: Option<&Path>,
    format: ReceiptFormat,
    out: &mut W,
) -> Result<()> {
    let mut session = OrderSession::load(&data.database).await?;
    select_all(&mut session, ids)?;

    let ordered: Vec<dish::Model> = session.summary().dishes.into_iter().cloned().collect();
    let saved = session.submit(&data.database).await?;

    writeln!(
        out,
        "✅ Order #{} saved! Total: {}",
        saved.id,
        export::format_price(saved.total_amount, &data.config.currency)
    )?;

    if let Some(path) = receipt {
        let refs: Vec<&dish::Model> = ordered.iter().collect();
        export::export_receipt(
            path,
            format,
            &saved.order_date,
            &refs,
            saved.total_amount,
            &data.config.currency,
        )?;
        writeln!(out, "Receipt written to {}", path.display())?;
    }
    Ok(())
}

/// Writes a receipt for a selection without recording an order.
pub async fn receipt<W: Write>(
    data: &AppData,
    ids: &[i64],
    output: &Path,
    format: ReceiptFormat,
    out: &mut W,
) -> Result<()> {
    let mut session = OrderSession::load(&data.database).await?;
    select_all(&mut session, ids)?;

    let summary = session.summary();
    if summary.is_empty() {
        return Err(Error::EmptySelection);
    }
    export::export_receipt(
        output,
        format,
        &chrono::Utc::now(),
        &summary.dishes,
        summary.total,
        &data.config.currency,
    )?;
    writeln!(out, "✅ Order exported to {}", output.display())?;
    Ok(())
}

/// Prints order history, newest first.
pub async fn show_history<W: Write>(data: &AppData, out: &mut W) -> Result<()> {
    let entries = history::list_order_history(&data.database).await?;
    if entries.is_empty() {
        writeln!(out, "No orders yet.")?;
        return Ok(());
    }

    writeln!(out, "{:<6} {:>12}  {:<20}  Dishes", "ID", "Amount", "Date")?;
    for entry in &entries {
        writeln!(
            out,
            "{:<6} {:>12}  {:<20}  {}",
            entry.order_id,
            export::format_price(entry.total_amount, &data.config.currency),
            entry.order_date.format("%Y-%m-%d %H:%M:%S"),
            entry.dish_names.as_deref().unwrap_or("")
        )?;
    }
    Ok(())
}

/// Exports order history to a CSV file.
pub async fn export_csv<W: Write>(data: &AppData, path: &Path, out: &mut W) -> Result<()> {
    let entries = history::list_order_history(&data.database).await?;
    export::export_history_csv(path, &entries)?;
    info!("History exported to {:?}", path);
    writeln!(out, "✅ Exported {} order(s) to {}", entries.len(), path.display())?;
    Ok(())
}

fn select_all(session: &mut OrderSession, ids: &[i64]) -> Result<()> {
    for &id in ids {
        session.set_selected(id, true)?;
    }
    Ok(())
}
