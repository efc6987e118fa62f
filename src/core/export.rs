//! Export formatters - order history as CSV and a single order as a receipt.
//!
//! The CSV carries plain two-decimal amounts; the currency symbol only appears in
//! receipts and on screen. The HTML receipt is produced by literal placeholder
//! substitution into a fixed template. Dish names are inserted as-is, without escaping.

use crate::{core::history::HistoryEntry, entities::dish, errors::Result};
use chrono::{DateTime, SecondsFormat, Utc};
use std::{fs, io::Write, path::Path, str::FromStr};
use tracing::info;

/// Header row of the history CSV.
pub const CSV_HEADER: [&str; 4] = ["ID", "Amount", "Date", "Dishes"];

const RECEIPT_RULE_WIDTH: usize = 30;

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>Order receipt</title>
</head>
<body>
<h1>Order receipt</h1>
<p>Date: {date}</p>
<p>Dishes: {count}</p>
<table>
<tr><th>Dish</th><th>Price</th></tr>
{rows}
</table>
<p><strong>Total: {total}</strong></p>
</body>
</html>
"#;

/// Receipt output flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReceiptFormat {
    /// Bullet list with a total line
    #[default]
    Text,
    /// Filled-in HTML template
    Html,
}

impl FromStr for ReceiptFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "html" | "htm" => Ok(Self::Html),
            other => Err(format!("unknown receipt format '{other}' (expected text or html)")),
        }
    }
}

/// Formats an amount with two decimals followed by the currency symbol, e.g. `12.99 ₽`.
#[must_use]
pub fn format_price(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Formats a timestamp the way it is written to exports.
#[must_use]
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Writes order history as CSV: the header row, then one row per entry.
///
/// # Errors
/// Returns an error if writing to `writer` fails.
pub fn write_history_csv<W: Write>(writer: W, entries: &[HistoryEntry]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;

    for entry in entries {
        csv_writer.write_record([
            entry.order_id.to_string(),
            format!("{:.2}", entry.total_amount),
            format_date(&entry.order_date),
            entry.dish_names.clone().unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Writes order history as a UTF-8 CSV file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn export_history_csv<P: AsRef<Path>>(path: P, entries: &[HistoryEntry]) -> Result<()> {
    let file = fs::File::create(path.as_ref())?;
    write_history_csv(file, entries)?;
    info!(
        "Exported {} order(s) to {:?}",
        entries.len(),
        path.as_ref()
    );
    Ok(())
}

/// Renders the plain-text receipt: a bullet per dish followed by the total.
#[must_use]
pub fn render_text_receipt(dishes: &[&dish::Model], total: f64, currency: &str) -> String {
    let rule = "=".repeat(RECEIPT_RULE_WIDTH);
    let mut out = String::new();
    out.push_str("YOUR ORDER:\n");
    out.push_str(&rule);
    out.push('\n');
    for dish in dishes {
        out.push_str(&format!("• {} - {}\n", dish.name, format_price(dish.price, currency)));
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&format!("TOTAL: {}\n", format_price(total, currency)));
    out
}

/// Renders the HTML receipt from the fixed template.
///
/// `{rows}` is substituted last, so dish names that happen to contain placeholder text
/// are left alone.
#[must_use]
pub fn render_html_receipt(
    date: &DateTime<Utc>,
    dishes: &[&dish::Model],
    total: f64,
    currency: &str,
) -> String {
    let rows: Vec<String> = dishes
        .iter()
        .map(|d| {
            format!(
                "<tr><td>{}</td><td>{}</td></tr>",
                d.name,
                format_price(d.price, currency)
            )
        })
        .collect();

    HTML_TEMPLATE
        .replace("{date}", &date.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .replace("{count}", &dishes.len().to_string())
        .replace("{total}", &format_price(total, currency))
        .replace("{rows}", &rows.join("\n"))
}

/// Renders a receipt in the requested format and writes it to `path`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn export_receipt<P: AsRef<Path>>(
    path: P,
    format: ReceiptFormat,
    date: &DateTime<Utc>,
    dishes: &[&dish::Model],
    total: f64,
    currency: &str,
) -> Result<()> {
    let body = match format {
        ReceiptFormat::Text => render_text_receipt(dishes, total, currency),
        ReceiptFormat::Html => render_html_receipt(date, dishes, total, currency),
    };
    fs::write(path.as_ref(), body)?;
    info!("Receipt written to {:?}", path.as_ref());
    Ok(())
}
