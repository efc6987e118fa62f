//! Core business logic - framework-agnostic catalog, order, history and export operations.

/// Dish catalog: listing, adding, deleting and seeding
pub mod catalog;
/// CSV history export and order receipts
pub mod export;
/// Order history projection
pub mod history;
/// Copying and checking dish images
pub mod images;
/// Recording completed orders
pub mod order;
/// Selection flags, totals and the per-session order state
pub mod selection;
