//! Unified error type for the order desk.
//!
//! Validation failures are kept apart from storage and I/O failures so the
//! command layer can print them as warnings and carry on.

use thiserror::Error;

/// All errors produced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },

    /// User input was rejected before reaching storage
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// A dish price was not finite or not positive
    #[error("Invalid price: {price}")]
    InvalidPrice {
        /// The rejected price
        price: f64,
    },

    /// The dish id is not part of the loaded catalog
    #[error("Dish not found: {id}")]
    DishNotFound {
        /// The unknown dish id
        id: i64,
    },

    /// An order was submitted with nothing selected
    #[error("No dishes selected")]
    EmptySelection,

    /// Database error from `SeaORM`
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// File system error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether this error is a user-input problem rather than a storage or I/O failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidPrice { .. }
                | Self::DishNotFound { .. }
                | Self::EmptySelection
        )
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
