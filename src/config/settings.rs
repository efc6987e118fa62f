//! Application settings loaded from config.toml
//!
//! Every field has a default, so a missing config file simply yields the
//! built-in sample menu. The `[[dishes]]` entries seed the catalog the first
//! time the database is opened with an empty `dishes` table.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Currency symbol appended to prices on screen and in receipts
    pub currency: String,
    /// Directory that receives copied dish images
    pub images_dir: String,
    /// Image reference used when no image was supplied or copying failed
    pub default_image: String,
    /// Sample dishes inserted into an empty catalog
    pub dishes: Vec<SeedDish>,
}

/// A dish inserted when the catalog is first created
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SeedDish {
    /// Display name
    pub name: String,
    /// Unit price
    pub price: f64,
    /// Image reference stored as-is
    pub image: String,
}

impl SeedDish {
    fn new(name: &str, price: f64, image: &str) -> Self {
        Self {
            name: name.to_string(),
            price,
            image: image.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            currency: "₽".to_string(),
            images_dir: "images".to_string(),
            default_image: "images/default.jpg".to_string(),
            dishes: default_dishes(),
        }
    }
}

fn default_dishes() -> Vec<SeedDish> {
    vec![
        SeedDish::new("Pasta Carbonara", 12.99, "images/pasta.jpg"),
        SeedDish::new("Pizza Margherita", 15.50, "images/pizza.jpg"),
        SeedDish::new("Caesar Salad", 8.75, "images/salad.jpg"),
        SeedDish::new("Ribeye Steak", 25.99, "images/steak.jpg"),
        SeedDish::new("California Roll", 18.25, "images/sushi.jpg"),
        SeedDish::new("Borscht", 7.50, "images/borscht.jpg"),
        SeedDish::new("Pelmeni", 10.25, "images/dumplings.jpg"),
    ]
}

/// Parses an application configuration from TOML text.
///
/// # Errors
/// Returns `Error::Config` if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the application configuration from a TOML file.
///
/// A file that does not exist yields [`AppConfig::default`].
///
/// # Errors
/// Returns an error if:
/// - The file exists but cannot be read
/// - The TOML syntax is invalid
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    debug!("Attempting to load configuration from: {:?}", path_ref);

    if !path_ref.exists() {
        info!(
            "No configuration file at {:?}, using built-in defaults.",
            path_ref
        );
        return Ok(AppConfig::default());
    }

    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    parse_config(&contents)
}
