//! Dish image handling.
//!
//! Images are referenced by path. When a dish is added with an image, the file is
//! copied into the images directory under a name derived from the dish name. Failures
//! here never abort the caller: copying falls back to the default image and a missing
//! file only changes how the dish is displayed.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const FALLBACK_STEM: &str = "new_dish";
const FALLBACK_EXTENSION: &str = "jpg";

/// Turns a dish name into a file stem: every non-alphanumeric character becomes `_`.
///
/// A blank name yields `new_dish`.
#[must_use]
pub fn sanitize_file_stem(name: &str) -> String {
    let name = name.trim();
    if name.is_empty() {
        return FALLBACK_STEM.to_string();
    }
    name.chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// Copies `source` into `images_dir` as `<sanitized name>.<ext>` and returns the new path.
///
/// Returns `default_image` when there is no source or when anything goes wrong.
#[must_use]
pub fn store_dish_image(
    source: Option<&Path>,
    dish_name: &str,
    images_dir: &str,
    default_image: &str,
) -> String {
    let Some(source) = source else {
        return default_image.to_string();
    };

    match copy_into(source, dish_name, images_dir) {
        Ok(stored) => {
            debug!("Copied image {:?} to {}", source, stored);
            stored
        }
        Err(e) => {
            warn!("Failed to copy image {:?}: {}", source, e);
            default_image.to_string()
        }
    }
}

fn copy_into(source: &Path, dish_name: &str, images_dir: &str) -> std::io::Result<String> {
    fs::create_dir_all(images_dir)?;

    let extension = source
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .unwrap_or(FALLBACK_EXTENSION);
    let target = format!(
        "{}/{}.{}",
        images_dir.trim_end_matches('/'),
        sanitize_file_stem(dish_name),
        extension
    );

    fs::copy(source, &target)?;
    Ok(target)
}

/// Whether the image behind a dish reference exists on disk.
#[must_use]
pub fn image_available(image_path: &str) -> bool {
    Path::new(image_path).is_file()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("Caesar Salad"), "Caesar_Salad");
        assert_eq!(sanitize_file_stem("Fish & Chips!"), "Fish___Chips_");
        assert_eq!(sanitize_file_stem("Борщ"), "Борщ");
        assert_eq!(sanitize_file_stem("../etc"), "___etc");
        assert_eq!(sanitize_file_stem("   "), "new_dish");
    }

    #[test]
    fn test_no_source_uses_default() {
        let stored = store_dish_image(None, "Soup", "images", "images/default.jpg");
        assert_eq!(stored, "images/default.jpg");
    }

    #[test]
    fn test_copy_into_images_dir() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload.png");
        fs::write(&source, b"png bytes").unwrap();
        let images_dir = dir.path().join("images");
        let images_dir = images_dir.to_str().unwrap();

        let stored = store_dish_image(Some(&source), "Fish & Chips", images_dir, "default.jpg");

        assert_eq!(stored, format!("{images_dir}/Fish___Chips.png"));
        assert_eq!(fs::read(&stored).unwrap(), b"png bytes");
        assert!(image_available(&stored));
    }

    #[test]
    fn test_missing_extension_defaults_to_jpg() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("upload");
        fs::write(&source, b"raw").unwrap();
        let images_dir = dir.path().join("images");
        let images_dir = images_dir.to_str().unwrap();

        let stored = store_dish_image(Some(&source), "Tea", images_dir, "default.jpg");
        assert_eq!(stored, format!("{images_dir}/Tea.jpg"));
    }

    #[test]
    fn test_copy_failure_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.jpg");
        let images_dir = dir.path().join("images");

        let stored = store_dish_image(
            Some(&missing),
            "Soup",
            images_dir.to_str().unwrap(),
            "images/default.jpg",
        );
        assert_eq!(stored, "images/default.jpg");
    }

    #[test]
    fn test_image_available_for_missing_file() {
        assert!(!image_available("definitely/not/here.jpg"));
    }
}
