//! Upload and field validators for catalog entities.
//!
//! The image validators are plain functions with no entity coupling so they can run
//! before anything is written.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest accepted image, in bytes (2 MiB).
pub const MAX_IMAGE_SIZE: u64 = 2 * 1024 * 1024;

/// Image extensions accepted for product photos (compared lower-cased).
pub const ALLOWED_IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Rejection reasons for an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// File suffix is not one of [`ALLOWED_IMAGE_EXTENSIONS`]
    #[error("Only JPEG, JPG, and PNG files are allowed.")]
    UnsupportedExtension {
        /// The lower-cased suffix that was found
        extension: String,
    },
    /// File is larger than [`MAX_IMAGE_SIZE`]
    #[error("The image file size should be less than 2MB.")]
    FileTooLarge {
        /// Actual size in bytes
        size: u64,
    },
}

/// An uploaded image file: its client-supplied name and raw bytes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUpload {
    /// Original file name, e.g. `"cola.png"`
    pub name: String,
    /// File contents
    pub content: Vec<u8>,
}

impl ImageUpload {
    /// Wraps an uploaded file.
    #[must_use]
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }

    /// Size of the file in bytes.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

// Contents are skipped; an image can be megabytes of noise in a log line.
impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("name", &self.name)
            .field("size", &self.size())
            .finish()
    }
}

/// Returns the lower-cased text after the last `.` of `name`.
///
/// A name without any `.` yields the whole name, so extension-less files are
/// rejected unless the name itself is `jpg`, `jpeg` or `png`.
#[must_use]
pub fn image_extension(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_lowercase()
}

/// Rejects images whose extension is not `jpg`, `jpeg` or `png` (case-insensitive).
///
/// # Errors
/// Returns [`ValidationError::UnsupportedExtension`] for any other suffix.
pub fn validate_image_extension(image: &ImageUpload) -> Result<(), ValidationError> {
    validate_image_name(&image.name)
}

/// Extension rule applied to a bare file name or stored path.
///
/// # Errors
/// Returns [`ValidationError::UnsupportedExtension`] for any suffix outside
/// [`ALLOWED_IMAGE_EXTENSIONS`].
pub fn validate_image_name(name: &str) -> Result<(), ValidationError> {
    let extension = image_extension(name);
    if ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(ValidationError::UnsupportedExtension { extension })
    }
}

/// Rejects images larger than [`MAX_IMAGE_SIZE`]. Exactly 2 MiB is accepted.
///
/// # Errors
/// Returns [`ValidationError::FileTooLarge`] when the file exceeds the limit.
pub fn validate_image_size(image: &ImageUpload) -> Result<(), ValidationError> {
    validate_image_byte_count(image.size())
}

/// Size rule applied to a byte count, e.g. of a file already in the media root.
///
/// # Errors
/// Returns [`ValidationError::FileTooLarge`] when `size` exceeds [`MAX_IMAGE_SIZE`].
pub const fn validate_image_byte_count(size: u64) -> Result<(), ValidationError> {
    if size > MAX_IMAGE_SIZE {
        Err(ValidationError::FileTooLarge { size })
    } else {
        Ok(())
    }
}

/// True when `value` is non-empty and made only of ASCII letters, digits, `-` and `_`.
#[must_use]
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// `validator` custom rule for slug fields: only ASCII letters, digits, `-` and `_`.
///
/// Blank values pass here; the field's length rule reports them.
///
/// # Errors
/// Returns a `slug` rule error when `value` contains any other character.
pub fn validate_slug(value: &str) -> Result<(), validator::ValidationError> {
    if value.is_empty() || is_valid_slug(value) {
        return Ok(());
    }
    let mut error = validator::ValidationError::new("slug");
    error.message = Some(
        "Enter a valid slug consisting of letters, numbers, underscores or hyphens.".into(),
    );
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(name: &str, size: usize) -> ImageUpload {
        ImageUpload::new(name, vec![0; size])
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        for name in ["a.jpg", "a.JPG", "a.jpeg", "a.Jpeg", "a.png", "archive.tar.PNG"] {
            assert!(validate_image_extension(&image(name, 1)).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_rejected_extensions() {
        for name in ["a.gif", "a.webp", "a.png.exe", "a.", "photo"] {
            assert!(
                matches!(
                    validate_image_extension(&image(name, 1)),
                    Err(ValidationError::UnsupportedExtension { .. })
                ),
                "{name}"
            );
        }
    }

    #[test]
    fn test_extensionless_name_uses_whole_name() {
        assert_eq!(image_extension("README"), "readme");
        // A file literally called "png" has no dot, and "png" is its extension.
        assert!(validate_image_extension(&image("png", 1)).is_ok());
    }

    #[test]
    fn test_stored_path_rules() {
        assert!(validate_image_name("photos/products/cola.JPG").is_ok());
        assert_eq!(
            validate_image_name("photos/products/cola.gif"),
            Err(ValidationError::UnsupportedExtension {
                extension: "gif".to_string()
            })
        );
        assert!(validate_image_byte_count(MAX_IMAGE_SIZE).is_ok());
        assert!(validate_image_byte_count(MAX_IMAGE_SIZE + 1).is_err());
    }

    #[test]
    fn test_size_boundary() {
        let limit = usize::try_from(MAX_IMAGE_SIZE).unwrap_or(usize::MAX);
        assert!(validate_image_size(&image("a.png", limit)).is_ok());
        assert_eq!(
            validate_image_size(&image("a.png", limit + 1)),
            Err(ValidationError::FileTooLarge {
                size: MAX_IMAGE_SIZE + 1
            })
        );
        assert!(validate_image_size(&image("a.png", 0)).is_ok());
    }

    #[test]
    fn test_error_messages() {
        let ext = ValidationError::UnsupportedExtension {
            extension: "gif".to_string(),
        };
        assert_eq!(ext.to_string(), "Only JPEG, JPG, and PNG files are allowed.");
        let size = ValidationError::FileTooLarge { size: 1 };
        assert_eq!(
            size.to_string(),
            "The image file size should be less than 2MB."
        );
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("cola"));
        assert!(is_valid_slug("diet-cola_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("diet cola"));
        assert!(!is_valid_slug("cola/zero"));
    }

    #[test]
    fn test_validate_slug_rule() {
        assert!(validate_slug("diet-cola").is_ok());
        // Left to the length rule
        assert!(validate_slug("").is_ok());
        let error = validate_slug("diet cola").unwrap_err();
        assert_eq!(error.code, "slug");
        assert!(error.message.is_some());
    }
}
