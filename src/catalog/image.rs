//! Upload checks applied when an administrator adds a product.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// (width, height) in pixels.
pub const MIN_RESOLUTION: (u32, u32) = (400, 400);
pub const MAX_RESOLUTION: (u32, u32) = (800, 800);
pub const MAX_IMAGE_SIZE: u64 = 3 * 1024 * 1024;

/// An uploaded image as described by the storage layer that received it.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ImageUpload {
    pub path: String,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

pub fn validate_image(image: &ImageUpload) -> AppResult<()> {
    if image.path.trim().is_empty() {
        return Err(AppError::Validation("image path is required".into()));
    }

    if image.size_bytes > MAX_IMAGE_SIZE {
        return Err(AppError::Validation("image exceeds 3 MB".into()));
    }

    let (min_width, min_height) = MIN_RESOLUTION;
    if image.width < min_width || image.height < min_height {
        return Err(AppError::Validation(format!(
            "image resolution is below the minimum of {min_width}x{min_height}px"
        )));
    }

    let (max_width, max_height) = MAX_RESOLUTION;
    if image.width > max_width || image.height > max_height {
        return Err(AppError::Validation(format!(
            "image resolution is above the maximum of {max_width}x{max_height}px"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(width: u32, height: u32, size_bytes: u64) -> ImageUpload {
        ImageUpload {
            path: "uploads/thinkpad.png".into(),
            width,
            height,
            size_bytes,
        }
    }

    #[test]
    fn accepts_bounds_inclusive() {
        assert!(validate_image(&upload(400, 400, 1024)).is_ok());
        assert!(validate_image(&upload(800, 800, MAX_IMAGE_SIZE)).is_ok());
    }

    #[test]
    fn rejects_small_and_large_resolutions() {
        assert!(matches!(
            validate_image(&upload(399, 600, 1024)),
            Err(AppError::Validation(msg)) if msg.contains("minimum")
        ));
        assert!(matches!(
            validate_image(&upload(600, 801, 1024)),
            Err(AppError::Validation(msg)) if msg.contains("maximum")
        ));
    }

    #[test]
    fn size_is_checked_before_resolution() {
        assert!(matches!(
            validate_image(&upload(10, 10, MAX_IMAGE_SIZE + 1)),
            Err(AppError::Validation(msg)) if msg.contains("3 MB")
        ));
    }
}
