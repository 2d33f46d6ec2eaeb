// ABOUTME: Validated domain types for image resolution.
// ABOUTME: Exposes the ImageRef value type and its parse error.

mod image_ref;

pub use image_ref::{ImageRef, ParseImageRefError};
