pub mod masks;
pub mod validation;

// Re-export for easier access
pub use masks::{
    build_circular_mask, build_cuboid_mask, build_rectangular_mask, image_to_pixel_mask,
    image_to_voxel_mask, pixel_to_image_mask, rasterize_roi,
};
pub use validation::{infer_dimension, validate_image_mask, validate_pixel_roi, validate_roi_size};
