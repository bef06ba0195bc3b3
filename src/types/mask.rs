//! Mask element domain and pixel/voxel mask entries

use bon::Builder;
use serde::{Deserialize, Serialize};

/// Element type that can populate an image mask.
///
/// Integer, floating point, and boolean arrays are interchangeable as masks as
/// long as every cell holds an "off" (0) or "on" (1) value.
pub trait MaskElement: Copy {
    /// The cell value as a float, used for reporting invalid values
    fn to_f64(self) -> f64;

    fn is_off(self) -> bool;

    fn is_on(self) -> bool;

    /// Whether the cell is neither 0 nor 1
    fn is_invalid(self) -> bool {
        !self.is_off() && !self.is_on()
    }

    fn is_nonzero(self) -> bool {
        !self.is_off()
    }
}

macro_rules! impl_mask_element_int {
    ($($elem:ty),*) => {
        $(
            impl MaskElement for $elem {
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn is_off(self) -> bool {
                    self == 0
                }

                fn is_on(self) -> bool {
                    self == 1
                }
            }
        )*
    };
}

macro_rules! impl_mask_element_float {
    ($($elem:ty),*) => {
        $(
            impl MaskElement for $elem {
                fn to_f64(self) -> f64 {
                    self as f64
                }

                fn is_off(self) -> bool {
                    self == 0.0
                }

                fn is_on(self) -> bool {
                    self == 1.0
                }
            }
        )*
    };
}

impl_mask_element_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_mask_element_float!(f32, f64);

impl MaskElement for bool {
    fn to_f64(self) -> f64 {
        if self { 1.0 } else { 0.0 }
    }

    fn is_off(self) -> bool {
        !self
    }

    fn is_on(self) -> bool {
        self
    }
}

/// A single "on" pixel of a 2D mask: `[x, y, weight]`
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct PixelMaskEntry {
    pub x: usize,
    pub y: usize,
    #[builder(default = 1.0)]
    pub weight: f64,
}

/// A single "on" voxel of a 3D mask: `[x, y, z, weight]`
#[derive(Debug, Clone, Copy, PartialEq, Builder, Serialize, Deserialize)]
pub struct VoxelMaskEntry {
    pub x: usize,
    pub y: usize,
    pub z: usize,
    #[builder(default = 1.0)]
    pub weight: f64,
}
