//! Trigger layers and mask validation
//!
//! A volume belongs to the layers set in its layer mask and reports
//! overlaps with volumes whose layer mask intersects its triggered-by mask.
//! Masks are eight bits wide.

use crate::error::{Result, TriggerError};

pub const LAYER_1: u8 = 1 << 0;
pub const LAYER_2: u8 = 1 << 1;
pub const LAYER_3: u8 = 1 << 2;
pub const LAYER_4: u8 = 1 << 3;
pub const LAYER_5: u8 = 1 << 4;
pub const LAYER_6: u8 = 1 << 5;
pub const LAYER_7: u8 = 1 << 6;
pub const LAYER_8: u8 = 1 << 7;

/// Every layer
pub const ALL_LAYERS: u8 = 0xFF;
/// No layer; as a triggered-by mask this reports nothing
pub const NO_LAYERS: u8 = 0;

/// Layer of the built-in observer volume
pub const PLAYER_LAYER_ID: u8 = LAYER_1;

/// Single-bit mask for a 1-based layer number
pub fn layer(number: u8) -> Result<u8> {
    match number {
        1..=8 => Ok(1 << (number - 1)),
        _ => Err(TriggerError::InvalidArgument(format!(
            "layer number {} is outside 1..=8",
            number
        ))),
    }
}

/// Whether a triggered-by mask accepts a volume on `layer_mask`
#[inline]
pub fn accepts(triggered_by_mask: u8, layer_mask: u8) -> bool {
    triggered_by_mask & layer_mask != 0
}

/// Values accepted wherever a mask is expected
pub trait IntoMask {
    /// Validate and narrow to an eight-bit mask
    fn into_mask(self) -> Result<u8>;
}

impl IntoMask for u8 {
    #[inline]
    fn into_mask(self) -> Result<u8> {
        Ok(self)
    }
}

macro_rules! impl_into_mask_int {
    ($($ty:ty),*) => {
        $(
            impl IntoMask for $ty {
                fn into_mask(self) -> Result<u8> {
                    u8::try_from(self).map_err(|_| out_of_range(self))
                }
            }
        )*
    };
}

impl_into_mask_int!(i32, i64, u32);

macro_rules! impl_into_mask_float {
    ($($ty:ty),*) => {
        $(
            impl IntoMask for $ty {
                fn into_mask(self) -> Result<u8> {
                    if !self.is_finite() || self.fract() != 0.0 {
                        return Err(TriggerError::InvalidArgument(format!(
                            "mask {} is not an integer",
                            self
                        )));
                    }
                    if !(0.0..=255.0).contains(&self) {
                        return Err(out_of_range(self));
                    }
                    Ok(self as u8)
                }
            }
        )*
    };
}

impl_into_mask_float!(f32, f64);

fn out_of_range(value: impl std::fmt::Display) -> TriggerError {
    TriggerError::InvalidArgument(format!("mask {} is outside 0..=255", value))
}
