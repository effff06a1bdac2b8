use crate::core::{
    error::Result,
    image::{Bitmap, PixelPoint},
    shape::CursorShape,
};

/// Creates and destroys native cursor handles for one platform.
pub trait CursorFactory {
    type Handle;

    /// Fails with `CursorError::UnsupportedShape` when the platform has no
    /// realization for `shape`.
    fn create_from_shape(&self, shape: CursorShape) -> Result<Self::Handle>;

    fn create_from_bitmap(&self, bitmap: &Bitmap, hotspot: PixelPoint) -> Result<Self::Handle>;

    fn dispose(&self, handle: Self::Handle);
}

/// Reports the scale factor of the surface under the pointer.
pub trait ScaleSource {
    fn scale_factor(&self) -> f64;
}
