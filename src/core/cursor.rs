use log::debug;
use std::{fmt, rc::Rc};

use super::{
    error::{CursorError, Result},
    image::{Bitmap, PixelPoint, ScaledImage},
    shape::CursorShape,
};
use crate::platform::factory::{CursorFactory, ScaleSource};

const BITMAP_CURSOR_NAME: &str = "BitmapCursor";

/// A live cursor owning exactly one native handle until released.
pub struct CursorResource<F: CursorFactory> {
    factory: Rc<F>,
    name: String,
    handle: Option<F::Handle>,
    variants: Vec<ScaledImage>,
    active_variant: usize,
}

impl<F: CursorFactory> CursorResource<F> {
    pub fn from_shape(factory: Rc<F>, shape: CursorShape) -> Result<Self> {
        let handle = factory.create_from_shape(shape)?;
        debug!("Created cursor for shape {}", shape);

        Ok(Self::with_handle(factory, shape.name().to_string(), handle, Vec::new()))
    }

    pub fn from_bitmap(factory: Rc<F>, bitmap: &Bitmap, hotspot: PixelPoint) -> Result<Self> {
        let handle = factory.create_from_bitmap(bitmap, hotspot)?;
        debug!(
            "Created {}x{} bitmap cursor with hotspot ({}, {})",
            bitmap.width(),
            bitmap.height(),
            hotspot.x,
            hotspot.y
        );

        Ok(Self::with_handle(
            factory,
            BITMAP_CURSOR_NAME.to_string(),
            handle,
            Vec::new(),
        ))
    }

    /// Builds the cursor from the first variant. The others are kept, in
    /// the given order, for `rescale`.
    pub fn from_scaled_set(factory: Rc<F>, variants: Vec<ScaledImage>) -> Result<Self> {
        let first = variants.first().ok_or_else(|| {
            CursorError::InvalidArgument("scaled cursor needs at least one image".to_string())
        })?;

        let handle = factory.create_from_bitmap(first.image(), first.hotspot())?;
        debug!("Created scaled cursor with {} variants", variants.len());

        Ok(Self::with_handle(
            factory,
            BITMAP_CURSOR_NAME.to_string(),
            handle,
            variants,
        ))
    }

    pub fn default_cursor(factory: Rc<F>) -> Result<Self> {
        Self::from_shape(factory, CursorShape::Arrow)
    }

    /// Resolves a shape name, ignoring case.
    pub fn parse(factory: Rc<F>, name: &str) -> Result<Self> {
        let shape = name.parse::<CursorShape>()?;
        Self::from_shape(factory, shape)
    }

    fn with_handle(
        factory: Rc<F>,
        name: String,
        handle: F::Handle,
        variants: Vec<ScaledImage>,
    ) -> Self {
        Self {
            factory,
            name,
            handle: Some(handle),
            variants,
            active_variant: 0,
        }
    }

    /// Switches to the variant whose scale is closest to `scale`.
    ///
    /// The replacement handle is created before the current one is
    /// disposed, so a failed allocation leaves the cursor as it was.
    ///
    /// Shape and single-bitmap cursors, and released ones, ignore the call
    /// whatever the scale.
    pub fn rescale(&mut self, scale: f64) -> Result<()> {
        if self.handle.is_none() || self.variants.is_empty() {
            return Ok(());
        }

        if !scale.is_finite() || scale <= 0.0 {
            return Err(CursorError::InvalidArgument(format!(
                "scale must be a positive number, got {}",
                scale
            )));
        }

        let Some(best) = select_closest_scale(&self.variants, scale) else {
            return Ok(());
        };

        if best == self.active_variant {
            return Ok(());
        }

        let variant = &self.variants[best];
        let handle = self
            .factory
            .create_from_bitmap(variant.image(), variant.hotspot())?;

        if let Some(old) = self.handle.replace(handle) {
            self.factory.dispose(old);
        }

        debug!(
            "Rescaled {} to {} (variant {} -> {}, scale {})",
            self.name,
            scale,
            self.active_variant,
            best,
            variant.scale()
        );
        self.active_variant = best;

        Ok(())
    }

    pub fn rescale_to(&mut self, source: &impl ScaleSource) -> Result<()> {
        self.rescale(source.scale_factor())
    }

    /// Disposes the native handle. Later calls do nothing.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Releasing cursor {}", self.name);
            self.factory.dispose(handle);
        }
    }

    pub fn handle(&self) -> Option<&F::Handle> {
        self.handle.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.handle.is_none()
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> &[ScaledImage] {
        &self.variants
    }

    pub fn active_variant(&self) -> usize {
        self.active_variant
    }

    pub fn factory(&self) -> &Rc<F> {
        &self.factory
    }
}

impl<F: CursorFactory> Drop for CursorResource<F> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<F: CursorFactory> fmt::Display for CursorResource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl<F: CursorFactory> fmt::Debug for CursorResource<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorResource")
            .field("name", &self.name)
            .field("released", &self.is_released())
            .field("variants", &self.variants.len())
            .field("active_variant", &self.active_variant)
            .finish()
    }
}

/// Index of the variant whose scale is nearest `target`. Ties go to the
/// earliest index.
pub fn select_closest_scale(variants: &[ScaledImage], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;

    for (i, variant) in variants.iter().enumerate() {
        let distance = (variant.scale() - target).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}
