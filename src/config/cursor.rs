use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    rc::Rc,
    sync::Arc,
};

use crate::{
    core::{
        cursor::CursorResource,
        image::{Bitmap, PixelPoint, ScaledImage},
        shape::CursorShape,
    },
    platform::factory::CursorFactory,
};

/// A PNG cursor image. `scale` only matters inside `images`.
#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct ImageConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub hotspot: [i32; 2],
    #[serde(default = "default_image_scale")]
    pub scale: f64,
}

fn default_image_scale() -> f64 {
    1.0
}

impl ImageConfig {
    pub fn hotspot(&self) -> PixelPoint {
        PixelPoint::new(self.hotspot[0], self.hotspot[1])
    }

    pub fn load_bitmap(&self) -> Result<Bitmap> {
        let decoded = image::open(&self.path)
            .with_context(|| format!("Failed to decode cursor image {}", self.path.display()))?
            .to_rgba8();

        Ok(Bitmap::from_rgba(
            decoded.width(),
            decoded.height(),
            decoded.as_raw(),
        )?)
    }

    fn resolve(&mut self, base: &Path) {
        if self.path.is_relative() {
            self.path = base.join(&self.path);
        }
    }
}

/// Which cursor to build. `images` wins over `image`, which wins over
/// `shape`.
#[derive(Deserialize, Default, Clone, Debug, PartialEq)]
pub struct CursorConfig {
    #[serde(default)]
    pub shape: CursorShape,
    #[serde(default)]
    pub image: Option<ImageConfig>,
    #[serde(default)]
    pub images: Vec<ImageConfig>,
    /// Overrides the scale reported by the display.
    #[serde(default)]
    pub scale: Option<f64>,
}

impl CursorConfig {
    pub fn effective_scale(&self, display_scale: f64) -> f64 {
        self.scale
            .filter(|scale| scale.is_finite() && *scale > 0.0)
            .unwrap_or(display_scale)
    }

    /// Makes relative image paths relative to `base`.
    pub fn resolve_paths(&mut self, base: &Path) {
        for image in self.image.iter_mut().chain(self.images.iter_mut()) {
            image.resolve(base);
        }
    }

    pub fn build<F: CursorFactory>(&self, factory: Rc<F>) -> Result<CursorResource<F>> {
        if !self.images.is_empty() {
            let variants = self
                .images
                .iter()
                .map(|image| -> Result<ScaledImage> {
                    let bitmap = Arc::new(image.load_bitmap()?);
                    Ok(ScaledImage::new(bitmap, image.hotspot(), image.scale)?)
                })
                .collect::<Result<Vec<_>>>()?;

            return CursorResource::from_scaled_set(factory, variants)
                .context("Failed to create scaled cursor");
        }

        if let Some(image) = &self.image {
            let bitmap = image.load_bitmap()?;
            return CursorResource::from_bitmap(factory, &bitmap, image.hotspot())
                .context("Failed to create bitmap cursor");
        }

        CursorResource::from_shape(factory, self.shape).context("Failed to create cursor")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::loader::Config, platform::memory::MemoryFactory};
    use pretty_assertions::assert_eq;

    fn write_png(dir: &Path, name: &str, side: u32) {
        image::RgbaImage::from_pixel(side, side, image::Rgba([255, 0, 0, 255]))
            .save(dir.join(name))
            .unwrap();
    }

    #[test]
    fn shape_is_the_fallback() {
        let config = Config::parse("[cursor]\nshape = \"help\"\n").unwrap();
        let factory = Rc::new(MemoryFactory::new());

        let cursor = config.cursor.build(factory.clone()).unwrap();
        assert_eq!(cursor.display_name(), "Help");
        assert_eq!(
            factory.shape_of(*cursor.handle().unwrap()),
            Some(CursorShape::Help)
        );
    }

    #[test]
    fn single_image_builds_bitmap_cursor() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "pointer.png", 32);

        let mut config =
            Config::parse("[cursor]\nimage = { path = \"pointer.png\", hotspot = [16, 16] }\n")
                .unwrap();
        config.cursor.resolve_paths(dir.path());

        let factory = Rc::new(MemoryFactory::new());
        let mut cursor = config.cursor.build(factory.clone()).unwrap();
        assert_eq!(cursor.display_name(), "BitmapCursor");
        assert!(cursor.variants().is_empty());

        let handle = *cursor.handle().unwrap();
        cursor.rescale(2.0).unwrap();
        assert_eq!(*cursor.handle().unwrap(), handle);
    }

    #[test]
    fn scaled_images_follow_display_scale() {
        let dir = tempfile::tempdir().unwrap();
        let scales = [(32, 1.0), (48, 1.5), (64, 2.0), (96, 3.0), (128, 4.0)];
        let mut content = String::from("[cursor]\nimages = [\n");
        for (side, scale) in scales {
            let name = format!("duplication-{}.png", side);
            write_png(dir.path(), &name, side);
            content.push_str(&format!(
                "  {{ path = \"{}\", hotspot = [1, 1], scale = {:?} }},\n",
                name, scale
            ));
        }
        content.push_str("]\n");

        let mut config = Config::parse(&content).unwrap();
        config.cursor.resolve_paths(dir.path());

        let factory = Rc::new(MemoryFactory::new());
        let mut cursor = config.cursor.build(factory.clone()).unwrap();
        assert_eq!(cursor.variants().len(), 5);
        assert_eq!(cursor.variants()[3].image().width(), 96);

        cursor.rescale(config.cursor.effective_scale(2.0)).unwrap();
        assert_eq!(cursor.active_variant(), 2);
        assert_eq!(cursor.variants()[2].image().width(), 64);

        cursor.rescale(1.75).unwrap();
        assert_eq!(cursor.active_variant(), 1);
    }

    #[test]
    fn missing_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config =
            Config::parse("[cursor]\nimage = { path = \"absent.png\" }\n").unwrap();
        config.cursor.resolve_paths(dir.path());

        let factory = Rc::new(MemoryFactory::new());
        let err = config.cursor.build(factory.clone()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to decode cursor image"));
        assert_eq!(factory.created(), 0);
    }

    #[test]
    fn non_positive_image_scale_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "pointer.png", 16);
        let mut config = Config::parse(
            "[cursor]\nimages = [{ path = \"pointer.png\", scale = 0.0 }]\n",
        )
        .unwrap();
        config.cursor.resolve_paths(dir.path());

        let factory = Rc::new(MemoryFactory::new());
        let err = config.cursor.build(factory.clone()).unwrap_err();
        assert!(format!("{:#}", err).contains("scale must be a positive number"));
        assert_eq!(factory.created(), 0);
    }
}
