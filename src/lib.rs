pub mod core {
    pub mod cursor;
    pub mod error;
    pub mod image;
    pub mod shape;
}

pub mod platform {
    pub mod factory;
    pub mod memory;
    pub mod x11;
}

pub mod utils {
    pub mod x11;
}

pub mod config {
    pub mod cursor;
    pub mod loader;
}

pub use self::config::loader::Config;
pub use self::core::{
    cursor::{select_closest_scale, CursorResource},
    error::CursorError,
    image::{Bitmap, PixelPoint, ScaledImage},
    shape::CursorShape,
};
pub use self::platform::factory::{CursorFactory, ScaleSource};
