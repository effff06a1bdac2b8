use log::{debug, warn};
use std::{cell::RefCell, collections::HashSet, rc::Rc};
use ::x11::{xcursor, xlib};

use super::factory::CursorFactory;
use crate::{
    core::{
        error::{CursorError, Result},
        image::{Bitmap, PixelPoint},
        shape::CursorShape,
    },
    utils::x11::Display,
};

// Glyph indices from X11/cursorfont.h
const XC_X_CURSOR: u32 = 0;
const XC_BOTTOM_LEFT_CORNER: u32 = 12;
const XC_BOTTOM_RIGHT_CORNER: u32 = 14;
const XC_BOTTOM_SIDE: u32 = 16;
const XC_CROSSHAIR: u32 = 34;
const XC_FLEUR: u32 = 52;
const XC_HAND2: u32 = 60;
const XC_LEFT_PTR: u32 = 68;
const XC_LEFT_SIDE: u32 = 70;
const XC_QUESTION_ARROW: u32 = 92;
const XC_RIGHT_SIDE: u32 = 96;
const XC_SB_H_DOUBLE_ARROW: u32 = 108;
const XC_SB_UP_ARROW: u32 = 114;
const XC_SB_V_DOUBLE_ARROW: u32 = 116;
const XC_TOP_LEFT_CORNER: u32 = 134;
const XC_TOP_RIGHT_CORNER: u32 = 136;
const XC_TOP_SIDE: u32 = 138;
const XC_WATCH: u32 = 150;
const XC_XTERM: u32 = 152;

/// Cursor-font glyph for a shape. `None` has no glyph and is built from a
/// transparent image instead.
fn font_glyph(shape: CursorShape) -> Option<u32> {
    let glyph = match shape {
        CursorShape::Arrow => XC_LEFT_PTR,
        CursorShape::Ibeam => XC_XTERM,
        CursorShape::Wait | CursorShape::AppStarting => XC_WATCH,
        CursorShape::Cross => XC_CROSSHAIR,
        CursorShape::UpArrow => XC_SB_UP_ARROW,
        CursorShape::SizeWestEast => XC_SB_H_DOUBLE_ARROW,
        CursorShape::SizeNorthSouth => XC_SB_V_DOUBLE_ARROW,
        CursorShape::SizeAll | CursorShape::DragMove => XC_FLEUR,
        CursorShape::No => XC_X_CURSOR,
        CursorShape::Hand | CursorShape::DragLink => XC_HAND2,
        CursorShape::Help => XC_QUESTION_ARROW,
        CursorShape::TopSide => XC_TOP_SIDE,
        CursorShape::BottomSide => XC_BOTTOM_SIDE,
        CursorShape::LeftSide => XC_LEFT_SIDE,
        CursorShape::RightSide => XC_RIGHT_SIDE,
        CursorShape::TopLeftCorner => XC_TOP_LEFT_CORNER,
        CursorShape::TopRightCorner => XC_TOP_RIGHT_CORNER,
        CursorShape::BottomLeftCorner => XC_BOTTOM_LEFT_CORNER,
        CursorShape::BottomRightCorner => XC_BOTTOM_RIGHT_CORNER,
        CursorShape::DragCopy => XC_CROSSHAIR,
        CursorShape::None => return None,
    };

    Some(glyph)
}

fn checked_font_cursor(cursor: xlib::Cursor, shape: CursorShape) -> Result<xlib::Cursor> {
    if cursor == 0 {
        return Err(CursorError::ResourceCreation(format!(
            "XCreateFontCursor failed for {}",
            shape
        )));
    }

    Ok(cursor)
}

/// Cursor factory backed by Xlib font cursors and Xcursor images.
///
/// Every handle it hands out stays registered until disposed; whatever is
/// still registered when the factory drops gets freed then.
pub struct X11CursorFactory {
    display: Rc<Display>,
    live: RefCell<HashSet<xlib::Cursor>>,
}

impl X11CursorFactory {
    pub fn new(display: Rc<Display>) -> Self {
        Self {
            display,
            live: RefCell::new(HashSet::new()),
        }
    }

    pub fn display(&self) -> &Rc<Display> {
        &self.display
    }

    /// Makes `cursor` the pointer image of `window`.
    pub fn define(&self, window: xlib::Window, cursor: xlib::Cursor) {
        unsafe {
            xlib::XDefineCursor(self.display.raw(), window, cursor);
        }
    }

    fn register(&self, cursor: xlib::Cursor) -> xlib::Cursor {
        self.live.borrow_mut().insert(cursor);
        cursor
    }

    fn load_image(&self, bitmap: &Bitmap, hotspot: PixelPoint) -> Result<xlib::Cursor> {
        if !bitmap.contains(hotspot) {
            return Err(CursorError::ResourceCreation(format!(
                "hotspot ({}, {}) lies outside the {}x{} image",
                hotspot.x,
                hotspot.y,
                bitmap.width(),
                bitmap.height()
            )));
        }

        unsafe {
            let image =
                xcursor::XcursorImageCreate(bitmap.width() as i32, bitmap.height() as i32);
            if image.is_null() {
                return Err(CursorError::ResourceCreation(
                    "XcursorImageCreate returned null".to_string(),
                ));
            }

            (*image).xhot = hotspot.x as u32;
            (*image).yhot = hotspot.y as u32;
            std::ptr::copy_nonoverlapping(
                bitmap.pixels().as_ptr(),
                (*image).pixels,
                bitmap.pixels().len(),
            );

            let cursor = xcursor::XcursorImageLoadCursor(self.display.raw(), image);
            xcursor::XcursorImageDestroy(image);

            if cursor == 0 {
                return Err(CursorError::ResourceCreation(
                    "XcursorImageLoadCursor failed".to_string(),
                ));
            }

            Ok(cursor)
        }
    }
}

impl CursorFactory for X11CursorFactory {
    type Handle = xlib::Cursor;

    fn create_from_shape(&self, shape: CursorShape) -> Result<xlib::Cursor> {
        let cursor = match font_glyph(shape) {
            Some(glyph) => {
                let cursor = unsafe { xlib::XCreateFontCursor(self.display.raw(), glyph) };
                checked_font_cursor(cursor, shape)?
            }
            None => {
                let blank = Bitmap::from_rgba(1, 1, &[0; 4])?;
                self.load_image(&blank, PixelPoint::default())?
            }
        };

        debug!("Created X cursor {} for {}", cursor, shape);
        Ok(self.register(cursor))
    }

    fn create_from_bitmap(&self, bitmap: &Bitmap, hotspot: PixelPoint) -> Result<xlib::Cursor> {
        let cursor = self.load_image(bitmap, hotspot)?;
        debug!(
            "Created X cursor {} from {}x{} image",
            cursor,
            bitmap.width(),
            bitmap.height()
        );
        Ok(self.register(cursor))
    }

    fn dispose(&self, cursor: xlib::Cursor) {
        if !self.live.borrow_mut().remove(&cursor) {
            warn!("Ignoring dispose of unknown X cursor {}", cursor);
            return;
        }

        unsafe {
            xlib::XFreeCursor(self.display.raw(), cursor);
        }
    }
}

impl Drop for X11CursorFactory {
    fn drop(&mut self) {
        for cursor in self.live.get_mut().drain() {
            warn!("Freeing leaked X cursor {}", cursor);
            unsafe {
                xlib::XFreeCursor(self.display.raw(), cursor);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_none_lacks_a_font_glyph() {
        for shape in CursorShape::ALL {
            assert_eq!(font_glyph(shape).is_none(), shape == CursorShape::None);
        }
    }

    #[test]
    fn zero_font_cursor_is_a_creation_error() {
        assert_eq!(
            checked_font_cursor(0, CursorShape::Hand),
            Err(CursorError::ResourceCreation(
                "XCreateFontCursor failed for Hand".to_string()
            ))
        );
        assert_eq!(checked_font_cursor(42, CursorShape::Hand), Ok(42));
    }
}
