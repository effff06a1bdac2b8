use log::{debug, warn};
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet},
};

use super::factory::CursorFactory;
use crate::core::{
    error::{CursorError, Result},
    image::{Bitmap, PixelPoint},
    shape::CursorShape,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemoryHandle(u64);

#[derive(Clone, Debug, PartialEq)]
pub enum MemoryCursor {
    Shape(CursorShape),
    Bitmap {
        width: u32,
        height: u32,
        hotspot: PixelPoint,
    },
}

/// Headless cursor factory. Hands out numbered handles and keeps a record
/// of every creation and disposal.
#[derive(Default)]
pub struct MemoryFactory {
    next_id: Cell<u64>,
    live: RefCell<HashMap<MemoryHandle, MemoryCursor>>,
    disposals: RefCell<HashMap<MemoryHandle, usize>>,
    unsupported: RefCell<HashSet<CursorShape>>,
    fail_bitmaps: Cell<bool>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unsupported(&self, shape: CursorShape) {
        self.unsupported.borrow_mut().insert(shape);
    }

    /// Makes every following bitmap creation fail until switched off.
    pub fn fail_bitmaps(&self, fail: bool) {
        self.fail_bitmaps.set(fail);
    }

    pub fn created(&self) -> u64 {
        self.next_id.get()
    }

    pub fn dispose_count(&self, handle: MemoryHandle) -> usize {
        self.disposals.borrow().get(&handle).copied().unwrap_or(0)
    }

    pub fn live_handles(&self) -> Vec<MemoryHandle> {
        let mut handles: Vec<_> = self.live.borrow().keys().copied().collect();
        handles.sort();
        handles
    }

    pub fn cursor(&self, handle: MemoryHandle) -> Option<MemoryCursor> {
        self.live.borrow().get(&handle).cloned()
    }

    pub fn shape_of(&self, handle: MemoryHandle) -> Option<CursorShape> {
        match self.cursor(handle)? {
            MemoryCursor::Shape(shape) => Some(shape),
            MemoryCursor::Bitmap { .. } => None,
        }
    }

    fn register(&self, cursor: MemoryCursor) -> MemoryHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);

        let handle = MemoryHandle(id);
        debug!("Allocated {:?} for {:?}", handle, cursor);
        self.live.borrow_mut().insert(handle, cursor);
        handle
    }
}

impl CursorFactory for MemoryFactory {
    type Handle = MemoryHandle;

    fn create_from_shape(&self, shape: CursorShape) -> Result<MemoryHandle> {
        if self.unsupported.borrow().contains(&shape) {
            return Err(CursorError::UnsupportedShape(shape));
        }

        Ok(self.register(MemoryCursor::Shape(shape)))
    }

    fn create_from_bitmap(&self, bitmap: &Bitmap, hotspot: PixelPoint) -> Result<MemoryHandle> {
        if self.fail_bitmaps.get() {
            return Err(CursorError::ResourceCreation(
                "bitmap allocation disabled".to_string(),
            ));
        }

        Ok(self.register(MemoryCursor::Bitmap {
            width: bitmap.width(),
            height: bitmap.height(),
            hotspot,
        }))
    }

    fn dispose(&self, handle: MemoryHandle) {
        *self.disposals.borrow_mut().entry(handle).or_insert(0) += 1;

        if self.live.borrow_mut().remove(&handle).is_none() {
            warn!("Disposed {:?} which is not live", handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn records_lifecycle() {
        let factory = MemoryFactory::new();
        let arrow = factory.create_from_shape(CursorShape::Arrow).unwrap();
        let bitmap = Bitmap::from_rgba(2, 3, &[0; 24]).unwrap();
        let custom = factory
            .create_from_bitmap(&bitmap, PixelPoint::new(1, 2))
            .unwrap();

        assert_eq!(factory.live_handles(), vec![arrow, custom]);
        assert_eq!(
            factory.cursor(custom),
            Some(MemoryCursor::Bitmap {
                width: 2,
                height: 3,
                hotspot: PixelPoint::new(1, 2),
            })
        );

        factory.dispose(arrow);
        factory.dispose(arrow);
        assert_eq!(factory.dispose_count(arrow), 2);
        assert_eq!(factory.live_handles(), vec![custom]);
        assert_eq!(factory.created(), 2);
    }
}
