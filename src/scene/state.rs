//! Readiness of the externally owned map.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{SceneError, SceneResult};

/// The configurator's view of the map: absent until the load event arrives,
/// then a weak reference it never owns.
#[derive(Debug)]
pub enum MapHandle<B> {
    NotReady,
    Ready(Weak<RefCell<B>>),
}

impl<B> Default for MapHandle<B> {
    fn default() -> Self {
        MapHandle::NotReady
    }
}

impl<B> MapHandle<B> {
    pub fn ready(map: &Rc<RefCell<B>>) -> Self {
        MapHandle::Ready(Rc::downgrade(map))
    }

    /// True while the map is loaded and still alive.
    pub fn is_ready(&self) -> bool {
        match self {
            MapHandle::NotReady => false,
            MapHandle::Ready(weak) => weak.strong_count() > 0,
        }
    }

    /// Live map, or [`SceneError::NotReady`] before load or after the owner
    /// dropped it.
    pub fn upgrade(&self) -> SceneResult<Rc<RefCell<B>>> {
        match self {
            MapHandle::NotReady => Err(SceneError::NotReady),
            MapHandle::Ready(weak) => weak.upgrade().ok_or(SceneError::NotReady),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_ready_by_default() {
        let handle: MapHandle<u32> = MapHandle::default();
        assert!(!handle.is_ready());
        assert!(handle.upgrade().unwrap_err().is_not_ready());
    }

    #[test]
    fn ready_until_owner_drops_map() {
        let map = Rc::new(RefCell::new(7u32));
        let handle = MapHandle::ready(&map);
        assert!(handle.is_ready());
        assert_eq!(*handle.upgrade().unwrap().borrow(), 7);

        drop(map);
        assert!(!handle.is_ready());
        assert!(matches!(handle.upgrade(), Err(SceneError::NotReady)));
    }
}
