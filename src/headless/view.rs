//! Map view with a one-shot "map loaded" event.

use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::CameraOptions;
use crate::headless::HeadlessMap;
use crate::style::StyleResult;

/// Shared handle to a live headless map. Single-threaded by construction.
pub type SharedMap = Rc<RefCell<HeadlessMap>>;

type LoadedObserver = Box<dyn FnMut(&SharedMap)>;

/// Owns the map and notifies observers once its style has loaded.
pub struct MapView {
    map: SharedMap,
    observers: Vec<LoadedObserver>,
    loaded: bool,
}

impl MapView {
    pub fn new(camera: CameraOptions) -> Self {
        Self {
            map: Rc::new(RefCell::new(HeadlessMap::new(camera))),
            observers: Vec::new(),
            loaded: false,
        }
    }

    pub fn map(&self) -> SharedMap {
        Rc::clone(&self.map)
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Register a callback for the load event.
    pub fn on_map_loaded<F>(&mut self, observer: F)
    where
        F: FnMut(&SharedMap) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Load a style. Observers fire after the first successful load only.
    pub fn load_style(&mut self, uri: &str) -> StyleResult<()> {
        self.map.borrow_mut().load_style(uri)?;
        if !self.loaded {
            self.loaded = true;
            self.emit_loaded();
        }
        Ok(())
    }

    /// Fire the load event again, as a renderer that reports a duplicate
    /// load would. The map borrow is released before observers run.
    pub fn emit_loaded(&mut self) {
        let map = Rc::clone(&self.map);
        for observer in self.observers.iter_mut() {
            observer(&map);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MapBackend;
    use crate::geo::LngLat;
    use std::cell::Cell;

    fn camera() -> CameraOptions {
        CameraOptions {
            center: LngLat::NULL_ISLAND,
            zoom: 12.0,
            pitch: 0.0,
            bearing: 186.0,
        }
    }

    #[test]
    fn load_event_fires_once() {
        let count = Rc::new(Cell::new(0));
        let mut view = MapView::new(camera());
        let c = Rc::clone(&count);
        view.on_map_loaded(move |map| {
            assert!(map.borrow().style_uri().is_some());
            c.set(c.get() + 1);
        });

        assert!(!view.is_loaded());
        view.load_style("mapbox://styles/mapbox/satellite-streets-v12")
            .unwrap();
        view.load_style("mapbox://styles/mapbox/satellite-streets-v12")
            .unwrap();
        assert!(view.is_loaded());
        assert_eq!(count.get(), 1);

        view.emit_loaded();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn observers_may_borrow_the_map_mutably() {
        let mut view = MapView::new(camera());
        view.on_map_loaded(|map| {
            let mut m = map.borrow_mut();
            m.load_style("mapbox://styles/mapbox/dark-v11").unwrap();
        });
        view.load_style("mapbox://styles/mapbox/satellite-streets-v12")
            .unwrap();
        assert_eq!(view.map().borrow().style().name, "dark-v11");
    }
}
