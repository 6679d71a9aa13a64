use std::path::Path;

use super::engine::{ItemHandle, LayoutEngine};
use super::item::GeometryUpdate;
use crate::geometry::{FitPolicy, LayoutBox, RenderGeometry, Size};
use crate::models::MediaItem;

/// Single-image viewer: the shown item is contain-fitted into the container.
///
/// Switching to a sibling discards the previous item, so a decode that
/// finishes after the switch cannot overwrite the new item's geometry.
pub struct DetailView {
    engine: LayoutEngine,
    current: Option<ItemHandle>,
    container: Option<LayoutBox>,
}

impl DetailView {
    pub fn new() -> Self {
        Self {
            engine: LayoutEngine::new(),
            current: None,
            container: None,
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Path, &GeometryUpdate) + 'static) {
        self.engine.subscribe(listener);
    }

    pub fn show(&mut self, item: &MediaItem) -> ItemHandle {
        if let Some(previous) = self.current.take() {
            self.engine.discard(&previous);
        }

        let handle = self
            .engine
            .register(item.path.clone(), item.orientation, FitPolicy::Contain);
        tracing::debug!(path = %item.path.display(), orientation = item.orientation.to_exif(), "Showing item");

        if let Some(container) = self.container {
            self.engine.on_box_changed(&handle, container);
        }
        if let Some(native) = item.native_size {
            self.engine.on_measured(&handle, native);
        }

        self.current = Some(handle.clone());
        handle
    }

    pub fn on_measured(&mut self, handle: &ItemHandle, native: Size) -> Option<GeometryUpdate> {
        self.engine.on_measured(handle, native)
    }

    pub fn on_container_resized(&mut self, container: LayoutBox) -> Option<GeometryUpdate> {
        self.container = Some(container);
        let handle = self.current.clone()?;
        self.engine.on_box_changed(&handle, container)
    }

    pub fn close(&mut self) {
        if let Some(handle) = self.current.take() {
            self.engine.discard(&handle);
        }
    }

    pub fn current(&self) -> Option<&ItemHandle> {
        self.current.as_ref()
    }

    pub fn geometry(&self) -> Option<&RenderGeometry> {
        let handle = self.current.as_ref()?;
        self.engine.geometry(&handle.key)
    }
}

impl Default for DetailView {
    fn default() -> Self {
        Self::new()
    }
}
