use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use super::engine::{ItemHandle, LayoutEngine};
use super::item::GeometryUpdate;
use crate::config::LayoutConfig;
use crate::geometry::{FitPolicy, LayoutBox, NotReady, Size};
use crate::layout::CachedFlowLayout;
use crate::models::{MediaItem, RowModel};

/// Grid presentation: cover-fitted cells in fixed-height flex rows.
pub struct GridView {
    engine: LayoutEngine,
    flow: CachedFlowLayout,
    items: Vec<MediaItem>,
    index: HashMap<PathBuf, usize>,
    viewport_width: f64,
    rows: Vec<RowModel>,
    /// Last box handed to each item's controller.
    pushed: HashMap<PathBuf, LayoutBox>,
}

impl GridView {
    pub fn new(flow: CachedFlowLayout) -> Self {
        Self {
            engine: LayoutEngine::new(),
            flow,
            items: Vec::new(),
            index: HashMap::new(),
            viewport_width: 0.0,
            rows: Vec::new(),
            pushed: HashMap::new(),
        }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(CachedFlowLayout::new(config.flow_layout(), config.cache_entries))
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&Path, &GeometryUpdate) + 'static) {
        self.engine.subscribe(listener);
    }

    /// Replace the presented collection.
    ///
    /// Items that stay (same identity and orientation) keep their controller
    /// and measurement; removed items are discarded so late events for them
    /// are dropped. Returns the live handle of every presented item, in order.
    pub fn present(&mut self, items: Vec<MediaItem>) -> Vec<ItemHandle> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut incoming = Vec::with_capacity(items.len());
        for item in items {
            if seen.insert(item.path.clone()) {
                incoming.push(item);
            } else {
                tracing::warn!(path = %item.path.display(), "Duplicate item in grid, keeping first");
            }
        }

        let wanted: HashMap<&Path, &MediaItem> =
            incoming.iter().map(|i| (i.path.as_path(), i)).collect();
        self.engine.retain(|key, controller| {
            wanted
                .get(key)
                .is_some_and(|item| item.orientation == controller.orientation())
        });
        let engine = &self.engine;
        self.pushed.retain(|key, _| engine.handle(key).is_some());

        let mut handles = Vec::with_capacity(incoming.len());
        let mut registered = 0usize;
        for item in &mut incoming {
            let handle = match self.engine.handle(&item.path) {
                Some(handle) => handle,
                None => {
                    registered += 1;
                    self.engine
                        .register(item.path.clone(), item.orientation, FitPolicy::Cover)
                }
            };

            // Keep a measurement the controller already has.
            if let Some(native) = self.engine.controller(&item.path).and_then(|c| c.native_size()) {
                item.set_native_size(native);
            }
            handles.push(handle);
        }

        self.index = incoming
            .iter()
            .enumerate()
            .map(|(idx, item)| (item.path.clone(), idx))
            .collect();
        self.items = incoming;

        for (item, handle) in self.items.iter().zip(&handles) {
            if let Some(native) = item.native_size {
                self.engine.on_measured(handle, native);
            }
        }

        tracing::debug!(
            items = self.items.len(),
            registered,
            "Presented grid items"
        );
        self.relayout();
        handles
    }

    /// Native size for one item arrived. Stale handles are ignored.
    pub fn on_measured(&mut self, handle: &ItemHandle, native: Size) -> Option<GeometryUpdate> {
        if !self.engine.is_live(handle) {
            tracing::trace!(path = %handle.key.display(), "Ignoring measurement for removed item");
            return None;
        }
        if native.is_empty() {
            tracing::trace!(path = %handle.key.display(), ?native, "Empty measurement, keeping fallback ratio");
            return Some(GeometryUpdate::NotReady(NotReady::Unmeasured));
        }
        if let Some(&idx) = self.index.get(&handle.key) {
            self.items[idx].set_native_size(native);
        }

        let update = self.engine.on_measured(handle, native)?;
        // The item's ratio replaced the fallback, so its row may reflow.
        self.relayout();
        Some(match self.engine.geometry(&handle.key) {
            Some(geometry) => GeometryUpdate::Ready(*geometry),
            None => update,
        })
    }

    /// Returns the number of items whose box changed.
    pub fn on_viewport_resized(&mut self, width: f64) -> usize {
        self.viewport_width = width;
        self.relayout()
    }

    fn relayout(&mut self) -> usize {
        self.rows = self.flow.compute(&self.items, self.viewport_width);

        let mut changed = 0usize;
        for cell in self.rows.iter().flat_map(|row| &row.items) {
            let target = cell.layout_box();
            if self.pushed.get(&cell.media_path) == Some(&target) {
                continue;
            }
            let Some(handle) = self.engine.handle(&cell.media_path) else {
                continue;
            };
            self.engine.on_box_changed(&handle, target);
            self.pushed.insert(cell.media_path.clone(), target);
            changed += 1;
        }

        tracing::trace!(
            rows = self.rows.len(),
            changed,
            width = self.viewport_width,
            "Grid relayout"
        );
        changed
    }

    pub fn rows(&self) -> &[RowModel] {
        &self.rows
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn total_height(&self, row_gap: f64) -> f64 {
        self.flow.layout.total_height(&self.rows, row_gap)
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }
}

impl Default for GridView {
    fn default() -> Self {
        Self::new(CachedFlowLayout::default())
    }
}
