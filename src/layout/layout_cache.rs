use crate::layout::flow::{FlowLayout, RowBreak};
use crate::models::{MediaItem, RowModel};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::Instant;
use xxhash_rust::xxh3::xxh3_64;

/// Default number of cached layouts kept in memory.
pub const DEFAULT_CACHE_ENTRIES: usize = 8;

/// Key for the layout cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct CacheKey {
    width_px: u32,
    /// Row height, gap and last-row policy folded together.
    layout_hash: u64,
    list_hash: u64,
}

#[derive(Debug, Clone)]
struct CachedLayout {
    breaks: Vec<RowBreak>,
    /// Number of items this layout was computed for
    item_count: usize,
    /// When this entry was last used (for LRU eviction)
    last_used: Instant,
}

/// Layout cache for storing and retrieving row breaks.
///
/// Entries are keyed by (whole-pixel viewport width, layout parameters, list
/// hash). The list hash covers each item's identity and the aspect ratio the
/// packer actually uses for it, so an item getting measured invalidates the
/// entry while unrelated resizes of other grids do not.
pub struct LayoutCache {
    cache: RwLock<HashMap<CacheKey, CachedLayout>>,
    capacity: usize,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_ENTRIES)
    }

    /// A capacity of zero disables caching.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: RwLock::new(HashMap::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Viewport width rounded to whole pixels, used only as the cache key.
    /// Sub-pixel differences resolve to the same line breaks in practice but
    /// not in general, so no coarser bucketing is done.
    pub fn width_key(viewport_width: f64) -> u32 {
        viewport_width.round().clamp(0.0, u32::MAX as f64) as u32
    }

    fn layout_hash(layout: &FlowLayout) -> u64 {
        let mut input = Vec::with_capacity(25);
        input.extend_from_slice(&layout.packer.row_height.to_bits().to_le_bytes());
        input.extend_from_slice(&layout.packer.fallback_ratio.to_bits().to_le_bytes());
        input.extend_from_slice(&layout.gap.to_bits().to_le_bytes());
        input.push(layout.justify_last_row as u8);
        xxh3_64(&input)
    }

    /// Fast hash of the item list in order: path bytes plus the effective
    /// aspect ratio of each item.
    pub fn compute_list_hash(items: &[MediaItem], layout: &FlowLayout) -> u64 {
        let mut hasher_input = Vec::with_capacity(items.len() * 64);

        for item in items {
            hasher_input.extend_from_slice(item.path.as_os_str().as_encoded_bytes());
            // Separator so ("ab", "c") and ("a", "bc") differ
            hasher_input.push(0);
            let ratio = layout.packer.effective_ratio(item.aspect_ratio());
            hasher_input.extend_from_slice(&ratio.to_bits().to_le_bytes());
        }

        xxh3_64(&hasher_input)
    }

    fn key(items: &[MediaItem], layout: &FlowLayout, viewport_width: f64) -> CacheKey {
        CacheKey {
            width_px: Self::width_key(viewport_width),
            layout_hash: Self::layout_hash(layout),
            list_hash: Self::compute_list_hash(items, layout),
        }
    }

    /// Attempts to retrieve cached rows, reconstructing them from breaks.
    /// Returns None on cache miss.
    pub fn get(
        &self,
        items: &[MediaItem],
        layout: &FlowLayout,
        viewport_width: f64,
    ) -> Option<Vec<RowModel>> {
        let key = Self::key(items, layout, viewport_width);

        let breaks = {
            let mut cache = self.cache.write();
            let entry = cache.get_mut(&key)?;
            if entry.item_count != items.len() {
                return None;
            }
            entry.last_used = Instant::now();
            entry.breaks.clone()
        };

        Some(layout.rows_from_breaks(items, &breaks, viewport_width))
    }

    /// Stores row breaks for `items` laid out at `viewport_width`.
    pub fn set(
        &self,
        items: &[MediaItem],
        layout: &FlowLayout,
        viewport_width: f64,
        breaks: Vec<RowBreak>,
    ) {
        if self.capacity == 0 {
            return;
        }

        let key = Self::key(items, layout, viewport_width);
        let entry = CachedLayout {
            breaks,
            item_count: items.len(),
            last_used: Instant::now(),
        };

        let mut cache = self.cache.write();

        if cache.len() >= self.capacity && !cache.contains_key(&key) {
            Self::evict_oldest(&mut cache);
        }

        cache.insert(key, entry);
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }

    /// Evicts the least recently used entry from the cache.
    fn evict_oldest(cache: &mut HashMap<CacheKey, CachedLayout>) {
        let oldest_key = cache
            .iter()
            .min_by_key(|(_, v)| v.last_used)
            .map(|(k, _)| k.clone());

        if let Some(key) = oldest_key {
            cache.remove(&key);
        }
    }
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Flow layout with automatic cache management.
pub struct CachedFlowLayout {
    pub layout: FlowLayout,
    pub cache: LayoutCache,
}

impl CachedFlowLayout {
    pub fn new(layout: FlowLayout, cache_entries: usize) -> Self {
        Self {
            layout,
            cache: LayoutCache::with_capacity(cache_entries),
        }
    }

    /// Computes the layout, using cached breaks if available.
    ///
    /// Breaks are shared by widths that round to the same pixel; the rows
    /// themselves are always sized for the exact `viewport_width`.
    pub fn compute(&self, items: &[MediaItem], viewport_width: f64) -> Vec<RowModel> {
        if items.is_empty() || !(viewport_width > 0.0) {
            return Vec::new();
        }

        if let Some(rows) = self.cache.get(items, &self.layout, viewport_width) {
            tracing::trace!(items = items.len(), viewport_width, "layout cache hit");
            return rows;
        }

        let breaks = self.layout.compute_breaks(items, viewport_width);
        let rows = self.layout.rows_from_breaks(items, &breaks, viewport_width);
        tracing::debug!(
            items = items.len(),
            viewport_width,
            rows = rows.len(),
            "computed flow layout"
        );

        self.cache.set(items, &self.layout, viewport_width, breaks);
        rows
    }

    /// Invalidates the cache, forcing recomputation on next call.
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

impl Default for CachedFlowLayout {
    fn default() -> Self {
        Self::new(FlowLayout::default(), DEFAULT_CACHE_ENTRIES)
    }
}
