//! Grid sizing: per-item flex cells, row flow and cached row breaks.

pub mod flow;
pub mod layout_cache;
pub mod masonry;

pub use flow::{FlowLayout, RowBreak};
pub use layout_cache::{CachedFlowLayout, LayoutCache, DEFAULT_CACHE_ENTRIES};
pub use masonry::{FlexCell, MasonryPacker, FALLBACK_ASPECT_RATIO};
