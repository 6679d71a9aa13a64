//! Stateful drivers that turn measurement and box events into geometry.
//!
//! - `item` - One controller per presented item
//! - `engine` - Registry of controllers with generation-tagged handles
//! - `grid` - Cover-fitted grid cells in flex rows
//! - `detail` - Contain-fitted single-image viewer

pub mod detail;
pub mod engine;
pub mod grid;
pub mod item;

pub use detail::DetailView;
pub use engine::{ItemHandle, LayoutEngine, LayoutEvent};
pub use grid::GridView;
pub use item::{GeometryUpdate, ItemPhase, LayoutController};
