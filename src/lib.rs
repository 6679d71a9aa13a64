//! Adaptive media layout and fit engine.
//!
//! Turns per-item measurements (native size, EXIF orientation) and box
//! changes into render geometry: a cover-fitted justified grid and a
//! contain-fitted single-image viewer.
//!
//! - `geometry` - Orientation transforms, fit solving, render geometry
//! - `layout` - Masonry cells, row flow and the row-break cache
//! - `controller` - Per-item controllers, the engine, grid and viewer views
//! - `scanner` - Folder listing and measuring for the command-line driver
//! - `config` - Layout tunables

pub mod cli;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod layout;
pub mod models;
pub mod scanner;

pub use config::{ConfigError, LayoutConfig};
pub use controller::{DetailView, GeometryUpdate, GridView, ItemHandle, LayoutEngine, LayoutEvent};
pub use geometry::{FitPolicy, LayoutBox, NotReady, Orientation, RenderGeometry, Size};
pub use models::{MediaItem, MediaType};
