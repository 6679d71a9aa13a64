//! Pure geometry for orienting and fitting media content.
//!
//! - `orientation` - EXIF orientation codes, mirror/rotation transforms, logical sizes
//! - `fit` - Contain/cover scale solving
//! - `render` - The published per-item render geometry

pub mod fit;
pub mod orientation;
pub mod render;
pub mod size;

pub use fit::*;
pub use orientation::*;
pub use render::*;
pub use size::*;
