//! Contain/cover scale solving.
//!
//! Always fed the logical (orientation-corrected) size. Solving against the
//! native size of quarter-turned content stretches it.

use std::fmt;

use super::size::{LayoutBox, Size};

/// How content is fitted into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitPolicy {
    /// Whole content visible, possibly leaving empty margin on one axis.
    /// Used by the single-image viewer.
    Contain,
    /// Box fully covered, possibly clipping content on one axis.
    /// Used by grid cells.
    Cover,
}

/// Scale and centering for one piece of content in one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSolution {
    pub scale: f64,
    /// Content is centered on both axes. Always true.
    pub centered: bool,
}

/// Geometry cannot be computed yet. Not an error: the caller retries when
/// the next measurement or box change arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotReady {
    /// The box has a zero, negative or non-finite side (container not laid out).
    EmptyBox,
    /// Content dimensions are unknown or zero.
    Unmeasured,
}

impl fmt::Display for NotReady {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBox => write!(f, "layout box has no usable size yet"),
            Self::Unmeasured => write!(f, "content size is not known yet"),
        }
    }
}

/// Solve the scale for `logical` content placed in `target` under `policy`.
pub fn solve(logical: Size, target: LayoutBox, policy: FitPolicy) -> Result<FitSolution, NotReady> {
    if !target.is_usable() {
        return Err(NotReady::EmptyBox);
    }
    if logical.is_empty() {
        return Err(NotReady::Unmeasured);
    }

    let scale_w = target.width / logical.width as f64;
    let scale_h = target.height / logical.height as f64;
    let scale = match policy {
        FitPolicy::Contain => scale_w.min(scale_h),
        FitPolicy::Cover => scale_w.max(scale_h),
    };

    Ok(FitSolution {
        scale,
        centered: true,
    })
}
