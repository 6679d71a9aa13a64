/// Pixel dimensions of media content as stored (or after orientation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Width over height, or `None` for an empty size.
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }
}

/// Target rectangle that rendered content must fit into.
///
/// Measured in layout units (fractional pixels), as reported by the
/// rendering layer for a grid cell or the viewer container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub width: f64,
    pub height: f64,
}

impl LayoutBox {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// A box is usable only when both sides are finite and strictly positive.
    /// Containers that have not been laid out yet report zero here.
    pub fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}
