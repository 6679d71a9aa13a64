/// Aspect ratio used for items whose ratio is unknown or degenerate (3:2 landscape).
pub const FALLBACK_ASPECT_RATIO: f64 = 1.5;

/// Flex sizing for one grid cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexCell {
    /// Flexible-grow weight; equal to the effective aspect ratio.
    pub grow: f64,
    /// Preferred width at the row height, floored to whole pixels.
    pub basis_width: f64,
}

/// Per-item flex sizing at a fixed row height.
///
/// Cells are independent: each depends only on its own aspect ratio and the
/// shared row height, so one item's ratio arriving never forces a recompute of
/// the others. Row composition is left to a flex-wrap container (see
/// [`FlowLayout`](super::FlowLayout) for renderers without one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MasonryPacker {
    pub row_height: f64,
    pub fallback_ratio: f64,
}

impl Default for MasonryPacker {
    fn default() -> Self {
        Self {
            row_height: 220.0,
            fallback_ratio: FALLBACK_ASPECT_RATIO,
        }
    }
}

impl MasonryPacker {
    pub fn new(row_height: f64) -> Self {
        Self {
            row_height,
            ..Self::default()
        }
    }

    /// Ratio actually used for packing: the item's own when usable, the
    /// fallback otherwise.
    pub fn effective_ratio(&self, aspect_ratio: Option<f64>) -> f64 {
        match aspect_ratio {
            Some(ar) if ar.is_finite() && ar > 0.0 => ar,
            _ => self.fallback_ratio,
        }
    }

    pub fn cell(&self, aspect_ratio: Option<f64>) -> FlexCell {
        let ratio = self.effective_ratio(aspect_ratio);
        FlexCell {
            grow: ratio,
            basis_width: (self.row_height * ratio).floor(),
        }
    }

    /// Order-preserving batch form of [`cell`](Self::cell).
    pub fn pack<I>(&self, aspect_ratios: I) -> Vec<FlexCell>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        aspect_ratios.into_iter().map(|ar| self.cell(ar)).collect()
    }
}
