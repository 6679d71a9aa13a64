use std::path::{Path, PathBuf};

use crate::geometry::{FitPolicy, LayoutBox, NotReady, Orientation, RenderGeometry, Size};

/// Lifecycle of one presented item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemPhase {
    /// Native size not known yet.
    Pending,
    /// Native size known, no geometry produced yet.
    Measured,
    /// Geometry computed at least once.
    Geometrized,
}

/// Result of one geometry pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryUpdate {
    Ready(RenderGeometry),
    /// The pass ran but had nothing usable to work with. Prior geometry, if
    /// any, stays published.
    NotReady(NotReady),
}

impl GeometryUpdate {
    pub fn geometry(&self) -> Option<&RenderGeometry> {
        match self {
            Self::Ready(g) => Some(g),
            Self::NotReady(_) => None,
        }
    }
}

/// Per-item driver that reacts to the two asynchronous inputs (measurement,
/// box changes) and re-runs the fit whenever both are available.
///
/// Order of events does not matter: a box that arrives first is remembered
/// until the measurement lands.
#[derive(Debug, Clone)]
pub struct LayoutController {
    key: PathBuf,
    orientation: Orientation,
    policy: FitPolicy,
    native: Option<Size>,
    target: Option<LayoutBox>,
    geometry: Option<RenderGeometry>,
    phase: ItemPhase,
}

impl LayoutController {
    pub fn new(key: PathBuf, orientation: Orientation, policy: FitPolicy) -> Self {
        Self {
            key,
            orientation,
            policy,
            native: None,
            target: None,
            geometry: None,
            phase: ItemPhase::Pending,
        }
    }

    pub fn key(&self) -> &Path {
        &self.key
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    pub fn phase(&self) -> ItemPhase {
        self.phase
    }

    pub fn native_size(&self) -> Option<Size> {
        self.native
    }

    pub fn current_box(&self) -> Option<LayoutBox> {
        self.target
    }

    /// Last successfully computed geometry.
    pub fn geometry(&self) -> Option<&RenderGeometry> {
        self.geometry.as_ref()
    }

    /// Native dimensions arrived. Only the first non-empty measurement counts;
    /// a zero-sized report (decode not finished, failed load) is not recorded.
    pub fn on_measured(&mut self, native: Size) -> Option<GeometryUpdate> {
        if let Some(existing) = self.native {
            if existing != native {
                tracing::debug!(
                    path = %self.key.display(),
                    existing = ?existing,
                    ignored = ?native,
                    "Ignoring second measurement"
                );
            }
            return None;
        }
        if native.is_empty() {
            tracing::trace!(path = %self.key.display(), ?native, "Empty measurement, still pending");
            return Some(GeometryUpdate::NotReady(NotReady::Unmeasured));
        }

        self.native = Some(native);
        self.phase = ItemPhase::Measured;
        tracing::trace!(path = %self.key.display(), ?native, "Item measured");
        Some(self.geometry_pass())
    }

    /// The item's box changed. Before measurement the box is only recorded.
    pub fn on_box_changed(&mut self, target: LayoutBox) -> Option<GeometryUpdate> {
        self.target = Some(target);
        if self.native.is_none() {
            return None;
        }
        Some(self.geometry_pass())
    }

    fn geometry_pass(&mut self) -> GeometryUpdate {
        let Some(native) = self.native else {
            return GeometryUpdate::NotReady(NotReady::Unmeasured);
        };
        let Some(target) = self.target else {
            return GeometryUpdate::NotReady(NotReady::EmptyBox);
        };

        match RenderGeometry::compute(native, self.orientation, target, self.policy) {
            Ok(geometry) => {
                self.geometry = Some(geometry);
                self.phase = ItemPhase::Geometrized;
                tracing::trace!(
                    path = %self.key.display(),
                    scale = geometry.scale,
                    "Geometry updated"
                );
                GeometryUpdate::Ready(geometry)
            }
            Err(reason) => {
                tracing::trace!(path = %self.key.display(), %reason, "Geometry not ready");
                GeometryUpdate::NotReady(reason)
            }
        }
    }
}
