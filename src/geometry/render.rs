use super::fit::{solve, FitPolicy, NotReady};
use super::orientation::{Mirror, Orientation, Transform};
use super::size::{LayoutBox, Size};

/// Render geometry published for one item.
///
/// A pure function of `(content, orientation, frame, policy)`. Holding on to
/// it is only a render-side cache; recomputing from the same inputs yields a
/// bit-identical value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderGeometry {
    pub scale: f64,
    pub orientation: Orientation,
    /// Content is centered in the frame. Always true.
    pub translate_center: bool,
    /// Native content size the transform applies to.
    pub content: Size,
    /// Box the content was fitted into.
    pub frame: LayoutBox,
    pub policy: FitPolicy,
}

/// 2D affine matrix in CSS `matrix(a, b, c, d, e, f)` layout:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

impl RenderGeometry {
    /// Fit `content` (native pixels) into `frame`, correcting for `orientation`.
    pub fn compute(
        content: Size,
        orientation: Orientation,
        frame: LayoutBox,
        policy: FitPolicy,
    ) -> Result<Self, NotReady> {
        let logical = orientation.logical_size(content);
        let fit = solve(logical, frame, policy)?;
        Ok(Self {
            scale: fit.scale,
            orientation,
            translate_center: fit.centered,
            content,
            frame,
            policy,
        })
    }

    pub fn transform(&self) -> Transform {
        self.orientation.transform()
    }

    /// On-screen size of the oriented, scaled content. May exceed the frame
    /// under `Cover`; the renderer clips the overflow.
    pub fn rendered_size(&self) -> (f64, f64) {
        let logical = self.orientation.logical_size(self.content);
        (
            logical.width as f64 * self.scale,
            logical.height as f64 * self.scale,
        )
    }

    /// Full transform from native content pixels to frame coordinates:
    /// move the content midpoint to the origin, mirror/rotate, scale, then
    /// translate to the frame center.
    pub fn affine(&self) -> Affine {
        let [a, b, c, d] = self.transform().linear().map(f64::from);
        let s = self.scale;
        let half_w = self.content.width as f64 / 2.0;
        let half_h = self.content.height as f64 / 2.0;
        Affine {
            a: s * a,
            b: s * b,
            c: s * c,
            d: s * d,
            e: self.frame.width / 2.0 - s * (a * half_w + c * half_h),
            f: self.frame.height / 2.0 - s * (b * half_w + d * half_h),
        }
    }

    /// CSS transform list for an element of native size positioned at the
    /// frame's midpoint (`left: 50%; top: 50%`) with a centered origin.
    pub fn css_transform(&self) -> String {
        let t = self.transform();
        let mut css = format!("translate(-50%, -50%) scale({})", self.scale);
        match t.mirror {
            Mirror::None => {}
            Mirror::Horizontal => css.push_str(" scaleX(-1)"),
            Mirror::Vertical => css.push_str(" scaleY(-1)"),
        }
        if t.rotation.degrees() != 0 {
            css.push_str(&format!(" rotate({}deg)", t.rotation.degrees()));
        }
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(g: &RenderGeometry) -> (f64, f64, f64, f64) {
        let m = g.affine();
        let w = g.content.width as f64;
        let h = g.content.height as f64;
        let corners = [m.apply(0.0, 0.0), m.apply(w, 0.0), m.apply(0.0, h), m.apply(w, h)];
        let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        (min_x, min_y, max_x, max_y)
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_rotated_contain_lands_inside_frame() {
        let g = RenderGeometry::compute(
            Size::new(4000, 3000),
            Orientation::Rotate90,
            LayoutBox::new(800.0, 800.0),
            FitPolicy::Contain,
        )
        .unwrap();
        assert_eq!(g.scale, 0.2);
        let (min_x, min_y, max_x, max_y) = bounds(&g);
        assert!(close(min_x, 100.0) && close(max_x, 700.0));
        assert!(close(min_y, 0.0) && close(max_y, 800.0));
        // Top-left stored pixel ends up top-right after a clockwise quarter turn.
        let (x, y) = g.affine().apply(0.0, 0.0);
        assert!(close(x, 700.0) && close(y, 0.0));
    }

    #[test]
    fn test_cover_overflows_symmetrically() {
        let g = RenderGeometry::compute(
            Size::new(3000, 2000),
            Orientation::Normal,
            LayoutBox::new(220.0, 220.0),
            FitPolicy::Cover,
        )
        .unwrap();
        let (min_x, min_y, max_x, max_y) = bounds(&g);
        assert!(close(min_y, 0.0) && close(max_y, 220.0));
        assert!(close(min_x, -(max_x - 220.0)));
        assert!(close(g.rendered_size().1, 220.0));
    }

    #[test]
    fn test_every_orientation_centers_content() {
        let frame = LayoutBox::new(640.0, 480.0);
        for o in Orientation::ALL {
            let g = RenderGeometry::compute(Size::new(4000, 3000), o, frame, FitPolicy::Contain).unwrap();
            let (min_x, min_y, max_x, max_y) = bounds(&g);
            assert!(close((min_x + max_x) / 2.0, 320.0), "{o:?}");
            assert!(close((min_y + max_y) / 2.0, 240.0), "{o:?}");
            let (w, h) = g.rendered_size();
            assert!(close(max_x - min_x, w) && close(max_y - min_y, h), "{o:?}");
        }
    }

    #[test]
    fn test_transpose_and_transverse_corners() {
        let frame = LayoutBox::new(30.0, 40.0);
        let native = Size::new(40, 30);
        let transpose =
            RenderGeometry::compute(native, Orientation::Transpose, frame, FitPolicy::Contain).unwrap();
        // Transpose keeps the top-left pixel at the top-left.
        let (x, y) = transpose.affine().apply(0.0, 0.0);
        assert!(close(x, 0.0) && close(y, 0.0));

        let transverse =
            RenderGeometry::compute(native, Orientation::Transverse, frame, FitPolicy::Contain).unwrap();
        // Transverse sends it to the bottom-right.
        let (x, y) = transverse.affine().apply(0.0, 0.0);
        assert!(close(x, 30.0) && close(y, 40.0));
    }

    #[test]
    fn test_css_transform() {
        let g = RenderGeometry::compute(
            Size::new(4000, 3000),
            Orientation::Transpose,
            LayoutBox::new(800.0, 800.0),
            FitPolicy::Contain,
        )
        .unwrap();
        assert_eq!(g.css_transform(), "translate(-50%, -50%) scale(0.2) scaleX(-1) rotate(90deg)");

        let plain = RenderGeometry::compute(
            Size::new(1000, 1000),
            Orientation::Normal,
            LayoutBox::new(500.0, 500.0),
            FitPolicy::Cover,
        )
        .unwrap();
        assert_eq!(plain.css_transform(), "translate(-50%, -50%) scale(0.5)");
    }

    #[test]
    fn test_compute_is_pure() {
        let args = (
            Size::new(6000, 4000),
            Orientation::Transverse,
            LayoutBox::new(1366.5, 701.25),
            FitPolicy::Contain,
        );
        let a = RenderGeometry::compute(args.0, args.1, args.2, args.3).unwrap();
        let b = RenderGeometry::compute(args.0, args.1, args.2, args.3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.scale.to_bits(), b.scale.to_bits());
        assert_eq!(a.affine(), b.affine());
    }
}
