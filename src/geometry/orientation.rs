//! Orientation codes and the mirror/rotation transforms they describe.
//!
//! Camera metadata stores an orientation code (1-8) telling how stored pixels
//! must be turned to appear upright. Any code outside 1-8 is treated as 1.
//!
//! ```text
//!     code  mirror      rotation (clockwise)
//!     1     none        0
//!     2     horizontal  0
//!     3     none        180
//!     4     vertical    0
//!     5     horizontal  90     (transpose)
//!     6     none        90
//!     7     horizontal  270    (transverse)
//!     8     none        270
//! ```
//!
//! In transform-list order the mirror is written before the rotation, the same
//! as the CSS list `scaleX(-1) rotate(90deg)`. As a point mapping this means the
//! rotation acts on the content first and the mirror is applied in display
//! space afterwards.

use super::size::Size;

/// Axis mirroring applied as part of an orientation transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mirror {
    #[default]
    None,
    /// Flip left-right.
    Horizontal,
    /// Flip top-bottom.
    Vertical,
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Exact (cos, sin) pair for the angle. Kept integral so every consumer
    /// derives bit-identical matrices.
    pub fn cos_sin(self) -> (i8, i8) {
        match self {
            Self::Deg0 => (1, 0),
            Self::Deg90 => (0, 1),
            Self::Deg180 => (-1, 0),
            Self::Deg270 => (0, -1),
        }
    }

    /// Quarter turns swap the content's width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Composed mirror + rotation for one orientation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Transform {
    pub mirror: Mirror,
    pub rotation: Rotation,
}

impl Transform {
    /// Linear part `(a, b, c, d)` of the transform in y-down screen space,
    /// mapping `(x, y)` to `(a*x + c*y, b*x + d*y)`.
    ///
    /// Equal to `Mirror * Rotation`: the point is rotated, then mirrored.
    pub fn linear(self) -> [i8; 4] {
        let (cos, sin) = self.rotation.cos_sin();
        match self.mirror {
            Mirror::None => [cos, sin, -sin, cos],
            Mirror::Horizontal => [-cos, sin, sin, cos],
            Mirror::Vertical => [cos, -sin, -sin, -cos],
        }
    }
}

/// One of the eight orientation codes, normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Orientation {
    /// Code 1.
    #[default]
    Normal,
    /// Code 2.
    FlipHorizontal,
    /// Code 3.
    Rotate180,
    /// Code 4.
    FlipVertical,
    /// Code 5.
    Transpose,
    /// Code 6.
    Rotate90,
    /// Code 7.
    Transverse,
    /// Code 8.
    Rotate270,
}

impl Orientation {
    pub const ALL: [Self; 8] = [
        Self::Normal,
        Self::FlipHorizontal,
        Self::Rotate180,
        Self::FlipVertical,
        Self::Transpose,
        Self::Rotate90,
        Self::Transverse,
        Self::Rotate270,
    ];

    /// Normalize an integer tag. Anything outside 1-8 becomes `Normal`.
    pub fn from_exif(value: i64) -> Self {
        if (1..=8).contains(&value) {
            Self::ALL[(value - 1) as usize]
        } else {
            Self::Normal
        }
    }

    /// Normalize an optional tag; a missing tag is `Normal`.
    pub fn from_optional(value: Option<i64>) -> Self {
        value.map(Self::from_exif).unwrap_or_default()
    }

    /// Normalize a numeric value that may not be integral (e.g. from JSON).
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 {
            Self::from_exif(value as i64)
        } else {
            Self::Normal
        }
    }

    /// Normalize textual metadata such as `"6"`; non-numeric text is `Normal`.
    pub fn parse(text: &str) -> Self {
        text.trim()
            .parse::<i64>()
            .map(Self::from_exif)
            .unwrap_or_default()
    }

    pub fn to_exif(self) -> u8 {
        match self {
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
        }
    }

    pub fn transform(self) -> Transform {
        let (mirror, rotation) = match self {
            Self::Normal => (Mirror::None, Rotation::Deg0),
            Self::FlipHorizontal => (Mirror::Horizontal, Rotation::Deg0),
            Self::Rotate180 => (Mirror::None, Rotation::Deg180),
            Self::FlipVertical => (Mirror::Vertical, Rotation::Deg0),
            Self::Transpose => (Mirror::Horizontal, Rotation::Deg90),
            Self::Rotate90 => (Mirror::None, Rotation::Deg90),
            Self::Transverse => (Mirror::Horizontal, Rotation::Deg270),
            Self::Rotate270 => (Mirror::None, Rotation::Deg270),
        };
        Transform { mirror, rotation }
    }

    pub fn is_identity(self) -> bool {
        self == Self::Normal
    }

    /// Codes 5-8 carry a quarter-turn and swap width/height.
    pub fn swaps_axes(self) -> bool {
        self.transform().rotation.swaps_axes()
    }

    /// Size the content visually occupies once the orientation is applied.
    pub fn logical_size(self, native: Size) -> Size {
        if self.swaps_axes() {
            Size::new(native.height, native.width)
        } else {
            native
        }
    }
}
