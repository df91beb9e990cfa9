//! Geometry value types and the native path primitive capability set.
//!
//! A [`PathPrimitive`] is the live, non-serializable geometry object a
//! [`Recorder`](crate::Recorder) drives. Anything that implements the trait can
//! be recorded onto or replayed into; [`KurboPath`](crate::KurboPath) is the
//! implementation shipped with this crate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An axis-aligned rectangle given by its four edges.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PathRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl PathRect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center_x(&self) -> f32 {
        (self.left + self.right) * 0.5
    }

    pub fn center_y(&self) -> f32 {
        (self.top + self.bottom) * 0.5
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.left.is_finite() && self.top.is_finite() && self.right.is_finite() && self.bottom.is_finite()
    }
}

impl From<PathRect> for kurbo::Rect {
    fn from(rect: PathRect) -> Self {
        kurbo::Rect::new(
            f64::from(rect.left),
            f64::from(rect.top),
            f64::from(rect.right),
            f64::from(rect.bottom),
        )
    }
}

/// Number of values in a [`Matrix`].
pub const MATRIX_LEN: usize = 9;

/// Number of values in a per-corner radii array (x/y pairs for the
/// top-left, top-right, bottom-right and bottom-left corners).
pub const CORNER_RADII_LEN: usize = 8;

/// A 3×3 transformation matrix stored row-major.
///
/// The layout is `[scale_x, skew_x, trans_x, skew_y, scale_y, trans_y,
/// persp_0, persp_1, persp_2]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Matrix {
    pub values: [f32; MATRIX_LEN],
}

impl Matrix {
    pub const SCALE_X: usize = 0;
    pub const SKEW_X: usize = 1;
    pub const TRANS_X: usize = 2;
    pub const SKEW_Y: usize = 3;
    pub const SCALE_Y: usize = 4;
    pub const TRANS_Y: usize = 5;
    pub const PERSP_0: usize = 6;
    pub const PERSP_1: usize = 7;
    pub const PERSP_2: usize = 8;

    pub const IDENTITY: Matrix = Matrix {
        values: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
    };

    pub fn new(values: [f32; MATRIX_LEN]) -> Self {
        Self { values }
    }

    pub fn translate(dx: f32, dy: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.values[Self::TRANS_X] = dx;
        m.values[Self::TRANS_Y] = dy;
        m
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        let mut m = Self::IDENTITY;
        m.values[Self::SCALE_X] = sx;
        m.values[Self::SCALE_Y] = sy;
        m
    }

    /// Whether the perspective row is `[0, 0, w]` with `w != 0`.
    pub fn is_affine(&self) -> bool {
        self.values[Self::PERSP_0] == 0.0
            && self.values[Self::PERSP_1] == 0.0
            && self.values[Self::PERSP_2] != 0.0
    }

    /// Convert to a kurbo affine, normalizing by the last entry.
    ///
    /// Returns `None` for perspective matrices.
    pub fn to_affine(&self) -> Option<kurbo::Affine> {
        if !self.is_affine() {
            return None;
        }
        let w = f64::from(self.values[Self::PERSP_2]);
        let v = |i: usize| f64::from(self.values[i]) / w;
        Some(kurbo::Affine::new([
            v(Self::SCALE_X),
            v(Self::SKEW_Y),
            v(Self::SKEW_X),
            v(Self::SCALE_Y),
            v(Self::TRANS_X),
            v(Self::TRANS_Y),
        ]))
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.values.iter().all(|v| v.is_finite())
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Winding direction for closed figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    /// Clockwise (in y-down coordinates).
    #[default]
    Cw,
    /// Counter-clockwise.
    Ccw,
}

impl Direction {
    pub(crate) fn to_byte(self) -> u8 {
        match self {
            Direction::Cw => 0,
            Direction::Ccw => 1,
        }
    }

    pub(crate) fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Direction::Cw),
            1 => Some(Direction::Ccw),
            _ => None,
        }
    }
}

/// Rule used to decide the interior of a closed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillType {
    /// Non-zero winding.
    #[default]
    Winding,
    EvenOdd,
    InverseWinding,
    InverseEvenOdd,
}

impl FillType {
    pub const ALL: [FillType; 4] = [
        FillType::Winding,
        FillType::EvenOdd,
        FillType::InverseWinding,
        FillType::InverseEvenOdd,
    ];

    /// Canonical name, as written by the codecs.
    pub fn name(self) -> &'static str {
        match self {
            FillType::Winding => "WINDING",
            FillType::EvenOdd => "EVEN_ODD",
            FillType::InverseWinding => "INVERSE_WINDING",
            FillType::InverseEvenOdd => "INVERSE_EVEN_ODD",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|fill| fill.name() == name)
    }

    pub fn is_inverse(self) -> bool {
        matches!(self, FillType::InverseWinding | FillType::InverseEvenOdd)
    }

    /// The base rule as a peniko fill. Inversion is reported by [`Self::is_inverse`].
    pub fn to_fill(self) -> peniko::Fill {
        match self {
            FillType::Winding | FillType::InverseWinding => peniko::Fill::NonZero,
            FillType::EvenOdd | FillType::InverseEvenOdd => peniko::Fill::EvenOdd,
        }
    }

    /// The SVG `fill-rule` value of the base rule.
    pub fn svg_rule(self) -> &'static str {
        match self {
            FillType::Winding | FillType::InverseWinding => "nonzero",
            FillType::EvenOdd | FillType::InverseEvenOdd => "evenodd",
        }
    }
}

impl fmt::Display for FillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FillType {
    type Err = UnknownFillType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| UnknownFillType(s.to_string()))
    }
}

/// A fill rule name that does not match any [`FillType`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown fill type: {0}")]
pub struct UnknownFillType(pub String);

/// Failure reported by a native primitive for a geometry call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    #[error("{op}: arguments must be finite")]
    NonFinite { op: &'static str },
    #[error("{op}: radius must not be negative")]
    NegativeRadius { op: &'static str },
    #[error("transform: perspective matrices are not supported")]
    Perspective,
    #[error("{op}: {message}")]
    Rejected { op: &'static str, message: String },
}

/// Result of a fallible primitive call.
pub type PrimitiveResult = Result<(), PrimitiveError>;

/// The capability set of a native 2-D path primitive.
///
/// Calls mirror the incremental path-building API of a typical 2-D graphics
/// library. A failing call must leave the primitive unchanged.
pub trait PathPrimitive {
    fn move_to(&mut self, x: f32, y: f32) -> PrimitiveResult;
    fn r_move_to(&mut self, dx: f32, dy: f32) -> PrimitiveResult;
    fn line_to(&mut self, x: f32, y: f32) -> PrimitiveResult;
    fn r_line_to(&mut self, dx: f32, dy: f32) -> PrimitiveResult;
    fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> PrimitiveResult;
    fn r_quad_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32) -> PrimitiveResult;
    fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> PrimitiveResult;
    fn r_cubic_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32) -> PrimitiveResult;

    /// Append an arc of the ellipse inscribed in `oval`. Angles are in degrees.
    fn arc_to(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32, force_move_to: bool) -> PrimitiveResult;

    /// Add an arc as a new contour.
    fn add_arc(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32) -> PrimitiveResult;

    fn add_circle(&mut self, x: f32, y: f32, radius: f32, dir: Direction) -> PrimitiveResult;
    fn add_oval(&mut self, oval: PathRect, dir: Direction) -> PrimitiveResult;
    fn add_rect(&mut self, rect: PathRect, dir: Direction) -> PrimitiveResult;
    fn add_round_rect(&mut self, rect: PathRect, rx: f32, ry: f32, dir: Direction) -> PrimitiveResult;

    /// Add a rounded rectangle with per-corner x/y radii.
    fn add_round_rect_corners(
        &mut self,
        rect: PathRect,
        radii: &[f32; CORNER_RADII_LEN],
        dir: Direction,
    ) -> PrimitiveResult;

    fn offset(&mut self, dx: f32, dy: f32) -> PrimitiveResult;
    fn transform(&mut self, matrix: &Matrix) -> PrimitiveResult;
    fn close(&mut self) -> PrimitiveResult;

    /// Replace the current point without adding a segment.
    fn set_last_point(&mut self, x: f32, y: f32) -> PrimitiveResult;

    /// Clear all geometry, releasing storage.
    fn reset(&mut self);

    /// Clear all geometry, keeping storage for reuse.
    fn rewind(&mut self);

    /// Hint that `extra_points` more points are coming.
    fn inc_reserve(&mut self, extra_points: usize);

    fn fill_type(&self) -> FillType;
    fn set_fill_type(&mut self, fill_type: FillType);
}
