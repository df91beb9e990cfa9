//! The closed set of recordable path operations.

use crate::geometry::{CORNER_RADII_LEN, Direction, Matrix, PathPrimitive, PathRect, PrimitiveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One recorded path mutation.
///
/// Each variant carries exactly the arguments of the matching
/// [`PathPrimitive`] call. Relative variants keep their deltas as given;
/// they are resolved by the primitive at replay time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Action {
    MoveTo { x: f32, y: f32 },
    RMoveTo { dx: f32, dy: f32 },
    LineTo { x: f32, y: f32 },
    RLineTo { dx: f32, dy: f32 },
    QuadTo { x1: f32, y1: f32, x2: f32, y2: f32 },
    RQuadTo { dx1: f32, dy1: f32, dx2: f32, dy2: f32 },
    CubicTo { x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32 },
    RCubicTo { dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32 },
    ArcTo {
        oval: PathRect,
        start_angle: f32,
        sweep_angle: f32,
        force_move_to: bool,
    },
    AddArc {
        oval: PathRect,
        start_angle: f32,
        sweep_angle: f32,
    },
    AddCircle { x: f32, y: f32, radius: f32, dir: Direction },
    AddOval { oval: PathRect, dir: Direction },
    AddRect { rect: PathRect, dir: Direction },
    AddRoundedRect { rect: PathRect, rx: f32, ry: f32, dir: Direction },
    AddRoundedRectCorners {
        rect: PathRect,
        radii: [f32; CORNER_RADII_LEN],
        dir: Direction,
    },
    Offset { dx: f32, dy: f32 },
    MatrixTransformation { matrix: Matrix },
    Close,
    LastPoint { x: f32, y: f32 },
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::MoveTo { .. } => ActionKind::MoveTo,
            Action::RMoveTo { .. } => ActionKind::RMoveTo,
            Action::LineTo { .. } => ActionKind::LineTo,
            Action::RLineTo { .. } => ActionKind::RLineTo,
            Action::QuadTo { .. } => ActionKind::QuadTo,
            Action::RQuadTo { .. } => ActionKind::RQuadTo,
            Action::CubicTo { .. } => ActionKind::CubicTo,
            Action::RCubicTo { .. } => ActionKind::RCubicTo,
            Action::ArcTo { .. } => ActionKind::ArcTo,
            Action::AddArc { .. } => ActionKind::AddArc,
            Action::AddCircle { .. } => ActionKind::AddCircle,
            Action::AddOval { .. } => ActionKind::AddOval,
            Action::AddRect { .. } => ActionKind::AddRect,
            Action::AddRoundedRect { .. } => ActionKind::AddRoundedRect,
            Action::AddRoundedRectCorners { .. } => ActionKind::AddRoundedRectCorners,
            Action::Offset { .. } => ActionKind::Offset,
            Action::MatrixTransformation { .. } => ActionKind::MatrixTransformation,
            Action::Close => ActionKind::Close,
            Action::LastPoint { .. } => ActionKind::LastPoint,
        }
    }

    /// Drive `target` through the call this action records.
    pub fn apply<P: PathPrimitive + ?Sized>(&self, target: &mut P) -> PrimitiveResult {
        match *self {
            Action::MoveTo { x, y } => target.move_to(x, y),
            Action::RMoveTo { dx, dy } => target.r_move_to(dx, dy),
            Action::LineTo { x, y } => target.line_to(x, y),
            Action::RLineTo { dx, dy } => target.r_line_to(dx, dy),
            Action::QuadTo { x1, y1, x2, y2 } => target.quad_to(x1, y1, x2, y2),
            Action::RQuadTo { dx1, dy1, dx2, dy2 } => target.r_quad_to(dx1, dy1, dx2, dy2),
            Action::CubicTo { x1, y1, x2, y2, x3, y3 } => target.cubic_to(x1, y1, x2, y2, x3, y3),
            Action::RCubicTo { dx1, dy1, dx2, dy2, dx3, dy3 } => {
                target.r_cubic_to(dx1, dy1, dx2, dy2, dx3, dy3)
            }
            Action::ArcTo { oval, start_angle, sweep_angle, force_move_to } => {
                target.arc_to(oval, start_angle, sweep_angle, force_move_to)
            }
            Action::AddArc { oval, start_angle, sweep_angle } => {
                target.add_arc(oval, start_angle, sweep_angle)
            }
            Action::AddCircle { x, y, radius, dir } => target.add_circle(x, y, radius, dir),
            Action::AddOval { oval, dir } => target.add_oval(oval, dir),
            Action::AddRect { rect, dir } => target.add_rect(rect, dir),
            Action::AddRoundedRect { rect, rx, ry, dir } => target.add_round_rect(rect, rx, ry, dir),
            Action::AddRoundedRectCorners { rect, ref radii, dir } => {
                target.add_round_rect_corners(rect, radii, dir)
            }
            Action::Offset { dx, dy } => target.offset(dx, dy),
            Action::MatrixTransformation { ref matrix } => target.transform(matrix),
            Action::Close => target.close(),
            Action::LastPoint { x, y } => target.set_last_point(x, y),
        }
    }

    /// Whether every float in the payload is finite.
    pub fn is_finite(&self) -> bool {
        let mut finite = true;
        self.for_each_float(|v| finite &= v.is_finite());
        finite
    }

    /// Visit the float payload in its stable field order.
    pub(crate) fn for_each_float(&self, mut f: impl FnMut(f32)) {
        fn rect(r: &PathRect, f: &mut dyn FnMut(f32)) {
            f(r.left);
            f(r.top);
            f(r.right);
            f(r.bottom);
        }
        match self {
            Action::MoveTo { x, y }
            | Action::LineTo { x, y }
            | Action::LastPoint { x, y }
            | Action::RMoveTo { dx: x, dy: y }
            | Action::RLineTo { dx: x, dy: y }
            | Action::Offset { dx: x, dy: y } => {
                f(*x);
                f(*y);
            }
            Action::QuadTo { x1, y1, x2, y2 } | Action::RQuadTo { dx1: x1, dy1: y1, dx2: x2, dy2: y2 } => {
                [*x1, *y1, *x2, *y2].into_iter().for_each(&mut f);
            }
            Action::CubicTo { x1, y1, x2, y2, x3, y3 }
            | Action::RCubicTo { dx1: x1, dy1: y1, dx2: x2, dy2: y2, dx3: x3, dy3: y3 } => {
                [*x1, *y1, *x2, *y2, *x3, *y3].into_iter().for_each(&mut f);
            }
            Action::ArcTo { oval, start_angle, sweep_angle, .. }
            | Action::AddArc { oval, start_angle, sweep_angle } => {
                rect(oval, &mut f);
                f(*start_angle);
                f(*sweep_angle);
            }
            Action::AddCircle { x, y, radius, .. } => {
                [*x, *y, *radius].into_iter().for_each(&mut f);
            }
            Action::AddOval { oval: r, .. } | Action::AddRect { rect: r, .. } => rect(r, &mut f),
            Action::AddRoundedRect { rect: r, rx, ry, .. } => {
                rect(r, &mut f);
                f(*rx);
                f(*ry);
            }
            Action::AddRoundedRectCorners { rect: r, radii, .. } => {
                rect(r, &mut f);
                radii.iter().copied().for_each(&mut f);
            }
            Action::MatrixTransformation { matrix } => matrix.values.iter().copied().for_each(&mut f),
            Action::Close => {}
        }
    }
}

fn write_rect(f: &mut fmt::Formatter<'_>, r: &PathRect) -> fmt::Result {
    write!(f, "[{}, {}, {}, {}]", r.left, r.top, r.right, r.bottom)
}

fn dir_name(dir: Direction) -> &'static str {
    match dir {
        Direction::Cw => "CW",
        Direction::Ccw => "CCW",
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind().name())?;
        match self {
            Action::Close => Ok(()),
            Action::ArcTo { oval, start_angle, sweep_angle, force_move_to } => {
                f.write_str("(")?;
                write_rect(f, oval)?;
                write!(f, ", {start_angle}, {sweep_angle}, {force_move_to})")
            }
            Action::AddArc { oval, start_angle, sweep_angle } => {
                f.write_str("(")?;
                write_rect(f, oval)?;
                write!(f, ", {start_angle}, {sweep_angle})")
            }
            Action::AddCircle { x, y, radius, dir } => {
                write!(f, "({x}, {y}, {radius}, {})", dir_name(*dir))
            }
            Action::AddOval { oval: r, dir } | Action::AddRect { rect: r, dir } => {
                f.write_str("(")?;
                write_rect(f, r)?;
                write!(f, ", {})", dir_name(*dir))
            }
            Action::AddRoundedRect { rect, rx, ry, dir } => {
                f.write_str("(")?;
                write_rect(f, rect)?;
                write!(f, ", {rx}, {ry}, {})", dir_name(*dir))
            }
            Action::AddRoundedRectCorners { rect, radii, dir } => {
                f.write_str("(")?;
                write_rect(f, rect)?;
                write!(f, ", {radii:?}, {})", dir_name(*dir))
            }
            Action::MatrixTransformation { matrix } => write!(f, "({:?})", matrix.values),
            _ => {
                let mut first = true;
                f.write_str("(")?;
                let mut result = Ok(());
                self.for_each_float(|v| {
                    if result.is_ok() {
                        result = if first { write!(f, "{v}") } else { write!(f, ", {v}") };
                        first = false;
                    }
                });
                result?;
                f.write_str(")")
            }
        }
    }
}

/// Discriminant of an [`Action`], with a stable wire tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionKind {
    MoveTo = 0,
    RMoveTo = 1,
    LineTo = 2,
    RLineTo = 3,
    QuadTo = 4,
    RQuadTo = 5,
    CubicTo = 6,
    RCubicTo = 7,
    ArcTo = 8,
    AddArc = 9,
    AddCircle = 10,
    AddOval = 11,
    AddRect = 12,
    AddRoundedRect = 13,
    AddRoundedRectCorners = 14,
    Offset = 15,
    MatrixTransformation = 16,
    Close = 17,
    LastPoint = 18,
}

impl ActionKind {
    pub const ALL: [ActionKind; 19] = [
        ActionKind::MoveTo,
        ActionKind::RMoveTo,
        ActionKind::LineTo,
        ActionKind::RLineTo,
        ActionKind::QuadTo,
        ActionKind::RQuadTo,
        ActionKind::CubicTo,
        ActionKind::RCubicTo,
        ActionKind::ArcTo,
        ActionKind::AddArc,
        ActionKind::AddCircle,
        ActionKind::AddOval,
        ActionKind::AddRect,
        ActionKind::AddRoundedRect,
        ActionKind::AddRoundedRectCorners,
        ActionKind::Offset,
        ActionKind::MatrixTransformation,
        ActionKind::Close,
        ActionKind::LastPoint,
    ];

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn from_tag(tag: u8) -> Option<Self> {
        Self::ALL.get(usize::from(tag)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::MoveTo => "MoveTo",
            ActionKind::RMoveTo => "RMoveTo",
            ActionKind::LineTo => "LineTo",
            ActionKind::RLineTo => "RLineTo",
            ActionKind::QuadTo => "QuadTo",
            ActionKind::RQuadTo => "RQuadTo",
            ActionKind::CubicTo => "CubicTo",
            ActionKind::RCubicTo => "RCubicTo",
            ActionKind::ArcTo => "ArcTo",
            ActionKind::AddArc => "AddArc",
            ActionKind::AddCircle => "AddCircle",
            ActionKind::AddOval => "AddOval",
            ActionKind::AddRect => "AddRect",
            ActionKind::AddRoundedRect => "AddRoundedRect",
            ActionKind::AddRoundedRectCorners => "AddRoundedRectCorners",
            ActionKind::Offset => "Offset",
            ActionKind::MatrixTransformation => "MatrixTransformation",
            ActionKind::Close => "Close",
            ActionKind::LastPoint => "LastPoint",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_dense_and_stable() {
        for (i, kind) in ActionKind::ALL.iter().enumerate() {
            assert_eq!(usize::from(kind.tag()), i);
            assert_eq!(ActionKind::from_tag(kind.tag()), Some(*kind));
        }
        assert_eq!(ActionKind::from_tag(19), None);
        assert_eq!(ActionKind::from_tag(u8::MAX), None);
    }

    #[test]
    fn test_relative_and_absolute_differ_by_kind_only() {
        let abs = Action::LineTo { x: 1.0, y: 2.0 };
        let rel = Action::RLineTo { dx: 1.0, dy: 2.0 };
        assert_ne!(abs, rel);
        assert_eq!(abs.kind(), ActionKind::LineTo);
        assert_eq!(rel.kind(), ActionKind::RLineTo);
    }

    #[test]
    fn test_matrix_equality_is_numeric() {
        let a = Action::MatrixTransformation { matrix: Matrix::translate(3.0, 4.0) };
        let b = Action::MatrixTransformation { matrix: Matrix::translate(3.0, 4.0) };
        let c = Action::MatrixTransformation { matrix: Matrix::translate(3.0, 5.0) };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::MoveTo { x: 0.0, y: 0.0 }.to_string(), "MoveTo(0, 0)");
        assert_eq!(Action::RLineTo { dx: 1.5, dy: -2.0 }.to_string(), "RLineTo(1.5, -2)");
        assert_eq!(Action::Close.to_string(), "Close");
        let circle = Action::AddCircle { x: 5.0, y: 5.0, radius: 2.0, dir: Direction::Ccw };
        assert_eq!(circle.to_string(), "AddCircle(5, 5, 2, CCW)");
        let rect = Action::AddRect { rect: PathRect::new(0.0, 0.0, 4.0, 3.0), dir: Direction::Cw };
        assert_eq!(rect.to_string(), "AddRect([0, 0, 4, 3], CW)");
    }

    #[test]
    fn test_is_finite() {
        assert!(Action::CubicTo { x1: 0.0, y1: 1.0, x2: 2.0, y2: 3.0, x3: 4.0, y3: 5.0 }.is_finite());
        assert!(!Action::Offset { dx: f32::NAN, dy: 0.0 }.is_finite());
        let mut radii = [1.0; 8];
        radii[7] = f32::INFINITY;
        let corners = Action::AddRoundedRectCorners {
            rect: PathRect::new(0.0, 0.0, 10.0, 10.0),
            radii,
            dir: Direction::Cw,
        };
        assert!(!corners.is_finite());
        assert!(Action::Close.is_finite());
    }

    #[test]
    fn test_json_tagged_by_kind() {
        let json = serde_json::to_string(&Action::LineTo { x: 10.0, y: 10.0 }).unwrap();
        assert_eq!(json, r#"{"kind":"LineTo","x":10.0,"y":10.0}"#);
        let close = serde_json::to_string(&Action::Close).unwrap();
        assert_eq!(close, r#"{"kind":"Close"}"#);
    }
}
