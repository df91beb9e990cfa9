//! A [`PathPrimitive`] backed by [`kurbo::BezPath`].
//!
//! Coordinates are y-down and angles are degrees measured clockwise from the
//! positive x axis. Arcs, circles and ovals are approximated with cubic
//! Béziers at [`ARC_TOLERANCE`].

use crate::geometry::{
    CORNER_RADII_LEN, Direction, FillType, Matrix, PathPrimitive, PathRect, PrimitiveError, PrimitiveResult,
};
use kurbo::{Affine, Arc, BezPath, PathEl, Point, Rect, Shape, Vec2};
use std::f64::consts::TAU;

/// Accuracy used when approximating arcs with cubic Béziers.
pub const ARC_TOLERANCE: f64 = 0.1;

/// A native path built on kurbo.
#[derive(Debug, Clone, Default)]
pub struct KurboPath {
    path: BezPath,
    fill_type: FillType,
    /// Start of the most recent contour; relative calls after `close` resolve against it.
    contour_start: Point,
    current: Point,
    open: bool,
}

fn pt(x: f32, y: f32) -> Point {
    Point::new(f64::from(x), f64::from(y))
}

fn finite(op: &'static str, values: &[f32]) -> PrimitiveResult {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(PrimitiveError::NonFinite { op })
    }
}

fn finite_rect(op: &'static str, rect: &PathRect, rest: &[f32]) -> PrimitiveResult {
    if rect.is_finite() {
        finite(op, rest)
    } else {
        Err(PrimitiveError::NonFinite { op })
    }
}

fn arc_point(center: Point, radii: Vec2, angle: f64) -> Point {
    center + Vec2::new(radii.x * angle.cos(), radii.y * angle.sin())
}

impl KurboPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bez_path(&self) -> &BezPath {
        &self.path
    }

    pub fn into_bez_path(self) -> BezPath {
        self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.elements().is_empty()
    }

    /// The point the next relative call is measured from.
    pub fn current_point(&self) -> Point {
        self.current
    }

    /// The fill rule as a peniko fill. See [`FillType::to_fill`].
    pub fn fill(&self) -> peniko::Fill {
        self.fill_type.to_fill()
    }

    pub fn bounds(&self) -> Rect {
        self.path.bounding_box()
    }

    /// SVG path data for the current geometry.
    pub fn to_svg(&self) -> String {
        self.path.to_svg()
    }

    fn start_contour(&mut self, p: Point) {
        self.path.move_to(p);
        self.contour_start = p;
        self.current = p;
        self.open = true;
    }

    /// Drawing with no open contour starts one at the last contour start.
    fn ensure_contour(&mut self) {
        if !self.open {
            self.start_contour(self.contour_start);
        }
    }

    fn close_contour(&mut self) {
        self.path.close_path();
        self.open = false;
        self.current = self.contour_start;
    }

    fn push_arc(&mut self, center: Point, radii: Vec2, start: f64, sweep: f64) {
        let arc = Arc {
            center,
            radii,
            start_angle: start,
            sweep_angle: sweep,
            x_rotation: 0.0,
        };
        for el in arc.append_iter(ARC_TOLERANCE) {
            self.path.push(el);
        }
    }

    fn arc(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32, force_move_to: bool) {
        let rect = Rect::from(oval).abs();
        let center = rect.center();
        let radii = Vec2::new(rect.width() / 2.0, rect.height() / 2.0);
        let start = f64::from(start_angle).to_radians();
        // Never more than one full turn.
        let sweep = f64::from(sweep_angle.clamp(-360.0, 360.0)).to_radians();

        let from = arc_point(center, radii, start);
        if force_move_to || !self.open {
            self.start_contour(from);
        } else if from != self.current {
            self.path.line_to(from);
        }
        if sweep != 0.0 {
            self.push_arc(center, radii, start, sweep);
        }
        self.current = arc_point(center, radii, start + sweep);
    }

    fn ellipse(&mut self, center: Point, radii: Vec2, dir: Direction) {
        let sweep = match dir {
            Direction::Cw => TAU,
            Direction::Ccw => -TAU,
        };
        self.start_contour(arc_point(center, radii, 0.0));
        self.push_arc(center, radii, 0.0, sweep);
        self.close_contour();
    }

    fn round_rect(&mut self, rect: PathRect, radii: &[f32; CORNER_RADII_LEN], dir: Direction) {
        let r = Rect::from(rect).abs();
        let (half_w, half_h) = (r.width() / 2.0, r.height() / 2.0);
        let corner = |i: usize| {
            Vec2::new(
                f64::from(radii[2 * i]).min(half_w),
                f64::from(radii[2 * i + 1]).min(half_h),
            )
        };
        let (tl, tr, br, bl) = (corner(0), corner(1), corner(2), corner(3));
        let c_tl = Point::new(r.x0 + tl.x, r.y0 + tl.y);
        let c_tr = Point::new(r.x1 - tr.x, r.y0 + tr.y);
        let c_br = Point::new(r.x1 - br.x, r.y1 - br.y);
        let c_bl = Point::new(r.x0 + bl.x, r.y1 - bl.y);

        // (corner center, corner radii, arc start in degrees), in drawing order.
        let (corners, sweep) = match dir {
            Direction::Cw => ([(c_tr, tr, -90.0), (c_br, br, 0.0), (c_bl, bl, 90.0), (c_tl, tl, 180.0)], 90.0f64),
            Direction::Ccw => ([(c_tl, tl, -90.0), (c_bl, bl, 180.0), (c_br, br, 90.0), (c_tr, tr, 0.0)], -90.0f64),
        };

        let start = Point::new(r.x0 + tl.x, r.y0);
        self.start_contour(start);
        let mut last = start;
        for (center, radii, start_deg) in corners {
            let angle = f64::to_radians(start_deg);
            let from = arc_point(center, radii, angle);
            if from.distance(last) > 1e-9 {
                self.path.line_to(from);
            }
            last = from;
            if radii.x > 0.0 && radii.y > 0.0 {
                let sweep = sweep.to_radians();
                self.push_arc(center, radii, angle, sweep);
                last = arc_point(center, radii, angle + sweep);
            }
        }
        self.close_contour();
    }
}

impl From<KurboPath> for BezPath {
    fn from(path: KurboPath) -> Self {
        path.path
    }
}

impl PathPrimitive for KurboPath {
    fn move_to(&mut self, x: f32, y: f32) -> PrimitiveResult {
        finite("move_to", &[x, y])?;
        self.start_contour(pt(x, y));
        Ok(())
    }

    fn r_move_to(&mut self, dx: f32, dy: f32) -> PrimitiveResult {
        finite("r_move_to", &[dx, dy])?;
        self.start_contour(self.current + pt(dx, dy).to_vec2());
        Ok(())
    }

    fn line_to(&mut self, x: f32, y: f32) -> PrimitiveResult {
        finite("line_to", &[x, y])?;
        self.ensure_contour();
        let p = pt(x, y);
        self.path.line_to(p);
        self.current = p;
        Ok(())
    }

    fn r_line_to(&mut self, dx: f32, dy: f32) -> PrimitiveResult {
        finite("r_line_to", &[dx, dy])?;
        self.ensure_contour();
        let p = self.current + pt(dx, dy).to_vec2();
        self.path.line_to(p);
        self.current = p;
        Ok(())
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> PrimitiveResult {
        finite("quad_to", &[x1, y1, x2, y2])?;
        self.ensure_contour();
        let p = pt(x2, y2);
        self.path.quad_to(pt(x1, y1), p);
        self.current = p;
        Ok(())
    }

    fn r_quad_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32) -> PrimitiveResult {
        finite("r_quad_to", &[dx1, dy1, dx2, dy2])?;
        self.ensure_contour();
        let base = self.current;
        let p = base + pt(dx2, dy2).to_vec2();
        self.path.quad_to(base + pt(dx1, dy1).to_vec2(), p);
        self.current = p;
        Ok(())
    }

    fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> PrimitiveResult {
        finite("cubic_to", &[x1, y1, x2, y2, x3, y3])?;
        self.ensure_contour();
        let p = pt(x3, y3);
        self.path.curve_to(pt(x1, y1), pt(x2, y2), p);
        self.current = p;
        Ok(())
    }

    fn r_cubic_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32) -> PrimitiveResult {
        finite("r_cubic_to", &[dx1, dy1, dx2, dy2, dx3, dy3])?;
        self.ensure_contour();
        let base = self.current;
        let p = base + pt(dx3, dy3).to_vec2();
        self.path
            .curve_to(base + pt(dx1, dy1).to_vec2(), base + pt(dx2, dy2).to_vec2(), p);
        self.current = p;
        Ok(())
    }

    fn arc_to(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32, force_move_to: bool) -> PrimitiveResult {
        finite_rect("arc_to", &oval, &[start_angle, sweep_angle])?;
        self.arc(oval, start_angle, sweep_angle, force_move_to);
        Ok(())
    }

    fn add_arc(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32) -> PrimitiveResult {
        finite_rect("add_arc", &oval, &[start_angle, sweep_angle])?;
        if sweep_angle.abs() >= 360.0 {
            let dir = if sweep_angle > 0.0 { Direction::Cw } else { Direction::Ccw };
            return self.add_oval(oval, dir);
        }
        self.arc(oval, start_angle, sweep_angle, true);
        Ok(())
    }

    fn add_circle(&mut self, x: f32, y: f32, radius: f32, dir: Direction) -> PrimitiveResult {
        finite("add_circle", &[x, y, radius])?;
        if radius < 0.0 {
            return Err(PrimitiveError::NegativeRadius { op: "add_circle" });
        }
        if radius > 0.0 {
            let r = f64::from(radius);
            self.ellipse(pt(x, y), Vec2::new(r, r), dir);
        }
        Ok(())
    }

    fn add_oval(&mut self, oval: PathRect, dir: Direction) -> PrimitiveResult {
        finite_rect("add_oval", &oval, &[])?;
        let rect = Rect::from(oval).abs();
        self.ellipse(rect.center(), Vec2::new(rect.width() / 2.0, rect.height() / 2.0), dir);
        Ok(())
    }

    fn add_rect(&mut self, rect: PathRect, dir: Direction) -> PrimitiveResult {
        finite_rect("add_rect", &rect, &[])?;
        let PathRect { left, top, right, bottom } = rect;
        self.start_contour(pt(left, top));
        let rest = match dir {
            Direction::Cw => [pt(right, top), pt(right, bottom), pt(left, bottom)],
            Direction::Ccw => [pt(left, bottom), pt(right, bottom), pt(right, top)],
        };
        for p in rest {
            self.path.line_to(p);
        }
        self.close_contour();
        Ok(())
    }

    fn add_round_rect(&mut self, rect: PathRect, rx: f32, ry: f32, dir: Direction) -> PrimitiveResult {
        finite_rect("add_round_rect", &rect, &[rx, ry])?;
        if rx < 0.0 || ry < 0.0 {
            return Err(PrimitiveError::NegativeRadius { op: "add_round_rect" });
        }
        self.round_rect(rect, &[rx, ry, rx, ry, rx, ry, rx, ry], dir);
        Ok(())
    }

    fn add_round_rect_corners(
        &mut self,
        rect: PathRect,
        radii: &[f32; CORNER_RADII_LEN],
        dir: Direction,
    ) -> PrimitiveResult {
        finite_rect("add_round_rect_corners", &rect, radii)?;
        if radii.iter().any(|r| *r < 0.0) {
            return Err(PrimitiveError::NegativeRadius { op: "add_round_rect_corners" });
        }
        self.round_rect(rect, radii, dir);
        Ok(())
    }

    fn offset(&mut self, dx: f32, dy: f32) -> PrimitiveResult {
        finite("offset", &[dx, dy])?;
        let v = pt(dx, dy).to_vec2();
        self.path.apply_affine(Affine::translate(v));
        self.contour_start = self.contour_start + v;
        self.current = self.current + v;
        Ok(())
    }

    fn transform(&mut self, matrix: &Matrix) -> PrimitiveResult {
        if !matrix.is_finite() {
            return Err(PrimitiveError::NonFinite { op: "transform" });
        }
        let affine = matrix.to_affine().ok_or(PrimitiveError::Perspective)?;
        self.path.apply_affine(affine);
        self.contour_start = affine * self.contour_start;
        self.current = affine * self.current;
        Ok(())
    }

    fn close(&mut self) -> PrimitiveResult {
        if self.open {
            self.close_contour();
        }
        Ok(())
    }

    fn set_last_point(&mut self, x: f32, y: f32) -> PrimitiveResult {
        finite("set_last_point", &[x, y])?;
        let p = pt(x, y);
        if self.is_empty() {
            self.start_contour(p);
            return Ok(());
        }

        for el in self.path.elements_mut().iter_mut().rev() {
            match el {
                PathEl::MoveTo(last) => {
                    *last = p;
                    if self.open {
                        self.contour_start = p;
                    }
                    break;
                }
                PathEl::LineTo(last) | PathEl::QuadTo(_, last) | PathEl::CurveTo(_, _, last) => {
                    *last = p;
                    break;
                }
                PathEl::ClosePath => {}
            }
        }
        if self.open {
            self.current = p;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.path = BezPath::new();
        self.contour_start = Point::ZERO;
        self.current = Point::ZERO;
        self.open = false;
    }

    fn rewind(&mut self) {
        self.path.truncate(0);
        self.contour_start = Point::ZERO;
        self.current = Point::ZERO;
        self.open = false;
    }

    fn inc_reserve(&mut self, extra_points: usize) {
        // kurbo paths only take a capacity up front. Hints that cannot be
        // allocated are dropped.
        if self.is_empty() {
            let mut elements = Vec::new();
            if elements.try_reserve(extra_points).is_ok() {
                self.path = BezPath::from_vec(elements);
            }
        }
    }

    fn fill_type(&self) -> FillType {
        self.fill_type
    }

    fn set_fill_type(&mut self, fill_type: FillType) {
        self.fill_type = fill_type;
    }
}
