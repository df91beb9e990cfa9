//! Recording wrapper around a native path primitive.
//!
//! Every supported call is issued to the primitive first and appended to the
//! log only if the primitive accepted it. Calls that would need another live
//! path as input are refused with [`JournalError::NotSupported`].

use crate::action::Action;
use crate::codec;
use crate::error::{JournalError, JournalResult};
use crate::geometry::{CORNER_RADII_LEN, Direction, FillType, Matrix, PathPrimitive, PathRect};
use crate::recorded::{DEFAULT_CAPACITY, RecordedPath};
use crate::replay::replay;
use bytes::Bytes;

/// A path builder that journals every mutation it forwards to `P`.
#[derive(Debug, Clone)]
pub struct Recorder<P> {
    primitive: P,
    actions: Vec<Action>,
}

impl<P: PathPrimitive> Recorder<P> {
    pub fn new(primitive: P) -> Self {
        Self::with_capacity(primitive, DEFAULT_CAPACITY)
    }

    /// Wrap `primitive` with a log pre-sized for `capacity` actions.
    ///
    /// The capacity is a hint; one that cannot be allocated is ignored.
    pub fn with_capacity(primitive: P, capacity: usize) -> Self {
        let mut rec = Self {
            primitive,
            actions: Vec::new(),
        };
        rec.reserve_log(capacity);
        rec
    }

    fn reserve_log(&mut self, additional: usize) {
        if let Err(e) = self.actions.try_reserve(additional) {
            log::debug!("ignoring capacity hint of {additional}: {e}");
        }
    }

    /// Replay `recorded` onto `primitive` and keep recording on top of it.
    pub fn restore(recorded: RecordedPath, mut primitive: P) -> JournalResult<Self> {
        replay(&recorded, &mut primitive)?;
        let (actions, _) = recorded.into_parts();
        log::debug!("restored recorder with {} actions", actions.len());
        Ok(Self { primitive, actions })
    }

    fn record(&mut self, action: Action) -> JournalResult<()> {
        action.apply(&mut self.primitive)?;
        log::trace!("recorded #{}: {}", self.actions.len(), action);
        self.actions.push(action);
        Ok(())
    }

    fn unsupported(&self, op: &'static str) -> JournalResult<()> {
        log::warn!("{op} cannot be recorded; log left at {} actions", self.actions.len());
        Err(JournalError::NotSupported(op))
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> JournalResult<()> {
        self.record(Action::MoveTo { x, y })
    }

    pub fn r_move_to(&mut self, dx: f32, dy: f32) -> JournalResult<()> {
        self.record(Action::RMoveTo { dx, dy })
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> JournalResult<()> {
        self.record(Action::LineTo { x, y })
    }

    pub fn r_line_to(&mut self, dx: f32, dy: f32) -> JournalResult<()> {
        self.record(Action::RLineTo { dx, dy })
    }

    pub fn quad_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> JournalResult<()> {
        self.record(Action::QuadTo { x1, y1, x2, y2 })
    }

    pub fn r_quad_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32) -> JournalResult<()> {
        self.record(Action::RQuadTo { dx1, dy1, dx2, dy2 })
    }

    pub fn cubic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x3: f32, y3: f32) -> JournalResult<()> {
        self.record(Action::CubicTo { x1, y1, x2, y2, x3, y3 })
    }

    pub fn r_cubic_to(&mut self, dx1: f32, dy1: f32, dx2: f32, dy2: f32, dx3: f32, dy3: f32) -> JournalResult<()> {
        self.record(Action::RCubicTo { dx1, dy1, dx2, dy2, dx3, dy3 })
    }

    pub fn arc_to(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32, force_move_to: bool) -> JournalResult<()> {
        self.record(Action::ArcTo { oval, start_angle, sweep_angle, force_move_to })
    }

    /// `arc_to` joining the arc to the current contour.
    pub fn arc_to_default(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32) -> JournalResult<()> {
        self.arc_to(oval, start_angle, sweep_angle, false)
    }

    pub fn add_arc(&mut self, oval: PathRect, start_angle: f32, sweep_angle: f32) -> JournalResult<()> {
        self.record(Action::AddArc { oval, start_angle, sweep_angle })
    }

    pub fn add_circle(&mut self, x: f32, y: f32, radius: f32, dir: Direction) -> JournalResult<()> {
        self.record(Action::AddCircle { x, y, radius, dir })
    }

    pub fn add_oval(&mut self, oval: PathRect, dir: Direction) -> JournalResult<()> {
        self.record(Action::AddOval { oval, dir })
    }

    pub fn add_rect(&mut self, rect: PathRect, dir: Direction) -> JournalResult<()> {
        self.record(Action::AddRect { rect, dir })
    }

    pub fn add_rect_ltrb(&mut self, left: f32, top: f32, right: f32, bottom: f32, dir: Direction) -> JournalResult<()> {
        self.add_rect(PathRect::new(left, top, right, bottom), dir)
    }

    pub fn add_round_rect(&mut self, rect: PathRect, rx: f32, ry: f32, dir: Direction) -> JournalResult<()> {
        self.record(Action::AddRoundedRect { rect, rx, ry, dir })
    }

    pub fn add_round_rect_corners(
        &mut self,
        rect: PathRect,
        radii: [f32; CORNER_RADII_LEN],
        dir: Direction,
    ) -> JournalResult<()> {
        self.record(Action::AddRoundedRectCorners { rect, radii, dir })
    }

    pub fn offset(&mut self, dx: f32, dy: f32) -> JournalResult<()> {
        self.record(Action::Offset { dx, dy })
    }

    pub fn transform(&mut self, matrix: Matrix) -> JournalResult<()> {
        self.record(Action::MatrixTransformation { matrix })
    }

    pub fn close(&mut self) -> JournalResult<()> {
        self.record(Action::Close)
    }

    pub fn set_last_point(&mut self, x: f32, y: f32) -> JournalResult<()> {
        self.record(Action::LastPoint { x, y })
    }

    pub fn add_path(&mut self, _src: &P) -> JournalResult<()> {
        self.unsupported("add_path")
    }

    pub fn add_path_offset(&mut self, _src: &P, _dx: f32, _dy: f32) -> JournalResult<()> {
        self.unsupported("add_path_offset")
    }

    pub fn add_path_transformed(&mut self, _src: &P, _matrix: &Matrix) -> JournalResult<()> {
        self.unsupported("add_path_transformed")
    }

    /// Replacing the whole path with another live one.
    pub fn set(&mut self, _src: &P) -> JournalResult<()> {
        self.unsupported("set")
    }

    pub fn offset_into(&mut self, _dx: f32, _dy: f32, _dst: &mut P) -> JournalResult<()> {
        self.unsupported("offset_into")
    }

    pub fn transform_into(&mut self, _matrix: &Matrix, _dst: &mut P) -> JournalResult<()> {
        self.unsupported("transform_into")
    }

    /// Clear the primitive and the log, releasing storage.
    pub fn reset(&mut self) {
        self.primitive.reset();
        self.actions = Vec::new();
        log::debug!("recorder reset");
    }

    /// Clear the primitive and the log, keeping storage.
    pub fn rewind(&mut self) {
        self.primitive.rewind();
        self.actions.clear();
        log::debug!("recorder rewound");
    }

    pub fn inc_reserve(&mut self, extra: usize) {
        self.primitive.inc_reserve(extra);
        self.reserve_log(extra);
    }

    pub fn fill_type(&self) -> FillType {
        self.primitive.fill_type()
    }

    pub fn set_fill_type(&mut self, fill_type: FillType) {
        self.primitive.set_fill_type(fill_type);
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The live geometry. Mutable access would let it drift from the log.
    pub fn primitive(&self) -> &P {
        &self.primitive
    }

    /// The journal as it stands, with the primitive's current fill rule.
    pub fn snapshot(&self) -> RecordedPath {
        RecordedPath::from_parts(self.actions.clone(), self.fill_type())
    }

    pub fn into_parts(self) -> (P, RecordedPath) {
        let fill_type = self.primitive.fill_type();
        (self.primitive, RecordedPath::from_parts(self.actions, fill_type))
    }

    /// Binary encoding of the journal.
    pub fn to_bytes(&self) -> Bytes {
        codec::encode_parts(&self.actions, self.fill_type())
    }
}

impl<P: PathPrimitive> PartialEq for Recorder<P> {
    fn eq(&self, other: &Self) -> bool {
        self.actions == other.actions && self.fill_type() == other.fill_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::kurbo_path::KurboPath;

    fn recorder() -> Recorder<KurboPath> {
        Recorder::new(KurboPath::new())
    }

    #[test]
    fn test_records_in_call_order() {
        let mut rec = recorder();
        rec.move_to(0.0, 0.0).unwrap();
        rec.r_line_to(5.0, 0.0).unwrap();
        rec.add_rect_ltrb(0.0, 0.0, 2.0, 2.0, Direction::Ccw).unwrap();
        rec.close().unwrap();

        let kinds: Vec<_> = rec.actions().iter().map(Action::kind).collect();
        assert_eq!(
            kinds,
            vec![ActionKind::MoveTo, ActionKind::RLineTo, ActionKind::AddRect, ActionKind::Close]
        );
        assert_eq!(
            rec.actions()[2],
            Action::AddRect { rect: PathRect::new(0.0, 0.0, 2.0, 2.0), dir: Direction::Ccw }
        );
    }

    #[test]
    fn test_arc_to_default_does_not_force_move() {
        let mut rec = recorder();
        let oval = PathRect::new(0.0, 0.0, 10.0, 10.0);
        rec.arc_to_default(oval, 0.0, 90.0).unwrap();
        assert_eq!(
            rec.actions(),
            &[Action::ArcTo { oval, start_angle: 0.0, sweep_angle: 90.0, force_move_to: false }]
        );
    }

    #[test]
    fn test_primitive_failure_is_not_logged() {
        let mut rec = recorder();
        rec.move_to(1.0, 1.0).unwrap();
        let before = rec.primitive().bez_path().clone();

        let err = rec.add_circle(0.0, 0.0, -3.0, Direction::Cw).unwrap_err();
        assert!(matches!(err, JournalError::NativePrimitiveFailure(_)));
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.primitive().bez_path(), &before);
    }

    #[test]
    fn test_unsupported_operations() {
        let mut rec = recorder();
        rec.move_to(1.0, 1.0).unwrap();
        let other = KurboPath::new();
        let mut dst = KurboPath::new();

        assert_eq!(rec.add_path(&other), Err(JournalError::NotSupported("add_path")));
        assert!(rec.add_path_offset(&other, 1.0, 1.0).is_err());
        assert!(rec.add_path_transformed(&other, &Matrix::IDENTITY).is_err());
        assert!(rec.set(&other).is_err());
        assert!(rec.offset_into(1.0, 1.0, &mut dst).is_err());
        assert!(rec.transform_into(&Matrix::IDENTITY, &mut dst).is_err());

        assert_eq!(rec.len(), 1);
        assert!(dst.is_empty());
    }

    #[test]
    fn test_reset_and_rewind_clear_log() {
        let mut rec = recorder();
        rec.move_to(1.0, 1.0).unwrap();
        rec.line_to(2.0, 2.0).unwrap();
        rec.rewind();
        assert!(rec.is_empty());
        assert!(rec.primitive().is_empty());

        rec.add_oval(PathRect::new(0.0, 0.0, 4.0, 4.0), Direction::Cw).unwrap();
        rec.reset();
        assert_eq!(rec.len(), 0);
        assert!(rec.primitive().is_empty());
    }

    #[test]
    fn test_fill_type_is_read_from_primitive() {
        let mut rec = recorder();
        rec.move_to(0.0, 0.0).unwrap();
        rec.set_fill_type(FillType::InverseEvenOdd);
        assert_eq!(rec.primitive().fill_type(), FillType::InverseEvenOdd);
        assert_eq!(rec.snapshot().fill_type(), FillType::InverseEvenOdd);
        // Fill rule changes are not journaled.
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn test_inc_reserve_is_not_recorded() {
        let mut rec = recorder();
        rec.inc_reserve(64);
        assert!(rec.is_empty());
        assert_eq!(rec, recorder());
    }

    #[test]
    fn test_huge_capacity_hints_are_ignored() {
        let mut rec = recorder();
        rec.move_to(0.0, 0.0).unwrap();
        let before = rec.primitive().bez_path().clone();

        rec.inc_reserve(usize::MAX / 2);
        rec.inc_reserve(usize::MAX);
        assert_eq!(rec.actions(), &[Action::MoveTo { x: 0.0, y: 0.0 }]);
        assert_eq!(rec.primitive().bez_path(), &before);

        let mut sized = Recorder::with_capacity(KurboPath::new(), usize::MAX / 2);
        assert!(sized.is_empty());
        sized.close().unwrap();
        assert_eq!(sized.len(), 1);
    }

    #[test]
    fn test_to_bytes_matches_snapshot_encoding() {
        let mut rec = recorder();
        rec.move_to(0.0, 0.0).unwrap();
        rec.transform(Matrix::translate(3.0, 4.0)).unwrap();
        assert_eq!(rec.to_bytes(), codec::encode(&rec.snapshot()));
    }

    #[test]
    fn test_restore_continues_recording() {
        let mut rec = recorder();
        rec.move_to(1.0, 1.0).unwrap();
        rec.line_to(4.0, 5.0).unwrap();
        rec.set_fill_type(FillType::EvenOdd);
        let recorded = codec::decode(&rec.to_bytes()).unwrap();

        let mut restored = Recorder::restore(recorded, KurboPath::new()).unwrap();
        assert_eq!(restored, rec);
        assert_eq!(restored.primitive().bez_path(), rec.primitive().bez_path());

        restored.close().unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored.fill_type(), FillType::EvenOdd);
    }

    #[test]
    fn test_restore_reports_failing_index() {
        let recorded: RecordedPath = [
            Action::MoveTo { x: 0.0, y: 0.0 },
            Action::AddCircle { x: 0.0, y: 0.0, radius: -1.0, dir: Direction::Cw },
        ]
        .into_iter()
        .collect();
        let err = Recorder::restore(recorded, KurboPath::new()).unwrap_err();
        assert!(matches!(err, JournalError::Replay { index: 1, .. }));
    }

    #[test]
    fn test_into_parts() {
        let mut rec = recorder();
        rec.add_circle(5.0, 5.0, 2.0, Direction::Cw).unwrap();
        let (path, recorded) = rec.into_parts();
        assert!(!path.is_empty());
        assert_eq!(recorded.kinds(), vec![ActionKind::AddCircle]);
        assert_eq!(recorded.fill_type(), FillType::Winding);
    }
}
