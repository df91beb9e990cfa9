//! Binary journal encoding.
//!
//! # Layout
//!
//! All integers and floats are little-endian.
//!
//! ```text
//! magic     4 bytes  "PLOG"
//! version   u8       1
//! count     u32      number of actions
//! actions   count × { tag: u8, payload }
//! fill      u32 byte length, then the UTF-8 fill type name
//! ```
//!
//! Payloads are fixed per kind. Floats are `f32`; `bool` and `Direction` are
//! one byte each (0 or 1). Corner radii and matrices are written as a `u32`
//! length followed by that many floats; the length must be 8 and 9
//! respectively.

use crate::action::{Action, ActionKind};
use crate::error::DecodeError;
use crate::geometry::{CORNER_RADII_LEN, Direction, FillType, MATRIX_LEN, Matrix, PathRect};
use crate::recorded::RecordedPath;
use bytes::{Buf, BufMut, Bytes, BytesMut};

/// Leading bytes of every binary journal.
pub const MAGIC: &[u8; 4] = b"PLOG";

/// Current binary format version.
pub const FORMAT_VERSION: u8 = 1;

const HEADER_LEN: usize = MAGIC.len() + 1 + 4;

/// Encode a journal. Encoding the same journal twice yields identical bytes.
pub fn encode(recorded: &RecordedPath) -> Bytes {
    encode_parts(recorded.actions(), recorded.fill_type())
}

/// Encode an action list and fill rule without building a [`RecordedPath`].
pub fn encode_parts(actions: &[Action], fill_type: FillType) -> Bytes {
    let name = fill_type.name().as_bytes();
    let mut buf = BytesMut::with_capacity(HEADER_LEN + actions.len() * 17 + 4 + name.len());

    buf.put_slice(MAGIC);
    buf.put_u8(FORMAT_VERSION);
    buf.put_u32_le(len_u32(actions.len()));
    for action in actions {
        put_action(&mut buf, action);
    }
    buf.put_u32_le(len_u32(name.len()));
    buf.put_slice(name);

    buf.freeze()
}

/// Decode a journal produced by [`encode`].
pub fn decode(bytes: &[u8]) -> Result<RecordedPath, DecodeError> {
    let mut reader = Reader { buf: bytes };

    if reader.take(MAGIC.len())? != MAGIC {
        return Err(DecodeError::InvalidMagic);
    }
    let version = reader.u8()?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }

    let count = reader.u32()? as usize;
    // Every action takes at least its tag byte.
    let mut actions = Vec::with_capacity(count.min(reader.buf.remaining()));
    for _ in 0..count {
        actions.push(reader.action()?);
    }

    let name_len = reader.u32()? as usize;
    let name = std::str::from_utf8(reader.take(name_len)?).map_err(|_| DecodeError::InvalidString)?;
    let fill_type = FillType::from_name(name).ok_or_else(|| DecodeError::UnknownFillType(name.to_string()))?;

    if reader.buf.has_remaining() {
        return Err(DecodeError::TrailingBytes(reader.buf.remaining()));
    }

    Ok(RecordedPath::from_parts(actions, fill_type))
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn put_rect(buf: &mut BytesMut, rect: &PathRect) {
    buf.put_f32_le(rect.left);
    buf.put_f32_le(rect.top);
    buf.put_f32_le(rect.right);
    buf.put_f32_le(rect.bottom);
}

fn put_floats(buf: &mut BytesMut, values: &[f32]) {
    for v in values {
        buf.put_f32_le(*v);
    }
}

fn put_array(buf: &mut BytesMut, values: &[f32]) {
    buf.put_u32_le(len_u32(values.len()));
    put_floats(buf, values);
}

fn put_action(buf: &mut BytesMut, action: &Action) {
    buf.put_u8(action.kind().tag());
    match action {
        Action::MoveTo { x, y } | Action::LineTo { x, y } | Action::LastPoint { x, y } => {
            put_floats(buf, &[*x, *y]);
        }
        Action::RMoveTo { dx, dy } | Action::RLineTo { dx, dy } | Action::Offset { dx, dy } => {
            put_floats(buf, &[*dx, *dy]);
        }
        Action::QuadTo { x1, y1, x2, y2 } => put_floats(buf, &[*x1, *y1, *x2, *y2]),
        Action::RQuadTo { dx1, dy1, dx2, dy2 } => put_floats(buf, &[*dx1, *dy1, *dx2, *dy2]),
        Action::CubicTo { x1, y1, x2, y2, x3, y3 } => put_floats(buf, &[*x1, *y1, *x2, *y2, *x3, *y3]),
        Action::RCubicTo { dx1, dy1, dx2, dy2, dx3, dy3 } => {
            put_floats(buf, &[*dx1, *dy1, *dx2, *dy2, *dx3, *dy3]);
        }
        Action::ArcTo { oval, start_angle, sweep_angle, force_move_to } => {
            put_rect(buf, oval);
            put_floats(buf, &[*start_angle, *sweep_angle]);
            buf.put_u8(u8::from(*force_move_to));
        }
        Action::AddArc { oval, start_angle, sweep_angle } => {
            put_rect(buf, oval);
            put_floats(buf, &[*start_angle, *sweep_angle]);
        }
        Action::AddCircle { x, y, radius, dir } => {
            put_floats(buf, &[*x, *y, *radius]);
            buf.put_u8(dir.to_byte());
        }
        Action::AddOval { oval: rect, dir } | Action::AddRect { rect, dir } => {
            put_rect(buf, rect);
            buf.put_u8(dir.to_byte());
        }
        Action::AddRoundedRect { rect, rx, ry, dir } => {
            put_rect(buf, rect);
            put_floats(buf, &[*rx, *ry]);
            buf.put_u8(dir.to_byte());
        }
        Action::AddRoundedRectCorners { rect, radii, dir } => {
            put_rect(buf, rect);
            put_array(buf, radii);
            buf.put_u8(dir.to_byte());
        }
        Action::MatrixTransformation { matrix } => put_array(buf, &matrix.values),
        Action::Close => {}
    }
}

/// Bounds-checked cursor over the encoded bytes.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    fn need(&self, n: usize) -> Result<(), DecodeError> {
        if self.buf.remaining() < n {
            return Err(DecodeError::UnexpectedEnd);
        }
        Ok(())
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_u32_le())
    }

    fn f32(&mut self) -> Result<f32, DecodeError> {
        self.need(4)?;
        Ok(self.buf.get_f32_le())
    }

    fn floats<const N: usize>(&mut self) -> Result<[f32; N], DecodeError> {
        let mut out = [0.0; N];
        for v in &mut out {
            *v = self.f32()?;
        }
        Ok(out)
    }

    fn array<const N: usize>(&mut self, kind: ActionKind) -> Result<[f32; N], DecodeError> {
        let found = self.u32()? as usize;
        if found != N {
            return Err(DecodeError::ArrayLength { kind, expected: N, found });
        }
        self.floats()
    }

    fn rect(&mut self) -> Result<PathRect, DecodeError> {
        let [left, top, right, bottom]: [f32; 4] = self.floats()?;
        Ok(PathRect { left, top, right, bottom })
    }

    fn bool(&mut self) -> Result<bool, DecodeError> {
        match self.u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(DecodeError::InvalidBool(other)),
        }
    }

    fn direction(&mut self) -> Result<Direction, DecodeError> {
        let byte = self.u8()?;
        Direction::from_byte(byte).ok_or(DecodeError::InvalidDirection(byte))
    }

    fn action(&mut self) -> Result<Action, DecodeError> {
        let tag = self.u8()?;
        let kind = ActionKind::from_tag(tag).ok_or(DecodeError::UnknownKind(tag))?;

        let action = match kind {
            ActionKind::MoveTo => {
                let [x, y]: [f32; 2] = self.floats()?;
                Action::MoveTo { x, y }
            }
            ActionKind::RMoveTo => {
                let [dx, dy]: [f32; 2] = self.floats()?;
                Action::RMoveTo { dx, dy }
            }
            ActionKind::LineTo => {
                let [x, y]: [f32; 2] = self.floats()?;
                Action::LineTo { x, y }
            }
            ActionKind::RLineTo => {
                let [dx, dy]: [f32; 2] = self.floats()?;
                Action::RLineTo { dx, dy }
            }
            ActionKind::QuadTo => {
                let [x1, y1, x2, y2]: [f32; 4] = self.floats()?;
                Action::QuadTo { x1, y1, x2, y2 }
            }
            ActionKind::RQuadTo => {
                let [dx1, dy1, dx2, dy2]: [f32; 4] = self.floats()?;
                Action::RQuadTo { dx1, dy1, dx2, dy2 }
            }
            ActionKind::CubicTo => {
                let [x1, y1, x2, y2, x3, y3]: [f32; 6] = self.floats()?;
                Action::CubicTo { x1, y1, x2, y2, x3, y3 }
            }
            ActionKind::RCubicTo => {
                let [dx1, dy1, dx2, dy2, dx3, dy3]: [f32; 6] = self.floats()?;
                Action::RCubicTo { dx1, dy1, dx2, dy2, dx3, dy3 }
            }
            ActionKind::ArcTo => {
                let oval = self.rect()?;
                let [start_angle, sweep_angle]: [f32; 2] = self.floats()?;
                let force_move_to = self.bool()?;
                Action::ArcTo { oval, start_angle, sweep_angle, force_move_to }
            }
            ActionKind::AddArc => {
                let oval = self.rect()?;
                let [start_angle, sweep_angle]: [f32; 2] = self.floats()?;
                Action::AddArc { oval, start_angle, sweep_angle }
            }
            ActionKind::AddCircle => {
                let [x, y, radius]: [f32; 3] = self.floats()?;
                let dir = self.direction()?;
                Action::AddCircle { x, y, radius, dir }
            }
            ActionKind::AddOval => {
                let oval = self.rect()?;
                let dir = self.direction()?;
                Action::AddOval { oval, dir }
            }
            ActionKind::AddRect => {
                let rect = self.rect()?;
                let dir = self.direction()?;
                Action::AddRect { rect, dir }
            }
            ActionKind::AddRoundedRect => {
                let rect = self.rect()?;
                let [rx, ry]: [f32; 2] = self.floats()?;
                let dir = self.direction()?;
                Action::AddRoundedRect { rect, rx, ry, dir }
            }
            ActionKind::AddRoundedRectCorners => {
                let rect = self.rect()?;
                let radii = self.array::<CORNER_RADII_LEN>(kind)?;
                let dir = self.direction()?;
                Action::AddRoundedRectCorners { rect, radii, dir }
            }
            ActionKind::Offset => {
                let [dx, dy]: [f32; 2] = self.floats()?;
                Action::Offset { dx, dy }
            }
            ActionKind::MatrixTransformation => {
                let values = self.array::<MATRIX_LEN>(kind)?;
                Action::MatrixTransformation { matrix: Matrix::new(values) }
            }
            ActionKind::Close => Action::Close,
            ActionKind::LastPoint => {
                let [x, y]: [f32; 2] = self.floats()?;
                Action::LastPoint { x, y }
            }
        };
        Ok(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RecordedPath {
        let mut path = RecordedPath::new();
        path.push(Action::MoveTo { x: 0.0, y: 0.0 });
        path.push(Action::LineTo { x: 10.0, y: 10.0 });
        path.push(Action::Close);
        path
    }

    fn corners() -> RecordedPath {
        let mut path = RecordedPath::new();
        path.push(Action::AddRoundedRectCorners {
            rect: PathRect::new(0.0, 0.0, 40.0, 20.0),
            radii: [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
            dir: Direction::Ccw,
        });
        path
    }

    #[test]
    fn test_header_and_count() {
        let bytes = encode(&sample());
        assert_eq!(&bytes[..4], MAGIC);
        assert_eq!(bytes[4], FORMAT_VERSION);
        assert_eq!(u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]), 3);
        assert_eq!(bytes[9], ActionKind::MoveTo.tag());
        assert!(bytes.ends_with(b"WINDING"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(encode(&sample()), encode(&sample()));
    }

    #[test]
    fn test_decode_sample() {
        let decoded = decode(&encode(&sample())).unwrap();
        assert_eq!(decoded, sample());
        assert_eq!(decoded.fill_type(), FillType::Winding);
    }

    #[test]
    fn test_float_bits_preserved() {
        let mut path = RecordedPath::new();
        path.push(Action::MoveTo { x: -0.0, y: f32::MIN_POSITIVE / 2.0 });
        path.push(Action::LineTo { x: f32::MAX, y: 0.1 });
        let decoded = decode(&encode(&path)).unwrap();
        match decoded.actions()[0] {
            Action::MoveTo { x, y } => {
                assert_eq!(x.to_bits(), (-0.0f32).to_bits());
                assert_eq!(y.to_bits(), (f32::MIN_POSITIVE / 2.0).to_bits());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_nan_survives_binary() {
        let mut path = RecordedPath::new();
        path.push(Action::Offset { dx: f32::NAN, dy: f32::INFINITY });
        let decoded = decode(&encode(&path)).unwrap();
        match decoded.actions()[0] {
            Action::Offset { dx, dy } => {
                assert!(dx.is_nan());
                assert_eq!(dy, f32::INFINITY);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_radii_length_mismatch() {
        let bytes = encode(&corners());
        // header(9) + tag(1) + rect(16) puts the radii length at offset 26.
        let len_at = HEADER_LEN + 1 + 16;
        assert_eq!(&bytes[len_at..len_at + 4], &8u32.to_le_bytes());

        let mut forged = bytes[..len_at].to_vec();
        forged.extend_from_slice(&6u32.to_le_bytes());
        forged.extend_from_slice(&bytes[len_at + 4..len_at + 4 + 6 * 4]);
        forged.extend_from_slice(&bytes[len_at + 4 + 8 * 4..]);

        let err = decode(&forged).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ArrayLength {
                kind: ActionKind::AddRoundedRectCorners,
                expected: 8,
                found: 6,
            }
        );
    }

    #[test]
    fn test_zero_length_matrix() {
        let mut bytes = BytesMut::new();
        bytes.put_slice(MAGIC);
        bytes.put_u8(FORMAT_VERSION);
        bytes.put_u32_le(1);
        bytes.put_u8(ActionKind::MatrixTransformation.tag());
        bytes.put_u32_le(0);
        bytes.put_u32_le(7);
        bytes.put_slice(b"WINDING");

        assert!(matches!(
            decode(&bytes),
            Err(DecodeError::ArrayLength { expected: 9, found: 0, .. })
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = encode(&sample());
        for cut in 0..bytes.len() {
            assert!(decode(&bytes[..cut]).is_err(), "prefix of {cut} bytes decoded");
        }
    }

    #[test]
    fn test_unknown_kind() {
        let mut bytes = encode(&sample()).to_vec();
        bytes[9] = 0x42;
        assert_eq!(decode(&bytes), Err(DecodeError::UnknownKind(0x42)));
    }

    #[test]
    fn test_unknown_fill_type() {
        let mut bytes = encode(&RecordedPath::new()).to_vec();
        let n = bytes.len();
        bytes[n - 7..].copy_from_slice(b"WINDONG");
        assert_eq!(decode(&bytes), Err(DecodeError::UnknownFillType("WINDONG".to_string())));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut bytes = encode(&sample()).to_vec();
        bytes[0] = b'X';
        assert_eq!(decode(&bytes), Err(DecodeError::InvalidMagic));

        let mut bytes = encode(&sample()).to_vec();
        bytes[4] = 9;
        assert_eq!(decode(&bytes), Err(DecodeError::UnsupportedVersion(9)));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = encode(&sample()).to_vec();
        bytes.push(0);
        assert_eq!(decode(&bytes), Err(DecodeError::TrailingBytes(1)));
    }

    #[test]
    fn test_invalid_flag_bytes() {
        let mut path = RecordedPath::new();
        path.push(Action::ArcTo {
            oval: PathRect::new(0.0, 0.0, 10.0, 10.0),
            start_angle: 0.0,
            sweep_angle: 90.0,
            force_move_to: true,
        });
        let mut bytes = encode(&path).to_vec();
        let flag_at = HEADER_LEN + 1 + 16 + 8;
        assert_eq!(bytes[flag_at], 1);
        bytes[flag_at] = 2;
        assert_eq!(decode(&bytes), Err(DecodeError::InvalidBool(2)));

        let mut bytes = encode(&corners()).to_vec();
        let dir_at = HEADER_LEN + 1 + 16 + 4 + 32;
        assert_eq!(bytes[dir_at], 1);
        bytes[dir_at] = 5;
        assert_eq!(decode(&bytes), Err(DecodeError::InvalidDirection(5)));
    }

    #[test]
    fn test_huge_count_does_not_preallocate() {
        let mut bytes = BytesMut::new();
        bytes.put_slice(MAGIC);
        bytes.put_u8(FORMAT_VERSION);
        bytes.put_u32_le(u32::MAX);
        assert_eq!(decode(&bytes), Err(DecodeError::UnexpectedEnd));
    }
}
