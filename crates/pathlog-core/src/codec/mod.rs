//! Encoding and decoding of recorded paths.
//!
//! The binary form is the canonical one. The text forms exist for
//! transports and tools that only carry strings.

mod binary;
mod text;

pub use binary::{FORMAT_VERSION, MAGIC, encode, encode_parts};
pub(crate) use binary::decode as decode_binary;
pub use text::{from_base64, from_json, to_base64, to_json};

use crate::error::{DecodeError, JournalResult};
use crate::recorded::RecordedPath;
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

/// The available journal encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Binary,
    Json,
    Base64,
}

impl Encoding {
    /// Guess the encoding of `data`.
    ///
    /// Binary journals start with [`MAGIC`], JSON with `{`; anything else is
    /// treated as base64.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(MAGIC) {
            return Encoding::Binary;
        }
        match data.iter().find(|b| !b.is_ascii_whitespace()) {
            Some(b'{') => Encoding::Json,
            _ => Encoding::Base64,
        }
    }

    pub fn encode(self, recorded: &RecordedPath) -> JournalResult<Vec<u8>> {
        match self {
            Encoding::Binary => Ok(encode(recorded).to_vec()),
            Encoding::Json => to_json(recorded).map(String::into_bytes),
            Encoding::Base64 => Ok(to_base64(recorded).into_bytes()),
        }
    }

    pub fn decode(self, data: &[u8]) -> JournalResult<RecordedPath> {
        match self {
            Encoding::Binary => decode(data),
            Encoding::Json => from_json(as_text(data)?),
            Encoding::Base64 => from_base64(as_text(data)?),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Encoding::Binary => "binary",
            Encoding::Json => "json",
            Encoding::Base64 => "base64",
        }
    }
}

fn as_text(data: &[u8]) -> Result<&str, DecodeError> {
    std::str::from_utf8(data).map_err(|_| DecodeError::InvalidString)
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" | "bin" => Ok(Encoding::Binary),
            "json" => Ok(Encoding::Json),
            "base64" | "b64" => Ok(Encoding::Base64),
            other => Err(format!("unknown encoding: {other}")),
        }
    }
}

/// Decode a binary journal produced by [`encode`].
///
/// Malformed input is reported as
/// [`JournalError::CorruptLog`](crate::error::JournalError::CorruptLog) carrying the
/// [`DecodeError`] reason.
pub fn decode(bytes: &[u8]) -> JournalResult<RecordedPath> {
    Ok(binary::decode(bytes)?)
}

/// Decode whatever encoding `data` is in.
pub fn decode_any(data: &[u8]) -> JournalResult<RecordedPath> {
    let encoding = Encoding::detect(data);
    encoding.decode(data).inspect_err(|e| {
        log::warn!("rejected {encoding} journal: {e}");
    })
}

/// Write the binary encoding of `recorded` to `writer`.
pub fn write_to<W: Write>(recorded: &RecordedPath, mut writer: W) -> io::Result<()> {
    writer.write_all(&encode(recorded))
}

/// Read a binary journal from `reader` until end of stream.
///
/// Decode failures are reported as [`io::ErrorKind::InvalidData`] wrapping
/// the [`DecodeError`].
pub fn read_from<R: Read>(mut reader: R) -> io::Result<RecordedPath> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    binary::decode(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::geometry::FillType;

    fn sample() -> RecordedPath {
        let mut path = RecordedPath::new();
        path.push(Action::MoveTo { x: 1.0, y: 1.0 });
        path.push(Action::Offset { dx: 2.0, dy: 2.0 });
        path.set_fill_type(FillType::EvenOdd);
        path
    }

    #[test]
    fn test_detect() {
        let path = sample();
        for encoding in [Encoding::Binary, Encoding::Json, Encoding::Base64] {
            let data = encoding.encode(&path).unwrap();
            assert_eq!(Encoding::detect(&data), encoding);
            assert_eq!(decode_any(&data).unwrap(), path);
        }
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("JSON".parse::<Encoding>(), Ok(Encoding::Json));
        assert_eq!("b64".parse::<Encoding>(), Ok(Encoding::Base64));
        assert!("xml".parse::<Encoding>().is_err());
        assert_eq!(Encoding::Binary.to_string(), "binary");
    }

    #[test]
    fn test_malformed_input_is_corrupt_log() {
        use crate::error::JournalError;

        assert_eq!(decode(b"PLOG"), Err(JournalError::CorruptLog(DecodeError::UnexpectedEnd)));
        assert_eq!(
            Encoding::Binary.decode(b"NOPE\x01"),
            Err(JournalError::CorruptLog(DecodeError::InvalidMagic))
        );
        assert!(matches!(
            decode_any(b"{\"actions\": 3}"),
            Err(JournalError::CorruptLog(DecodeError::Text(_)))
        ));
    }

    #[test]
    fn test_stream_round_trip() {
        let mut out = Vec::new();
        write_to(&sample(), &mut out).unwrap();
        let decoded = read_from(out.as_slice()).unwrap();
        assert_eq!(decoded, sample());
    }

    #[test]
    fn test_stream_corrupt_is_invalid_data() {
        let err = read_from(&b"PLOG\x01"[..]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        let inner = err.get_ref().and_then(|e| e.downcast_ref::<DecodeError>());
        assert_eq!(inner, Some(&DecodeError::UnexpectedEnd));
    }
}
