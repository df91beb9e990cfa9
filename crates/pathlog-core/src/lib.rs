//! Pathlog Core Library
//!
//! A recorded-path journal: a path builder that journals every mutation it
//! forwards to a native geometry primitive, so the path can be encoded,
//! stored and replayed onto a fresh primitive later.

pub mod action;
pub mod codec;
pub mod error;
pub mod geometry;
pub mod kurbo_path;
pub mod recorded;
pub mod recorder;
pub mod replay;
pub mod store;

pub use action::{Action, ActionKind};
pub use codec::Encoding;
pub use error::{DecodeError, JournalError, JournalResult};
pub use geometry::{Direction, FillType, Matrix, PathPrimitive, PathRect, PrimitiveError, PrimitiveResult};
pub use kurbo_path::KurboPath;
pub use recorded::{DEFAULT_CAPACITY, RecordedPath};
pub use recorder::Recorder;
pub use replay::replay;
pub use store::{FileStore, JournalStore, MemoryStore, StoreError, StoreResult};
