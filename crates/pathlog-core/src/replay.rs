//! Drive a native primitive through a recorded journal.

use crate::error::{JournalError, JournalResult};
use crate::geometry::PathPrimitive;
use crate::recorded::RecordedPath;

/// Replay `recorded` onto `target`, in recorded order, then apply the fill rule.
///
/// Replaying onto a non-empty primitive continues from its current state,
/// the same as issuing the calls live. On failure the primitive keeps the
/// calls issued before the failing action and the fill rule is left as is.
pub fn replay<P: PathPrimitive + ?Sized>(recorded: &RecordedPath, target: &mut P) -> JournalResult<()> {
    for (index, action) in recorded.iter().enumerate() {
        action
            .apply(target)
            .map_err(|source| JournalError::Replay { index, source })?;
    }
    target.set_fill_type(recorded.fill_type());
    log::debug!(
        "replayed {} actions, fill type {}",
        recorded.len(),
        recorded.fill_type()
    );
    Ok(())
}
