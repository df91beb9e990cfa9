//! The replayable journal: an ordered action list plus a fill rule.

use crate::action::{Action, ActionKind};
use crate::geometry::FillType;
use serde::{Deserialize, Serialize};

/// Default capacity hint for a new journal.
pub const DEFAULT_CAPACITY: usize = 1024;

/// An ordered list of [`Action`]s and the fill rule to apply after them.
///
/// Order is significant: this is a script, not a set. Two recorded paths are
/// equal when their actions are element-wise equal and their fill rules match.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordedPath {
    actions: Vec<Action>,
    fill_type: FillType,
}

impl RecordedPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty journal. The capacity is only a sizing hint and is
    /// dropped if it cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut actions = Vec::new();
        let _ = actions.try_reserve(capacity);
        Self {
            actions,
            fill_type: FillType::default(),
        }
    }

    pub fn from_parts(actions: Vec<Action>, fill_type: FillType) -> Self {
        Self { actions, fill_type }
    }

    pub fn into_parts(self) -> (Vec<Action>, FillType) {
        (self.actions, self.fill_type)
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

    pub fn fill_type(&self) -> FillType {
        self.fill_type
    }

    pub fn set_fill_type(&mut self, fill_type: FillType) {
        self.fill_type = fill_type;
    }

    /// Append an action to the end of the journal.
    pub fn push(&mut self, action: Action) {
        self.actions.push(action);
    }

    /// The kinds of all actions, in order.
    pub fn kinds(&self) -> Vec<ActionKind> {
        self.actions.iter().map(Action::kind).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.actions.iter()
    }
}

impl<'a> IntoIterator for &'a RecordedPath {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

impl Extend<Action> for RecordedPath {
    fn extend<T: IntoIterator<Item = Action>>(&mut self, iter: T) {
        self.actions.extend(iter);
    }
}

impl FromIterator<Action> for RecordedPath {
    fn from_iter<T: IntoIterator<Item = Action>>(iter: T) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            fill_type: FillType::default(),
        }
    }
}
