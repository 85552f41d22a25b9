//! The diff result: changes, their actions, and ordered change lists.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Deref;

use crate::error::{DiffError, DiffResult};
use crate::path::NoderPath;

/// What a [`Change`] does to its path.
///
/// Variant order is the tie-break when two changes share a path: a delete
/// of the old kind of entry sorts before the insert of the new kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Delete,
    Insert,
    Modify,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Delete => "Delete",
            Self::Insert => "Insert",
            Self::Modify => "Modify",
        };
        f.write_str(name)
    }
}

/// One structural difference between two trees.
///
/// `from` is the entry in the old tree, `to` the entry in the new tree. At
/// least one of them is present in every change the engine produces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Change {
    pub from: Option<NoderPath>,
    pub to: Option<NoderPath>,
}

impl Change {
    pub fn insert(to: NoderPath) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    pub fn delete(from: NoderPath) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn modify(from: NoderPath, to: NoderPath) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Derive the action from which sides are present.
    ///
    /// Fails with [`DiffError::MalformedChange`] if neither side is.
    pub fn action(&self) -> DiffResult<Action> {
        match (&self.from, &self.to) {
            (None, Some(_)) => Ok(Action::Insert),
            (Some(_), None) => Ok(Action::Delete),
            (Some(_), Some(_)) => Ok(Action::Modify),
            (None, None) => Err(DiffError::MalformedChange),
        }
    }

    /// The path this change is about: the `to` side when present, since
    /// that is where the entry lives afterwards, otherwise the `from` side.
    ///
    /// Empty for a malformed change.
    pub fn path(&self) -> String {
        self.to
            .as_ref()
            .or(self.from.as_ref())
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// The same change seen from the other tree.
    pub fn reverse(&self) -> Self {
        Self {
            from: self.to.clone(),
            to: self.from.clone(),
        }
    }

    fn key_path(&self) -> Option<&NoderPath> {
        self.to.as_ref().or(self.from.as_ref())
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.action() {
            Ok(action) => write!(f, "<{action} {}>", self.path()),
            Err(_) => f.write_str("<malformed change>"),
        }
    }
}

impl PartialOrd for Change {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Change {
    /// By path, then action; malformed changes sort last.
    fn cmp(&self, other: &Self) -> Ordering {
        let action = |c: &Change| c.action().ok();
        match (self.key_path(), other.key_path()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a
                .cmp_path(b)
                .then_with(|| action(self).cmp(&action(other)))
                .then_with(|| self.from.cmp(&other.from))
                .then_with(|| self.to.cmp(&other.to)),
        }
    }
}

/// An ordered list of changes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Changes(Vec<Change>);

impl Changes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by path, breaking ties by action. Sorting is idempotent.
    pub fn sort(&mut self) {
        self.0.sort();
    }

    /// Every change reversed, re-sorted: the diff in the other direction.
    pub fn reversed(&self) -> Self {
        let mut changes: Self = self.0.iter().map(Change::reverse).collect();
        changes.sort();
        changes
    }

    /// Paths of all changes, in order.
    pub fn paths(&self) -> Vec<String> {
        self.0.iter().map(Change::path).collect()
    }

    /// Changes with the given action, in order.
    pub fn with_action(&self, action: Action) -> impl Iterator<Item = &Change> + '_ {
        self.0
            .iter()
            .filter(move |c| c.action().ok() == Some(action))
    }

    pub fn into_vec(self) -> Vec<Change> {
        self.0
    }

    pub(crate) fn push(&mut self, change: Change) {
        self.0.push(change);
    }
}

impl Deref for Changes {
    type Target = [Change];

    fn deref(&self) -> &[Change] {
        &self.0
    }
}

impl FromIterator<Change> for Changes {
    fn from_iter<I: IntoIterator<Item = Change>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Changes {
    type Item = Change;
    type IntoIter = std::vec::IntoIter<Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Changes {
    type Item = &'a Change;
    type IntoIter = std::slice::Iter<'a, Change>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Changes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, change) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{change}")?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noder::Noder;
    use arbor_types::{EntryMode, ObjectId};

    fn path(name: &str, content: u8) -> NoderPath {
        NoderPath::new(vec![Noder::from_entry(
            name,
            EntryMode::Regular,
            ObjectId::from([content; 20]),
        )])
    }

    #[test]
    fn action_follows_present_sides() {
        assert_eq!(Change::insert(path("a", 1)).action().unwrap(), Action::Insert);
        assert_eq!(Change::delete(path("a", 1)).action().unwrap(), Action::Delete);
        assert_eq!(
            Change::modify(path("a", 1), path("a", 2)).action().unwrap(),
            Action::Modify
        );
    }

    #[test]
    fn malformed_change_is_an_error() {
        let change = Change { from: None, to: None };
        assert!(matches!(change.action(), Err(DiffError::MalformedChange)));
        assert_eq!(change.path(), "");
        assert_eq!(change.to_string(), "<malformed change>");
    }

    #[test]
    fn path_prefers_to_side() {
        let change = Change::modify(path("old", 1), path("new", 2));
        assert_eq!(change.path(), "new");
        assert_eq!(Change::delete(path("gone", 1)).path(), "gone");
    }

    #[test]
    fn reverse_swaps_sides() {
        let insert = Change::insert(path("a", 1));
        let reversed = insert.reverse();
        assert_eq!(reversed.action().unwrap(), Action::Delete);
        assert_eq!(reversed.reverse(), insert);
    }

    #[test]
    fn display() {
        assert_eq!(
            Change::modify(path("gem_eval.rb", 1), path("gem_eval.rb", 2)).to_string(),
            "<Modify gem_eval.rb>"
        );
        let changes: Changes = vec![Change::delete(path("b", 1)), Change::insert(path("c", 1))]
            .into_iter()
            .collect();
        assert_eq!(changes.to_string(), "[<Delete b>, <Insert c>]");
    }

    #[test]
    fn sort_by_path_then_action() {
        let mut changes: Changes = vec![
            Change::insert(path("c", 1)),
            Change::insert(path("b", 2)),
            Change::delete(path("b", 1)),
            Change::modify(path("a", 1), path("a", 2)),
        ]
        .into_iter()
        .collect();
        changes.sort();
        assert_eq!(changes.paths(), vec!["a", "b", "b", "c"]);
        assert_eq!(changes[1].action().unwrap(), Action::Delete);
        assert_eq!(changes[2].action().unwrap(), Action::Insert);

        let once = changes.clone();
        changes.sort();
        assert_eq!(changes, once);
    }

    #[test]
    fn malformed_sorts_last() {
        let mut changes: Changes = vec![
            Change { from: None, to: None },
            Change::insert(path("z", 1)),
        ]
        .into_iter()
        .collect();
        changes.sort();
        assert_eq!(changes[0].path(), "z");
    }

    #[test]
    fn order_follows_joined_path_not_segments() {
        // Segment-wise, "a" < "a.txt"; as joined paths "a.txt" < "a/b".
        let nested = NoderPath::new(vec![
            Noder::from_entry("a", EntryMode::Directory, ObjectId::from([9; 20])),
            Noder::from_entry("b", EntryMode::Regular, ObjectId::from([1; 20])),
        ]);
        let mut changes: Changes = vec![Change::insert(nested), Change::delete(path("a.txt", 1))]
            .into_iter()
            .collect();
        changes.sort();
        assert_eq!(changes.paths(), vec!["a.txt", "a/b"]);
    }

    #[test]
    fn with_action_filters() {
        let changes: Changes = vec![
            Change::insert(path("a", 1)),
            Change::delete(path("b", 1)),
            Change::insert(path("c", 1)),
        ]
        .into_iter()
        .collect();
        assert_eq!(changes.with_action(Action::Insert).count(), 2);
        assert_eq!(changes.with_action(Action::Modify).count(), 0);
    }

    #[test]
    fn reversed_swaps_every_change() {
        let changes: Changes = vec![
            Change::delete(path("b", 1)),
            Change::insert(path("c", 1)),
        ]
        .into_iter()
        .collect();
        let reversed = changes.reversed();
        assert_eq!(reversed[0].action().unwrap(), Action::Insert);
        assert_eq!(reversed[1].action().unwrap(), Action::Delete);
        assert_eq!(reversed.reversed(), changes);
    }
}
