//! Merkle-pruned lockstep diff of two noder trees.
//!
//! Both trees are walked together, depth first, children in name order.
//! Entries whose identities match are skipped without reading what is below
//! them. Everything else is classified:
//!
//! - two directories: their children are merged by name and compared;
//! - two non-directories of the same mode class: one `Modify`;
//! - anything else (a file replaced by a directory, a symlink by a file,
//!   ...): the old entry is deleted and the new one inserted, directories
//!   being expanded into their individual entries.
//!
//! Directories themselves never appear in the result. The walk keeps an
//! explicit work stack, so tree depth is bounded by memory rather than by
//! the thread's stack.

use std::cmp::Ordering;

use tracing::{debug, trace};

use crate::change::{Action, Change, Changes};
use crate::equivalence::same_class;
use crate::error::{DiffError, DiffResult};
use crate::noder::Noder;
use crate::path::NoderPath;
use crate::source::TreeSource;

/// Compute the changes that turn `from` into `to`.
///
/// Either root may be `None`, standing for an empty or nonexistent tree.
/// The result is sorted by path, ties broken by action. Any failure to read
/// children aborts the whole diff.
pub fn diff<S: TreeSource + ?Sized>(
    source: &S,
    from: Option<&Noder>,
    to: Option<&Noder>,
) -> DiffResult<Changes> {
    let first = match (from, to) {
        (None, None) => return Ok(Changes::new()),
        (Some(a), None) => Task::Report {
            entry: Entry::root(a.clone()),
            action: Action::Delete,
        },
        (None, Some(b)) => Task::Report {
            entry: Entry::root(b.clone()),
            action: Action::Insert,
        },
        (Some(a), Some(b)) => Task::Compare {
            from: Entry::root(a.clone()),
            to: Entry::root(b.clone()),
        },
    };

    let mut walker = Walker {
        source,
        stack: vec![first],
        changes: Changes::new(),
        pruned: 0,
    };
    walker.run()?;

    let Walker {
        mut changes,
        pruned,
        ..
    } = walker;
    changes.sort();
    debug!(changes = changes.len(), pruned, "tree diff complete");
    Ok(changes)
}

/// An entry together with the path leading to it.
///
/// Roots have an empty path: their children start new paths.
struct Entry {
    path: NoderPath,
    noder: Noder,
}

impl Entry {
    fn root(noder: Noder) -> Self {
        Self {
            path: NoderPath::default(),
            noder,
        }
    }

    fn child(&self, noder: Noder) -> Self {
        Self {
            path: self.path.child(noder.clone()),
            noder,
        }
    }

    /// The path reported in a change. A root that is not a directory is
    /// reported under its own name.
    fn into_path(self) -> NoderPath {
        if self.path.is_empty() {
            NoderPath::new(vec![self.noder])
        } else {
            self.path
        }
    }
}

enum Task {
    /// The entries at the same path in both trees.
    Compare { from: Entry, to: Entry },
    /// An entry on one side only; every non-directory below it gets `action`.
    Report { entry: Entry, action: Action },
}

struct Walker<'a, S: ?Sized> {
    source: &'a S,
    stack: Vec<Task>,
    changes: Changes,
    pruned: usize,
}

impl<S: TreeSource + ?Sized> Walker<'_, S> {
    fn run(&mut self) -> DiffResult<()> {
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Compare { from, to } => self.compare(from, to)?,
                Task::Report { entry, action } => self.report(entry, action)?,
            }
        }
        Ok(())
    }

    /// Push `tasks` so that they are popped in the given order.
    fn schedule(&mut self, tasks: Vec<Task>) {
        self.stack.extend(tasks.into_iter().rev());
    }

    fn compare(&mut self, from: Entry, to: Entry) -> DiffResult<()> {
        if from.noder.identity() == to.noder.identity() {
            trace!(path = %to.path, "identical, pruned");
            self.pruned += 1;
            return Ok(());
        }

        match (from.noder.is_dir(), to.noder.is_dir()) {
            (true, true) => self.merge(&from, &to),
            (false, false) if same_class(from.noder.mode(), to.noder.mode()) => {
                self.changes
                    .push(Change::modify(from.into_path(), to.into_path()));
                Ok(())
            }
            _ => {
                trace!(
                    path = %to.path,
                    old = %from.noder.mode(),
                    new = %to.noder.mode(),
                    "entry changed kind"
                );
                self.schedule(vec![
                    Task::Report {
                        entry: from,
                        action: Action::Delete,
                    },
                    Task::Report {
                        entry: to,
                        action: Action::Insert,
                    },
                ]);
                Ok(())
            }
        }
    }

    fn report(&mut self, entry: Entry, action: Action) -> DiffResult<()> {
        if !entry.noder.is_dir() {
            let path = entry.into_path();
            let change = match action {
                Action::Insert => Change::insert(path),
                _ => Change::delete(path),
            };
            self.changes.push(change);
            return Ok(());
        }

        let tasks = self
            .children(&entry)?
            .into_iter()
            .map(|child| Task::Report {
                entry: entry.child(child),
                action,
            })
            .collect();
        self.schedule(tasks);
        Ok(())
    }

    /// Sorted merge of two directories' children by name.
    fn merge(&mut self, from: &Entry, to: &Entry) -> DiffResult<()> {
        let mut left = self.children(from)?.into_iter().peekable();
        let mut right = self.children(to)?.into_iter().peekable();
        let mut tasks = Vec::new();

        loop {
            let order = match (left.peek(), right.peek()) {
                (None, None) => break,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.name().cmp(b.name()),
            };
            match order {
                Ordering::Less => {
                    if let Some(a) = left.next() {
                        tasks.push(Task::Report {
                            entry: from.child(a),
                            action: Action::Delete,
                        });
                    }
                }
                Ordering::Greater => {
                    if let Some(b) = right.next() {
                        tasks.push(Task::Report {
                            entry: to.child(b),
                            action: Action::Insert,
                        });
                    }
                }
                Ordering::Equal => {
                    if let (Some(a), Some(b)) = (left.next(), right.next()) {
                        tasks.push(Task::Compare {
                            from: from.child(a),
                            to: to.child(b),
                        });
                    }
                }
            }
        }

        self.schedule(tasks);
        Ok(())
    }

    fn children(&self, dir: &Entry) -> DiffResult<Vec<Noder>> {
        let mut children = self
            .source
            .children(&dir.noder)
            .map_err(|e| DiffError::TreeRead {
                path: dir.path.to_string(),
                source: Box::new(e),
            })?;
        children.sort();
        Ok(children)
    }
}
