//! Resolving directory noders into their children.

use tracing::debug;

use arbor_store::{ObjectKind, ObjectStore, StoreError, Tree};
use arbor_types::ObjectId;

use crate::change::Changes;
use crate::error::{DiffError, DiffResult};
use crate::merkle;
use crate::noder::Noder;

/// Where the children of directory noders come from.
///
/// Implementations must return children sorted by name and must be safe to
/// call repeatedly for the same directory. The engine asks only for the
/// children of directories whose identities differ between the two trees.
pub trait TreeSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// The entries directly inside `dir`, sorted by name.
    fn children(&self, dir: &Noder) -> Result<Vec<Noder>, Self::Error>;
}

impl<T: TreeSource + ?Sized> TreeSource for &T {
    type Error = T::Error;

    fn children(&self, dir: &Noder) -> Result<Vec<Noder>, Self::Error> {
        (**self).children(dir)
    }
}

/// [`TreeSource`] over the tree objects of an [`ObjectStore`].
pub struct StoreTreeSource<'s> {
    store: &'s dyn ObjectStore,
}

impl<'s> StoreTreeSource<'s> {
    pub fn new(store: &'s dyn ObjectStore) -> Self {
        Self { store }
    }

    /// The root noder of the tree stored under `tree_id`.
    ///
    /// Fails with [`DiffError::ObjectNotFound`] if no such object exists and
    /// with [`DiffError::TreeRead`] if it is not a tree. The entries are not
    /// decoded until the diff asks for them.
    pub fn root_noder(&self, tree_id: &ObjectId) -> DiffResult<Noder> {
        let stored = self
            .store
            .read(tree_id)
            .map_err(|e| tree_read("", e))?
            .ok_or(DiffError::ObjectNotFound(*tree_id))?;
        if stored.kind != ObjectKind::Tree {
            return Err(tree_read(
                "",
                StoreError::UnexpectedKind {
                    expected: ObjectKind::Tree,
                    actual: stored.kind,
                },
            ));
        }
        Ok(Noder::root(*tree_id))
    }
}

impl TreeSource for StoreTreeSource<'_> {
    type Error = StoreError;

    fn children(&self, dir: &Noder) -> Result<Vec<Noder>, StoreError> {
        let stored = self.store.read_required(dir.hash())?;
        let tree = Tree::from_stored_object(&stored)?;
        Ok(tree
            .entries
            .into_iter()
            .map(|entry| Noder::from_entry(entry.name, entry.mode, entry.object_id))
            .collect())
    }
}

fn tree_read(path: &str, err: StoreError) -> DiffError {
    DiffError::TreeRead {
        path: path.to_string(),
        source: Box::new(err),
    }
}

/// Diff two stored trees. `None` stands for an empty or nonexistent tree.
pub fn diff_trees(
    store: &dyn ObjectStore,
    old_tree: Option<&ObjectId>,
    new_tree: Option<&ObjectId>,
) -> DiffResult<Changes> {
    let source = StoreTreeSource::new(store);
    let from = old_tree.map(|id| source.root_noder(id)).transpose()?;
    let to = new_tree.map(|id| source.root_noder(id)).transpose()?;
    let changes = merkle::diff(&source, from.as_ref(), to.as_ref())?;
    debug!(
        old = ?old_tree.map(ObjectId::short_hex),
        new = ?new_tree.map(ObjectId::short_hex),
        changes = changes.len(),
        "diffed stored trees"
    );
    Ok(changes)
}
