use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::noder::Noder;

/// The noders from just below a tree root down to one entry.
///
/// Immutable once built; [`child`](Self::child) returns a new, longer path
/// that shares every ancestor with its parent, so extending a path costs one
/// allocation whatever its depth. Paths order by their `/`-joined string
/// form, then by the noders on them.
#[derive(Clone, Default)]
pub struct NoderPath {
    tip: Option<Arc<Segment>>,
}

struct Segment {
    parent: Option<Arc<Segment>>,
    noder: Noder,
    depth: usize,
}

impl NoderPath {
    pub fn new(nodes: Vec<Noder>) -> Self {
        nodes
            .into_iter()
            .fold(Self::default(), |path, noder| path.child(noder))
    }

    /// This path extended by `noder`.
    pub fn child(&self, noder: Noder) -> Self {
        Self {
            tip: Some(Arc::new(Segment {
                parent: self.tip.clone(),
                depth: self.len() + 1,
                noder,
            })),
        }
    }

    /// The entry this path leads to.
    pub fn last(&self) -> Option<&Noder> {
        self.tip.as_deref().map(|segment| &segment.noder)
    }

    /// Every noder on the path, root side first.
    pub fn nodes(&self) -> Vec<&Noder> {
        let mut nodes = Vec::with_capacity(self.len());
        let mut cursor = self.tip.as_deref();
        while let Some(segment) = cursor {
            nodes.push(&segment.noder);
            cursor = segment.parent.as_deref();
        }
        nodes.reverse();
        nodes
    }

    pub fn len(&self) -> usize {
        self.tip.as_ref().map_or(0, |segment| segment.depth)
    }

    pub fn is_empty(&self) -> bool {
        self.tip.is_none()
    }

    /// Order by the `/`-joined path without building the strings.
    pub(crate) fn cmp_path(&self, other: &Self) -> Ordering {
        let (ours, theirs) = (self.nodes(), other.nodes());
        path_bytes(&ours).cmp(path_bytes(&theirs))
    }
}

fn path_bytes<'a>(nodes: &'a [&'a Noder]) -> impl Iterator<Item = u8> + 'a {
    nodes.iter().enumerate().flat_map(|(i, noder)| {
        let sep: &[u8] = if i == 0 { b"" } else { b"/" };
        sep.iter().chain(noder.name().as_bytes()).copied()
    })
}

impl Drop for NoderPath {
    // Unlink uniquely owned ancestors one at a time so that dropping a very
    // deep path does not recurse.
    fn drop(&mut self) {
        let mut next = self.tip.take();
        while let Some(segment) = next {
            next = match Arc::try_unwrap(segment) {
                Ok(mut owned) => owned.parent.take(),
                Err(_) => None,
            };
        }
    }
}

impl PartialEq for NoderPath {
    fn eq(&self, other: &Self) -> bool {
        match (&self.tip, &other.tip) {
            (Some(a), Some(b)) if Arc::ptr_eq(a, b) => true,
            _ => self.len() == other.len() && self.nodes() == other.nodes(),
        }
    }
}

impl Eq for NoderPath {}

impl Hash for NoderPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.nodes().hash(state);
    }
}

impl fmt::Debug for NoderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.nodes()).finish()
    }
}

impl fmt::Display for NoderPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, noder) in self.nodes().into_iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(noder.name())?;
        }
        Ok(())
    }
}

impl PartialOrd for NoderPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NoderPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_path(other)
            .then_with(|| self.nodes().cmp(&other.nodes()))
    }
}
