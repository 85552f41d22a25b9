//! Test helpers for building stored trees from flat path listings.

use std::collections::BTreeMap;

use arbor_store::{Blob, EntryMode, InMemoryObjectStore, ObjectStore, Tree, TreeEntry};
use arbor_types::{ObjectFormat, ObjectId};

pub fn sha1_store() -> InMemoryObjectStore {
    InMemoryObjectStore::with_format(ObjectFormat::Sha1)
}

enum Node<'a> {
    Leaf(EntryMode, &'a str),
    Dir(BTreeMap<&'a str, Node<'a>>),
}

/// Write a tree holding `files` (`path`, `mode`, `content`) and return its id.
///
/// Intermediate directories are implied by `/` in paths.
pub fn write_tree(store: &dyn ObjectStore, files: &[(&str, EntryMode, &str)]) -> ObjectId {
    let mut root = BTreeMap::new();
    for &(path, mode, content) in files {
        let mut dir = &mut root;
        let mut segments = path.split('/').peekable();
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                dir.insert(segment, Node::Leaf(mode, content));
            } else {
                let next = dir
                    .entry(segment)
                    .or_insert_with(|| Node::Dir(BTreeMap::new()));
                dir = match next {
                    Node::Dir(children) => children,
                    Node::Leaf(..) => panic!("{path}: {segment} is a file"),
                };
            }
        }
    }
    write_dir(store, &root)
}

fn write_dir(store: &dyn ObjectStore, dir: &BTreeMap<&str, Node<'_>>) -> ObjectId {
    let entries = dir
        .iter()
        .map(|(name, node)| match node {
            Node::Leaf(mode, content) => {
                let id = store
                    .write(&Blob::new(content.as_bytes().to_vec()).to_stored_object())
                    .unwrap();
                TreeEntry::new(*mode, *name, id)
            }
            Node::Dir(children) => {
                TreeEntry::new(EntryMode::Directory, *name, write_dir(store, children))
            }
        })
        .collect();
    store
        .write(&Tree::new(entries).to_stored_object().unwrap())
        .unwrap()
}
