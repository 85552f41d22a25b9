//! Turning a directory on disk into stored tree objects.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

use arbor_store::{Blob, EntryMode, ObjectStore, Tree, TreeEntry};
use arbor_types::ObjectId;

/// Settings for [`snapshot_dir`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    /// Whether names starting with `.` are part of the snapshot.
    pub include_hidden: bool,
    /// Directory names never descended into, at any depth.
    pub skip_dirs: Vec<String>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            include_hidden: true,
            skip_dirs: vec![".git".to_string()],
        }
    }
}

impl SnapshotConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading snapshot config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing snapshot config {}", path.display()))
    }

    fn keeps(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if !self.include_hidden && name.starts_with('.') {
            return false;
        }
        !(entry.file_type().is_dir() && self.skip_dirs.iter().any(|d| *d == name))
    }
}

/// Write every file under `root` into `store` and return the root tree id.
///
/// Regular files, executables and symlinks become tree entries; symlinks
/// are stored as their target and never followed. Directories with nothing
/// to store are left out, as git does.
pub fn snapshot_dir(
    store: &dyn ObjectStore,
    root: &Path,
    config: &SnapshotConfig,
) -> anyhow::Result<ObjectId> {
    let mut pending: HashMap<PathBuf, Vec<TreeEntry>> = HashMap::new();
    let mut files = 0usize;

    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .contents_first(true)
        .into_iter()
        .filter_entry(|e| config.keeps(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        let path = entry.path();
        let name = entry
            .file_name()
            .to_str()
            .ok_or_else(|| anyhow!("{} is not valid UTF-8", path.display()))?
            .to_string();
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("{} has no parent", path.display()))?
            .to_path_buf();

        let file_type = entry.file_type();
        let tree_entry = if file_type.is_dir() {
            let children = pending.remove(path).unwrap_or_default();
            if children.is_empty() {
                trace!(path = %path.display(), "skipping empty directory");
                continue;
            }
            let id = write_tree(store, children)?;
            TreeEntry::new(EntryMode::Directory, name, id)
        } else if file_type.is_symlink() {
            let target = fs::read_link(path)
                .with_context(|| format!("reading link {}", path.display()))?;
            let data = target.to_string_lossy().into_owned().into_bytes();
            files += 1;
            TreeEntry::new(EntryMode::Symlink, name, write_blob(store, data)?)
        } else {
            let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
            let mode = if is_executable(&entry)? {
                EntryMode::Executable
            } else {
                EntryMode::Regular
            };
            files += 1;
            TreeEntry::new(mode, name, write_blob(store, data)?)
        };
        pending.entry(parent).or_default().push(tree_entry);
    }

    let id = write_tree(store, pending.remove(root).unwrap_or_default())?;
    debug!(root = %root.display(), files, tree = %id.short_hex(), "snapshot written");
    Ok(id)
}

fn write_blob(store: &dyn ObjectStore, data: Vec<u8>) -> anyhow::Result<ObjectId> {
    Ok(store.write(&Blob::new(data).to_stored_object())?)
}

fn write_tree(store: &dyn ObjectStore, entries: Vec<TreeEntry>) -> anyhow::Result<ObjectId> {
    let tree = Tree::new(entries);
    Ok(store.write(&tree.to_stored_object()?)?)
}

#[cfg(unix)]
fn is_executable(entry: &DirEntry) -> anyhow::Result<bool> {
    use std::os::unix::fs::PermissionsExt;
    let meta = entry
        .metadata()
        .with_context(|| format!("stat {}", entry.path().display()))?;
    Ok(meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(_entry: &DirEntry) -> anyhow::Result<bool> {
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_diff::{diff_trees, Action};
    use arbor_store::InMemoryObjectStore;
    use arbor_types::ObjectFormat;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn summary(store: &InMemoryObjectStore, old: ObjectId, new: ObjectId) -> Vec<(Action, String)> {
        diff_trees(store, Some(&old), Some(&new))
            .unwrap()
            .iter()
            .map(|c| (c.action().unwrap(), c.path()))
            .collect()
    }

    #[test]
    fn identical_directories_share_a_tree_id() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        for dir in [a.path(), b.path()] {
            write(dir, "README", "hello");
            write(dir, "src/lib.rs", "fn main() {}");
        }
        let store = InMemoryObjectStore::with_format(ObjectFormat::Sha1);
        let config = SnapshotConfig::default();
        let old = snapshot_dir(&store, a.path(), &config).unwrap();
        let new = snapshot_dir(&store, b.path(), &config).unwrap();
        assert_eq!(old, new);
    }

    #[test]
    fn diff_between_snapshots() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(a.path(), "README", "hello");
        write(a.path(), "old.txt", "bye");
        write(a.path(), "src/lib.rs", "v1");
        write(b.path(), "README", "hello");
        write(b.path(), "new.txt", "hi");
        write(b.path(), "src/lib.rs", "v2");

        let store = InMemoryObjectStore::with_format(ObjectFormat::Sha256);
        let config = SnapshotConfig::default();
        let old = snapshot_dir(&store, a.path(), &config).unwrap();
        let new = snapshot_dir(&store, b.path(), &config).unwrap();

        assert_eq!(
            summary(&store, old, new),
            vec![
                (Action::Insert, "new.txt".to_string()),
                (Action::Delete, "old.txt".to_string()),
                (Action::Modify, "src/lib.rs".to_string()),
            ]
        );
    }

    #[test]
    fn git_dir_and_empty_dirs_are_skipped() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        write(a.path(), "file", "x");
        write(b.path(), "file", "x");
        write(b.path(), ".git/HEAD", "ref: refs/heads/main");
        fs::create_dir_all(b.path().join("empty/nested")).unwrap();

        let store = InMemoryObjectStore::with_format(ObjectFormat::Sha1);
        let config = SnapshotConfig::default();
        let old = snapshot_dir(&store, a.path(), &config).unwrap();
        let new = snapshot_dir(&store, b.path(), &config).unwrap();
        assert_eq!(old, new);
    }

    #[test]
    fn hidden_files_follow_config() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "visible", "v");
        write(dir.path(), ".env", "secret");

        let store = InMemoryObjectStore::with_format(ObjectFormat::Sha1);
        let with_hidden = snapshot_dir(&store, dir.path(), &SnapshotConfig::default()).unwrap();
        let config = SnapshotConfig {
            include_hidden: false,
            ..Default::default()
        };
        let without = snapshot_dir(&store, dir.path(), &config).unwrap();

        assert_eq!(
            summary(&store, without, with_hidden),
            vec![(Action::Insert, ".env".to_string())]
        );
    }

    #[cfg(unix)]
    #[test]
    fn executable_and_symlink_modes() {
        use std::os::unix::fs::{symlink, PermissionsExt};

        let dir = TempDir::new().unwrap();
        write(dir.path(), "run.sh", "#!/bin/sh");
        fs::set_permissions(dir.path().join("run.sh"), fs::Permissions::from_mode(0o755)).unwrap();
        write(dir.path(), "target.txt", "t");
        symlink("target.txt", dir.path().join("link")).unwrap();

        let store = InMemoryObjectStore::with_format(ObjectFormat::Sha1);
        let id = snapshot_dir(&store, dir.path(), &SnapshotConfig::default()).unwrap();
        let tree = Tree::from_stored_object(&store.read_required(&id).unwrap()).unwrap();

        assert_eq!(tree.get("run.sh").unwrap().mode, EntryMode::Executable);
        assert_eq!(tree.get("target.txt").unwrap().mode, EntryMode::Regular);
        let link = tree.get("link").unwrap();
        assert_eq!(link.mode, EntryMode::Symlink);
        let target = Blob::from_stored_object(&store.read_required(&link.object_id).unwrap()).unwrap();
        assert_eq!(target.data, b"target.txt");
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, r#"{ "include_hidden": false }"#).unwrap();
        let config = SnapshotConfig::load(&path).unwrap();
        assert!(!config.include_hidden);
        assert_eq!(config.skip_dirs, vec![".git"]);
    }
}
