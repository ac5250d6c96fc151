//! In-memory tree of logical entries shared by the archive and memory sources.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use super::Lookup;

#[derive(Debug, Clone)]
enum Node {
    File(Arc<[u8]>),
    Directory(BTreeSet<String>),
}

/// Flat map from normalized logical path to entry, with the root ("") always
/// present as a directory.
#[derive(Debug, Clone)]
pub(crate) struct EntryTree {
    nodes: BTreeMap<String, Node>,
}

/// Two entries disagree about whether a path is a file or a directory.
#[derive(Debug)]
pub(crate) struct KindConflict {
    pub(crate) path: String,
}

fn split_parent(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

impl EntryTree {
    pub(crate) fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(String::new(), Node::Directory(BTreeSet::new()));
        Self { nodes }
    }

    /// Adds `path` to its parent's listing, creating ancestors as needed.
    fn link_into_parent(&mut self, path: &str) -> Result<(), KindConflict> {
        let mut child = path;
        while !child.is_empty() {
            let (parent, name) = split_parent(child);
            match self
                .nodes
                .entry(parent.to_string())
                .or_insert_with(|| Node::Directory(BTreeSet::new()))
            {
                Node::Directory(children) => {
                    if !children.insert(name.to_string()) {
                        // Ancestors above are already linked.
                        return Ok(());
                    }
                }
                Node::File(_) => {
                    return Err(KindConflict {
                        path: parent.to_string(),
                    })
                }
            }
            child = parent;
        }
        Ok(())
    }

    pub(crate) fn insert_file(&mut self, path: &str, bytes: Arc<[u8]>) -> Result<(), KindConflict> {
        if path.is_empty() || matches!(self.nodes.get(path), Some(Node::Directory(_))) {
            return Err(KindConflict {
                path: path.to_string(),
            });
        }
        self.link_into_parent(path)?;
        self.nodes.insert(path.to_string(), Node::File(bytes));
        Ok(())
    }

    pub(crate) fn insert_dir(&mut self, path: &str) -> Result<(), KindConflict> {
        match self.nodes.get(path) {
            Some(Node::Directory(_)) => return Ok(()),
            Some(Node::File(_)) => {
                return Err(KindConflict {
                    path: path.to_string(),
                })
            }
            None => {}
        }
        self.link_into_parent(path)?;
        self.nodes
            .insert(path.to_string(), Node::Directory(BTreeSet::new()));
        Ok(())
    }

    /// Removes `path` and everything below it. Returns whether anything was removed.
    pub(crate) fn remove(&mut self, path: &str) -> bool {
        if path.is_empty() || self.nodes.remove(path).is_none() {
            return false;
        }
        let prefix = format!("{path}/");
        self.nodes.retain(|key, _| !key.starts_with(&prefix));
        let (parent, name) = split_parent(path);
        if let Some(Node::Directory(children)) = self.nodes.get_mut(parent) {
            children.remove(name);
        }
        true
    }

    pub(crate) fn lookup(&self, path: &str) -> Lookup {
        match self.nodes.get(path) {
            None => Lookup::NotFound,
            Some(Node::File(bytes)) => Lookup::from_bytes(Arc::clone(bytes)),
            Some(Node::Directory(children)) => Lookup::Directory(children.clone()),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &str) -> Arc<[u8]> {
        Arc::from(s.as_bytes())
    }

    #[test]
    fn test_insert_file_synthesizes_ancestors() {
        let mut tree = EntryTree::new();
        tree.insert_file("tree/a/b/c.txt", bytes("c")).unwrap();

        match tree.lookup("tree/a") {
            Lookup::Directory(children) => {
                assert_eq!(children.into_iter().collect::<Vec<_>>(), vec!["b"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        match tree.lookup("") {
            Lookup::Directory(children) => assert!(children.contains("tree")),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_file_and_directory_conflict() {
        let mut tree = EntryTree::new();
        tree.insert_file("a", bytes("x")).unwrap();
        assert!(tree.insert_file("a/b", bytes("y")).is_err());
        assert!(tree.insert_dir("a").is_err());

        tree.insert_dir("d").unwrap();
        assert!(tree.insert_file("d", bytes("z")).is_err());
    }

    #[test]
    fn test_remove_subtree() {
        let mut tree = EntryTree::new();
        tree.insert_file("webroot/subdir/subfile.html", bytes("s")).unwrap();
        tree.insert_file("webroot/somefile.html", bytes("f")).unwrap();

        assert!(tree.remove("webroot/subdir"));
        assert!(!tree.lookup("webroot/subdir/subfile.html").is_found());
        match tree.lookup("webroot") {
            Lookup::Directory(children) => {
                assert_eq!(children.into_iter().collect::<Vec<_>>(), vec!["somefile.html"]);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!tree.remove("webroot/subdir"));
        assert!(!tree.remove(""));
    }

    #[test]
    fn test_replace_file_content() {
        let mut tree = EntryTree::new();
        tree.insert_file("foo", bytes("foo")).unwrap();
        tree.insert_file("foo", bytes("bar")).unwrap();
        match tree.lookup("foo") {
            Lookup::File { length, .. } => assert_eq!(length, 3),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(tree.len(), 1);
    }
}
