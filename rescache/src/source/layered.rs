//! Ordered search over several resource sources.

use std::collections::BTreeSet;

use super::{Lookup, ResourceSource};
use crate::error::Result;

/// Searches a list of sources in order, like a classpath.
///
/// A file is served by the first layer that has anything at the path. When
/// that first match is a directory, the listing becomes the union of the
/// listings of every layer with a directory at the same path, so a
/// directory split across several archives materializes as one tree. A
/// later layer that has a file where an earlier one has a directory is
/// shadowed.
///
/// # Examples
///
/// ```
/// use rescache::source::{LayeredSource, Lookup, MemorySource, ResourceSource};
///
/// let app = MemorySource::new();
/// app.insert_file("webroot/index.html", b"app".to_vec());
/// let lib = MemorySource::new();
/// lib.insert_file("webroot/lib.js", b"lib".to_vec());
///
/// let mut layered = LayeredSource::new(Vec::new());
/// layered.push(app);
/// layered.push(lib);
/// match layered.lookup("webroot").unwrap() {
///     Lookup::Directory(children) => assert_eq!(children.len(), 2),
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
pub struct LayeredSource {
    layers: Vec<Box<dyn ResourceSource>>,
}

impl LayeredSource {
    /// Creates a source searching `layers` front to back.
    #[must_use]
    pub fn new(layers: Vec<Box<dyn ResourceSource>>) -> Self {
        Self { layers }
    }

    /// Appends a layer with the lowest precedence.
    pub fn push(&mut self, layer: impl ResourceSource + 'static) {
        self.layers.push(Box::new(layer));
    }

    /// Number of layers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether there are no layers at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

/// Unions the directory listings found in `rest` into `children`.
fn merge_listings<'a>(
    path: &str,
    children: &mut BTreeSet<String>,
    rest: impl Iterator<Item = &'a Box<dyn ResourceSource>>,
) -> Result<()> {
    for layer in rest {
        match layer.lookup(path)? {
            Lookup::Directory(more) => children.extend(more),
            Lookup::File { .. } => {
                log::debug!("{} shadows a file at '{path}'", layer.describe());
            }
            Lookup::NotFound => {}
        }
    }
    Ok(())
}

impl ResourceSource for LayeredSource {
    fn lookup(&self, path: &str) -> Result<Lookup> {
        let mut layers = self.layers.iter();
        while let Some(layer) = layers.next() {
            match layer.lookup(path)? {
                Lookup::NotFound => continue,
                Lookup::Directory(mut children) => {
                    merge_listings(path, &mut children, layers.by_ref())?;
                    return Ok(Lookup::Directory(children));
                }
                file @ Lookup::File { .. } => return Ok(file),
            }
        }
        Ok(Lookup::NotFound)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.layers.iter().map(|l| l.describe()).collect();
        format!("layered [{}]", names.join(", "))
    }
}
