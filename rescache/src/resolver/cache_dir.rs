//! The private on-disk cache root owned by one resolver.
//!
//! The root is named `<base>/rescache-cache-<uuid>`. The name is reserved when
//! the resolver is built, the directory is created on first use, and the
//! whole tree is removed when the resolver closes. A destroyed cache
//! directory is never recreated.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use uuid::Uuid;

use super::logical;
use crate::error::{Error, Result};

/// Fixed prefix of every cache root directory name.
pub const CACHE_DIR_PREFIX: &str = "rescache-cache";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Reserved,
    Created,
    Destroyed,
}

/// An exclusively owned cache root.
///
/// # Examples
///
/// ```
/// use rescache::resolver::CacheDirectory;
///
/// let base = tempfile::tempdir().unwrap();
/// let cache = CacheDirectory::reserve(base.path()).unwrap();
/// assert!(!cache.root().exists());
///
/// cache.ensure_created().unwrap();
/// assert!(cache.root().is_dir());
///
/// cache.destroy().unwrap();
/// assert!(!cache.root().exists());
/// assert!(cache.ensure_created().is_err());
/// ```
#[derive(Debug)]
pub struct CacheDirectory {
    root: PathBuf,
    state: Mutex<State>,
    // Lets `ensure_created` skip the mutex once the root exists.
    created: AtomicBool,
}

impl CacheDirectory {
    /// Reserves a fresh, uniquely named root under `base`.
    ///
    /// Nothing is written to disk. A relative `base` is resolved against the
    /// current working directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or
    /// `base` climbs above the filesystem root.
    pub fn reserve(base: impl AsRef<Path>) -> Result<Self> {
        let base = base.as_ref();
        let absolute = if base.is_absolute() {
            base.to_path_buf()
        } else {
            env::current_dir()?.join(base)
        };
        let base = logical::lexical_absolute(&absolute).ok_or_else(|| Error::InvalidPath {
            path: base.to_path_buf(),
            reason: "cache directory base escapes the filesystem root".to_string(),
        })?;

        let root = base.join(format!("{CACHE_DIR_PREFIX}-{}", Uuid::new_v4()));
        log::debug!("Reserved cache directory {}", root.display());
        Ok(Self {
            root,
            state: Mutex::new(State::Reserved),
            created: AtomicBool::new(false),
        })
    }

    /// The absolute cache root path, whether or not it exists yet.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the root has been created and not yet destroyed.
    #[must_use]
    pub fn is_created(&self) -> bool {
        self.created.load(Ordering::Acquire)
    }

    /// Whether [`destroy`](Self::destroy) has run.
    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) == State::Destroyed
    }

    /// Creates the root if it does not exist yet and returns it.
    ///
    /// Safe to call from many threads at once; exactly one of them creates
    /// the directory. On Unix the root is made accessible to the owner only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResolverClosed`] once the directory has been
    /// destroyed, or an I/O error if creation fails.
    pub fn ensure_created(&self) -> Result<&Path> {
        if self.created.load(Ordering::Acquire) {
            return Ok(&self.root);
        }

        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match *state {
            State::Created => return Ok(&self.root),
            State::Destroyed => return Err(Error::ResolverClosed),
            State::Reserved => {}
        }

        if let Some(base) = self.root.parent() {
            fs::create_dir_all(base)?;
        }
        match fs::create_dir(&self.root) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && self.root.is_dir() => {}
            Err(e) => return Err(e.into()),
        }
        restrict_permissions(&self.root)?;

        *state = State::Created;
        self.created.store(true, Ordering::Release);
        log::debug!("Created cache directory {}", self.root.display());
        Ok(&self.root)
    }

    /// Removes the whole tree. Later calls to
    /// [`ensure_created`](Self::ensure_created) fail.
    ///
    /// Returns `true` if this call removed a tree from disk. Destroying twice
    /// is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the tree exists but cannot be removed. The
    /// directory still counts as destroyed.
    pub fn destroy(&self) -> Result<bool> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::mem::replace(&mut *state, State::Destroyed);
        self.created.store(false, Ordering::Release);
        if previous != State::Created {
            return Ok(false);
        }

        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                log::debug!("Removed cache directory {}", self.root.display());
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// The logical path of `path` relative to the root, if `path` is inside
    /// it.
    #[must_use]
    pub fn rebase(&self, path: &Path) -> Option<String> {
        logical::rebase(&self.root, path)
    }

    /// The on-disk location of a logical path.
    #[must_use]
    pub fn entry_path(&self, logical: &str) -> PathBuf {
        self.root.join(logical::to_native(logical))
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
