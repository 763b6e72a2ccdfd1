//! Filesystems that config lookups read from

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor, Seek};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;

/// A buffered, seekable byte stream. Format sniffing peeks at the leading
/// bytes and rewinds, so plain `Read` is not enough.
pub trait BufReadSeek: BufRead + Seek + Send {}

impl<T: BufRead + Seek + Send> BufReadSeek for T {}

pub trait Filesystem: Send + Sync {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufReadSeek>>;
}

impl<F: Filesystem + ?Sized> Filesystem for Arc<F> {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufReadSeek>> {
        (**self).open(path)
    }
}

impl<F: Filesystem + ?Sized> Filesystem for &F {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufReadSeek>> {
        (**self).open(path)
    }
}

/// Lexically normalise `path` to a relative path.
///
/// A leading `/` is dropped, `.` is skipped and `..` pops a component.
/// Climbing above the root is reported as `NotFound`.
pub fn clean(path: &str) -> io::Result<PathBuf> {
    let mut cleaned = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    return Err(io::Error::new(
                        io::ErrorKind::NotFound,
                        format!("{path}: file does not exist"),
                    ));
                }
            }
            Component::Normal(part) => cleaned.push(part),
        }
    }
    Ok(cleaned)
}

/// The OS filesystem, rooted at a working directory.
#[derive(Debug, Clone)]
pub struct OsFs {
    working_dir: PathBuf,
}

impl OsFs {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    pub fn resolve(&self, path: &str) -> io::Result<PathBuf> {
        Ok(self.working_dir.join(clean(path)?))
    }
}

impl Filesystem for OsFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufReadSeek>> {
        let resolved = self.resolve(path)?;
        log::trace!("Opening {}", resolved.display());
        let file = File::open(resolved)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory filesystem keyed by cleaned path.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RwLock<HashMap<PathBuf, Arc<[u8]>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: &str, data: impl Into<Arc<[u8]>>) -> io::Result<()> {
        self.files.write().insert(clean(path)?, data.into());
        Ok(())
    }

    pub fn remove(&self, path: &str) -> bool {
        match clean(path) {
            Ok(key) => self.files.write().remove(&key).is_some(),
            Err(_) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.files.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.read().is_empty()
    }
}

impl Filesystem for MemoryFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn BufReadSeek>> {
        let key = clean(path)?;
        let data = self.files.read().get(&key).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("{path}: file does not exist"),
            )
        })?;
        Ok(Box::new(Cursor::new(data)))
    }
}
