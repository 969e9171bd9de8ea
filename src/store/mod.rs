//! File storage abstraction layer
//!
//! The resolver reads the version file and the persister writes the version
//! record through the [FileStore] trait, so both can run against an in-memory
//! store in tests.
//!
//! - [local::LocalFileStore]: reads and writes the real file system
//! - [mock::MemoryStore]: in-memory store that records reads
//!
//! ```rust
//! # use image_tagger::store::FileStore;
//! # use std::path::Path;
//! # fn example<S: FileStore>(store: &S) -> std::io::Result<()> {
//! let bytes = store.read(Path::new("version.json"))?;
//! store.write(Path::new("version.json"), &bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod local;
pub mod mock;

pub use local::LocalFileStore;
pub use mock::MemoryStore;

use std::io;
use std::path::Path;

/// Whole-file read/write capability
///
/// Errors are plain `io::Error`s; callers decide whether a failure is fatal.
pub trait FileStore: Send + Sync {
    /// Read the full contents of `path`
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - File contents
    /// * `Err` - Not found, permission denied, or any other I/O failure
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write `contents` to `path`, replacing anything already there
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

impl<T: FileStore + ?Sized> FileStore for &T {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        (**self).write(path, contents)
    }
}
