use std::path::Path;

use tempfile::NamedTempFile;

/// A working file that disappears when this handle drops, including when a
/// response stream is abandoned mid-flight.
pub struct ScratchFile {
    inner: NamedTempFile,
}

impl ScratchFile {
    /// Creates a fresh scratch file, in `dir` when given, otherwise in the
    /// system temp directory.
    pub fn create_in(dir: Option<&Path>) -> anyhow::Result<Self> {
        let inner = match dir {
            Some(dir) => NamedTempFile::new_in(dir)?,
            None => NamedTempFile::new()?,
        };
        Ok(Self { inner })
    }

    pub fn as_file(&self) -> &std::fs::File {
        self.inner.as_file()
    }

    pub fn as_file_mut(&mut self) -> &mut std::fs::File {
        self.inner.as_file_mut()
    }

    /// Opens a second read handle with its own cursor at the start. The
    /// delete-on-drop guard stays with `self`.
    pub fn reopen(&self) -> std::io::Result<std::fs::File> {
        self.inner.reopen()
    }

    pub fn path(&self) -> &Path {
        self.inner.path()
    }
}
