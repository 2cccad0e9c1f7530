use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use tempfile::NamedTempFile;

/// Tempfiles of writes currently in progress.
struct InFlight(Mutex<Vec<PathBuf>>);

impl InFlight {
    const fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    fn slots(&self) -> MutexGuard<'_, Vec<PathBuf>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn register(&self, path: &Path) {
        self.slots().push(path.to_path_buf());
    }

    fn release(&self, path: &Path) {
        self.slots().retain(|p| p != path);
    }

    fn remove_all(&self) {
        for path in self.slots().drain(..) {
            // Already persisted when this races the writer.
            let _ = std::fs::remove_file(path);
        }
    }
}

static IN_FLIGHT: InFlight = InFlight::new();

/// Atomically write `data` to `path` using a tempfile in the same directory.
///
/// The parent directory must already exist; a missing parent surfaces as an
/// I/O error. An existing file at `path` is replaced.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    let tmp_path = tmp.path().to_path_buf();
    IN_FLIGHT.register(&tmp_path);
    let written = write_and_persist(tmp, path, data);
    IN_FLIGHT.release(&tmp_path);
    written
}

fn write_and_persist(mut tmp: NamedTempFile, path: &Path, data: &[u8]) -> Result<()> {
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Remove the tempfiles of interrupted [`atomic_write`] calls.
///
/// For signal handlers that exit the process without unwinding, where the
/// tempfile's own cleanup never runs.
pub fn remove_in_flight() {
    IN_FLIGHT.remove_all();
}
