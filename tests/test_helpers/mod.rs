//! Shared environment and filesystem guards for integration tests.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use std::env;
use std::ffi::OsString;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, OnceLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
static SCRATCH_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Guard that sets or clears one environment variable and restores it on
/// drop.
///
/// Holding the guard also serializes every other environment mutation made
/// through it.
pub struct EnvVarGuard {
    key: OsString,
    previous: Option<OsString>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    /// Sets `key` to `value`, or removes it when `value` is `None`.
    pub fn set(key: &str, value: Option<&str>) -> Self {
        let lock = env_lock();
        let previous = env::var_os(key);
        unsafe {
            // SAFETY: the global mutex serializes environment mutations in tests.
            match value {
                Some(new_value) => env::set_var(key, new_value),
                None => env::remove_var(key),
            }
        }
        Self {
            key: OsString::from(key),
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        unsafe {
            // SAFETY: the global mutex serializes environment mutations in tests.
            match self.previous.take() {
                Some(previous) => env::set_var(&self.key, previous),
                None => env::remove_var(&self.key),
            }
        }
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Uniquely named directory under the system temp dir, removed on drop.
pub struct ScratchDir {
    path: Utf8PathBuf,
    name: String,
    parent: Dir,
    dir: Dir,
}

impl ScratchDir {
    /// Creates a fresh scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the temp dir is not UTF-8 or cannot be written.
    pub fn new() -> io::Result<Self> {
        let temp = Utf8PathBuf::from_path_buf(env::temp_dir())
            .map_err(|_| io::Error::other("temp dir is not UTF-8"))?;
        let name = format!(
            "bounty-board-{}-{}",
            std::process::id(),
            SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed)
        );
        let parent = Dir::open_ambient_dir(&temp, ambient_authority())?;
        parent.create_dir(&name)?;
        let dir = parent.open_dir(&name)?;
        Ok(Self {
            path: temp.join(&name),
            name,
            parent,
            dir,
        })
    }

    /// Writes `contents` to `file_name` and returns the full path.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn write(&self, file_name: &str, contents: &str) -> io::Result<Utf8PathBuf> {
        self.dir.write(file_name, contents)?;
        Ok(self.path.join(file_name))
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(err) = self.parent.remove_dir_all(&self.name) {
            tracing::debug!(error = %err, path = %self.path, "scratch dir cleanup failed");
        }
    }
}
