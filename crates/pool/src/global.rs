//! crates/pool/src/global.rs
//! Process-wide buffer pool singleton.

use std::sync::OnceLock;

use crate::buffer::BufferPool;
use crate::error::PoolError;

/// Default capacity reserved for a freshly allocated buffer (1 KiB).
pub const DEFAULT_INITIAL_CAPACITY: usize = 1024;

static GLOBAL: OnceLock<BufferPool> = OnceLock::new();

/// Sizing for a [`BufferPool`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PoolSettings {
    /// Maximum number of idle buffers retained for reuse.
    pub max_retained: usize,
    /// Capacity reserved when a new buffer has to be allocated.
    pub initial_capacity: usize,
}

impl Default for PoolSettings {
    /// Retains four buffers per available core.
    fn default() -> Self {
        let cores = std::thread::available_parallelism()
            .map(|p| p.get())
            .unwrap_or(4);
        Self {
            max_retained: cores * 4,
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Installs the process-wide buffer pool.
///
/// Must run before the first call to [`global`]; later calls fail with
/// [`PoolError::AlreadyInitialized`] and leave the installed pool untouched.
pub fn init_global(settings: PoolSettings) -> Result<(), PoolError> {
    let mut installed = false;
    GLOBAL.get_or_init(|| {
        installed = true;
        BufferPool::new(settings)
    });

    if installed {
        tracing::debug!(
            target: "pool",
            max_retained = settings.max_retained,
            initial_capacity = settings.initial_capacity,
            "installed global buffer pool"
        );
        Ok(())
    } else {
        Err(PoolError::AlreadyInitialized)
    }
}

/// Returns the process-wide buffer pool, installing a default one on first use.
pub fn global() -> &'static BufferPool {
    GLOBAL.get_or_init(|| BufferPool::new(PoolSettings::default()))
}
