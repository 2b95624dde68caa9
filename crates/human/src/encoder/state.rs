//! Per-render mutable state and the pool that recycles it.

use std::sync::LazyLock;

use pool::{Buffer, Pool};

use crate::reflect::ReflectedEncoder;

/// Idle encoder states kept for reuse.
const MAX_IDLE_STATES: usize = 64;

static STATES: LazyLock<Pool<EncoderState>> = LazyLock::new(|| EncoderState::pool(MAX_IDLE_STATES));

/// Returns the process-wide encoder state pool.
pub(crate) fn states() -> &'static Pool<EncoderState> {
    &STATES
}

/// Mutable half of an encoder.
///
/// Reset on release: the output buffer is detached and empty, the namespace
/// depth is zero, and the side buffer for opaque values goes back to the
/// buffer pool.
#[derive(Default)]
pub(crate) struct EncoderState {
    pub(crate) buf: Buffer,
    pub(crate) open_namespaces: usize,
    pub(crate) array: ArrayCursor,
    pub(crate) reflect: Option<ReflectScratch>,
}

impl EncoderState {
    pub(crate) fn pool(max_idle: usize) -> Pool<Self> {
        Pool::new(max_idle)
    }
}

/// Side buffer and encoder for opaque values, created on first use.
pub(crate) struct ReflectScratch {
    pub(crate) buf: Buffer,
    pub(crate) encoder: Box<dyn ReflectedEncoder>,
}

/// Tracks whether unkeyed values are being written as array elements.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct ArrayCursor {
    open: bool,
    written: usize,
}

impl ArrayCursor {
    pub(crate) const fn opened() -> Self {
        Self {
            open: true,
            written: 0,
        }
    }

    /// Counts one element; returns whether a separator must precede it.
    pub(crate) fn next_needs_separator(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.written += 1;
        self.written > 1
    }
}
