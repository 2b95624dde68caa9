//! Pooled growable byte buffers.
//!
//! [`BufferPool`] hands out [`Buffer`] values backed by a [`Pool`] of byte
//! vectors. A buffer remembers the pool it came from and returns its storage
//! there when dropped, so finished log records can be handed to a caller
//! without the caller knowing about the pool. Detaching with
//! [`Buffer::into_vec`] transfers the storage out for good.

use std::fmt::{self, Write as _};
use std::io;
use std::sync::Arc;

use crate::global::PoolSettings;
use crate::instance::Pool;

/// Precision used when appending a floating point value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FloatWidth {
    /// Shortest text that round-trips through an `f32`.
    F32,
    /// Shortest text that round-trips through an `f64`.
    F64,
}

/// A thread-safe pool of growable byte buffers.
///
/// Cloning the pool is cheap and every clone hands out buffers from the same
/// shared storage.
#[derive(Clone, Debug)]
pub struct BufferPool {
    storage: Arc<Pool<Vec<u8>>>,
}

impl BufferPool {
    /// Creates a buffer pool sized by `settings`.
    #[must_use]
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            storage: Arc::new(Pool::with_custom(
                settings.max_retained,
                settings.initial_capacity,
                Vec::with_capacity,
                |bytes, _| bytes.clear(),
            )),
        }
    }

    /// Acquires an empty buffer that returns to this pool when dropped.
    #[must_use]
    pub fn get(&self) -> Buffer {
        Buffer {
            bytes: self.storage.get(),
            origin: Some(Arc::clone(&self.storage)),
        }
    }

    /// Returns the number of idle buffers waiting for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.storage.available()
    }

    /// Returns the maximum number of idle buffers the pool retains.
    #[must_use]
    pub fn max_retained(&self) -> usize {
        self.storage.max_retained()
    }
}

/// A growable, append-only byte buffer.
///
/// Buffers obtained from a [`BufferPool`] give their storage back to the pool
/// on drop. Buffers built with [`Buffer::new`] are detached and simply free
/// their memory.
pub struct Buffer {
    bytes: Vec<u8>,
    origin: Option<Arc<Pool<Vec<u8>>>>,
}

impl Buffer {
    /// Creates an empty buffer that does not belong to any pool.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            origin: None,
        }
    }

    /// Appends a single byte.
    pub fn append_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }

    /// Appends raw bytes.
    pub fn append_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a string.
    pub fn append_str(&mut self, s: &str) {
        self.bytes.extend_from_slice(s.as_bytes());
    }

    /// Appends the base-10 text of a signed integer.
    pub fn append_int(&mut self, value: i64) {
        let _ = write!(self, "{value}");
    }

    /// Appends the base-10 text of an unsigned integer.
    pub fn append_uint(&mut self, value: u64) {
        let _ = write!(self, "{value}");
    }

    /// Appends the shortest decimal text that round-trips at `width`.
    ///
    /// Non-finite values are written as Rust formats them (`NaN`, `inf`,
    /// `-inf`); callers wanting a different spelling must special-case them.
    pub fn append_float(&mut self, value: f64, width: FloatWidth) {
        let _ = match width {
            FloatWidth::F32 => write!(self, "{}", value as f32),
            FloatWidth::F64 => write!(self, "{value}"),
        };
    }

    /// Appends `true` or `false`.
    pub fn append_bool(&mut self, value: bool) {
        self.append_str(if value { "true" } else { "false" });
    }

    /// Removes a single trailing `\n`, if present.
    pub fn trim_newline(&mut self) {
        if self.bytes.last() == Some(&b'\n') {
            self.bytes.pop();
        }
    }

    /// Returns the number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Reports whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the current capacity of the underlying storage.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Discards the contents while keeping the allocation.
    pub fn reset(&mut self) {
        self.bytes.clear();
    }

    /// Reports whether the buffer will return to a pool when dropped.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        self.origin.is_some()
    }

    /// Detaches the storage from its pool and returns it.
    #[must_use]
    pub fn into_vec(mut self) -> Vec<u8> {
        self.origin = None;
        std::mem::take(&mut self.bytes)
    }

    /// Returns the buffer to its pool.
    ///
    /// Equivalent to dropping it; spelled out for call sites that want the
    /// release to be visible.
    pub fn free(self) {
        drop(self);
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        if let Some(origin) = self.origin.take() {
            origin.put(std::mem::take(&mut self.bytes));
        }
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("contents", &String::from_utf8_lossy(&self.bytes))
            .field("pooled", &self.is_pooled())
            .finish()
    }
}

impl fmt::Write for Buffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

impl io::Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append_bytes(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.append_bytes(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
