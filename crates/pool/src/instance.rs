//! Generic thread-safe pool of reusable instances.
//!
//! The pool keeps a stack of previously released values. Acquiring pops the
//! most recently released value (good cache locality) or builds a new one
//! with the configured initializer; releasing resets the value and pushes it
//! back unless the pool is already full.

use std::fmt;
use std::sync::Mutex;

/// A thread-safe pool of reusable values.
///
/// Reset happens on release, never on acquire, so the cost of clearing a value
/// is paid by the thread that finished with it.
///
/// # Type Parameters
///
/// * `T` - The pooled type
///
/// # Example
///
/// ```
/// use pool::Pool;
///
/// let pool: Pool<Vec<u8>> = Pool::with_custom(
///     4,
///     64,
///     Vec::with_capacity,
///     |buf, _| buf.clear(),
/// );
///
/// let mut scratch = pool.get();
/// scratch.extend_from_slice(b"data");
/// pool.put(scratch);
///
/// assert_eq!(pool.available(), 1);
/// assert!(pool.get().is_empty());
/// ```
pub struct Pool<T> {
    values: Mutex<Vec<T>>,
    max_retained: usize,
    capacity_hint: usize,
    initializer: fn(usize) -> T,
    resetter: fn(&mut T, usize),
}

impl<T> Pool<T> {
    /// Creates a pool with user-defined initialization and reset.
    ///
    /// # Arguments
    ///
    /// * `max_retained` - Maximum number of released values kept for reuse
    /// * `capacity_hint` - Size hint passed to `initializer` and `resetter`
    /// * `initializer` - Builds a fresh value when the pool is empty
    /// * `resetter` - Restores a released value to its pristine state
    #[must_use]
    pub fn with_custom(
        max_retained: usize,
        capacity_hint: usize,
        initializer: fn(usize) -> T,
        resetter: fn(&mut T, usize),
    ) -> Self {
        Self {
            values: Mutex::new(Vec::with_capacity(max_retained)),
            max_retained,
            capacity_hint,
            initializer,
            resetter,
        }
    }

    /// Acquires a value, reusing a released one when available.
    #[must_use]
    pub fn get(&self) -> T {
        let value = {
            let mut values = self.values.lock().expect("instance pool mutex poisoned");
            values.pop()
        };

        value.unwrap_or_else(|| (self.initializer)(self.capacity_hint))
    }

    /// Resets `value` and returns it to the pool.
    ///
    /// The value is dropped instead when the pool already holds
    /// [`max_retained`](Self::max_retained) values.
    pub fn put(&self, mut value: T) {
        (self.resetter)(&mut value, self.capacity_hint);

        let mut values = self.values.lock().expect("instance pool mutex poisoned");
        if values.len() < self.max_retained {
            values.push(value);
        } else {
            tracing::trace!(
                target: "pool",
                max_retained = self.max_retained,
                "pool full, dropping released value"
            );
        }
    }

    /// Returns the number of values currently waiting for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.values.lock().expect("instance pool mutex poisoned").len()
    }

    /// Returns the maximum number of values the pool will retain.
    #[must_use]
    pub fn max_retained(&self) -> usize {
        self.max_retained
    }

    /// Returns the size hint handed to the initializer.
    #[must_use]
    pub fn capacity_hint(&self) -> usize {
        self.capacity_hint
    }
}

impl<T: Default> Pool<T> {
    /// Creates a pool whose values are built with [`Default`] and reset by
    /// replacing them with a fresh default.
    #[must_use]
    pub fn new(max_retained: usize) -> Self {
        Self::with_custom(max_retained, 0, |_| T::default(), |value, _| {
            *value = T::default();
        })
    }
}

impl<T> fmt::Debug for Pool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("available", &self.available())
            .field("max_retained", &self.max_retained)
            .field("capacity_hint", &self.capacity_hint)
            .finish()
    }
}
