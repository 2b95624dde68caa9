#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `pool` provides the allocation-recycling primitives used by the human log
//! encoder: a generic, thread-safe [`Pool`] of reusable instances and a
//! [`BufferPool`] handing out growable [`Buffer`]s that find their way back to
//! the pool when dropped.
//!
//! # Design
//!
//! Both pools use a stack of retained values guarded by a [`std::sync::Mutex`].
//! The lock is held only while pushing or popping, so contention stays low
//! even with many producer threads rendering log records at once. Every value
//! is reset before it is retained, which means an acquired value never carries
//! state from its previous user.
//!
//! A process-wide buffer pool is available through [`global`]. It can be sized
//! once with [`init_global`]; otherwise the first call to [`global`] installs
//! one built from [`PoolSettings::default`].
//!
//! # Invariants
//!
//! - A pool never retains more than its configured maximum; surplus values are
//!   dropped on release.
//! - Values returned by [`Pool::get`] and [`BufferPool::get`] are always in
//!   their reset state.
//! - A [`Buffer`] detached with [`Buffer::into_vec`] is never returned to the
//!   pool it came from.
//!
//! # Examples
//!
//! ```
//! use pool::{BufferPool, PoolSettings};
//!
//! let buffers = BufferPool::new(PoolSettings::default());
//! let mut buf = buffers.get();
//! buf.append_str("answer: ");
//! buf.append_int(42);
//! assert_eq!(buf.as_bytes(), b"answer: 42");
//!
//! drop(buf);
//! assert_eq!(buffers.available(), 1);
//! assert!(buffers.get().is_empty());
//! ```

mod buffer;
mod error;
mod global;
mod instance;

pub use buffer::{Buffer, BufferPool, FloatWidth};
pub use error::PoolError;
pub use global::{PoolSettings, global, init_global};
pub use instance::Pool;
