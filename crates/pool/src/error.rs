//! crates/pool/src/error.rs
//! Error type for pool configuration.

/// Errors reported while configuring pools.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum PoolError {
    /// The process-wide buffer pool was already installed.
    #[error("global buffer pool is already initialized")]
    AlreadyInitialized,
}
