//! Name-based encoder registration.
//!
//! Logging hosts select encoders by name from configuration. [`install`]
//! registers the human encoder as [`HUMAN_ENCODER_NAME`] in the process-wide
//! [`registry`]; calling it more than once is harmless.

use std::collections::HashMap;
use std::sync::{Mutex, Once, OnceLock};

use crate::config::EncoderConfig;
use crate::encoder::{Encoder, HumanEncoder};
use crate::error::{EncodeError, RegistryError};

/// Name the human encoder is registered under.
pub const HUMAN_ENCODER_NAME: &str = "human";

/// Builds an encoder from host-supplied options.
pub type EncoderConstructor = fn(EncoderConfig) -> Result<Box<dyn Encoder>, EncodeError>;

/// Thread-safe map from encoder names to constructors.
#[derive(Debug, Default)]
pub struct EncoderRegistry {
    constructors: Mutex<HashMap<String, EncoderConstructor>>,
}

impl EncoderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `constructor` under `name`.
    ///
    /// # Errors
    ///
    /// Fails when `name` is empty or already taken.
    pub fn register(
        &self,
        name: &str,
        constructor: EncoderConstructor,
    ) -> Result<(), RegistryError> {
        if name.is_empty() {
            return Err(RegistryError::EmptyName);
        }
        let mut constructors = self.constructors.lock().expect("registry lock poisoned");
        if constructors.contains_key(name) {
            return Err(RegistryError::AlreadyRegistered(name.to_owned()));
        }
        constructors.insert(name.to_owned(), constructor);
        Ok(())
    }

    /// Builds the encoder registered under `name`.
    ///
    /// # Errors
    ///
    /// Fails when nothing is registered under `name` or its constructor fails.
    pub fn build(&self, name: &str, config: EncoderConfig) -> Result<Box<dyn Encoder>, RegistryError> {
        let constructor = self
            .constructors
            .lock()
            .expect("registry lock poisoned")
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownEncoder(name.to_owned()))?;
        constructor(config).map_err(|source| RegistryError::Construct {
            name: name.to_owned(),
            source,
        })
    }

    /// Returns the registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .constructors
            .lock()
            .expect("registry lock poisoned")
            .keys()
            .cloned()
            .collect();
        names.sort_unstable();
        names
    }
}

/// Returns the process-wide registry.
pub fn registry() -> &'static EncoderRegistry {
    static REGISTRY: OnceLock<EncoderRegistry> = OnceLock::new();
    REGISTRY.get_or_init(EncoderRegistry::new)
}

/// Constructs a [`HumanEncoder`] behind the [`Encoder`] interface.
///
/// # Errors
///
/// Never fails; the signature matches [`EncoderConstructor`].
pub fn new_human_encoder(config: EncoderConfig) -> Result<Box<dyn Encoder>, EncodeError> {
    Ok(Box::new(HumanEncoder::new(config)))
}

/// Registers the human encoder in the process-wide registry, once.
pub fn install() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        install_into(registry());
    });
}

/// Registers the human encoder in `registry`; returns whether it was added.
///
/// A name clash is logged rather than raised.
pub fn install_into(registry: &EncoderRegistry) -> bool {
    match registry.register(HUMAN_ENCODER_NAME, new_human_encoder) {
        Ok(()) => {
            tracing::debug!(target: "human::registry", name = HUMAN_ENCODER_NAME, "encoder registered");
            true
        }
        Err(error) => {
            tracing::warn!(target: "human::registry", %error, "could not register encoder");
            false
        }
    }
}
