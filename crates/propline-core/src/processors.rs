// crates/propline-core/src/processors.rs
// ============================================================================
// Module: Propline Built-In Processors
// Description: Base64 decoding and pluggable decryption processors.
// Purpose: Transform resolved values that are stored encoded or encrypted.
// Dependencies: base64, crate::interfaces
// ============================================================================

//! ## Overview
//! [`Base64DecodeProcessor`] decodes a value with the alphabet named by the
//! directive argument. [`DecryptProcessor`] Base64-decodes a value and hands
//! the bytes to the [`Decryptor`] named by the directive argument; concrete
//! ciphers are supplied by the application.
//! Invariants:
//! - Decoded output must be UTF-8.
//! - Decryptor names are unique within a processor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::engine::general_purpose::URL_SAFE;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

use crate::core::method::ProcessorDirective;
use crate::interfaces::Processor;
use crate::interfaces::ProcessorError;
use crate::runtime::context::InvocationContext;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Registry name of the Base64 decoding processor.
pub const BASE64_DECODE_PROCESSOR: &str = "base64-decode";

/// Registry name of the decryption processor.
pub const DECRYPT_PROCESSOR: &str = "decrypt";

// ============================================================================
// SECTION: Base64
// ============================================================================

/// Returns the Base64 engine named by `variant`.
fn base64_engine(variant: Option<&str>) -> Result<&'static GeneralPurpose, ProcessorError> {
    match variant.unwrap_or("standard") {
        "standard" => Ok(&STANDARD),
        "standard-no-pad" => Ok(&STANDARD_NO_PAD),
        "url" => Ok(&URL_SAFE),
        "url-no-pad" => Ok(&URL_SAFE_NO_PAD),
        other => Err(ProcessorError::Configuration(format!("unknown base64 variant '{other}'"))),
    }
}

/// Converts decoded bytes to UTF-8 text.
fn utf8(bytes: Vec<u8>) -> Result<String, ProcessorError> {
    String::from_utf8(bytes).map_err(|err| ProcessorError::Failed {
        message: "processed value is not valid UTF-8".to_string(),
        source: Some(Box::new(err)),
    })
}

/// Decodes Base64 values using the alphabet named by the directive argument.
///
/// Arguments: `standard` (default), `standard-no-pad`, `url`, `url-no-pad`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Base64DecodeProcessor;

impl Processor for Base64DecodeProcessor {
    fn process(
        &self,
        _ctx: &InvocationContext<'_>,
        directive: &ProcessorDirective,
        value: &str,
    ) -> Result<String, ProcessorError> {
        let engine = base64_engine(directive.argument.as_deref())?;
        let bytes = engine
            .decode(value)
            .map_err(|err| ProcessorError::invalid_input_with_source("invalid base64", err))?;
        utf8(bytes)
    }
}

// ============================================================================
// SECTION: Decryption
// ============================================================================

/// Pluggable cipher used by [`DecryptProcessor`].
pub trait Decryptor: Send + Sync {
    /// Name selected by the `decrypt` directive argument.
    fn name(&self) -> &str;

    /// Decrypts `ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError`] when the ciphertext is invalid.
    fn decrypt(
        &self,
        ctx: &InvocationContext<'_>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProcessorError>;
}

/// Processor decrypting Base64-encoded ciphertext with a named decryptor.
#[derive(Clone, Default)]
pub struct DecryptProcessor {
    /// Decryptors keyed by name.
    decryptors: BTreeMap<String, Arc<dyn Decryptor>>,
}

impl DecryptProcessor {
    /// Creates a processor without decryptors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a decryptor under its own name.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::Configuration`] when the name is taken.
    pub fn register(&mut self, decryptor: Arc<dyn Decryptor>) -> Result<(), ProcessorError> {
        let name = decryptor.name().to_string();
        if self.decryptors.contains_key(&name) {
            return Err(ProcessorError::Configuration(format!("duplicate decryptor '{name}'")));
        }
        self.decryptors.insert(name, decryptor);
        Ok(())
    }

    /// Registers a decryptor and returns the processor.
    ///
    /// # Errors
    ///
    /// Returns [`ProcessorError::Configuration`] when the name is taken.
    pub fn with_decryptor(
        mut self,
        decryptor: impl Decryptor + 'static,
    ) -> Result<Self, ProcessorError> {
        self.register(Arc::new(decryptor))?;
        Ok(self)
    }
}

impl Processor for DecryptProcessor {
    fn process(
        &self,
        ctx: &InvocationContext<'_>,
        directive: &ProcessorDirective,
        value: &str,
    ) -> Result<String, ProcessorError> {
        let Some(name) = directive.argument.as_deref() else {
            return Err(ProcessorError::Configuration(
                "decrypt directive must name a decryptor".to_string(),
            ));
        };
        let Some(decryptor) = self.decryptors.get(name) else {
            return Err(ProcessorError::Configuration(format!("unknown decryptor '{name}'")));
        };
        let ciphertext = STANDARD.decode(value).map_err(|err| {
            ProcessorError::invalid_input_with_source("invalid base64 ciphertext", err)
        })?;
        utf8(decryptor.decrypt(ctx, &ciphertext)?)
    }
}
