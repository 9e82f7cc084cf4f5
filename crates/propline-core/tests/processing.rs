// crates/propline-core/tests/processing.rs
// ============================================================================
// Module: Processing Chain Tests
// Description: Named processor dispatch and built-in processors.
// Purpose: Ensure unknown processors fail fast and causes are preserved.
// Dependencies: propline-core, base64
// ============================================================================

//! ## Overview
//! Covers unknown processor names, directive ordering, the Base64 decoder,
//! and decryption through a pluggable test decryptor.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use propline_core::Arguments;
use propline_core::DECRYPT_PROCESSOR;
use propline_core::DecryptProcessor;
use propline_core::Decryptor;
use propline_core::Engine;
use propline_core::EngineBuildError;
use propline_core::InvocationContext;
use propline_core::Processor;
use propline_core::ProcessorDirective;
use propline_core::ProcessorError;
use propline_core::ProcessorName;
use propline_core::PropertyValue;
use propline_core::ResolutionError;
use propline_core::TypeDescriptor;

use crate::common::map;
use crate::common::property;

/// XOR cipher used only to exercise the decrypt processor.
struct XorDecryptor(u8);

impl Decryptor for XorDecryptor {
    fn name(&self) -> &str {
        "xor"
    }

    fn decrypt(
        &self,
        _ctx: &InvocationContext<'_>,
        ciphertext: &[u8],
    ) -> Result<Vec<u8>, ProcessorError> {
        if ciphertext.is_empty() {
            return Err(ProcessorError::invalid_input("empty ciphertext"));
        }
        Ok(ciphertext.iter().map(|byte| byte ^ self.0).collect())
    }
}

/// Appends the directive argument.
struct Suffix;

impl Processor for Suffix {
    fn process(
        &self,
        _ctx: &InvocationContext<'_>,
        directive: &ProcessorDirective,
        value: &str,
    ) -> Result<String, ProcessorError> {
        Ok(format!("{value}{}", directive.argument.as_deref().unwrap_or_default()))
    }
}

fn encrypt(plain: &str, key: u8) -> String {
    let bytes: Vec<u8> = plain.bytes().map(|byte| byte ^ key).collect();
    STANDARD.encode(bytes)
}

#[test]
fn unknown_processor_fails_even_when_value_resolves() {
    let engine = Engine::builder().resolver(map(&[("secret", "plain")])).build().unwrap();
    let method = property("secret", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("rot13"));
    let err = engine.invoke(&method, &Arguments::none()).unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::UnknownProcessor { ref processor, .. } if processor == "rot13"
    ));
}

#[test]
fn unknown_processor_is_detected_before_known_ones_run() {
    let engine = Engine::builder()
        .resolver(map(&[("v", "a")]))
        .processor("suffix", Suffix)
        .build()
        .unwrap();
    let method = property("v", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("suffix").with_argument("!"))
        .with_processor(ProcessorDirective::new("missing"));
    let err = engine.invoke(&method, &Arguments::none()).unwrap_err();
    assert!(matches!(err, ResolutionError::UnknownProcessor { .. }));
}

#[test]
fn directives_apply_in_declaration_order() {
    let engine = Engine::builder()
        .resolver(map(&[("v", "a")]))
        .processor("suffix", Suffix)
        .build()
        .unwrap();
    let method = property("v", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("suffix").with_argument("1"))
        .with_processor(ProcessorDirective::new("suffix").with_argument("2"));
    let value = engine.invoke(&method, &Arguments::none()).unwrap();
    assert_eq!(value, PropertyValue::String("a12".to_string()));
}

#[test]
fn duplicate_processor_names_fail_the_build() {
    let err = Engine::builder().processor("p", Suffix).processor("p", Suffix).build().err();
    assert_eq!(err, Some(EngineBuildError::DuplicateProcessor(ProcessorName::new("p"))));
}

#[test]
fn base64_decode_supports_variants() {
    let encoded = URL_SAFE_NO_PAD.encode("a?b>c");
    let engine = Engine::builder()
        .resolver(map(&[("std", "aGVsbG8="), ("url", encoded.as_str()), ("bad", "***")]))
        .builtin_processors()
        .build()
        .unwrap();
    let std_method = property("std", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("base64-decode"));
    let url_method = property("url", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("base64-decode").with_argument("url-no-pad"));
    let bad_method = property("bad", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new("base64-decode"));
    assert_eq!(
        engine.invoke(&std_method, &Arguments::none()).unwrap(),
        PropertyValue::String("hello".to_string())
    );
    assert_eq!(
        engine.invoke(&url_method, &Arguments::none()).unwrap(),
        PropertyValue::String("a?b>c".to_string())
    );
    let err = engine.invoke(&bad_method, &Arguments::none()).unwrap_err();
    let ResolutionError::ProcessingFailure {
        source: ref failure @ ProcessorError::InvalidInput { .. },
        ..
    } = err
    else {
        panic!("expected invalid input, got {err:?}");
    };
    assert!(std::error::Error::source(failure).is_some());
}

#[test]
fn decrypt_runs_after_expansion_and_before_conversion() {
    let ciphertext = encrypt("8080", 0x2A);
    let decrypt = DecryptProcessor::new().with_decryptor(XorDecryptor(0x2A)).unwrap();
    let engine = Engine::builder()
        .resolver(map(&[("port", "${encrypted.port}"), ("encrypted.port", ciphertext.as_str())]))
        .processor(DECRYPT_PROCESSOR, decrypt)
        .build()
        .unwrap();
    let method = property("port", TypeDescriptor::U16)
        .with_processor(ProcessorDirective::new(DECRYPT_PROCESSOR).with_argument("xor"));
    assert_eq!(engine.invoke(&method, &Arguments::none()).unwrap(), PropertyValue::U16(8080));
}

#[test]
fn decrypt_failures_keep_their_cause() {
    let decrypt = DecryptProcessor::new().with_decryptor(XorDecryptor(1)).unwrap();
    let engine = Engine::builder()
        .resolver(map(&[("empty", ""), ("ok", "AA=="), ("garbled", "!!not-base64!!")]))
        .processor(DECRYPT_PROCESSOR, decrypt)
        .build()
        .unwrap();
    let empty = property("empty", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new(DECRYPT_PROCESSOR).with_argument("xor"));
    let err = engine.invoke(&empty, &Arguments::none()).unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::ProcessingFailure {
            ref processor,
            source: ProcessorError::InvalidInput { source: None, .. },
        } if processor == DECRYPT_PROCESSOR
    ));
    let unknown = property("ok", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new(DECRYPT_PROCESSOR).with_argument("aes"));
    let err = engine.invoke(&unknown, &Arguments::none()).unwrap_err();
    assert!(matches!(
        err,
        ResolutionError::ProcessingFailure { source: ProcessorError::Configuration(_), .. }
    ));
    let garbled = property("garbled", TypeDescriptor::String)
        .with_processor(ProcessorDirective::new(DECRYPT_PROCESSOR).with_argument("xor"));
    let err = engine.invoke(&garbled, &Arguments::none()).unwrap_err();
    let processing = std::error::Error::source(&err).expect("processor error");
    assert!(processing.to_string().contains("invalid base64 ciphertext"));
    let decode = processing.source().expect("base64 decode error");
    assert!(decode.downcast_ref::<base64::DecodeError>().is_some());
}

#[test]
fn duplicate_decryptors_are_rejected() {
    let result = DecryptProcessor::new()
        .with_decryptor(XorDecryptor(1))
        .and_then(|processor| processor.with_decryptor(XorDecryptor(2)));
    assert!(matches!(result, Err(ProcessorError::Configuration(_))));
}
