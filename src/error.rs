//! Error types for schema compilation and response decoding
//!
//! This module provides error types for failures that originate locally: a
//! declaration that cannot be compiled into an extraction schema, and
//! per-field warnings collected while decoding a response body. Transport and
//! service failures live with the fetch client.

/// Errors that can occur when compiling a declaration into an extraction schema
///
/// Schema errors are fatal for the declaration that produced them: the caller
/// must fix the declaration, and retrying the compile will never help.
///
/// # Examples
///
/// ```ignore
/// use renderfetch::{ExtractionSchema, FieldSpec, Cardinality, SchemaError};
///
/// let specs = vec![
///     FieldSpec::new("title", "h1", Cardinality::Single),
///     FieldSpec::new("title", "h2", Cardinality::Single),
/// ];
///
/// match ExtractionSchema::from_specs(specs) {
///     Err(SchemaError::DuplicateKey { key }) => {
///         eprintln!("Output key '{}' is declared twice", key);
///     }
///     other => panic!("expected duplicate key error, got {:?}", other),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The declaration has no addressable fields
    ///
    /// A declaration contributes nothing to extraction if none of its fields
    /// carry a selector expression.
    #[error("Declaration has no extractable fields")]
    EmptyDeclaration,

    /// Two fields produce the same output key
    #[error("Duplicate output key '{key}'")]
    DuplicateKey { key: String },

    /// A field's selector expression is empty
    ///
    /// Selector syntax is otherwise opaque to this crate; only emptiness is
    /// rejected locally. The remote service validates the rest.
    #[error("Field '{key}' has an empty selector expression")]
    EmptySelector { key: String },
}

/// Per-field warnings collected while decoding a response body
///
/// A warning means the remote service returned a JSON value whose shape does
/// not match the declared cardinality for that output key. The field keeps its
/// zero value and decoding of the remaining fields continues.
///
/// # Examples
///
/// ```ignore
/// use renderfetch::DecodeOutcome;
///
/// match outcome {
///     DecodeOutcome::Partial { record, warnings, .. } => {
///         for warning in &warnings {
///             eprintln!("decode warning: {}", warning);
///         }
///         // record is still usable; mismatched fields are zero-valued
///     }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeWarning {
    /// A single-cardinality field received something other than a JSON string
    #[error("Field '{key}' expected a string, got {found}")]
    ExpectedString { key: String, found: &'static str },

    /// A multiple-cardinality field received something other than a JSON array
    #[error("Field '{key}' expected a sequence of strings, got {found}")]
    ExpectedSequence { key: String, found: &'static str },

    /// An element of a sequence field was not a JSON string
    ///
    /// The string elements of the sequence are still applied to the field.
    #[error("Field '{key}' has a non-string element at index {index}")]
    NonStringElement { key: String, index: usize },
}
