//! Structured decoding of extraction responses
//!
//! When a fetch carried an extraction schema, the remote service answers with
//! a JSON object mapping output keys to strings or arrays of strings. The
//! decoder populates a typed [`Record`] from that object without ever
//! aborting the caller: a body that is not valid JSON becomes an explicit
//! [`DecodeOutcome::Malformed`] carrying the original bytes, and a field whose
//! JSON shape does not match its declared cardinality becomes a
//! [`DecodeWarning`] while the remaining fields decode normally.
//!
//! "Decoded to empty" and "failed to decode" are therefore always
//! distinguishable — nothing is swallowed.
//!
//! # Examples
//!
//! ```ignore
//! use renderfetch::{compile, decode_record, DecodeOutcome};
//!
//! let schema = compile::<ListingPage>()?;
//! match decode_record::<ListingPage>(&result.body, &schema) {
//!     DecodeOutcome::Clean { record, .. } => println!("title: {}", record.title),
//!     DecodeOutcome::Partial { record, warnings, .. } => {
//!         for w in &warnings {
//!             eprintln!("decode warning: {}", w);
//!         }
//!         println!("partial title: {}", record.title);
//!     }
//!     DecodeOutcome::Malformed { body } => {
//!         eprintln!("not extraction JSON ({} bytes kept for inspection)", body.len());
//!     }
//! }
//! ```

use bytes::Bytes;
use serde_json::Value;

use crate::record::Record;
use crate::{Cardinality, DecodeWarning, ExtractionSchema, FieldValue};

/// Decoded values by output key, in schema order
///
/// Produced alongside the typed record so rule-based inspection can look
/// fields up by key without knowing the record type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedFields {
    entries: Vec<(String, FieldValue)>,
}

impl DecodedFields {
    /// Look up a decoded value by output key
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key == key)
            .map(|(_, value)| value)
    }

    /// Iterate decoded (key, value) pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Number of decoded fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field decoded at all
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of decoding one response body against a schema
///
/// Decoding never fails fatally; the worst case is `Malformed`, which keeps
/// the raw body for inspection while the record stays at its zero value.
#[derive(Debug, Clone)]
pub enum DecodeOutcome<T> {
    /// Every present key decoded with the declared shape
    Clean { record: T, fields: DecodedFields },

    /// The body parsed, but some fields had mismatched shapes
    ///
    /// Mismatched fields keep their zero value; the warnings say why.
    Partial {
        record: T,
        fields: DecodedFields,
        warnings: Vec<DecodeWarning>,
    },

    /// The body was not a JSON object at all
    ///
    /// Typical when the service returned raw HTML or a challenge page where
    /// extraction JSON was expected. The original bytes are kept.
    Malformed { body: Bytes },
}

impl<T> DecodeOutcome<T> {
    /// The decoded record, unless the body was malformed
    pub fn record(&self) -> Option<&T> {
        match self {
            DecodeOutcome::Clean { record, .. } | DecodeOutcome::Partial { record, .. } => {
                Some(record)
            }
            DecodeOutcome::Malformed { .. } => None,
        }
    }

    /// The decoded field map, unless the body was malformed
    pub fn fields(&self) -> Option<&DecodedFields> {
        match self {
            DecodeOutcome::Clean { fields, .. } | DecodeOutcome::Partial { fields, .. } => {
                Some(fields)
            }
            DecodeOutcome::Malformed { .. } => None,
        }
    }

    /// Warnings collected during decoding
    pub fn warnings(&self) -> &[DecodeWarning] {
        match self {
            DecodeOutcome::Partial { warnings, .. } => warnings,
            _ => &[],
        }
    }

    /// Whether the body failed to parse as extraction JSON
    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodeOutcome::Malformed { .. })
    }
}

/// Decode a response body into a typed record
///
/// Keys absent from the JSON leave their field at the zero value with no
/// warning; only shape mismatches warn. Keys in the JSON that the schema does
/// not declare are ignored.
pub fn decode_record<T: Record + Default>(
    body: &[u8],
    schema: &ExtractionSchema,
) -> DecodeOutcome<T> {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(error) => {
            tracing::debug!(%error, bytes = body.len(), "body is not valid JSON");
            return DecodeOutcome::Malformed {
                body: Bytes::copy_from_slice(body),
            };
        }
    };
    let Some(object) = value.as_object() else {
        tracing::debug!(found = json_kind(&value), "body is JSON but not an object");
        return DecodeOutcome::Malformed {
            body: Bytes::copy_from_slice(body),
        };
    };

    let mut record = T::default();
    let mut entries = Vec::new();
    let mut warnings = Vec::new();

    for spec in schema.iter() {
        let Some(raw) = object.get(spec.key()) else {
            continue;
        };

        match (spec.cardinality(), raw) {
            (Cardinality::Single, Value::String(text)) => {
                entries.push((spec.key().to_string(), FieldValue::One(text.clone())));
            }
            (Cardinality::Multiple, Value::Array(items)) => {
                let mut values = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    match item {
                        Value::String(text) => values.push(text.clone()),
                        _ => warnings.push(DecodeWarning::NonStringElement {
                            key: spec.key().to_string(),
                            index,
                        }),
                    }
                }
                entries.push((spec.key().to_string(), FieldValue::Many(values)));
            }
            (Cardinality::Single, other) => {
                warnings.push(DecodeWarning::ExpectedString {
                    key: spec.key().to_string(),
                    found: json_kind(other),
                });
            }
            (Cardinality::Multiple, other) => {
                warnings.push(DecodeWarning::ExpectedSequence {
                    key: spec.key().to_string(),
                    found: json_kind(other),
                });
            }
        }
    }

    for (key, value) in &entries {
        record.apply(key, value);
    }

    let fields = DecodedFields { entries };
    if warnings.is_empty() {
        DecodeOutcome::Clean { record, fields }
    } else {
        tracing::debug!(count = warnings.len(), "decoded with field warnings");
        DecodeOutcome::Partial {
            record,
            fields,
            warnings,
        }
    }
}

/// Human-readable name of a JSON value's kind
fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
