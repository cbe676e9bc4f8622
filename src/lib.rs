// Re-export the Record derive macro
pub use renderfetch_macros::Record;

// Core modules
mod client;
mod decode;
mod error;
mod inspect;
mod record;
mod schema;

// Public exports
pub use client::{
    ConfigError, DEFAULT_ENDPOINT, FetchClient, FetchClientBuilder, FetchError, FetchRequest,
    FetchResult, ProxyTier, ServiceError,
};
pub use decode::{DecodeOutcome, DecodedFields, decode_record};
pub use error::{DecodeWarning, SchemaError};
pub use inspect::{Inspector, Rule, Verdict};
pub use record::{FieldValue, Record as RecordTrait};
pub use schema::{Cardinality, ExtractionSchema, FieldSpec, compile};
