//! Selector schema compilation
//!
//! A typed declaration ([`Record`]) compiles into an [`ExtractionSchema`]: an
//! ordered set of (output key, selector, cardinality) triples with unique
//! keys. The schema serializes into the wire parameter the remote service
//! expects — a JSON object mapping output key to selector string, with
//! selector syntax passed through verbatim.
//!
//! Compilation is pure and deterministic: structurally identical declarations
//! always produce byte-identical wire parameters, which makes schemas safe to
//! cache per declaration type and share across concurrent fetches.
//!
//! # Examples
//!
//! ```ignore
//! use renderfetch::{compile, Record};
//!
//! #[derive(Debug, Default, Record)]
//! struct ListingPage {
//!     #[field(selector = "h1")]
//!     title: String,
//! }
//!
//! let schema = compile::<ListingPage>()?;
//! assert_eq!(schema.to_wire_param(), r#"{"title":"h1"}"#);
//! ```

use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use crate::SchemaError;
use crate::record::Record;

/// Whether a field expects one extracted value or a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Exactly one value (a JSON string on the wire)
    Single,
    /// Zero or more values (a JSON array of strings on the wire)
    Multiple,
}

/// One extractable field: output key, selector expression, cardinality
///
/// The selector expression is an opaque string, optionally suffixed with an
/// attribute reference such as `@href`. It is never parsed locally; the
/// remote service owns selector semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    key: String,
    selector: String,
    cardinality: Cardinality,
}

impl FieldSpec {
    /// Create a new FieldSpec
    pub fn new(
        key: impl Into<String>,
        selector: impl Into<String>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            key: key.into(),
            selector: selector.into(),
            cardinality,
        }
    }

    /// The output key this field decodes from
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The selector expression sent to the remote service
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The declared cardinality
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// An ordered, validated set of field specs compiled from one declaration
///
/// Immutable once compiled. Shared as `Arc<ExtractionSchema>` between the
/// compiler's cache and any number of concurrent fetch requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionSchema {
    fields: Vec<FieldSpec>,
}

impl ExtractionSchema {
    /// Build a schema from explicit field specs
    ///
    /// This is the builder path for callers that do not use the derive macro.
    /// Fails when the spec list is empty, when two specs share an output key,
    /// or when a selector expression is empty.
    pub fn from_specs(specs: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        if specs.is_empty() {
            return Err(SchemaError::EmptyDeclaration);
        }

        for (index, spec) in specs.iter().enumerate() {
            if spec.selector.trim().is_empty() {
                return Err(SchemaError::EmptySelector {
                    key: spec.key.clone(),
                });
            }
            if specs[..index].iter().any(|prior| prior.key == spec.key) {
                return Err(SchemaError::DuplicateKey {
                    key: spec.key.clone(),
                });
            }
        }

        Ok(Self { fields: specs })
    }

    /// Iterate the field specs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter()
    }

    /// Look up a field spec by output key
    pub fn get(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.key == key)
    }

    /// Number of fields in the schema
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    ///
    /// Cannot be true for a schema built through [`from_specs`], which
    /// rejects empty declarations.
    ///
    /// [`from_specs`]: ExtractionSchema::from_specs
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize the schema into the remote service's extraction parameter
    ///
    /// Produces a JSON object mapping output key to selector string, in
    /// declaration order. Selector syntax like `>` and `&` survives verbatim;
    /// JSON string escaping applies but no HTML escaping is performed.
    pub fn to_wire_param(&self) -> String {
        let mut map = serde_json::Map::with_capacity(self.fields.len());
        for spec in &self.fields {
            map.insert(
                spec.key.clone(),
                serde_json::Value::String(spec.selector.clone()),
            );
        }
        serde_json::to_string(&map).expect("string map serialization cannot fail")
    }
}

/// Global cache of compiled schemas, keyed by declaration type
///
/// Racing compiles of the same declaration produce identical schemas, so
/// insert-if-absent is enough; the first insert wins and later racers adopt
/// the cached value.
static SCHEMA_CACHE: OnceLock<RwLock<HashMap<TypeId, Arc<ExtractionSchema>>>> = OnceLock::new();

/// Compile a declaration type into a cached extraction schema
///
/// The first call for a given type validates and caches the schema; later
/// calls return the cached `Arc`. Fails with [`SchemaError`] when the
/// declaration has no extractable fields, duplicate output keys, or an empty
/// selector expression.
///
/// # Examples
///
/// ```ignore
/// let schema = renderfetch::compile::<ListingPage>()?;
/// let request = FetchRequest::new(url).schema(schema.clone());
/// ```
pub fn compile<T: Record + 'static>() -> Result<Arc<ExtractionSchema>, SchemaError> {
    let cache = SCHEMA_CACHE.get_or_init(|| RwLock::new(HashMap::new()));
    let type_id = TypeId::of::<T>();

    {
        let map = cache.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(schema) = map.get(&type_id) {
            return Ok(schema.clone());
        }
    }

    let schema = Arc::new(ExtractionSchema::from_specs(T::field_specs())?);

    let mut map = cache.write().unwrap_or_else(PoisonError::into_inner);
    Ok(map.entry(type_id).or_insert(schema).clone())
}
