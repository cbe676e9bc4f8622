use crate::FieldSpec;

/// A decoded value for one output key
///
/// The remote service returns either a single string or a sequence of strings
/// per output key, matching the declared cardinality of the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A single extracted value
    One(String),
    /// A sequence of zero or more extracted values
    Many(Vec<String>),
}

impl FieldValue {
    /// The single value, if this is a `One`
    pub fn as_one(&self) -> Option<&str> {
        match self {
            FieldValue::One(value) => Some(value),
            FieldValue::Many(_) => None,
        }
    }

    /// The sequence of values, if this is a `Many`
    pub fn as_many(&self) -> Option<&[String]> {
        match self {
            FieldValue::One(_) => None,
            FieldValue::Many(values) => Some(values),
        }
    }

    /// Whether the value carries no content
    ///
    /// An empty string and an empty sequence both count as empty.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::One(value) => value.is_empty(),
            FieldValue::Many(values) => values.is_empty(),
        }
    }
}

/// Trait for types that declare extractable fields
///
/// A `Record` is the typed declaration shape behind an extraction schema: it
/// enumerates its fields as (output key, selector, cardinality) triples and
/// knows how to write decoded values back into itself. It is usually derived
/// with `#[derive(Record)]`, but can be implemented manually for declaration
/// shapes that are not plain structs.
///
/// # Deriving Record
///
/// ```ignore
/// use renderfetch::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct ListingPage {
///     #[field(selector = "h1")]
///     title: String,
///
///     #[field(selector = ".prhead > h3 > a @href")]
///     urls: Vec<String>,
/// }
/// ```
///
/// # Manual Implementation
///
/// ```ignore
/// use renderfetch::{Cardinality, FieldSpec, FieldValue, RecordTrait};
///
/// #[derive(Default)]
/// struct Headline {
///     text: String,
/// }
///
/// impl RecordTrait for Headline {
///     fn field_specs() -> Vec<FieldSpec> {
///         vec![FieldSpec::new("text", "h1", Cardinality::Single)]
///     }
///
///     fn apply(&mut self, key: &str, value: &FieldValue) {
///         if key == "text"
///             && let FieldValue::One(v) = value
///         {
///             self.text = v.clone();
///         }
///     }
/// }
/// ```
///
/// # Usage
///
/// The declaration is compiled once into an [`ExtractionSchema`] and shared
/// across any number of concurrent fetches:
///
/// ```ignore
/// use renderfetch::{compile, decode_record, DecodeOutcome};
///
/// let schema = compile::<ListingPage>()?;
/// let outcome: DecodeOutcome<ListingPage> = decode_record(&result.body, &schema);
/// ```
///
/// [`ExtractionSchema`]: crate::ExtractionSchema
pub trait Record: Sized {
    /// Enumerate this declaration's fields in declaration order
    ///
    /// Each entry describes one extractable field: its output key, the
    /// selector expression sent to the remote service, and whether it expects
    /// a single value or a sequence.
    fn field_specs() -> Vec<FieldSpec>;

    /// Write a decoded value into the field identified by `key`
    ///
    /// The decoder only calls this with values whose shape matches the
    /// declared cardinality; unknown keys and mismatched shapes are ignored.
    fn apply(&mut self, key: &str, value: &FieldValue);
}
