use proc_macro_error::{abort_call_site, proc_macro_error};
use syn::parse_macro_input;

use record_derive::Record;

mod codegen;
mod parse;
mod record_derive;
mod types;
mod validate;

/// Derive macro for the Record trait
///
/// This macro implements the `Record` trait for your struct, describing each
/// field as an (output key, selector, cardinality) triple for the remote
/// extraction service and generating the code that writes decoded values back
/// into the struct.
///
/// # Field Attributes
///
/// - `#[field(selector = "...")]` - selector expression sent to the remote
///   service (required for a field to participate in extraction)
/// - `#[field(rename = "...")]` - output key to use instead of the field name
///
/// Fields without a `#[field(...)]` attribute are ignored; they keep their
/// `Default` value after decoding.
///
/// # Supported Field Types
///
/// - `String` - the field expects exactly one extracted value
/// - `Vec<String>` - the field expects a sequence of zero or more values
///
/// The remote service returns extracted values as JSON strings, so no other
/// field types are supported.
///
/// # Examples
///
/// ## Basic Usage
///
/// ```ignore
/// use renderfetch::Record;
///
/// #[derive(Debug, Default, Record)]
/// struct ListingPage {
///     #[field(selector = "h1")]
///     title: String,
///
///     #[field(selector = ".prhead > h3 > a @href", rename = "urls")]
///     listing_urls: Vec<String>,
/// }
/// ```
///
/// ## Attribute References
///
/// A selector expression may end with an attribute reference such as `@href`.
/// The expression is passed to the remote service verbatim; this crate never
/// interprets selector syntax.
///
/// ```ignore
/// #[derive(Debug, Default, Record)]
/// struct DetailPage {
///     #[field(selector = "h1.pb3")]
///     title: String,
///
///     #[field(selector = "#prddtl > table > tbody > tr > th")]
///     detail_labels: Vec<String>,
/// }
/// ```
#[proc_macro_error]
#[proc_macro_derive(Record, attributes(field))]
pub fn record_derive(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as syn::DeriveInput);
    match Record::try_from(input) {
        Ok(record) => record.generate_impl().into(),
        Err(err) => abort_call_site!(err),
    }
}
