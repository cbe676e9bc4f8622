//! Validation logic for derive macro inputs

use syn::{Data, DeriveInput, Error, Fields, Result};

use crate::parse::FieldAttrs;
use crate::types;

/// Validate that the derive macro is only used on structs with named fields
pub fn validate_struct_with_named_fields(input: &DeriveInput) -> Result<()> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(_) => Ok(()),
            _ => Err(Error::new_spanned(
                input,
                "Record can only be derived for structs with named fields",
            )),
        },
        Data::Enum(_) => Err(Error::new_spanned(
            input,
            "Record can only be derived for structs, not enums",
        )),
        Data::Union(_) => Err(Error::new_spanned(
            input,
            "Record can only be derived for structs, not unions",
        )),
    }
}

/// Validate that an extracted field has a supported type
///
/// The remote service only produces JSON strings and arrays of strings, so
/// extracted fields must be `String` or `Vec<String>`.
pub fn validate_field_type(field: &syn::Field) -> Result<()> {
    if types::is_string(&field.ty) || types::is_vec_of_string(&field.ty) {
        return Ok(());
    }

    let field_name = field
        .ident
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_else(|| "unnamed field".to_string());

    Err(Error::new_spanned(
        field,
        format!(
            "Field '{}' must be String or Vec<String> to carry an extracted value",
            field_name
        ),
    ))
}

/// Validate that a field's selector expression is not empty
pub fn validate_selector_not_empty(field: &syn::Field, attrs: &FieldAttrs) -> Result<()> {
    if let Some(selector) = &attrs.selector
        && selector.trim().is_empty()
    {
        let field_name = field
            .ident
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_else(|| "unnamed field".to_string());

        return Err(Error::new_spanned(
            field,
            format!("Field '{}' has an empty selector expression", field_name),
        ));
    }
    Ok(())
}

/// Validate that a rename attribute does not produce an empty output key
pub fn validate_rename_not_empty(field: &syn::Field, attrs: &FieldAttrs) -> Result<()> {
    if let Some(rename) = &attrs.rename
        && rename.trim().is_empty()
    {
        let field_name = field
            .ident
            .as_ref()
            .map(|i| i.to_string())
            .unwrap_or_else(|| "unnamed field".to_string());

        return Err(Error::new_spanned(
            field,
            format!("Field '{}' has an empty rename key", field_name),
        ));
    }
    Ok(())
}
