use std::collections::HashSet;

use proc_macro2::TokenStream;
use syn::{Data, DeriveInput, Error, Fields, Result};

use crate::codegen;
use crate::parse::FieldAttrs;
use crate::validate;

#[derive(Debug)]
pub struct Record {
    input: DeriveInput,
}

impl TryFrom<DeriveInput> for Record {
    type Error = syn::Error;

    fn try_from(input: DeriveInput) -> Result<Self> {
        // Validate that it's a struct with named fields
        validate::validate_struct_with_named_fields(&input)?;

        // Validate each extracted field and check output keys for uniqueness
        let mut seen_keys = HashSet::new();
        if let Data::Struct(data) = &input.data
            && let Fields::Named(fields) = &data.fields
        {
            for field in &fields.named {
                let attrs = FieldAttrs::from_attributes(&field.attrs)?;
                if !attrs.is_extracted() {
                    continue;
                }

                validate::validate_field_type(field)?;
                validate::validate_selector_not_empty(field, &attrs)?;
                validate::validate_rename_not_empty(field, &attrs)?;

                let key = attrs
                    .rename
                    .clone()
                    .unwrap_or_else(|| field.ident.as_ref().unwrap().to_string());
                if !seen_keys.insert(key.clone()) {
                    return Err(Error::new_spanned(
                        field,
                        format!("Duplicate output key '{}'", key),
                    ));
                }
            }
        }

        Ok(Self { input })
    }
}

impl Record {
    pub fn generate_impl(&self) -> TokenStream {
        codegen::generate_record_impl(&self.input)
    }
}
