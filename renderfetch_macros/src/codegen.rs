//! Code generation for Record trait implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

use crate::parse::FieldAttrs;
use crate::types;

/// Generate the complete Record trait implementation
pub fn generate_record_impl(input: &DeriveInput) -> TokenStream {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let (spec_entries, apply_arms) = generate_field_code(input);

    quote! {
        impl #impl_generics renderfetch::RecordTrait for #name #ty_generics #where_clause {
            fn field_specs() -> Vec<renderfetch::FieldSpec> {
                vec![
                    #(#spec_entries),*
                ]
            }

            fn apply(&mut self, key: &str, value: &renderfetch::FieldValue) {
                match (key, value) {
                    #(#apply_arms)*
                    _ => {}
                }
            }
        }
    }
}

/// Generate spec entries and apply arms for all extracted fields
fn generate_field_code(input: &DeriveInput) -> (Vec<TokenStream>, Vec<TokenStream>) {
    let mut spec_entries = Vec::new();
    let mut apply_arms = Vec::new();

    if let Data::Struct(data) = &input.data
        && let Fields::Named(fields) = &data.fields
    {
        for field in &fields.named {
            let field_name = field.ident.as_ref().unwrap();

            let field_attrs = match FieldAttrs::from_attributes(&field.attrs) {
                Ok(attrs) => attrs,
                Err(_) => continue,
            };

            // Fields without a selector stay at their Default value
            let Some(selector) = field_attrs.selector else {
                continue;
            };

            let key = field_attrs
                .rename
                .unwrap_or_else(|| field_name.to_string());

            if types::is_vec_of_string(&field.ty) {
                spec_entries.push(quote! {
                    renderfetch::FieldSpec::new(#key, #selector, renderfetch::Cardinality::Multiple)
                });
                apply_arms.push(quote! {
                    (#key, renderfetch::FieldValue::Many(values)) => {
                        self.#field_name = values.clone();
                    }
                });
            } else {
                spec_entries.push(quote! {
                    renderfetch::FieldSpec::new(#key, #selector, renderfetch::Cardinality::Single)
                });
                apply_arms.push(quote! {
                    (#key, renderfetch::FieldValue::One(value)) => {
                        self.#field_name = value.clone();
                    }
                });
            }
        }
    }

    (spec_entries, apply_arms)
}
