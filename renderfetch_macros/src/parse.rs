//! Attribute parsing for #[field(...)] attributes

use syn::{Attribute, Lit, Result};

/// Field-level attributes from #[field(...)]
#[derive(Debug, Default, Clone)]
pub struct FieldAttrs {
    /// Selector expression for the field (e.g., #[field(selector = "h1")])
    pub selector: Option<String>,

    /// Output key override (e.g., #[field(rename = "urls")])
    pub rename: Option<String>,
}

impl FieldAttrs {
    /// Parse field attributes from a list of attributes
    pub fn from_attributes(attrs: &[Attribute]) -> Result<Self> {
        let mut field_attrs = FieldAttrs::default();

        for attr in attrs {
            if !attr.path().is_ident("field") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("selector") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        field_attrs.selector = Some(s.value());
                    } else {
                        return Err(meta.error("selector must be a string literal"));
                    }
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    if let Lit::Str(s) = lit {
                        field_attrs.rename = Some(s.value());
                    } else {
                        return Err(meta.error("rename must be a string literal"));
                    }
                    Ok(())
                } else {
                    Err(meta.error("unknown field attribute"))
                }
            })?;
        }

        Ok(field_attrs)
    }

    /// Whether this field participates in extraction at all
    pub fn is_extracted(&self) -> bool {
        self.selector.is_some()
    }
}
