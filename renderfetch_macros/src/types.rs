//! Type analysis utilities for field types

use syn::{GenericArgument, PathArguments, Type, TypePath};

/// Check if a type is String
pub fn is_string(ty: &Type) -> bool {
    if let Type::Path(TypePath { path, .. }) = ty
        && let Some(segment) = path.segments.last()
    {
        return segment.ident == "String" && segment.arguments.is_none();
    }
    false
}

/// Check if a type is Vec<String>
pub fn is_vec_of_string(ty: &Type) -> bool {
    if let Type::Path(TypePath { path, .. }) = ty
        && let Some(segment) = path.segments.last()
        && segment.ident == "Vec"
        && let PathArguments::AngleBracketed(args) = &segment.arguments
        && let Some(GenericArgument::Type(inner)) = args.args.first()
    {
        return is_string(inner);
    }
    false
}
