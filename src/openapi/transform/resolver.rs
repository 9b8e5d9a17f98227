use crate::openapi::error::TransformError;
use crate::openapi::spec::{OpenApiSpec, SchemaOrBool};

pub const SCHEMA_PREFIX: &str = "#/components/schemas/";

/// Resolve a `$ref` to the component schema it names and that name.
pub fn resolve_ref<'a, 'r>(
    doc: &'a OpenApiSpec,
    reference: &'r str,
) -> Result<(&'a SchemaOrBool, &'r str), TransformError> {
    let Some(name) = reference.strip_prefix(SCHEMA_PREFIX) else {
        return Err(TransformError::UnsupportedReferenceKind(
            reference.to_string(),
        ));
    };
    let schema = doc
        .component_schema(name)
        .ok_or_else(|| TransformError::UnknownSchema {
            reference: reference.to_string(),
            name: name.to_string(),
        })?;
    Ok((schema, name))
}

/// Type name a reference points at, without looking it up.
pub fn ref_type_name(reference: &str) -> Option<&str> {
    reference.strip_prefix(SCHEMA_PREFIX)
}
