//! Errors raised while planning or emitting response transforms.
//!
//! Every variant is fatal to the current generation run: no partial output
//! is produced for a document that fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("Failed to parse OpenAPI spec: {0}")]
    Parse(String),

    #[error("Not implemented ref: {0} (only #/components/schemas/<name> is supported)")]
    UnsupportedReferenceKind(String),

    #[error("Reference {reference} points at unknown schema '{name}'")]
    UnknownSchema { reference: String, name: String },

    #[error("Type '{0}' is not defined under components.schemas")]
    UnknownType(String),

    #[error("Duplicate operation name '{0}'. Each operation must have a unique identifier.")]
    DuplicateOperationName(String),

    #[error("Object schema declares both properties and additionalProperties")]
    ConflictingObjectShape,

    #[error("Object schema has no properties and no additionalProperties")]
    EmptyObjectSchema,

    #[error("Emptiness of '{0}' requested before its transformation was built")]
    PrematureEmptinessCheck(String),
}
