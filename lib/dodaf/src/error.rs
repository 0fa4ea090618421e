use dodaf_semantic::SchemaError;
use dodaf_shacl::ShaclError;

/// An error raised while assembling the ontology or its validators.
///
/// Validating a document never fails with this type: problems with the document end up in its
/// [`DocumentValidationResult`](crate::DocumentValidationResult).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DocumentError {
    /// A schema of the ontology is malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// The generated shapes could not be loaded.
    #[error("Unable to load the generated SHACL shapes: {0}")]
    Shapes(#[from] ShaclError),
}
