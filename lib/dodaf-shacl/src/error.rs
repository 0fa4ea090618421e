//! Error types for SHACL validation.

use oxiri::IriParseError;
use oxjsonld::JsonLdSyntaxError;
use oxrdf::Term;
use oxttl::TurtleSyntaxError;

/// Main error type for SHACL operations.
///
/// [`ShaclValidator`](crate::ShaclValidator) folds these into its result. They only surface from
/// the lower-level [`ShapesGraph`](crate::ShapesGraph) and [`GraphValidator`](crate::GraphValidator)
/// entry points.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclError {
    /// The shapes graph does not describe valid shapes.
    #[error(transparent)]
    Parse(#[from] ShaclParseError),
    /// The shapes Turtle could not be parsed.
    #[error("Invalid shapes document: {0}")]
    Turtle(#[from] TurtleSyntaxError),
    /// The JSON-LD document could not be expanded.
    #[error("JSON-LD expansion failed: {0}")]
    JsonLd(#[from] JsonLdSyntaxError),
    /// The document is not serializable JSON.
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    /// The configured base IRI is not an absolute IRI.
    #[error("Invalid base IRI: {0}")]
    BaseIri(#[from] IriParseError),
}

/// Error type for reading shapes from an RDF graph.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ShaclParseError {
    /// Invalid shape definition.
    #[error("Invalid shape definition for {shape}: {message}")]
    InvalidShape { shape: Term, message: String },

    /// Invalid RDF list.
    #[error("Invalid RDF list in shape {shape}: {message}")]
    InvalidRdfList { shape: Term, message: String },

    /// Invalid regex pattern.
    #[error("Invalid regex pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// Only predicate paths are supported.
    #[error("Unsupported property path {path} in shape {shape}")]
    UnsupportedPath { shape: Term, path: Term },
}

impl ShaclParseError {
    pub fn invalid_shape(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub fn invalid_rdf_list(shape: impl Into<Term>, message: impl Into<String>) -> Self {
        Self::InvalidRdfList {
            shape: shape.into(),
            message: message.into(),
        }
    }

    pub fn invalid_regex(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRegex {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}
