use oxiri::IriParseError;

/// An error raised while defining a semantic schema.
///
/// These are programmer errors: a schema that fails to build is never partially usable.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// An IRI could not be parsed.
    #[error("Invalid IRI '{iri}': {source}")]
    InvalidIri {
        iri: String,
        #[source]
        source: IriParseError,
    },
    /// Two fields share a name.
    #[error("Field '{field}' is declared twice in the schema of <{class}>")]
    DuplicateField { class: String, field: String },
    /// `minCount` is greater than `maxCount`.
    #[error("Field '{field}' of <{class}> has minCount {min} greater than maxCount {max}")]
    InvalidCardinality {
        class: String,
        field: String,
        min: u32,
        max: u32,
    },
    /// A `pattern` facet is not a valid regular expression.
    #[error("Field '{field}' of <{class}> has an invalid pattern: {message}")]
    InvalidPattern {
        class: String,
        field: String,
        message: String,
    },
    /// A context override maps to something that is neither an IRI, a compact IRI nor a keyword.
    #[error("Context entry '{term}' of <{class}> maps to '{value}', which is not an IRI")]
    InvalidContextEntry {
        class: String,
        term: String,
        value: String,
    },
}

impl SchemaError {
    pub(crate) fn invalid_iri(iri: impl Into<String>, source: IriParseError) -> Self {
        Self::InvalidIri {
            iri: iri.into(),
            source,
        }
    }
}
