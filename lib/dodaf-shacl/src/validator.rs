use crate::engine::GraphValidator;
use crate::error::ShaclError;
use crate::jsonld::JsonLdExpander;
use crate::model::ShapesGraph;
use crate::report::{ValidationReport, ValidationResult, graph_to_turtle};
use dodaf_semantic::{
    ContextOptions, SemanticSchema, ShaclOptions, generate_context, generate_shacl_turtle,
};
use oxrdf::{Graph, Term};
use serde_json::Value;
use std::fmt;
use std::io;
use tracing::{info, warn};

/// Severity of a [`ShaclValidationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSeverity {
    Error,
    Warning,
    Info,
}

impl ResultSeverity {
    /// Maps a SHACL severity IRI.
    ///
    /// Anything that is neither a warning nor an info is an error, including custom severities.
    pub fn from_severity_iri(iri: &str) -> Self {
        if iri.contains("Violation") {
            Self::Error
        } else if iri.contains("Warning") {
            Self::Warning
        } else if iri.contains("Info") {
            Self::Info
        } else {
            Self::Error
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ResultSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One itemized finding of a [`ShaclValidationResult`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaclValidationError {
    pub focus_node: String,
    pub path: Option<String>,
    /// Compact name of the constraint component, `sh:MinCountConstraintComponent` for example.
    pub constraint: String,
    pub message: String,
    pub severity: ResultSeverity,
    pub source_shape: String,
}

impl ShaclValidationError {
    fn from_result(result: &ValidationResult) -> Self {
        Self {
            focus_node: term_text(&result.focus_node),
            path: result.result_path.as_ref().map(|p| p.as_str().to_owned()),
            constraint: result.source_constraint_component.name(),
            message: result.result_message.clone().unwrap_or_default(),
            severity: ResultSeverity::from_severity_iri(result.result_severity.iri().as_str()),
            source_shape: term_text(&result.source_shape.to_term()),
        }
    }
}

impl fmt::Display for ShaclValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.focus_node)?;
        if let Some(path) = &self.path {
            write!(f, " {path}")?;
        }
        write!(f, ": {} ({})", self.message, self.constraint)
    }
}

/// Outcome of [`ShaclValidator::validate`].
#[derive(Debug, Clone)]
pub struct ShaclValidationResult {
    pub conforms: bool,
    pub results: Vec<ShaclValidationError>,
    /// The W3C validation report graph.
    pub report: Graph,
}

impl ShaclValidationResult {
    fn from_report(report: &ValidationReport) -> Self {
        Self {
            conforms: report.conforms(),
            results: report
                .results()
                .iter()
                .map(ShaclValidationError::from_result)
                .collect(),
            report: report.to_graph(),
        }
    }

    /// The result of a run that could not check anything.
    fn failure(focus_node: String, error: &ShaclError) -> Self {
        Self {
            conforms: false,
            results: vec![ShaclValidationError {
                focus_node,
                path: None,
                constraint: String::from("validation"),
                message: format!("SHACL validation failed: {error}"),
                severity: ResultSeverity::Error,
                source_shape: String::new(),
            }],
            report: Graph::new(),
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &ShaclValidationError> {
        self.results
            .iter()
            .filter(|r| r.severity == ResultSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ShaclValidationError> {
        self.results
            .iter()
            .filter(|r| r.severity != ResultSeverity::Error)
    }

    pub fn report_turtle(&self) -> io::Result<String> {
        graph_to_turtle(&self.report)
    }
}

/// Validates JSON-LD documents against a shapes graph loaded once at construction.
///
/// The shapes are never mutated after construction, so one validator can serve concurrent
/// [`validate`](Self::validate) calls. Every call expands into its own data graph.
#[derive(Debug, Clone)]
pub struct ShaclValidator {
    engine: GraphValidator,
    expander: JsonLdExpander,
}

impl ShaclValidator {
    /// Builds the validator from the SHACL shapes and JSON-LD context generated for `schemas`.
    ///
    /// The generated context is injected into documents that have no `@context` of their own.
    pub fn from_schemas(
        schemas: &[SemanticSchema],
        shacl_options: &ShaclOptions,
        context_options: &ContextOptions,
    ) -> Result<Self, ShaclError> {
        let shapes = generate_shacl_turtle(schemas, shacl_options);
        let context = generate_context(schemas, context_options);
        let mut validator = Self::from_turtle(&shapes)?
            .with_context(Value::Object(context.terms().clone()));
        if let Some(base) = context_options.base() {
            validator = validator.with_base_iri(base);
        }
        Ok(validator)
    }

    /// Builds the validator from a pre-written shapes document.
    pub fn from_turtle(shapes: &str) -> Result<Self, ShaclError> {
        let shapes = ShapesGraph::from_turtle(shapes)?;
        info!(shapes = shapes.len(), "loaded SHACL shapes");
        Ok(Self {
            engine: GraphValidator::new(shapes),
            expander: JsonLdExpander::new(),
        })
    }

    /// Context used for documents without `@context`.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.expander = self.expander.with_context(context);
        self
    }

    /// Base IRI for relative `@id` values.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.expander = self.expander.with_base_iri(base_iri);
        self
    }

    /// Resolves the context URL `url` to `document` instead of fetching it.
    #[must_use]
    pub fn with_remote_context(mut self, url: impl Into<String>, document: impl Into<String>) -> Self {
        self.expander = self.expander.with_remote_context(url, document);
        self
    }

    pub fn shapes(&self) -> &ShapesGraph {
        self.engine.shapes()
    }

    pub fn expander(&self) -> &JsonLdExpander {
        &self.expander
    }

    /// Validates a JSON-LD document. Failures to expand or check it are reported as a single
    /// error in the result.
    pub fn validate(&self, document: &Value) -> ShaclValidationResult {
        let outcome = self
            .expander
            .to_graph(document)
            .and_then(|graph| self.engine.validate(&graph));
        match outcome {
            Ok(report) => ShaclValidationResult::from_report(&report),
            Err(error) => {
                warn!(%error, "SHACL validation could not run");
                ShaclValidationResult::failure(document_id(document), &error)
            }
        }
    }

    /// Validates an RDF graph directly.
    pub fn validate_graph(&self, graph: &Graph) -> ShaclValidationResult {
        match self.engine.validate(graph) {
            Ok(report) => ShaclValidationResult::from_report(&report),
            Err(error) => ShaclValidationResult::failure(String::new(), &error),
        }
    }
}

fn document_id(document: &Value) -> String {
    ["@id", "id"]
        .into_iter()
        .find_map(|key| document.get(key)?.as_str())
        .unwrap_or_default()
        .to_owned()
}

fn term_text(term: &Term) -> String {
    match term {
        Term::NamedNode(n) => n.as_str().to_owned(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_mapping_fails_closed() {
        assert_eq!(
            ResultSeverity::from_severity_iri("http://www.w3.org/ns/shacl#Violation"),
            ResultSeverity::Error
        );
        assert_eq!(
            ResultSeverity::from_severity_iri("http://www.w3.org/ns/shacl#Warning"),
            ResultSeverity::Warning
        );
        assert_eq!(
            ResultSeverity::from_severity_iri("http://www.w3.org/ns/shacl#Info"),
            ResultSeverity::Info
        );
        assert_eq!(
            ResultSeverity::from_severity_iri("http://ex.org#Critical"),
            ResultSeverity::Error
        );
        assert_eq!(ResultSeverity::from_severity_iri(""), ResultSeverity::Error);
    }

    #[test]
    fn invalid_shapes_are_an_error() {
        ShaclValidator::from_turtle("this is not turtle").unwrap_err();
    }
}
