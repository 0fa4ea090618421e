//! SHACL validation reports in the W3C report vocabulary.

use crate::constraint::ConstraintComponent;
use crate::model::ShapeId;
use dodaf_semantic::vocab::{RDF, SH, XSD, rdf, sh, xsd};
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term, Triple};
use oxttl::TurtleSerializer;
use std::fmt;
use std::io;

/// Severity of a validation result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    Violation,
    Warning,
    Info,
    /// A custom severity IRI declared with `sh:severity`.
    Other(NamedNode),
}

impl Severity {
    pub fn iri(&self) -> NamedNode {
        match self {
            Self::Violation => sh::VIOLATION.to_named_node(),
            Self::Warning => sh::WARNING.to_named_node(),
            Self::Info => sh::INFO.to_named_node(),
            Self::Other(iri) => iri.clone(),
        }
    }

    pub fn from_iri(iri: NamedNodeRef<'_>) -> Self {
        if iri == sh::VIOLATION.as_named_node() {
            Self::Violation
        } else if iri == sh::WARNING.as_named_node() {
            Self::Warning
        } else if iri == sh::INFO.as_named_node() {
            Self::Info
        } else {
            Self::Other(iri.into_owned())
        }
    }

    /// Warnings and infos do not break conformance. Unknown severities do.
    pub fn breaks_conformance(&self) -> bool {
        matches!(self, Self::Violation | Self::Other(_))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Violation => f.write_str("Violation"),
            Self::Warning => f.write_str("Warning"),
            Self::Info => f.write_str("Info"),
            Self::Other(iri) => write!(f, "{iri}"),
        }
    }
}

/// A single validation result.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub focus_node: Term,
    /// The property of the property shape, if the result comes from one.
    pub result_path: Option<NamedNode>,
    /// The offending value, when there is one.
    pub value: Option<Term>,
    pub source_shape: ShapeId,
    pub source_constraint_component: ConstraintComponent,
    pub result_message: Option<String>,
    pub result_severity: Severity,
}

impl ValidationResult {
    pub fn new(
        focus_node: Term,
        source_shape: ShapeId,
        source_constraint_component: ConstraintComponent,
    ) -> Self {
        Self {
            focus_node,
            result_path: None,
            value: None,
            source_shape,
            source_constraint_component,
            result_message: None,
            result_severity: Severity::Violation,
        }
    }

    #[must_use]
    pub fn with_path(mut self, path: NamedNode) -> Self {
        self.result_path = Some(path);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: Term) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.result_message = Some(message.into());
        self
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.result_severity = severity;
        self
    }
}

/// A SHACL validation report.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    conforms: bool,
    results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            conforms: true,
            results: Vec::new(),
        }
    }

    pub fn conforms(&self) -> bool {
        self.conforms
    }

    pub fn results(&self) -> &[ValidationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<ValidationResult> {
        self.results
    }

    pub fn violation_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.result_severity.breaks_conformance())
            .count()
    }

    pub fn add_result(&mut self, result: ValidationResult) {
        if result.result_severity.breaks_conformance() {
            self.conforms = false;
        }
        self.results.push(result);
    }

    /// Converts the report to an RDF graph.
    pub fn to_graph(&self) -> Graph {
        let mut graph = Graph::new();
        let report = BlankNode::default();
        graph.insert(&Triple::new(
            report.clone(),
            rdf::TYPE.to_named_node(),
            sh::VALIDATION_REPORT.to_named_node(),
        ));
        graph.insert(&Triple::new(
            report.clone(),
            sh::CONFORMS.to_named_node(),
            Literal::new_typed_literal(self.conforms.to_string(), xsd::BOOLEAN.to_named_node()),
        ));

        for result in &self.results {
            let node = BlankNode::default();
            graph.insert(&Triple::new(
                report.clone(),
                sh::RESULT.to_named_node(),
                node.clone(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                rdf::TYPE.to_named_node(),
                sh::VALIDATION_RESULT.to_named_node(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::FOCUS_NODE.to_named_node(),
                result.focus_node.clone(),
            ));
            if let Some(path) = &result.result_path {
                graph.insert(&Triple::new(
                    node.clone(),
                    sh::RESULT_PATH.to_named_node(),
                    path.clone(),
                ));
            }
            if let Some(value) = &result.value {
                graph.insert(&Triple::new(
                    node.clone(),
                    sh::VALUE.to_named_node(),
                    value.clone(),
                ));
            }
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_SHAPE.to_named_node(),
                result.source_shape.to_term(),
            ));
            graph.insert(&Triple::new(
                node.clone(),
                sh::SOURCE_CONSTRAINT_COMPONENT.to_named_node(),
                result.source_constraint_component.iri(),
            ));
            if let Some(message) = &result.result_message {
                graph.insert(&Triple::new(
                    node.clone(),
                    sh::RESULT_MESSAGE.to_named_node(),
                    Literal::new_simple_literal(message),
                ));
            }
            graph.insert(&Triple::new(
                node,
                sh::RESULT_SEVERITY.to_named_node(),
                result.result_severity.iri(),
            ));
        }

        graph
    }

    /// Serializes [`Self::to_graph`] as Turtle.
    pub fn to_turtle(&self) -> io::Result<String> {
        graph_to_turtle(&self.to_graph())
    }
}

/// Serializes a report graph as Turtle with the `rdf`, `sh` and `xsd` prefixes.
pub fn graph_to_turtle(graph: &Graph) -> io::Result<String> {
    let mut serializer = TurtleSerializer::new();
    for namespace in [RDF, SH, XSD] {
        serializer = serializer
            .with_prefix(namespace.prefix(), namespace.base())
            .map_err(io::Error::other)?;
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in graph {
        writer.serialize_triple(triple)?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes).map_err(io::Error::other)
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodaf_semantic::parse_turtle;

    fn result(severity: Severity) -> ValidationResult {
        ValidationResult::new(
            NamedNode::new_unchecked("http://ex.org/w1").into(),
            ShapeId::Named(NamedNode::new_unchecked("http://ex.org#WidgetShape")),
            ConstraintComponent::MinCount,
        )
        .with_path(NamedNode::new_unchecked("http://ex.org#name"))
        .with_message("Expected at least 1 value(s), got 0")
        .with_severity(severity)
    }

    #[test]
    fn only_violations_and_unknown_severities_break_conformance() {
        let mut report = ValidationReport::new();
        report.add_result(result(Severity::Warning));
        report.add_result(result(Severity::Info));
        assert!(report.conforms());
        report.add_result(result(Severity::Other(NamedNode::new_unchecked("http://ex.org#Critical"))));
        assert!(!report.conforms());
        assert_eq!(report.violation_count(), 1);
    }

    #[test]
    fn severity_from_iri() {
        assert_eq!(Severity::from_iri(sh::WARNING.as_named_node()), Severity::Warning);
        assert_eq!(
            Severity::from_iri(NamedNodeRef::new_unchecked("http://ex.org#Critical")),
            Severity::Other(NamedNode::new_unchecked("http://ex.org#Critical"))
        );
    }

    #[test]
    fn severity_iri() {
        assert_eq!(Severity::Violation.iri().as_str(), "http://www.w3.org/ns/shacl#Violation");
        let custom = NamedNode::new_unchecked("http://ex.org#Critical");
        assert_eq!(Severity::Other(custom.clone()).iri(), custom);
        assert_eq!(Severity::from_iri(Severity::Info.iri().as_ref()), Severity::Info);
    }

    #[test]
    fn report_graph_uses_w3c_vocabulary() {
        let mut report = ValidationReport::new();
        report.add_result(result(Severity::Violation));
        let graph = report.to_graph();
        assert_eq!(
            graph
                .subjects_for_predicate_object(rdf::TYPE.as_named_node(), sh::VALIDATION_RESULT.as_named_node())
                .count(),
            1
        );
        let conforms: Vec<_> = graph
            .triples_for_predicate(sh::CONFORMS.as_named_node())
            .map(|t| t.object.to_string())
            .collect();
        assert_eq!(conforms, ["\"false\"^^<http://www.w3.org/2001/XMLSchema#boolean>"]);

        let turtle = report.to_turtle().unwrap();
        assert_eq!(parse_turtle(&turtle).unwrap().len(), graph.len());
    }
}
