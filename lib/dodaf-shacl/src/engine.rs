//! Validation of an RDF graph against a [`ShapesGraph`].

use crate::constraint::{Constraint, ConstraintComponent};
use crate::error::ShaclError;
use crate::model::{NodeShape, PropertyShape, Shape, ShapesGraph, class_hierarchy, compile_pattern};
use crate::report::{Severity, ValidationReport, ValidationResult};
use dodaf_semantic::vocab::{rdf, sh};
use oxrdf::{Graph, NamedNode, NamedNodeRef, Term, TermRef};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::{debug, info};

/// Validates RDF graphs against a fixed shapes graph.
#[derive(Debug, Clone)]
pub struct GraphValidator {
    shapes_graph: ShapesGraph,
}

impl GraphValidator {
    pub fn new(shapes_graph: ShapesGraph) -> Self {
        Self { shapes_graph }
    }

    pub fn shapes(&self) -> &ShapesGraph {
        &self.shapes_graph
    }

    /// Validates `data_graph`.
    ///
    /// Shapes are visited in shapes graph order and focus nodes in lexical order, so the results
    /// of two runs over the same input are identical.
    pub fn validate(&self, data_graph: &Graph) -> Result<ValidationReport, ShaclError> {
        let mut report = ValidationReport::new();
        let mut context = ValidationContext::new(data_graph);

        for node_shape in self.shapes_graph.node_shapes() {
            if node_shape.base.deactivated {
                debug!(shape = %node_shape.id(), "skipping deactivated shape");
                continue;
            }
            let focus_nodes = find_focus_nodes(&node_shape.base, data_graph);
            debug!(shape = %node_shape.id(), focus_nodes = focus_nodes.len(), "validating shape");
            for focus_node in &focus_nodes {
                validate_node_against_shape(&mut context, &mut report, focus_node, node_shape)?;
            }
        }

        info!(
            conforms = report.conforms(),
            results = report.results().len(),
            "SHACL validation finished"
        );
        Ok(report)
    }
}

fn find_focus_nodes(shape: &Shape, data_graph: &Graph) -> Vec<Term> {
    let mut focus_nodes = Vec::new();
    for target in &shape.targets {
        for node in target.find_focus_nodes(data_graph) {
            if !focus_nodes.contains(&node) {
                focus_nodes.push(node);
            }
        }
    }
    focus_nodes.sort_by_cached_key(ToString::to_string);
    focus_nodes
}

fn validate_node_against_shape(
    context: &mut ValidationContext<'_>,
    report: &mut ValidationReport,
    focus_node: &Term,
    shape: &Arc<NodeShape>,
) -> Result<(), ShaclError> {
    let severity = &shape.base.severity;
    for constraint in &shape.base.constraints {
        validate_constraint(
            context,
            report,
            focus_node,
            &[focus_node.clone()],
            constraint,
            &shape.base,
            None,
            severity,
        )?;
    }
    for property_shape in &shape.base.property_shapes {
        validate_property_shape(context, report, focus_node, property_shape, severity)?;
    }
    Ok(())
}

fn validate_property_shape(
    context: &mut ValidationContext<'_>,
    report: &mut ValidationReport,
    focus_node: &Term,
    shape: &Arc<PropertyShape>,
    parent_severity: &Severity,
) -> Result<(), ShaclError> {
    if shape.base.deactivated {
        return Ok(());
    }
    // Own severity if set, otherwise the parent's
    let severity = if shape.base.severity == Severity::Violation {
        parent_severity
    } else {
        &shape.base.severity
    };

    let value_nodes = value_nodes(context.data_graph, focus_node, shape.path());
    for constraint in &shape.base.constraints {
        validate_constraint(
            context,
            report,
            focus_node,
            &value_nodes,
            constraint,
            &shape.base,
            Some(shape.path()),
            severity,
        )?;
    }
    for nested in &shape.base.property_shapes {
        for value_node in &value_nodes {
            validate_property_shape(context, report, value_node, nested, severity)?;
        }
    }
    Ok(())
}

#[expect(clippy::too_many_arguments)]
fn validate_constraint(
    context: &mut ValidationContext<'_>,
    report: &mut ValidationReport,
    focus_node: &Term,
    value_nodes: &[Term],
    constraint: &Constraint,
    shape: &Shape,
    path: Option<&NamedNode>,
    severity: &Severity,
) -> Result<(), ShaclError> {
    let component = constraint.component();
    let mut failures: Vec<(Option<&Term>, String)> = Vec::new();

    match constraint {
        Constraint::MinCount(min) => {
            if value_nodes.len() < *min {
                failures.push((
                    None,
                    format!("Expected at least {min} value(s), got {}", value_nodes.len()),
                ));
            }
        }
        Constraint::MaxCount(max) => {
            if value_nodes.len() > *max {
                failures.push((
                    None,
                    format!("Expected at most {max} value(s), got {}", value_nodes.len()),
                ));
            }
        }
        Constraint::Datatype(datatype) => {
            for value in value_nodes {
                let valid = matches!(value, Term::Literal(l) if l.datatype() == datatype.as_ref());
                if !valid {
                    failures.push((
                        Some(value),
                        format!("Value does not have datatype <{}>", datatype.as_str()),
                    ));
                }
            }
        }
        Constraint::NodeKind(node_kind) => {
            for value in value_nodes {
                if !matches_node_kind(value, node_kind.as_ref()) {
                    failures.push((
                        Some(value),
                        format!("Value does not match node kind <{}>", node_kind.as_str()),
                    ));
                }
            }
        }
        Constraint::Pattern { pattern, flags } => {
            let regex = context.get_or_compile_regex(pattern, flags.as_deref())?;
            for value in value_nodes {
                let matched = match string_value(value) {
                    Some(s) => regex.is_match(s),
                    None => false,
                };
                if !matched {
                    failures.push((Some(value), format!("Value does not match pattern '{pattern}'")));
                }
            }
        }
        Constraint::In(allowed) => {
            for value in value_nodes {
                if !allowed.contains(value) {
                    failures.push((
                        Some(value),
                        format!("Value is not in the allowed list: {}", list_display(allowed)),
                    ));
                }
            }
        }
        Constraint::HasValue(expected) => {
            if !value_nodes.contains(expected) {
                failures.push((None, format!("Missing expected value {expected}")));
            }
        }
        Constraint::Class(class) => {
            for value in value_nodes {
                if !is_instance_of(context.data_graph, value, class) {
                    failures.push((
                        Some(value),
                        format!("Value is not an instance of <{}>", class.as_str()),
                    ));
                }
            }
        }
    }

    for (value, message) in failures {
        report.add_result(build_result(
            focus_node, value, component, shape, path, severity, message,
        ));
    }
    Ok(())
}

fn build_result(
    focus_node: &Term,
    value: Option<&Term>,
    component: ConstraintComponent,
    shape: &Shape,
    path: Option<&NamedNode>,
    severity: &Severity,
    message: String,
) -> ValidationResult {
    let mut result = ValidationResult::new(focus_node.clone(), shape.id.clone(), component)
        .with_severity(severity.clone())
        .with_message(shape.message.clone().unwrap_or(message));
    if let Some(path) = path {
        result = result.with_path(path.clone());
    }
    if let Some(value) = value {
        result = result.with_value(value.clone());
    }
    result
}

fn value_nodes(graph: &Graph, focus_node: &Term, path: &NamedNode) -> Vec<Term> {
    let mut values: Vec<Term> = match focus_node {
        Term::NamedNode(n) => graph
            .objects_for_subject_predicate(n, path)
            .map(TermRef::into_owned)
            .collect(),
        Term::BlankNode(b) => graph
            .objects_for_subject_predicate(b, path)
            .map(TermRef::into_owned)
            .collect(),
        _ => Vec::new(),
    };
    values.sort_by_cached_key(ToString::to_string);
    values
}

struct ValidationContext<'a> {
    data_graph: &'a Graph,
    regex_cache: FxHashMap<String, Regex>,
}

impl<'a> ValidationContext<'a> {
    fn new(data_graph: &'a Graph) -> Self {
        Self {
            data_graph,
            regex_cache: FxHashMap::default(),
        }
    }

    fn get_or_compile_regex(&mut self, pattern: &str, flags: Option<&str>) -> Result<&Regex, ShaclError> {
        let key = format!("{}/{}", pattern, flags.unwrap_or(""));
        Ok(match self.regex_cache.entry(key) {
            Entry::Occupied(entry) => &*entry.into_mut(),
            Entry::Vacant(entry) => &*entry.insert(compile_pattern(pattern, flags)?),
        })
    }
}

fn is_instance_of(graph: &Graph, term: &Term, class: &NamedNode) -> bool {
    let classes = class_hierarchy(graph, class);
    let types: Vec<TermRef<'_>> = match term {
        Term::NamedNode(n) => graph.objects_for_subject_predicate(n, rdf::TYPE.as_named_node()).collect(),
        Term::BlankNode(b) => graph.objects_for_subject_predicate(b, rdf::TYPE.as_named_node()).collect(),
        _ => return false,
    };
    types
        .into_iter()
        .any(|t| classes.iter().any(|c| c.as_ref() == t))
}

fn matches_node_kind(term: &Term, node_kind: NamedNodeRef<'_>) -> bool {
    match node_kind {
        k if k == sh::IRI.as_named_node() => matches!(term, Term::NamedNode(_)),
        k if k == sh::LITERAL.as_named_node() => matches!(term, Term::Literal(_)),
        k if k == sh::BLANK_NODE.as_named_node() => matches!(term, Term::BlankNode(_)),
        k if k == sh::BLANK_NODE_OR_IRI.as_named_node() => {
            matches!(term, Term::NamedNode(_) | Term::BlankNode(_))
        }
        k if k == sh::BLANK_NODE_OR_LITERAL.as_named_node() => {
            matches!(term, Term::BlankNode(_) | Term::Literal(_))
        }
        k if k == sh::IRI_OR_LITERAL.as_named_node() => {
            matches!(term, Term::NamedNode(_) | Term::Literal(_))
        }
        _ => false,
    }
}

/// The string a pattern is matched against. Blank nodes have none.
fn string_value(term: &Term) -> Option<&str> {
    match term {
        Term::NamedNode(n) => Some(n.as_str()),
        Term::Literal(l) => Some(l.value()),
        _ => None,
    }
}

fn list_display(values: &[Term]) -> String {
    values
        .iter()
        .map(|v| match v {
            Term::Literal(l) => l.value().to_owned(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodaf_semantic::parse_turtle;

    const SHAPES: &str = r#"
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        @prefix ex: <http://ex.org#> .

        ex:WidgetShape a sh:NodeShape ;
            sh:targetClass ex:Widget ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ; sh:maxCount 1 ; sh:datatype xsd:string ] ,
                [ sh:path ex:code ; sh:pattern "^W-\\d+$" ] ,
                [ sh:path ex:kind ; sh:in ( "small" "large" ) ; sh:severity sh:Warning ] ,
                [ sh:path ex:part ; sh:class ex:Part ; sh:nodeKind sh:IRI ] .
    "#;

    fn validate(data: &str) -> ValidationReport {
        let validator = GraphValidator::new(ShapesGraph::from_turtle(SHAPES).unwrap());
        validator.validate(&parse_turtle(data).unwrap()).unwrap()
    }

    fn components(report: &ValidationReport) -> Vec<ConstraintComponent> {
        report
            .results()
            .iter()
            .map(|r| r.source_constraint_component)
            .collect()
    }

    #[test]
    fn conforming_data() {
        let report = validate(
            r#"@prefix ex: <http://ex.org#> .
            @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
            ex:Gear rdfs:subClassOf ex:Part .
            ex:w1 a ex:Widget ; ex:name "Widget" ; ex:code "W-12" ; ex:kind "small" ; ex:part ex:g1 .
            ex:g1 a ex:Gear ."#,
        );
        assert!(report.conforms(), "{:?}", report.results());
        assert!(report.results().is_empty());
    }

    #[test]
    fn cardinality_violations() {
        let report = validate(
            r#"@prefix ex: <http://ex.org#> .
            ex:w1 a ex:Widget .
            ex:w2 a ex:Widget ; ex:name "a", "b" ."#,
        );
        assert!(!report.conforms());
        assert_eq!(
            components(&report),
            [ConstraintComponent::MinCount, ConstraintComponent::MaxCount]
        );
        let first = &report.results()[0];
        assert_eq!(first.focus_node.to_string(), "<http://ex.org#w1>");
        assert_eq!(first.result_path.as_ref().map(NamedNode::as_str), Some("http://ex.org#name"));
        assert_eq!(first.result_message.as_deref(), Some("Expected at least 1 value(s), got 0"));
    }

    #[test]
    fn value_constraints() {
        let report = validate(
            r#"@prefix ex: <http://ex.org#> .
            ex:w1 a ex:Widget ; ex:name 3 ; ex:code "X-1" ; ex:part "g1" ."#,
        );
        let mut names: Vec<String> = components(&report).iter().map(|c| c.name()).collect();
        names.sort();
        assert_eq!(
            names,
            [
                "sh:ClassConstraintComponent",
                "sh:DatatypeConstraintComponent",
                "sh:NodeKindConstraintComponent",
                "sh:PatternConstraintComponent"
            ]
        );
    }

    #[test]
    fn warnings_keep_conformance() {
        let report = validate(
            r#"@prefix ex: <http://ex.org#> .
            ex:w1 a ex:Widget ; ex:name "Widget" ; ex:kind "medium" ."#,
        );
        assert!(report.conforms());
        let [result] = report.results() else {
            panic!("{:?}", report.results())
        };
        assert_eq!(result.result_severity, Severity::Warning);
        assert_eq!(result.source_constraint_component, ConstraintComponent::In);
        assert_eq!(
            result.result_message.as_deref(),
            Some("Value is not in the allowed list: small, large")
        );
    }

    #[test]
    fn has_value_and_custom_message() {
        let shapes = ShapesGraph::from_turtle(
            r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
            @prefix ex: <http://ex.org#> .
            ex:S a sh:NodeShape ; sh:targetClass ex:Widget ;
                sh:property [ sh:path ex:status ; sh:hasValue "approved" ; sh:message "must be approved" ] ."#,
        )
        .unwrap();
        let data = parse_turtle(r#"<http://ex.org#w1> a <http://ex.org#Widget> ; <http://ex.org#status> "draft" ."#)
            .unwrap();
        let report = GraphValidator::new(shapes).validate(&data).unwrap();
        let [result] = report.results() else {
            panic!("{:?}", report.results())
        };
        assert_eq!(result.source_constraint_component, ConstraintComponent::HasValue);
        assert_eq!(result.result_message.as_deref(), Some("must be approved"));
    }

    #[test]
    fn results_are_deterministic() {
        let data = r#"@prefix ex: <http://ex.org#> .
            ex:w3 a ex:Widget . ex:w1 a ex:Widget . ex:w2 a ex:Widget ."#;
        let focus: Vec<String> = validate(data)
            .results()
            .iter()
            .map(|r| r.focus_node.to_string())
            .collect();
        assert_eq!(
            focus,
            ["<http://ex.org#w1>", "<http://ex.org#w2>", "<http://ex.org#w3>"]
        );
    }
}
