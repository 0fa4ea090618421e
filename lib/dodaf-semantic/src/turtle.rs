//! Turtle plumbing shared by the OWL and SHACL generators and their self-checks.

use crate::iri::PropertyIri;
use crate::vocab::{Namespace, rdf};
use oxrdf::{BlankNode, Graph, NamedNode, NamedNodeRef, Term, Triple};
use oxttl::{TurtleParser, TurtleSerializer, TurtleSyntaxError};
use tracing::warn;

/// A triple subject: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Named(NamedNode),
    Blank(BlankNode),
}

impl Node {
    pub(crate) fn to_term(&self) -> Term {
        match self {
            Self::Named(n) => n.clone().into(),
            Self::Blank(b) => b.clone().into(),
        }
    }
}

impl From<NamedNode> for Node {
    fn from(node: NamedNode) -> Self {
        Self::Named(node)
    }
}

/// An ordered, duplicate-free triple buffer.
///
/// Triples are written out in insertion order, which keeps generated documents byte-identical
/// from one run to the next.
pub(crate) struct TripleBuffer {
    prefixes: Vec<Namespace>,
    seen: Graph,
    triples: Vec<Triple>,
    blank_node_counter: u64,
}

impl TripleBuffer {
    pub(crate) fn new(prefixes: &[Namespace]) -> Self {
        Self {
            prefixes: prefixes.to_vec(),
            seen: Graph::new(),
            triples: Vec::new(),
            blank_node_counter: 0,
        }
    }

    pub(crate) fn add(&mut self, subject: &Node, predicate: &PropertyIri, object: impl Into<Term>) {
        let predicate = predicate.to_named_node();
        let triple = match subject {
            Node::Named(n) => Triple::new(n.clone(), predicate, object),
            Node::Blank(b) => Triple::new(b.clone(), predicate, object),
        };
        if self.seen.insert(&triple) {
            self.triples.push(triple);
        }
    }

    /// Allocates a blank node with a deterministic label.
    pub(crate) fn fresh_blank_node(&mut self, hint: &str) -> BlankNode {
        let id = format!("{hint}{}", self.blank_node_counter);
        self.blank_node_counter += 1;
        BlankNode::new_unchecked(id)
    }

    /// Emits `items` as a closed RDF collection and returns its head.
    ///
    /// The empty collection is `rdf:nil` itself.
    pub(crate) fn add_list(&mut self, items: Vec<Term>) -> Term {
        let mut current: Term = rdf::NIL.to_named_node().into();
        let nodes: Vec<BlankNode> = items.iter().map(|_| self.fresh_blank_node("l")).collect();
        for (item, node) in items.into_iter().zip(nodes).rev() {
            let cell = Node::Blank(node.clone());
            self.add(&cell, &rdf::FIRST, item);
            self.add(&cell, &rdf::REST, current);
            current = node.into();
        }
        current
    }

    pub(crate) fn len(&self) -> usize {
        self.triples.len()
    }

    /// Serializes the buffer to Turtle.
    pub(crate) fn to_turtle(&self) -> String {
        let mut serializer = TurtleSerializer::new();
        for namespace in &self.prefixes {
            serializer = match serializer.with_prefix(namespace.prefix(), namespace.base()) {
                Ok(serializer) => serializer,
                Err(e) => {
                    warn!(prefix = namespace.prefix(), error = %e, "dropping prefix declarations");
                    TurtleSerializer::new()
                }
            };
        }
        let mut writer = serializer.for_writer(Vec::new());
        for triple in &self.triples {
            if let Err(e) = writer.serialize_triple(triple) {
                warn!(error = %e, "failed to serialize a triple");
            }
        }
        match writer.finish() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                warn!(error = %e, "failed to finish the Turtle document");
                String::new()
            }
        }
    }
}

/// Parses a Turtle document into a graph.
pub fn parse_turtle(text: &str) -> Result<Graph, TurtleSyntaxError> {
    let mut graph = Graph::new();
    for triple in TurtleParser::new().for_slice(text.as_bytes()) {
        graph.insert(&triple?);
    }
    Ok(graph)
}

/// Reads the RDF collection starting at `head`.
///
/// Fails on a cell missing `rdf:first` or `rdf:rest`, on a cell with several of them, and on
/// cycles.
pub fn read_list(graph: &Graph, head: &Term) -> Result<Vec<Term>, String> {
    let nil = Term::from(rdf::NIL.to_named_node());
    let (first, rest) = (rdf::FIRST, rdf::REST);
    let mut items = Vec::new();
    let mut visited = Vec::new();
    let mut current = head.clone();
    while current != nil {
        if visited.contains(&current) {
            return Err(format!("cycle at {current}"));
        }
        let item = single_object(graph, &current, first.as_named_node())?;
        let next = single_object(graph, &current, rest.as_named_node())?;
        items.push(item);
        visited.push(current);
        current = next;
    }
    Ok(items)
}

fn single_object(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Result<Term, String> {
    let values: Vec<Term> = match subject {
        Term::NamedNode(n) => graph
            .objects_for_subject_predicate(n, predicate)
            .map(|t| t.into_owned())
            .collect(),
        Term::BlankNode(b) => graph
            .objects_for_subject_predicate(b, predicate)
            .map(|t| t.into_owned())
            .collect(),
        _ => Vec::new(),
    };
    match <[Term; 1]>::try_from(values) {
        Ok([value]) => Ok(value),
        Err(values) if values.is_empty() => Err(format!("missing {predicate} on {subject}")),
        Err(_) => Err(format!("several {predicate} values on {subject}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::{DODAF, RDF, dodaf};
    use oxrdf::Literal;

    #[test]
    fn list_is_closed_and_ordered() {
        let mut buffer = TripleBuffer::new(&[RDF]);
        let head = buffer.add_list(vec![
            Literal::new_simple_literal("a").into(),
            Literal::new_simple_literal("b").into(),
            Literal::new_simple_literal("c").into(),
        ]);
        assert_eq!(buffer.len(), 6);
        let graph = parse_turtle(&buffer.to_turtle()).unwrap();
        // Labels are not preserved through Turtle, so find the head again.
        let head_label = match head {
            Term::BlankNode(b) => b,
            other => panic!("unexpected head {other}"),
        };
        assert_eq!(head_label.as_str(), "l0");
        let heads: Vec<Term> = graph
            .triples_for_predicate(rdf::FIRST.as_named_node())
            .map(|t| Term::from(t.subject.into_owned()))
            .filter(|s| graph.triples_for_object(s).next().is_none())
            .collect();
        assert_eq!(heads.len(), 1);
        let items = read_list(&graph, &heads[0]).unwrap();
        assert_eq!(
            items,
            [
                Term::from(Literal::new_simple_literal("a")),
                Literal::new_simple_literal("b").into(),
                Literal::new_simple_literal("c").into()
            ]
        );
    }

    #[test]
    fn empty_list_is_nil() {
        let mut buffer = TripleBuffer::new(&[]);
        assert_eq!(buffer.add_list(Vec::new()), Term::from(rdf::NIL.to_named_node()));
        assert_eq!(buffer.len(), 0);
    }

    #[test]
    fn duplicates_are_dropped() {
        let mut buffer = TripleBuffer::new(&[DODAF]);
        let subject = Node::from(dodaf::VIEW.to_named_node());
        buffer.add(&subject, &rdf::TYPE, dodaf::ELEMENT.to_named_node());
        buffer.add(&subject, &rdf::TYPE, dodaf::ELEMENT.to_named_node());
        assert_eq!(buffer.len(), 1);
        assert!(buffer.to_turtle().starts_with("@prefix dodaf:"));
    }

    #[test]
    fn broken_list_is_reported() {
        let graph = parse_turtle(
            "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\
             _:a rdf:first 1 ; rdf:rest _:b .\n\
             _:b rdf:first 2 .\n",
        )
        .unwrap();
        let head = graph
            .triples_for_predicate(rdf::REST.as_named_node())
            .map(|t| Term::from(t.subject.into_owned()))
            .next()
            .unwrap();
        let error = read_list(&graph, &head).unwrap_err();
        assert!(error.contains("missing"), "{error}");
    }

    #[test]
    fn syntax_errors_surface() {
        parse_turtle("<http://example.com/s> <http://example.com/p> .").unwrap_err();
    }
}
