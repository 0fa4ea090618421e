//! Compaction of an expanded document graph back into a nested JSON tree.

use dodaf_semantic::JsonLdContext;
use dodaf_semantic::vocab::{compact_iri, dodaf, rdf, xsd};
use oxrdf::{Graph, Literal, NamedNode, Term, TermRef};
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::{Map, Number, Value, json};
use std::collections::{BTreeMap, VecDeque};

/// Rebuilds a JSON tree from a graph using the terms of a context.
///
/// Every node with properties is embedded exactly once, under the parent that reaches it first in
/// a breadth-first walk from the root. Any other occurrence becomes an `{"id": ...}` reference.
/// Properties are sorted by term so the output is stable.
pub(crate) struct Compactor<'a> {
    context: &'a JsonLdContext,
    base: &'a str,
}

impl<'a> Compactor<'a> {
    pub(crate) fn new(context: &'a JsonLdContext, base: &'a str) -> Self {
        Self { context, base }
    }

    pub(crate) fn compact(&self, graph: &Graph, context_url: &str) -> Option<Value> {
        let root = find_root(graph)?;
        let parents = spanning_tree(graph, &root);
        let Value::Object(body) = self.node(graph, &root, &parents) else {
            return None;
        };
        let mut document = Map::new();
        document.insert("@context".into(), context_url.into());
        document.extend(body);
        Some(Value::Object(document))
    }

    fn node(&self, graph: &Graph, subject: &Term, parents: &FxHashMap<Term, (Term, NamedNode)>) -> Value {
        let mut object = Map::new();
        if let Term::NamedNode(iri) = subject {
            object.insert("id".into(), self.compact_id(iri.as_str()).into());
        }

        let mut types = Vec::new();
        let mut properties: BTreeMap<String, Vec<Value>> = BTreeMap::new();
        for (predicate, value) in outgoing(graph, subject) {
            if predicate.as_ref() == rdf::TYPE.as_named_node() {
                if let Term::NamedNode(class) = &value {
                    types.push(Value::String(compact_vocab(class.as_str())));
                }
                continue;
            }
            let rendered = match &value {
                Term::Literal(literal) => literal_value(literal),
                _ if parents.get(&value) == Some(&(subject.clone(), predicate.clone())) => {
                    self.node(graph, &value, parents)
                }
                Term::NamedNode(iri) => json!({ "id": self.compact_id(iri.as_str()) }),
                other => json!({ "id": other.to_string() }),
            };
            properties
                .entry(self.term(&predicate))
                .or_default()
                .push(rendered);
        }

        if !types.is_empty() {
            object.insert("type".into(), single_or_array(types));
        }
        for (term, values) in properties {
            object.insert(term, single_or_array(values));
        }
        Value::Object(object)
    }

    /// Base-relative when possible, then a compact IRI, then the full IRI.
    fn compact_id(&self, iri: &str) -> String {
        match iri.strip_prefix(self.base) {
            Some(relative) if !relative.is_empty() => relative.to_owned(),
            _ => compact_vocab(iri),
        }
    }

    fn term(&self, predicate: &NamedNode) -> String {
        match self.context.term_for(predicate.as_str()) {
            Some(term) => term.to_owned(),
            None => compact_vocab(predicate.as_str()),
        }
    }
}

fn compact_vocab(iri: &str) -> String {
    compact_iri(iri).unwrap_or_else(|| iri.to_owned())
}

fn single_or_array(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

fn literal_value(literal: &Literal) -> Value {
    if let Some(language) = literal.language() {
        return json!({ "@value": literal.value(), "@language": language });
    }
    let datatype = literal.datatype();
    let value = literal.value();
    let native = if datatype == xsd::STRING.as_named_node() {
        Some(Value::String(value.to_owned()))
    } else if datatype == xsd::BOOLEAN.as_named_node() {
        match value {
            "true" | "1" => Some(Value::Bool(true)),
            "false" | "0" => Some(Value::Bool(false)),
            _ => None,
        }
    } else if datatype == xsd::INTEGER.as_named_node() {
        value.parse::<i64>().ok().map(Value::from)
    } else if datatype == xsd::DOUBLE.as_named_node() || datatype == xsd::DECIMAL.as_named_node() {
        value
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
    } else {
        None
    };
    native.unwrap_or_else(|| json!({ "@value": value, "@type": compact_vocab(datatype.as_str()) }))
}

/// Properties of `subject`, sorted by predicate then value.
fn outgoing(graph: &Graph, subject: &Term) -> Vec<(NamedNode, Term)> {
    let mut triples: Vec<(NamedNode, Term)> = match subject {
        Term::NamedNode(n) => graph
            .triples_for_subject(n)
            .map(|t| (t.predicate.into_owned(), t.object.into_owned()))
            .collect(),
        Term::BlankNode(b) => graph
            .triples_for_subject(b)
            .map(|t| (t.predicate.into_owned(), t.object.into_owned()))
            .collect(),
        _ => Vec::new(),
    };
    triples.sort_by_cached_key(|(p, o)| (p.as_str().to_owned(), o.to_string()));
    triples
}

fn has_properties(graph: &Graph, term: &Term) -> bool {
    match term {
        Term::NamedNode(n) => graph.triples_for_subject(n).next().is_some(),
        Term::BlankNode(b) => graph.triples_for_subject(b).next().is_some(),
        _ => false,
    }
}

/// The architecture node if there is one, else the first subject never used as an object.
fn find_root(graph: &Graph) -> Option<Term> {
    let mut architectures: Vec<Term> = graph
        .subjects_for_predicate_object(rdf::TYPE.as_named_node(), dodaf::ARCHITECTURE.as_named_node())
        .map(|s| s.into_owned().into())
        .collect();
    architectures.sort_by_cached_key(ToString::to_string);
    if let Some(root) = architectures.into_iter().next() {
        return Some(root);
    }

    let objects: FxHashSet<TermRef<'_>> = graph.iter().map(|t| t.object).collect();
    let mut subjects: Vec<Term> = graph
        .iter()
        .map(|t| -> Term { t.subject.into_owned().into() })
        .collect();
    subjects.sort_by_cached_key(ToString::to_string);
    subjects.dedup();
    subjects
        .iter()
        .find(|s| !objects.contains(&s.as_ref()))
        .or_else(|| subjects.first())
        .cloned()
}

/// For each reachable node with properties, the subject and predicate it is embedded under.
fn spanning_tree(graph: &Graph, root: &Term) -> FxHashMap<Term, (Term, NamedNode)> {
    let mut parents = FxHashMap::default();
    let mut seen = FxHashSet::default();
    seen.insert(root.clone());
    let mut queue = VecDeque::from([root.clone()]);
    while let Some(subject) = queue.pop_front() {
        for (predicate, object) in outgoing(graph, &subject) {
            if predicate.as_ref() == rdf::TYPE.as_named_node() || !has_properties(graph, &object) {
                continue;
            }
            if seen.insert(object.clone()) {
                parents.insert(object.clone(), (subject.clone(), predicate));
                queue.push_back(object);
            }
        }
    }
    parents
}
