//! SHACL shape model types.
//!
//! Only the subset of SHACL Core the generated shapes use is read: class targets, predicate
//! paths, the constraints listed in [`Constraint`] and the `sh:severity`, `sh:message`,
//! `sh:name` and `sh:deactivated` parameters.

use crate::constraint::Constraint;
use crate::error::{ShaclError, ShaclParseError};
use crate::report::Severity;
use dodaf_semantic::vocab::{rdf, rdfs, sh};
use dodaf_semantic::{parse_turtle, read_list};
use oxrdf::{BlankNode, Graph, Literal, NamedNode, NamedNodeRef, Term};
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Identifier of a shape: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ShapeId {
    Named(NamedNode),
    Blank(BlankNode),
}

impl ShapeId {
    pub fn to_term(&self) -> Term {
        match self {
            Self::Named(n) => Term::NamedNode(n.clone()),
            Self::Blank(b) => Term::BlankNode(b.clone()),
        }
    }

    fn from_term(term: Term) -> Result<Self, ShaclParseError> {
        match term {
            Term::NamedNode(n) => Ok(Self::Named(n)),
            Term::BlankNode(b) => Ok(Self::Blank(b)),
            _ => Err(ShaclParseError::invalid_shape(
                term,
                "Shape reference must be an IRI or blank node",
            )),
        }
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => write!(f, "<{}>", n.as_str()),
            Self::Blank(b) => write!(f, "_:{}", b.as_str()),
        }
    }
}

/// Target declaration selecting focus nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// All instances of the class or of one of its subclasses.
    Class(NamedNode),
}

impl Target {
    /// Finds the focus nodes of this target in `graph`.
    pub fn find_focus_nodes(&self, graph: &Graph) -> Vec<Term> {
        match self {
            Self::Class(class) => {
                let mut instances = Vec::new();
                for class in class_hierarchy(graph, class) {
                    for subject in graph.subjects_for_predicate_object(rdf::TYPE.as_named_node(), &class) {
                        let subject: Term = subject.into_owned().into();
                        if !instances.contains(&subject) {
                            instances.push(subject);
                        }
                    }
                }
                instances
            }
        }
    }
}

/// A class and its transitive `rdfs:subClassOf` descendants in `graph`.
pub(crate) fn class_hierarchy(graph: &Graph, class: &NamedNode) -> Vec<Term> {
    let mut classes = vec![Term::NamedNode(class.clone())];
    let mut to_check = classes.clone();
    while let Some(current) = to_check.pop() {
        for subclass in graph.subjects_for_predicate_object(rdfs::SUB_CLASS_OF.as_named_node(), &current) {
            let subclass: Term = subclass.into_owned().into();
            if !classes.contains(&subclass) {
                classes.push(subclass.clone());
                to_check.push(subclass);
            }
        }
    }
    classes
}

/// What node and property shapes have in common.
#[derive(Debug, Clone)]
pub struct Shape {
    pub id: ShapeId,
    pub targets: Vec<Target>,
    pub constraints: Vec<Constraint>,
    pub property_shapes: Vec<Arc<PropertyShape>>,
    pub severity: Severity,
    pub deactivated: bool,
    pub name: Option<String>,
    /// Replaces the generated result message.
    pub message: Option<String>,
}

impl Shape {
    pub fn new(id: ShapeId) -> Self {
        Self {
            id,
            targets: Vec::new(),
            constraints: Vec::new(),
            property_shapes: Vec::new(),
            severity: Severity::Violation,
            deactivated: false,
            name: None,
            message: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NodeShape {
    pub base: Shape,
}

impl NodeShape {
    pub fn new(id: ShapeId) -> Self {
        Self {
            base: Shape::new(id),
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.base.id
    }
}

/// A property shape. Its path is always a single predicate.
#[derive(Debug, Clone)]
pub struct PropertyShape {
    pub base: Shape,
    pub path: NamedNode,
}

impl PropertyShape {
    pub fn new(id: ShapeId, path: NamedNode) -> Self {
        Self {
            base: Shape::new(id),
            path,
        }
    }

    pub fn id(&self) -> &ShapeId {
        &self.base.id
    }

    pub fn path(&self) -> &NamedNode {
        &self.path
    }
}

/// The node shapes of a shapes graph, in a stable order.
#[derive(Debug, Clone, Default)]
pub struct ShapesGraph {
    node_shapes: FxHashMap<ShapeId, Arc<NodeShape>>,
    order: Vec<ShapeId>,
}

impl ShapesGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads every `sh:NodeShape` of `graph`.
    ///
    /// Patterns are compiled once here so that a shapes graph with an invalid regular expression
    /// is rejected before any data is validated.
    pub fn from_graph(graph: &Graph) -> Result<Self, ShaclParseError> {
        let mut ids: Vec<ShapeId> = graph
            .subjects_for_predicate_object(rdf::TYPE.as_named_node(), sh::NODE_SHAPE.as_named_node())
            .map(|s| ShapeId::from_term(s.into_owned().into()))
            .collect::<Result<_, _>>()?;
        ids.sort_by_cached_key(ToString::to_string);

        let mut shapes_graph = Self::new();
        for id in ids {
            let shape = parse_node_shape(graph, &id)?;
            shapes_graph.add_node_shape(Arc::new(shape));
        }
        debug!(shapes = shapes_graph.len(), "loaded shapes graph");
        Ok(shapes_graph)
    }

    /// Parses a Turtle document and reads its shapes.
    pub fn from_turtle(turtle: &str) -> Result<Self, ShaclError> {
        Ok(Self::from_graph(&parse_turtle(turtle)?)?)
    }

    pub fn add_node_shape(&mut self, shape: Arc<NodeShape>) {
        let id = shape.id().clone();
        if self.node_shapes.insert(id.clone(), shape).is_none() {
            self.order.push(id);
        }
    }

    pub fn get_node_shape(&self, id: &ShapeId) -> Option<&Arc<NodeShape>> {
        self.node_shapes.get(id)
    }

    /// Node shapes, in the order they were added.
    pub fn node_shapes(&self) -> impl Iterator<Item = &Arc<NodeShape>> {
        self.order.iter().filter_map(|id| self.node_shapes.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.node_shapes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.node_shapes.len()
    }
}

fn parse_node_shape(graph: &Graph, id: &ShapeId) -> Result<NodeShape, ShaclParseError> {
    let mut shape = NodeShape::new(id.clone());
    let term = id.to_term();
    parse_targets(graph, &term, &mut shape.base);
    parse_constraints(graph, &term, &mut shape.base)?;
    parse_property_shapes(graph, &term, &mut shape.base)?;
    parse_metadata(graph, &term, &mut shape.base);
    Ok(shape)
}

fn parse_property_shape(graph: &Graph, id: &ShapeId) -> Result<Option<PropertyShape>, ShaclParseError> {
    let term = id.to_term();
    let path = match get_object(graph, &term, sh::PATH.as_named_node()) {
        Some(Term::NamedNode(path)) => path,
        Some(path) => {
            return Err(ShaclParseError::UnsupportedPath { shape: term, path });
        }
        None => return Ok(None),
    };
    let mut shape = PropertyShape::new(id.clone(), path);
    parse_constraints(graph, &term, &mut shape.base)?;
    parse_property_shapes(graph, &term, &mut shape.base)?;
    parse_metadata(graph, &term, &mut shape.base);
    Ok(Some(shape))
}

fn parse_targets(graph: &Graph, shape_term: &Term, shape: &mut Shape) {
    for object in get_objects(graph, shape_term, sh::TARGET_CLASS.as_named_node()) {
        if let Term::NamedNode(class) = object {
            shape.targets.push(Target::Class(class));
        }
    }
}

fn parse_constraints(graph: &Graph, shape_term: &Term, shape: &mut Shape) -> Result<(), ShaclParseError> {
    if let Some(n) = get_count(graph, shape_term, sh::MIN_COUNT.as_named_node())? {
        shape.constraints.push(Constraint::MinCount(n));
    }
    if let Some(n) = get_count(graph, shape_term, sh::MAX_COUNT.as_named_node())? {
        shape.constraints.push(Constraint::MaxCount(n));
    }
    if let Some(Term::NamedNode(datatype)) = get_object(graph, shape_term, sh::DATATYPE.as_named_node()) {
        shape.constraints.push(Constraint::Datatype(datatype));
    }
    if let Some(Term::NamedNode(kind)) = get_object(graph, shape_term, sh::NODE_KIND.as_named_node()) {
        shape.constraints.push(Constraint::NodeKind(kind));
    }
    if let Some(pattern) = get_string(graph, shape_term, sh::PATTERN.as_named_node()) {
        let flags = get_string(graph, shape_term, sh::FLAGS.as_named_node());
        compile_pattern(&pattern, flags.as_deref())?;
        shape.constraints.push(Constraint::Pattern { pattern, flags });
    }
    if let Some(head) = get_object(graph, shape_term, sh::IN.as_named_node()) {
        let values = read_list(graph, &head)
            .map_err(|e| ShaclParseError::invalid_rdf_list(shape_term.clone(), e))?;
        shape.constraints.push(Constraint::In(values));
    }
    for value in get_objects(graph, shape_term, sh::HAS_VALUE.as_named_node()) {
        shape.constraints.push(Constraint::HasValue(value));
    }
    for object in get_objects(graph, shape_term, sh::CLASS.as_named_node()) {
        if let Term::NamedNode(class) = object {
            shape.constraints.push(Constraint::Class(class));
        }
    }
    Ok(())
}

fn parse_property_shapes(graph: &Graph, shape_term: &Term, shape: &mut Shape) -> Result<(), ShaclParseError> {
    let mut ids = get_objects(graph, shape_term, sh::PROPERTY.as_named_node())
        .into_iter()
        .map(ShapeId::from_term)
        .collect::<Result<Vec<_>, _>>()?;
    ids.sort_by_cached_key(ToString::to_string);
    for id in ids {
        if let Some(property_shape) = parse_property_shape(graph, &id)? {
            shape.property_shapes.push(Arc::new(property_shape));
        }
    }
    Ok(())
}

fn parse_metadata(graph: &Graph, shape_term: &Term, shape: &mut Shape) {
    if let Some(Term::Literal(value)) = get_object(graph, shape_term, sh::DEACTIVATED.as_named_node()) {
        shape.deactivated = matches!(value.value(), "true" | "1");
    }
    if let Some(Term::NamedNode(severity)) = get_object(graph, shape_term, sh::SEVERITY.as_named_node()) {
        shape.severity = Severity::from_iri(severity.as_ref());
    }
    shape.name = get_string(graph, shape_term, sh::NAME.as_named_node());
    shape.message = get_string(graph, shape_term, sh::MESSAGE.as_named_node());
}

/// Builds the regular expression for `sh:pattern` and `sh:flags`.
pub(crate) fn compile_pattern(pattern: &str, flags: Option<&str>) -> Result<Regex, ShaclParseError> {
    let mut full = String::new();
    if let Some(flags) = flags {
        for (flag, inline) in [('i', "(?i)"), ('m', "(?m)"), ('s', "(?s)"), ('x', "(?x)")] {
            if flags.contains(flag) {
                full.push_str(inline);
            }
        }
    }
    full.push_str(pattern);
    Regex::new(&full).map_err(|e| ShaclParseError::invalid_regex(pattern, e.to_string()))
}

fn get_object(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<Term> {
    match subject {
        Term::NamedNode(n) => graph
            .object_for_subject_predicate(n, predicate)
            .map(|t| t.into_owned()),
        Term::BlankNode(b) => graph
            .object_for_subject_predicate(b, predicate)
            .map(|t| t.into_owned()),
        _ => None,
    }
}

fn get_objects(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Vec<Term> {
    let mut objects: Vec<Term> = match subject {
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
    objects.sort_by_cached_key(ToString::to_string);
    objects
}

fn get_literal(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<Literal> {
    match get_object(graph, subject, predicate)? {
        Term::Literal(literal) => Some(literal),
        _ => None,
    }
}

fn get_string(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Option<String> {
    get_literal(graph, subject, predicate).map(|l| l.value().to_owned())
}

fn get_count(graph: &Graph, subject: &Term, predicate: NamedNodeRef<'_>) -> Result<Option<usize>, ShaclParseError> {
    let Some(literal) = get_literal(graph, subject, predicate) else {
        return Ok(None);
    };
    literal.value().parse().map(Some).map_err(|_| {
        ShaclParseError::invalid_shape(
            subject.clone(),
            format!("{predicate} must be a non-negative integer, found {literal}"),
        )
    })
}
