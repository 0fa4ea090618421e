//! SHACL shapes generation.

use crate::report::ArtifactReport;
use crate::schema::{PropertyMeta, SemanticSchema, Value};
use crate::turtle::{Node, TripleBuffer, parse_turtle, read_list};
use crate::vocab::{DODAF, RDF, RDFS, SH, XSD, rdf, rdfs, sh, xsd};
use oxrdf::{Literal, NamedNode, Term};
use tracing::{info, warn};

/// Options for [`generate_shacl_turtle`].
#[derive(Debug, Clone)]
pub struct ShaclOptions {
    inline_property_shapes: bool,
    annotations: bool,
}

impl Default for ShaclOptions {
    fn default() -> Self {
        Self {
            inline_property_shapes: false,
            annotations: true,
        }
    }
}

impl ShaclOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses blank nodes instead of `<class>Shape_<field>` IRIs for property shapes.
    #[must_use]
    pub fn with_inline_property_shapes(mut self, inline: bool) -> Self {
        self.inline_property_shapes = inline;
        self
    }

    /// Whether to emit `rdfs:comment` on node shapes and `sh:name` on property shapes.
    #[must_use]
    pub fn with_annotations(mut self, annotations: bool) -> Self {
        self.annotations = annotations;
        self
    }
}

/// The term `sh:in` and `sh:hasValue` use for a constant.
fn value_term(value: &Value) -> Term {
    match value {
        Value::Iri(iri) => iri.to_named_node().into(),
        Value::String(s) => Literal::new_simple_literal(s).into(),
        Value::Integer(i) => Literal::new_typed_literal(i.to_string(), xsd::INTEGER.to_named_node()).into(),
        Value::Boolean(b) => Literal::new_typed_literal(b.to_string(), xsd::BOOLEAN.to_named_node()).into(),
    }
}

fn integer(value: u32) -> Literal {
    Literal::new_typed_literal(value.to_string(), xsd::INTEGER.to_named_node())
}

struct ShapeWriter<'a> {
    options: &'a ShaclOptions,
    buffer: TripleBuffer,
}

impl ShapeWriter<'_> {
    /// `base` + `suffix` as a named node, or a fresh blank node when the result is not an IRI.
    fn shape_node(&mut self, base: &str, suffix: &str) -> Node {
        let candidate = format!("{base}{suffix}");
        match NamedNode::new(candidate) {
            Ok(node) => Node::Named(node),
            Err(e) => {
                warn!(base, suffix, error = %e, "shape IRI is not valid, using a blank node");
                Node::Blank(self.buffer.fresh_blank_node("shape"))
            }
        }
    }

    fn write_schema(&mut self, schema: &SemanticSchema) {
        let class = schema.class_iri();
        let shape = self.shape_node(class.as_str(), "Shape");
        self.buffer.add(&shape, &rdf::TYPE, sh::NODE_SHAPE.to_named_node());
        self.buffer
            .add(&shape, &sh::TARGET_CLASS, class.to_named_node());
        if self.options.annotations {
            if let Some(comment) = schema.comment() {
                self.buffer
                    .add(&shape, &rdfs::COMMENT, Literal::new_simple_literal(comment));
            }
        }

        for (field, meta) in schema.properties() {
            let property_shape = if self.options.inline_property_shapes {
                Node::Blank(self.buffer.fresh_blank_node("p"))
            } else {
                self.shape_node(class.as_str(), &format!("Shape_{field}"))
            };
            self.buffer
                .add(&shape, &sh::PROPERTY, property_shape.to_term());
            self.write_property_shape(&property_shape, field, meta);
        }
    }

    fn write_property_shape(&mut self, shape: &Node, field: &str, meta: &PropertyMeta) {
        self.buffer
            .add(shape, &rdf::TYPE, sh::PROPERTY_SHAPE.to_named_node());
        self.buffer.add(shape, &sh::PATH, meta.iri().to_named_node());
        if self.options.annotations {
            self.buffer
                .add(shape, &sh::NAME, Literal::new_simple_literal(field));
        }
        if let Some(min) = meta.min_count() {
            self.buffer.add(shape, &sh::MIN_COUNT, integer(min));
        }
        if let Some(max) = meta.max_count() {
            self.buffer.add(shape, &sh::MAX_COUNT, integer(max));
        }
        if let Some(datatype) = meta.datatype() {
            self.buffer
                .add(shape, &sh::DATATYPE, datatype.to_named_node());
        }
        if let Some(node_kind) = meta.node_kind() {
            self.buffer
                .add(shape, &sh::NODE_KIND, node_kind.shacl_iri().to_named_node());
        }
        if let Some(pattern) = meta.pattern() {
            self.buffer
                .add(shape, &sh::PATTERN, Literal::new_simple_literal(pattern));
        }
        if let Some(values) = meta.enumeration() {
            let head = self.buffer.add_list(values.iter().map(value_term).collect());
            self.buffer.add(shape, &sh::IN, head);
        }
        if let Some(value) = meta.has_value() {
            let term: Term = match value {
                Value::String(s) => Literal::new_simple_literal(s).into(),
                Value::Iri(iri) => iri.to_named_node().into(),
                other => {
                    Literal::new_typed_literal(other.lexical_form(), xsd::STRING.to_named_node()).into()
                }
            };
            self.buffer.add(shape, &sh::HAS_VALUE, term);
        }
    }
}

/// Serializes the schemas as SHACL shapes in Turtle: one node shape per schema and one property
/// shape per field carrying property metadata.
pub fn generate_shacl_turtle(schemas: &[SemanticSchema], options: &ShaclOptions) -> String {
    let mut writer = ShapeWriter {
        options,
        buffer: TripleBuffer::new(&[RDF, RDFS, SH, XSD, DODAF]),
    };
    for schema in schemas {
        writer.write_schema(schema);
    }
    info!(
        schemas = schemas.len(),
        triples = writer.buffer.len(),
        "generated SHACL shapes"
    );
    writer.buffer.to_turtle()
}

/// Re-parses generated SHACL Turtle and checks that every `sh:in` value is a closed list.
pub fn validate_shacl_turtle(turtle: &str) -> ArtifactReport {
    let graph = match parse_turtle(turtle) {
        Ok(graph) => graph,
        Err(e) => return ArtifactReport::from_errors(vec![format!("Turtle syntax error: {e}")]),
    };
    let mut errors = Vec::new();
    if graph
        .subjects_for_predicate_object(rdf::TYPE.as_named_node(), sh::NODE_SHAPE.as_named_node())
        .next()
        .is_none()
    {
        errors.push("No sh:NodeShape declared".to_owned());
    }
    for triple in graph.triples_for_predicate(sh::IN.as_named_node()) {
        if let Err(e) = read_list(&graph, &triple.object.into_owned()) {
            errors.push(format!("Malformed sh:in list on {}: {e}", triple.subject));
        }
    }
    ArtifactReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iri::{ClassIri, PropertyIri};
    use crate::schema::{FieldSchema, NodeKind, data_property, object_property};
    use crate::vocab::dodaf;
    use oxrdf::{Graph, NamedNodeRef};

    fn view() -> SemanticSchema {
        SemanticSchema::builder(dodaf::VIEW)
            .comment("A DoDAF viewpoint")
            .field(
                "viewpoint",
                data_property(
                    FieldSchema::enumeration(["OV", "SV", "AV"]),
                    PropertyMeta::new(dodaf::VIEWPOINT)
                        .with_min_count(1)
                        .with_max_count(1)
                        .with_datatype(xsd::STRING)
                        .with_enumeration(["OV", "SV", "AV"]),
                ),
            )
            .field(
                "products",
                object_property(
                    FieldSchema::array(crate::schema::FieldType::Object),
                    PropertyMeta::new(dodaf::HAS_PRODUCT).with_node_kind(NodeKind::Iri),
                ),
            )
            .build()
            .unwrap()
    }

    fn object(graph: &Graph, subject: &str, predicate: NamedNodeRef<'_>) -> Option<String> {
        graph
            .object_for_subject_predicate(NamedNodeRef::new_unchecked(subject), predicate)
            .map(|t| t.to_string())
    }

    #[test]
    fn names_shapes_after_the_class() {
        let turtle = generate_shacl_turtle(&[view()], &ShaclOptions::new());
        assert!(validate_shacl_turtle(&turtle).valid, "{turtle}");
        let graph = parse_turtle(&turtle).unwrap();
        let node_shape = format!("{}Shape", dodaf::VIEW.as_str());
        let property_shape = format!("{}Shape_viewpoint", dodaf::VIEW.as_str());

        assert_eq!(object(&graph, &node_shape, sh::TARGET_CLASS.as_named_node()), Some(format!("<{}>", dodaf::VIEW.as_str())));
        assert_eq!(
            graph
                .objects_for_subject_predicate(NamedNodeRef::new_unchecked(&node_shape), sh::PROPERTY.as_named_node())
                .count(),
            2
        );
        assert_eq!(object(&graph, &property_shape, sh::PATH.as_named_node()), Some(format!("<{}>", dodaf::VIEWPOINT.as_str())));
        assert_eq!(
            object(&graph, &property_shape, sh::MIN_COUNT.as_named_node()).as_deref(),
            Some("\"1\"^^<http://www.w3.org/2001/XMLSchema#integer>")
        );
        assert_eq!(
            object(&graph, &format!("{}Shape_products", dodaf::VIEW.as_str()), sh::NODE_KIND.as_named_node()),
            Some(format!("<{}>", sh::IRI.as_str()))
        );
    }

    #[test]
    fn enumeration_is_an_ordered_closed_list() {
        let turtle = generate_shacl_turtle(&[view()], &ShaclOptions::new());
        let graph = parse_turtle(&turtle).unwrap();
        let shape = format!("{}Shape_viewpoint", dodaf::VIEW.as_str());
        let head = graph
            .object_for_subject_predicate(NamedNodeRef::new_unchecked(&shape), sh::IN.as_named_node())
            .unwrap()
            .into_owned();
        let items: Vec<String> = read_list(&graph, &head).unwrap().iter().map(ToString::to_string).collect();
        assert_eq!(items, ["\"OV\"", "\"SV\"", "\"AV\""]);
        assert_eq!(graph.triples_for_predicate(rdf::FIRST.as_named_node()).count(), 3);
        assert_eq!(graph.triples_for_predicate(rdf::REST.as_named_node()).count(), 3);
        assert_eq!(
            graph
                .triples_for_object(rdf::NIL.as_named_node())
                .filter(|t| t.predicate == rdf::REST.as_named_node())
                .count(),
            1
        );
    }

    #[test]
    fn has_value_and_pattern() {
        let schema = SemanticSchema::builder(ClassIri::parse("https://ex.org#Widget").unwrap())
            .field(
                "code",
                data_property(
                    FieldSchema::string(),
                    PropertyMeta::new(PropertyIri::parse("https://ex.org#code").unwrap())
                        .with_pattern("^W-[0-9]+$")
                        .with_has_value("W-1"),
                ),
            )
            .field(
                "count",
                data_property(
                    FieldSchema::integer(),
                    PropertyMeta::new(PropertyIri::parse("https://ex.org#count").unwrap()).with_has_value(3),
                ),
            )
            .build()
            .unwrap();
        let graph = parse_turtle(&generate_shacl_turtle(&[schema], &ShaclOptions::new())).unwrap();
        assert_eq!(
            object(&graph, "https://ex.org#WidgetShape_code", sh::HAS_VALUE.as_named_node()).as_deref(),
            Some("\"W-1\"")
        );
        assert_eq!(
            object(&graph, "https://ex.org#WidgetShape_code", sh::PATTERN.as_named_node()).as_deref(),
            Some("\"^W-[0-9]+$\"")
        );
        assert_eq!(
            object(&graph, "https://ex.org#WidgetShape_count", sh::HAS_VALUE.as_named_node()).as_deref(),
            Some("\"3\"")
        );
    }

    #[test]
    fn inline_property_shapes_are_blank() {
        let options = ShaclOptions::new().with_inline_property_shapes(true);
        let turtle = generate_shacl_turtle(&[view()], &options);
        assert!(!turtle.contains("Shape_"), "{turtle}");
        let graph = parse_turtle(&turtle).unwrap();
        assert!(
            graph
                .triples_for_predicate(sh::PROPERTY.as_named_node())
                .all(|t| t.object.is_blank_node())
        );
        assert_eq!(generate_shacl_turtle(&[view()], &options), turtle);
    }

    #[test]
    fn self_check_catches_broken_lists() {
        let report = validate_shacl_turtle(
            "@prefix sh: <http://www.w3.org/ns/shacl#> .\n\
             @prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .\n\
             <http://ex.org/S> a sh:NodeShape ; sh:property <http://ex.org/P> .\n\
             <http://ex.org/P> sh:in _:l .\n\
             _:l rdf:first \"a\" .\n",
        );
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("Malformed sh:in list"), "{report}");
    }
}
