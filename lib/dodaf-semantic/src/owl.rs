//! OWL ontology generation.

use crate::iri::{ClassIri, Iri, ResourceIri};
use crate::report::ArtifactReport;
use crate::schema::{PropertyKind, SemanticSchema, Value};
use crate::turtle::{Node, TripleBuffer, parse_turtle};
use crate::vocab::{DCT, DODAF, OWL, RDF, RDFS, SCHEMA, XSD, owl, rdf, rdfs};
use oxrdf::{Literal, NamedNode};
use tracing::{debug, info};

/// Options for [`generate_owl_turtle`].
#[derive(Debug, Clone)]
pub struct OwlOptions {
    ontology_iri: ResourceIri,
    version_iri: Option<ResourceIri>,
    imports: Vec<ResourceIri>,
    annotations: bool,
    infer_subclass_from_type_enum: bool,
}

impl Default for OwlOptions {
    fn default() -> Self {
        Self {
            ontology_iri: Iri::from_static("https://w3id.org/dodaf/2.0/ontology"),
            version_iri: None,
            imports: Vec::new(),
            annotations: true,
            infer_subclass_from_type_enum: false,
        }
    }
}

impl OwlOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ontology_iri(mut self, iri: ResourceIri) -> Self {
        self.ontology_iri = iri;
        self
    }

    #[must_use]
    pub fn with_version_iri(mut self, iri: ResourceIri) -> Self {
        self.version_iri = Some(iri);
        self
    }

    #[must_use]
    pub fn with_import(mut self, iri: ResourceIri) -> Self {
        self.imports.push(iri);
        self
    }

    /// Whether to emit `rdfs:label` and `rdfs:comment`. On by default.
    #[must_use]
    pub fn with_annotations(mut self, annotations: bool) -> Self {
        self.annotations = annotations;
        self
    }

    /// Emits `rdfs:subClassOf` from the class IRIs listed in the enumeration of a `type` field.
    ///
    /// Off by default: an enumerated type tag is not a superclass in general.
    #[must_use]
    pub fn with_subclass_inference(mut self, infer: bool) -> Self {
        self.infer_subclass_from_type_enum = infer;
        self
    }

    pub fn ontology_iri(&self) -> &ResourceIri {
        &self.ontology_iri
    }
}

struct OwlWriter<'a> {
    options: &'a OwlOptions,
    buffer: TripleBuffer,
}

impl<'a> OwlWriter<'a> {
    fn new(options: &'a OwlOptions) -> Self {
        Self {
            options,
            buffer: TripleBuffer::new(&[RDF, RDFS, OWL, XSD, DCT, SCHEMA, DODAF]),
        }
    }

    fn write_header(&mut self) {
        let ontology = Node::from(self.options.ontology_iri.to_named_node());
        self.buffer
            .add(&ontology, &rdf::TYPE, owl::ONTOLOGY.to_named_node());
        if let Some(version) = &self.options.version_iri {
            self.buffer
                .add(&ontology, &owl::VERSION_IRI, version.to_named_node());
        }
        for import in &self.options.imports {
            self.buffer.add(&ontology, &owl::IMPORTS, import.to_named_node());
        }
    }

    fn write_class(&mut self, schema: &SemanticSchema) {
        let class = Node::from(schema.class_iri().to_named_node());
        self.buffer.add(&class, &rdf::TYPE, owl::CLASS.to_named_node());
        if !self.options.annotations {
            return;
        }
        if let Some(comment) = schema.comment() {
            self.buffer
                .add(&class, &rdfs::COMMENT, Literal::new_simple_literal(comment));
        }
        let label = schema.class_iri().local_name();
        if !label.is_empty() {
            self.buffer
                .add(&class, &rdfs::LABEL, Literal::new_simple_literal(label));
        }
    }

    fn write_properties(&mut self, schema: &SemanticSchema) {
        for (field, meta) in schema.properties() {
            let property = Node::from(meta.iri().to_named_node());
            let declaration = match meta.kind() {
                PropertyKind::Data => owl::DATATYPE_PROPERTY,
                PropertyKind::Object => owl::OBJECT_PROPERTY,
            };
            self.buffer
                .add(&property, &rdf::TYPE, declaration.to_named_node());
            if meta.is_functional() {
                self.buffer
                    .add(&property, &rdf::TYPE, owl::FUNCTIONAL_PROPERTY.to_named_node());
            }
            if meta.is_inverse_functional() {
                self.buffer.add(
                    &property,
                    &rdf::TYPE,
                    owl::INVERSE_FUNCTIONAL_PROPERTY.to_named_node(),
                );
            }

            let domain = meta.domain().unwrap_or(schema.class_iri());
            self.buffer
                .add(&property, &rdfs::DOMAIN, domain.to_named_node());

            // Object properties without an explicit range stay unconstrained.
            let range: Option<NamedNode> = match (meta.range(), meta.kind()) {
                (Some(range), _) => Some(range.to_named_node()),
                (None, PropertyKind::Data) => meta.datatype().map(Iri::to_named_node),
                (None, PropertyKind::Object) => None,
            };
            if let Some(range) = range {
                self.buffer.add(&property, &rdfs::RANGE, range);
            }

            if self.options.annotations {
                self.buffer
                    .add(&property, &rdfs::LABEL, Literal::new_simple_literal(field));
            }
        }
    }

    fn write_inferred_subclasses(&mut self, schemas: &[SemanticSchema]) {
        let known: Vec<&ClassIri> = schemas.iter().map(SemanticSchema::class_iri).collect();
        for schema in schemas {
            let Some(meta) = schema.property("type") else {
                continue;
            };
            if meta.kind() != PropertyKind::Object {
                continue;
            }
            let Some(values) = meta.enumeration() else {
                continue;
            };
            let owner = Node::from(schema.class_iri().to_named_node());
            for value in values {
                let Value::Iri(candidate) = value else {
                    continue;
                };
                let Some(parent) = known.iter().find(|c| c.as_str() == candidate.as_str()) else {
                    continue;
                };
                if *parent == schema.class_iri() {
                    continue;
                }
                debug!(
                    class = schema.class_iri().as_str(),
                    parent = parent.as_str(),
                    "inferred subclass from type enumeration"
                );
                self.buffer
                    .add(&owner, &rdfs::SUB_CLASS_OF, parent.to_named_node());
            }
        }
    }
}

/// Serializes the schemas as an OWL ontology in Turtle.
///
/// The output starts with the ontology declaration, followed by the classes and then the
/// properties, each in the order the schemas and their fields were declared. A triple produced
/// twice, such as the declaration of a property shared by several classes, is written once.
pub fn generate_owl_turtle(schemas: &[SemanticSchema], options: &OwlOptions) -> String {
    let mut writer = OwlWriter::new(options);
    writer.write_header();
    for schema in schemas {
        writer.write_class(schema);
    }
    for schema in schemas {
        writer.write_properties(schema);
    }
    if options.infer_subclass_from_type_enum {
        writer.write_inferred_subclasses(schemas);
    }
    info!(
        schemas = schemas.len(),
        triples = writer.buffer.len(),
        "generated OWL ontology"
    );
    writer.buffer.to_turtle()
}

/// Re-parses generated OWL Turtle and checks that it declares an ontology.
pub fn validate_owl_turtle(turtle: &str) -> ArtifactReport {
    let graph = match parse_turtle(turtle) {
        Ok(graph) => graph,
        Err(e) => return ArtifactReport::from_errors(vec![format!("Turtle syntax error: {e}")]),
    };
    let mut errors = Vec::new();
    if graph
        .subjects_for_predicate_object(rdf::TYPE.as_named_node(), owl::ONTOLOGY.as_named_node())
        .next()
        .is_none()
    {
        errors.push("Missing owl:Ontology declaration".to_owned());
    }
    ArtifactReport::from_errors(errors)
}
