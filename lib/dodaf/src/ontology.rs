//! The DoDAF 2.0 semantic schemas and the artifacts derived from them.

use crate::artifacts::ArtifactBundle;
use crate::document::{DocumentValidator, ValidationOptions};
use crate::error::DocumentError;
use crate::metamodel;
use dodaf_semantic::vocab::{dct, dodaf, schema, xsd};
use dodaf_semantic::{
    ClassIri, ContextOptions, FieldDefinition, FieldSchema, FieldType, JsonLdContext, NodeKind,
    OwlOptions, PropertyMeta, SemanticSchema, SemanticSchemaBuilder, ShaclOptions, data_property,
    functional_object_property, generate_context, generate_owl_turtle, generate_shacl_turtle,
    object_property,
};
use dodaf_shacl::ShaclValidator;
use tracing::info;

/// Base IRI against which relative `@id` values of architecture documents resolve.
pub const DOCUMENT_BASE: &str = "https://w3id.org/dodaf/2.0/resource/";
/// Published URL of the generated JSON-LD context.
pub const CONTEXT_URL: &str = "https://w3id.org/dodaf/2.0/context.jsonld";

/// The eight DoDAF viewpoints.
pub const VIEWPOINTS: [&str; 8] = ["AV", "CV", "DIV", "OV", "PV", "SvcV", "StdV", "SV"];
/// Product identifiers such as `OV-1`, `SV-10c` or `SvcV-4`.
pub const PRODUCT_TYPE_PATTERN: &str = r"^(AV|CV|DIV|OV|PV|SvcV|StdV|SV)-\d+[a-z]?$";

pub const ELEMENT_CLASSES: [ClassIri; 17] = [
    dodaf::ACTIVITY,
    dodaf::CAPABILITY,
    dodaf::CONDITION,
    dodaf::DATA,
    dodaf::INFORMATION,
    dodaf::LOCATION,
    dodaf::MEASURE,
    dodaf::ORGANIZATION,
    dodaf::PERFORMER,
    dodaf::PERSON_ROLE,
    dodaf::PROJECT,
    dodaf::RESOURCE,
    dodaf::RULE,
    dodaf::SERVICE,
    dodaf::SKILL,
    dodaf::STANDARD,
    dodaf::SYSTEM,
];

pub const RELATIONSHIP_CLASSES: [ClassIri; 7] = [
    dodaf::ACTIVITY_PERFORMED_BY_PERFORMER,
    dodaf::ACTIVITY_CONSUMES_RESOURCE,
    dodaf::ACTIVITY_PRODUCES_RESOURCE,
    dodaf::ACTIVITY_PART_OF_CAPABILITY,
    dodaf::RULE_CONSTRAINS_ACTIVITY,
    dodaf::PERFORMER_AT_LOCATION,
    dodaf::SERVICE_PROVIDES_CAPABILITY,
];

/// Options for every artifact derived from the ontology.
#[derive(Debug, Clone)]
pub struct OntologyConfig {
    pub document_base: String,
    pub context: ContextOptions,
    pub owl: OwlOptions,
    pub shacl: ShaclOptions,
}

impl OntologyConfig {
    /// Uses `base` for relative document IRIs and as the context `@base`.
    #[must_use]
    pub fn with_document_base(mut self, base: impl Into<String>) -> Self {
        self.document_base = base.into();
        self.context = self.context.with_base(self.document_base.clone());
        self
    }

    #[must_use]
    pub fn with_context_options(mut self, options: ContextOptions) -> Self {
        self.context = options;
        self
    }

    #[must_use]
    pub fn with_owl_options(mut self, options: OwlOptions) -> Self {
        self.owl = options;
        self
    }

    #[must_use]
    pub fn with_shacl_options(mut self, options: ShaclOptions) -> Self {
        self.shacl = options;
        self
    }
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            document_base: DOCUMENT_BASE.to_owned(),
            context: ContextOptions::new().with_base(DOCUMENT_BASE),
            owl: OwlOptions::new(),
            shacl: ShaclOptions::new(),
        }
    }
}

/// The DoDAF ontology: its semantic schemas and the configuration of the generators.
///
/// Built explicitly and handed to whatever needs it.
#[derive(Debug, Clone)]
pub struct Ontology {
    config: OntologyConfig,
    schemas: Vec<SemanticSchema>,
}

impl Ontology {
    pub fn new(config: OntologyConfig) -> Result<Self, DocumentError> {
        let schemas = dodaf_schemas()?;
        info!(schemas = schemas.len(), "built DoDAF ontology");
        Ok(Self { config, schemas })
    }

    pub fn config(&self) -> &OntologyConfig {
        &self.config
    }

    /// Architecture, View, Product, Element, Relationship, then one schema per element type and
    /// per relationship type.
    pub fn schemas(&self) -> &[SemanticSchema] {
        &self.schemas
    }

    pub fn context(&self) -> JsonLdContext {
        generate_context(&self.schemas, &self.config.context)
    }

    pub fn owl_turtle(&self) -> String {
        generate_owl_turtle(&self.schemas, &self.config.owl)
    }

    pub fn shacl_turtle(&self) -> String {
        generate_shacl_turtle(&self.schemas, &self.config.shacl)
    }

    /// All three artifacts.
    pub fn artifacts(&self) -> ArtifactBundle {
        ArtifactBundle::new(
            self.context(),
            self.owl_turtle(),
            self.shacl_turtle(),
            &self.schemas,
        )
    }

    /// A SHACL validator over the generated shapes that resolves [`CONTEXT_URL`] locally.
    pub fn shacl_validator(&self) -> Result<ShaclValidator, DocumentError> {
        let validator = ShaclValidator::from_schemas(&self.schemas, &self.config.shacl, &self.config.context)?
            .with_base_iri(self.config.document_base.clone())
            .with_remote_context(CONTEXT_URL, self.context().to_pretty_string());
        Ok(validator)
    }

    pub fn document_validator(&self, options: ValidationOptions) -> Result<DocumentValidator, DocumentError> {
        Ok(DocumentValidator::new(
            self.context(),
            self.shacl_validator()?,
            &self.schemas,
            options,
        ))
    }
}

fn name_field() -> FieldDefinition {
    data_property(
        FieldSchema::string(),
        PropertyMeta::new(dodaf::NAME)
            .with_min_count(1)
            .with_datatype(xsd::STRING),
    )
}

fn description_field(required: bool) -> FieldDefinition {
    let meta = PropertyMeta::new(dct::DESCRIPTION).with_datatype(xsd::STRING);
    if required {
        data_property(FieldSchema::string(), meta.with_min_count(1))
    } else {
        data_property(FieldSchema::string().optional(), meta)
    }
}

fn link_field(property: dodaf_semantic::PropertyIri) -> FieldDefinition {
    object_property(
        FieldSchema::array(FieldType::Object).optional(),
        PropertyMeta::new(property).with_node_kind(NodeKind::Iri),
    )
}

/// `id`, `type`, `name` and `description`, shared by every schema.
fn resource(class: ClassIri, comment: &str, description_required: bool) -> SemanticSchemaBuilder {
    SemanticSchema::builder(class)
        .comment(comment)
        .field("id", FieldSchema::uri())
        .field("type", FieldSchema::string())
        .field("name", name_field())
        .field("description", description_field(description_required))
}

fn endpoint_field(property: dodaf_semantic::PropertyIri) -> FieldDefinition {
    functional_object_property(
        FieldSchema::uri(),
        PropertyMeta::new(property)
            .with_min_count(1)
            .with_node_kind(NodeKind::Iri),
    )
}

fn relationship(class: ClassIri, comment: &str) -> Result<SemanticSchema, DocumentError> {
    Ok(SemanticSchema::builder(class)
        .comment(comment)
        .field("id", FieldSchema::uri())
        .field("type", FieldSchema::string())
        .field(
            "name",
            data_property(
                FieldSchema::string().optional(),
                PropertyMeta::new(dodaf::NAME).with_datatype(xsd::STRING),
            ),
        )
        .field("source", endpoint_field(dodaf::SOURCE))
        .field("target", endpoint_field(dodaf::TARGET))
        .build()?)
}

fn dodaf_schemas() -> Result<Vec<SemanticSchema>, DocumentError> {
    let mut schemas = vec![
        resource(dodaf::ARCHITECTURE, "A DoDAF architecture description", true)
            .field(
                "version",
                data_property(
                    FieldSchema::string().optional(),
                    PropertyMeta::new(schema::VERSION).with_datatype(xsd::STRING),
                ),
            )
            .field(
                "creator",
                data_property(
                    FieldSchema::string().optional(),
                    PropertyMeta::new(dct::CREATOR).with_datatype(xsd::STRING),
                ),
            )
            .field(
                "keywords",
                data_property(
                    FieldSchema::array(FieldType::String).optional(),
                    PropertyMeta::new(schema::KEYWORDS).with_datatype(xsd::STRING),
                ),
            )
            .field("views", link_field(dodaf::HAS_VIEW))
            .build()?,
        resource(dodaf::VIEW, "A DoDAF viewpoint of an architecture", false)
            .field(
                "viewpoint",
                data_property(
                    FieldSchema::enumeration(VIEWPOINTS),
                    PropertyMeta::new(dodaf::VIEWPOINT)
                        .with_min_count(1)
                        .with_max_count(1)
                        .with_enumeration(VIEWPOINTS),
                ),
            )
            .field("products", link_field(dodaf::HAS_PRODUCT))
            .build()?,
        resource(dodaf::PRODUCT, "A DoDAF model such as OV-1 or SV-4", false)
            .field(
                "productType",
                data_property(
                    FieldSchema::string(),
                    PropertyMeta::new(dodaf::PRODUCT_TYPE)
                        .with_min_count(1)
                        .with_max_count(1)
                        .with_pattern(PRODUCT_TYPE_PATTERN),
                ),
            )
            .field("elements", link_field(dodaf::HAS_ELEMENT))
            .field("relationships", link_field(dodaf::HAS_RELATIONSHIP))
            .build()?,
        resource(dodaf::ELEMENT, "Any DoDAF metamodel element", false).build()?,
        relationship(dodaf::RELATIONSHIP, "Any DoDAF metamodel relationship")?,
    ];

    for class in ELEMENT_CLASSES {
        let comment = metamodel::element_record(class.local_name())
            .map_or("A DoDAF element", |r| r.description);
        let mut builder = resource(class.clone(), comment, false);
        if class == dodaf::MEASURE {
            builder = builder.field(
                "unitOfMeasure",
                data_property(
                    FieldSchema::string().optional(),
                    PropertyMeta::new(dodaf::UNIT_OF_MEASURE).with_datatype(xsd::STRING),
                ),
            );
        }
        schemas.push(builder.build()?);
    }
    for class in RELATIONSHIP_CLASSES {
        let comment = metamodel::relationship_record(class.local_name())
            .map_or("A DoDAF relationship", |r| r.description);
        schemas.push(relationship(class, comment)?);
    }
    Ok(schemas)
}
