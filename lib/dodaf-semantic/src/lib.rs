#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod error;
mod iri;
mod owl;
mod report;
mod schema;
mod shacl;
mod turtle;
pub mod vocab;

pub use context::{ContextOptions, JsonLdContext, generate_context, validate_context};
pub use error::SchemaError;
pub use iri::{ClassIri, DatatypeIri, Iri, PropertyIri, ResourceIri, kind};
pub use owl::{OwlOptions, generate_owl_turtle, validate_owl_turtle};
pub use report::ArtifactReport;
pub use schema::{
    FieldDefinition, FieldSchema, FieldType, NodeKind, PropertyKind, PropertyMeta, SemanticSchema,
    SemanticSchemaBuilder, Value, data_property, functional_data_property,
    functional_object_property, object_property,
};
pub use shacl::{ShaclOptions, generate_shacl_turtle, validate_shacl_turtle};
pub use turtle::{parse_turtle, read_list};
