#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analysis;
mod artifacts;
mod document;
mod error;
pub mod metamodel;
mod normalize;
mod ontology;

pub use analysis::{ArchitectureSummary, summarize};
pub use artifacts::{ArtifactBundle, CONTEXT_FILE, OWL_FILE, SHACL_FILE};
pub use document::{
    ARCHITECTURE_TYPE, DocumentValidationResult, DocumentValidator, ValidationOptions,
    check_architecture_fields,
};
pub use error::DocumentError;
pub use metamodel::{
    MetamodelCheck, validate_element_against_metamodel, validate_relationship_against_metamodel,
};
pub use ontology::{
    CONTEXT_URL, DOCUMENT_BASE, ELEMENT_CLASSES, Ontology, OntologyConfig, PRODUCT_TYPE_PATTERN,
    RELATIONSHIP_CLASSES, VIEWPOINTS,
};
