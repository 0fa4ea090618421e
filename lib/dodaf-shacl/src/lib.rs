#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod constraint;
mod engine;
mod error;
mod jsonld;
mod model;
mod report;
mod validator;

pub use constraint::{Constraint, ConstraintComponent};
pub use engine::GraphValidator;
pub use error::{ShaclError, ShaclParseError};
pub use jsonld::JsonLdExpander;
pub use model::{NodeShape, PropertyShape, Shape, ShapeId, ShapesGraph, Target};
pub use report::{Severity, ValidationReport, ValidationResult, graph_to_turtle};
pub use validator::{ResultSeverity, ShaclValidationError, ShaclValidationResult, ShaclValidator};
