//! The SHACL Core constraint components checked by the engine.

use dodaf_semantic::ResourceIri;
use dodaf_semantic::vocab::sh;
use oxrdf::{NamedNode, Term};
use std::fmt;

/// A constraint attached to a shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    /// sh:minCount
    MinCount(usize),
    /// sh:maxCount
    MaxCount(usize),
    /// sh:datatype: every value is a literal of this datatype.
    Datatype(NamedNode),
    /// sh:nodeKind
    NodeKind(NamedNode),
    /// sh:pattern with optional sh:flags. Blank nodes never match.
    Pattern {
        pattern: String,
        flags: Option<String>,
    },
    /// sh:in
    In(Vec<Term>),
    /// sh:hasValue
    HasValue(Term),
    /// sh:class, with `rdfs:subClassOf` closure in the data graph.
    Class(NamedNode),
}

impl Constraint {
    pub fn component(&self) -> ConstraintComponent {
        match self {
            Self::MinCount(_) => ConstraintComponent::MinCount,
            Self::MaxCount(_) => ConstraintComponent::MaxCount,
            Self::Datatype(_) => ConstraintComponent::Datatype,
            Self::NodeKind(_) => ConstraintComponent::NodeKind,
            Self::Pattern { .. } => ConstraintComponent::Pattern,
            Self::In(_) => ConstraintComponent::In,
            Self::HasValue(_) => ConstraintComponent::HasValue,
            Self::Class(_) => ConstraintComponent::Class,
        }
    }
}

/// The type of a constraint, as reported in `sh:sourceConstraintComponent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintComponent {
    MinCount,
    MaxCount,
    Datatype,
    NodeKind,
    Pattern,
    In,
    HasValue,
    Class,
}

impl ConstraintComponent {
    fn vocab(self) -> ResourceIri {
        match self {
            Self::MinCount => sh::MIN_COUNT_CONSTRAINT_COMPONENT,
            Self::MaxCount => sh::MAX_COUNT_CONSTRAINT_COMPONENT,
            Self::Datatype => sh::DATATYPE_CONSTRAINT_COMPONENT,
            Self::NodeKind => sh::NODE_KIND_CONSTRAINT_COMPONENT,
            Self::Pattern => sh::PATTERN_CONSTRAINT_COMPONENT,
            Self::In => sh::IN_CONSTRAINT_COMPONENT,
            Self::HasValue => sh::HAS_VALUE_CONSTRAINT_COMPONENT,
            Self::Class => sh::CLASS_CONSTRAINT_COMPONENT,
        }
    }

    pub fn iri(self) -> NamedNode {
        self.vocab().to_named_node()
    }

    /// The compact name, `sh:MinCountConstraintComponent` for example.
    pub fn name(self) -> String {
        format!("sh:{}", self.vocab().local_name())
    }
}

impl fmt::Display for ConstraintComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
