//! DoDAF 2.0 metamodel (DM2) records used for structural checks.
//!
//! The tables are plain data. `super_class` documents the DM2 lineage and drives nothing.

use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;
use tracing::debug;

/// Fields every element must carry.
const ELEMENT_FIELDS: &[&str] = &["id", "name", "description"];
/// Fields every relationship must carry.
const RELATIONSHIP_FIELDS: &[&str] = &["id", "source", "target"];

/// Descriptive record of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementRecord {
    pub name: &'static str,
    pub super_class: &'static str,
    pub description: &'static str,
    pub required_fields: &'static [&'static str],
}

/// Descriptive record of a relationship type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RelationshipRecord {
    pub name: &'static str,
    pub super_class: &'static str,
    pub description: &'static str,
    pub source_types: &'static [&'static str],
    pub target_types: &'static [&'static str],
    pub required_fields: &'static [&'static str],
}

impl RelationshipRecord {
    pub fn accepts_source(&self, element_type: &str) -> bool {
        self.source_types.contains(&element_type)
    }

    pub fn accepts_target(&self, element_type: &str) -> bool {
        self.target_types.contains(&element_type)
    }
}

const fn element(
    name: &'static str,
    super_class: &'static str,
    description: &'static str,
) -> ElementRecord {
    ElementRecord {
        name,
        super_class,
        description,
        required_fields: ELEMENT_FIELDS,
    }
}

const PERFORMERS: &[&str] = &["Performer", "Organization", "PersonRole", "System", "Service"];
const RESOURCES: &[&str] = &["Resource", "Data", "Information"];

pub static ELEMENTS: &[ElementRecord] = &[
    element(
        "Activity",
        "IndividualType",
        "Work, not specific to a single organization, weapon system or individual, that transforms inputs into outputs or changes their state.",
    ),
    element(
        "Capability",
        "IndividualType",
        "The ability to achieve a desired effect under specified standards and conditions through combinations of ways and means.",
    ),
    element(
        "Condition",
        "IndividualType",
        "The state of an environment or situation in which a performer performs.",
    ),
    element(
        "Data",
        "Resource",
        "Representation of information in a formalized manner suitable for communication, interpretation or processing.",
    ),
    element(
        "Information",
        "Resource",
        "The state of something of interest that is materialized in any medium or form and communicated or received.",
    ),
    element(
        "Location",
        "IndividualType",
        "A point or extent in space that may be referred to physically or logically.",
    ),
    ElementRecord {
        name: "Measure",
        super_class: "IndividualType",
        description: "The magnitude of some attribute of an individual.",
        required_fields: &["id", "name", "description", "unitOfMeasure"],
    },
    element(
        "Organization",
        "Performer",
        "A specific real-world assemblage of people and other resources organized for an on-going purpose.",
    ),
    element(
        "Performer",
        "Resource",
        "Any entity that performs an activity and provides a capability.",
    ),
    element(
        "PersonRole",
        "Performer",
        "A category of persons defined by the role or roles they share that are relevant to an architecture.",
    ),
    element(
        "Project",
        "IndividualType",
        "A temporary endeavor undertaken to create resources or desired effects.",
    ),
    element(
        "Resource",
        "IndividualType",
        "Data, information, performers, materiel or personnel types that are produced or consumed.",
    ),
    element(
        "Rule",
        "Information",
        "A principle or condition that governs behavior; a prescribed guide for conduct or action.",
    ),
    element(
        "Service",
        "Performer",
        "A mechanism to enable access to a set of capabilities through a prescribed interface.",
    ),
    element(
        "Skill",
        "IndividualType",
        "The ability, coming from knowledge, practice or aptitude, to do something well.",
    ),
    element(
        "Standard",
        "Rule",
        "A formal agreement documenting generally accepted specifications or criteria.",
    ),
    element(
        "System",
        "Performer",
        "A functionally, physically or behaviorally related group of regularly interacting or interdependent elements.",
    ),
];

pub static RELATIONSHIPS: &[RelationshipRecord] = &[
    RelationshipRecord {
        name: "ActivityPerformedByPerformer",
        super_class: "overlapType",
        description: "Links an activity to the performer that carries it out.",
        source_types: &["Activity"],
        target_types: PERFORMERS,
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "ActivityConsumesResource",
        super_class: "overlapType",
        description: "A resource consumed by an activity.",
        source_types: &["Activity"],
        target_types: RESOURCES,
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "ActivityProducesResource",
        super_class: "overlapType",
        description: "A resource produced by an activity.",
        source_types: &["Activity"],
        target_types: RESOURCES,
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "ActivityPartOfCapability",
        super_class: "wholePartType",
        description: "An activity that contributes to a capability.",
        source_types: &["Activity"],
        target_types: &["Capability"],
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "RuleConstrainsActivity",
        super_class: "overlapType",
        description: "A rule or standard that constrains how an activity is performed.",
        source_types: &["Rule", "Standard"],
        target_types: &["Activity"],
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "PerformerAtLocation",
        super_class: "overlapType",
        description: "The location at which a performer operates.",
        source_types: PERFORMERS,
        target_types: &["Location"],
        required_fields: RELATIONSHIP_FIELDS,
    },
    RelationshipRecord {
        name: "ServiceProvidesCapability",
        super_class: "overlapType",
        description: "A capability made accessible through a service.",
        source_types: &["Service"],
        target_types: &["Capability"],
        required_fields: RELATIONSHIP_FIELDS,
    },
];

/// Record used for element and relationship types with no entry in the tables.
pub const DEFAULT_RECORD: ElementRecord = ElementRecord {
    name: "Unknown",
    super_class: "Thing",
    description: "Permissive record synthesized for unregistered types.",
    required_fields: ELEMENT_FIELDS,
};

pub fn element_record(type_name: &str) -> Option<&'static ElementRecord> {
    ELEMENTS.iter().find(|r| r.name == type_name)
}

pub fn relationship_record(type_name: &str) -> Option<&'static RelationshipRecord> {
    RELATIONSHIPS.iter().find(|r| r.name == type_name)
}

/// The local type name of a `type` value: `dodaf:Activity`, `Activity` and the full IRI all
/// give `Activity`.
pub fn type_name(value: &str) -> &str {
    value
        .rsplit(['#', '/', ':'])
        .next()
        .unwrap_or(value)
}

/// The local type name declared by a JSON object, from `type` or `@type`.
pub fn declared_type(object: &Value) -> Option<&str> {
    let value = object.get("type").or_else(|| object.get("@type"))?;
    let first = match value {
        Value::Array(values) => values.first()?,
        other => other,
    };
    first.as_str().map(type_name)
}

/// Outcome of a metamodel check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetamodelCheck {
    pub valid: bool,
    /// Name of the record that was applied.
    pub record: Cow<'static, str>,
    /// `false` when the permissive default record was used.
    pub known_type: bool,
    pub errors: Vec<String>,
}

fn check_fields(
    object: &Value,
    record: Cow<'static, str>,
    known_type: bool,
    required_fields: &[&str],
) -> MetamodelCheck {
    let errors: Vec<String> = required_fields
        .iter()
        .filter(|field| object.get(**field).is_none_or(Value::is_null))
        .map(|field| format!("{record}: missing required field '{field}'"))
        .collect();
    MetamodelCheck {
        valid: errors.is_empty(),
        record,
        known_type,
        errors,
    }
}

/// Checks that an element carries the fields its metamodel record requires.
///
/// Unknown types are not rejected: they are checked against [`DEFAULT_RECORD`].
pub fn validate_element_against_metamodel(element: &Value) -> MetamodelCheck {
    let declared = declared_type(element).unwrap_or_default();
    match element_record(declared) {
        Some(record) => check_fields(element, record.name.into(), true, record.required_fields),
        None => {
            debug!(element_type = declared, "no metamodel record, using the default one");
            check_fields(
                element,
                Cow::Owned(declared_or_default(declared)),
                false,
                DEFAULT_RECORD.required_fields,
            )
        }
    }
}

/// Checks that a relationship carries the fields its metamodel record requires.
///
/// Unknown types are checked against [`DEFAULT_RECORD`].
pub fn validate_relationship_against_metamodel(relationship: &Value) -> MetamodelCheck {
    let declared = declared_type(relationship).unwrap_or_default();
    match relationship_record(declared) {
        Some(record) => check_fields(relationship, record.name.into(), true, record.required_fields),
        None => {
            debug!(relationship_type = declared, "no metamodel record, using the default one");
            check_fields(
                relationship,
                Cow::Owned(declared_or_default(declared)),
                false,
                DEFAULT_RECORD.required_fields,
            )
        }
    }
}

fn declared_or_default(declared: &str) -> String {
    if declared.is_empty() {
        DEFAULT_RECORD.name.to_owned()
    } else {
        declared.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn type_names() {
        assert_eq!(type_name("Activity"), "Activity");
        assert_eq!(type_name("dodaf:Activity"), "Activity");
        assert_eq!(type_name("https://w3id.org/dodaf/2.0/ontology#Activity"), "Activity");
        assert_eq!(declared_type(&json!({ "@type": ["dodaf:System", "x"] })), Some("System"));
    }

    #[test]
    fn known_element() {
        let check = validate_element_against_metamodel(&json!({
            "id": "e1", "type": "dodaf:Activity", "name": "Plan", "description": "Planning"
        }));
        assert!(check.valid, "{:?}", check.errors);
        assert!(check.known_type);
        assert_eq!(check.record, "Activity");
    }

    #[test]
    fn measure_needs_a_unit() {
        let check = validate_element_against_metamodel(&json!({
            "id": "m1", "type": "Measure", "name": "Range", "description": "Max range"
        }));
        assert!(!check.valid);
        assert_eq!(check.errors, ["Measure: missing required field 'unitOfMeasure'"]);
    }

    #[test]
    fn relationships_require_endpoints() {
        let check = validate_relationship_against_metamodel(&json!({
            "id": "r1", "type": "ActivityPartOfCapability", "source": "a1"
        }));
        assert!(!check.valid);
        assert_eq!(check.errors, ["ActivityPartOfCapability: missing required field 'target'"]);
        let record = relationship_record("PerformerAtLocation").unwrap();
        assert!(record.accepts_source("System"));
        assert!(!record.accepts_target("System"));
    }

    #[test]
    fn tables_have_unique_names() {
        let mut names: Vec<&str> = ELEMENTS.iter().map(|r| r.name).collect();
        names.extend(RELATIONSHIPS.iter().map(|r| r.name));
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
        for record in RELATIONSHIPS {
            for name in record.source_types.iter().chain(record.target_types) {
                assert!(element_record(name).is_some(), "{} refers to {name}", record.name);
            }
        }
    }
}
