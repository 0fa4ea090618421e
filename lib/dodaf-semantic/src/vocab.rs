//! Namespace prefixes and typed vocabulary terms.
//!
//! Every IRI the ontology uses is declared here. Ontology code never builds an IRI from string
//! pieces: it either picks a constant from one of the modules below or asks a [`Namespace`] for a
//! term, which validates the result.

use crate::iri::Iri;
use oxiri::IriParseError;

/// A short prefix bound to a base IRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Namespace {
    prefix: &'static str,
    base: &'static str,
}

impl Namespace {
    pub const fn new(prefix: &'static str, base: &'static str) -> Self {
        Self { prefix, base }
    }

    #[inline]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    #[inline]
    pub const fn base(&self) -> &'static str {
        self.base
    }

    /// Builds the IRI of `local` in this namespace.
    ///
    /// ```
    /// use dodaf_semantic::vocab::DODAF;
    /// use dodaf_semantic::ClassIri;
    ///
    /// let activity: ClassIri = DODAF.term("Activity")?;
    /// assert_eq!(activity, dodaf_semantic::vocab::dodaf::ACTIVITY);
    /// # Result::<_, Box<dyn std::error::Error>>::Ok(())
    /// ```
    pub fn term<K>(&self, local: &str) -> Result<Iri<K>, IriParseError> {
        Iri::parse(format!("{}{local}", self.base))
    }

    /// Returns `prefix:local` if `iri` lives in this namespace.
    pub fn compact(&self, iri: &str) -> Option<String> {
        let local = iri.strip_prefix(self.base)?;
        if local.is_empty() || local.contains(['#', '/']) {
            return None;
        }
        Some(format!("{}:{local}", self.prefix))
    }

    /// Expands `prefix:local` if it uses this namespace's prefix.
    pub fn expand(&self, curie: &str) -> Option<String> {
        let (prefix, local) = curie.split_once(':')?;
        (prefix == self.prefix && !local.starts_with("//")).then(|| format!("{}{local}", self.base))
    }
}

pub const RDF: Namespace = Namespace::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
pub const RDFS: Namespace = Namespace::new("rdfs", "http://www.w3.org/2000/01/rdf-schema#");
pub const OWL: Namespace = Namespace::new("owl", "http://www.w3.org/2002/07/owl#");
pub const XSD: Namespace = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#");
pub const SH: Namespace = Namespace::new("sh", "http://www.w3.org/ns/shacl#");
pub const DCT: Namespace = Namespace::new("dct", "http://purl.org/dc/terms/");
pub const FOAF: Namespace = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/");
pub const SCHEMA: Namespace = Namespace::new("schema", "http://schema.org/");
pub const DODAF: Namespace = Namespace::new("dodaf", "https://w3id.org/dodaf/2.0/ontology#");

/// The process-wide prefix table, in declaration order.
pub const STANDARD_PREFIXES: [Namespace; 9] = [RDF, RDFS, OWL, XSD, SH, DCT, FOAF, SCHEMA, DODAF];

/// Looks up a standard namespace by prefix.
pub fn namespace(prefix: &str) -> Option<Namespace> {
    STANDARD_PREFIXES.iter().copied().find(|ns| ns.prefix == prefix)
}

/// Rewrites `iri` as a compact IRI using the standard prefix table, if one applies.
pub fn compact_iri(iri: &str) -> Option<String> {
    STANDARD_PREFIXES.iter().find_map(|ns| ns.compact(iri))
}

/// Expands a compact IRI using the standard prefix table.
pub fn expand_curie(curie: &str) -> Option<String> {
    STANDARD_PREFIXES.iter().find_map(|ns| ns.expand(curie))
}

pub mod rdf {
    use crate::iri::{ClassIri, Iri, PropertyIri, ResourceIri};

    pub const TYPE: PropertyIri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
    pub const FIRST: PropertyIri =
        Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#first");
    pub const REST: PropertyIri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#rest");
    pub const NIL: ResourceIri = Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#nil");
    pub const PROPERTY: ClassIri =
        Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#Property");
    pub const LANG_STRING: ClassIri =
        Iri::from_static("http://www.w3.org/1999/02/22-rdf-syntax-ns#langString");
}

pub mod rdfs {
    use crate::iri::{ClassIri, Iri, PropertyIri};

    pub const CLASS: ClassIri = Iri::from_static("http://www.w3.org/2000/01/rdf-schema#Class");
    pub const LABEL: PropertyIri = Iri::from_static("http://www.w3.org/2000/01/rdf-schema#label");
    pub const COMMENT: PropertyIri =
        Iri::from_static("http://www.w3.org/2000/01/rdf-schema#comment");
    pub const DOMAIN: PropertyIri = Iri::from_static("http://www.w3.org/2000/01/rdf-schema#domain");
    pub const RANGE: PropertyIri = Iri::from_static("http://www.w3.org/2000/01/rdf-schema#range");
    pub const SUB_CLASS_OF: PropertyIri =
        Iri::from_static("http://www.w3.org/2000/01/rdf-schema#subClassOf");
}

pub mod owl {
    use crate::iri::{ClassIri, Iri, PropertyIri};

    pub const ONTOLOGY: ClassIri = Iri::from_static("http://www.w3.org/2002/07/owl#Ontology");
    pub const CLASS: ClassIri = Iri::from_static("http://www.w3.org/2002/07/owl#Class");
    pub const THING: ClassIri = Iri::from_static("http://www.w3.org/2002/07/owl#Thing");
    pub const DATATYPE_PROPERTY: ClassIri =
        Iri::from_static("http://www.w3.org/2002/07/owl#DatatypeProperty");
    pub const OBJECT_PROPERTY: ClassIri =
        Iri::from_static("http://www.w3.org/2002/07/owl#ObjectProperty");
    pub const FUNCTIONAL_PROPERTY: ClassIri =
        Iri::from_static("http://www.w3.org/2002/07/owl#FunctionalProperty");
    pub const INVERSE_FUNCTIONAL_PROPERTY: ClassIri =
        Iri::from_static("http://www.w3.org/2002/07/owl#InverseFunctionalProperty");
    pub const VERSION_IRI: PropertyIri = Iri::from_static("http://www.w3.org/2002/07/owl#versionIRI");
    pub const IMPORTS: PropertyIri = Iri::from_static("http://www.w3.org/2002/07/owl#imports");
}

pub mod xsd {
    use crate::iri::{DatatypeIri, Iri};

    pub const STRING: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#string");
    pub const INTEGER: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#integer");
    pub const NON_NEGATIVE_INTEGER: DatatypeIri =
        Iri::from_static("http://www.w3.org/2001/XMLSchema#nonNegativeInteger");
    pub const DECIMAL: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#decimal");
    pub const DOUBLE: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#double");
    pub const BOOLEAN: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#boolean");
    pub const DATE: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#date");
    pub const DATE_TIME: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#dateTime");
    pub const ANY_URI: DatatypeIri = Iri::from_static("http://www.w3.org/2001/XMLSchema#anyURI");
}

/// Shapes Constraint Language terms, including the validation report vocabulary.
pub mod sh {
    use crate::iri::{ClassIri, Iri, PropertyIri, ResourceIri};

    pub const NODE_SHAPE: ClassIri = Iri::from_static("http://www.w3.org/ns/shacl#NodeShape");
    pub const PROPERTY_SHAPE: ClassIri = Iri::from_static("http://www.w3.org/ns/shacl#PropertyShape");
    pub const TARGET_CLASS: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#targetClass");
    pub const PROPERTY: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#property");
    pub const PATH: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#path");
    pub const NAME: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#name");
    pub const MIN_COUNT: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#minCount");
    pub const MAX_COUNT: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#maxCount");
    pub const DATATYPE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#datatype");
    pub const NODE_KIND: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#nodeKind");
    pub const PATTERN: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#pattern");
    pub const FLAGS: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#flags");
    pub const IN: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#in");
    pub const HAS_VALUE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#hasValue");
    pub const CLASS: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#class");
    pub const SEVERITY: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#severity");
    pub const MESSAGE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#message");
    pub const DEACTIVATED: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#deactivated");

    pub const IRI: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#IRI");
    pub const BLANK_NODE: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#BlankNode");
    pub const LITERAL: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#Literal");
    pub const BLANK_NODE_OR_IRI: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#BlankNodeOrIRI");
    pub const BLANK_NODE_OR_LITERAL: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#BlankNodeOrLiteral");
    pub const IRI_OR_LITERAL: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#IRIOrLiteral");

    pub const VIOLATION: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#Violation");
    pub const WARNING: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#Warning");
    pub const INFO: ResourceIri = Iri::from_static("http://www.w3.org/ns/shacl#Info");

    pub const VALIDATION_REPORT: ClassIri =
        Iri::from_static("http://www.w3.org/ns/shacl#ValidationReport");
    pub const VALIDATION_RESULT: ClassIri =
        Iri::from_static("http://www.w3.org/ns/shacl#ValidationResult");
    pub const CONFORMS: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#conforms");
    pub const RESULT: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#result");
    pub const FOCUS_NODE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#focusNode");
    pub const RESULT_PATH: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#resultPath");
    pub const VALUE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#value");
    pub const SOURCE_SHAPE: PropertyIri = Iri::from_static("http://www.w3.org/ns/shacl#sourceShape");
    pub const SOURCE_CONSTRAINT_COMPONENT: PropertyIri =
        Iri::from_static("http://www.w3.org/ns/shacl#sourceConstraintComponent");
    pub const RESULT_MESSAGE: PropertyIri =
        Iri::from_static("http://www.w3.org/ns/shacl#resultMessage");
    pub const RESULT_SEVERITY: PropertyIri =
        Iri::from_static("http://www.w3.org/ns/shacl#resultSeverity");

    pub const MIN_COUNT_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#MinCountConstraintComponent");
    pub const MAX_COUNT_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#MaxCountConstraintComponent");
    pub const DATATYPE_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#DatatypeConstraintComponent");
    pub const NODE_KIND_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#NodeKindConstraintComponent");
    pub const PATTERN_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#PatternConstraintComponent");
    pub const IN_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#InConstraintComponent");
    pub const HAS_VALUE_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#HasValueConstraintComponent");
    pub const CLASS_CONSTRAINT_COMPONENT: ResourceIri =
        Iri::from_static("http://www.w3.org/ns/shacl#ClassConstraintComponent");
}

/// Dublin Core terms.
pub mod dct {
    use crate::iri::{Iri, PropertyIri};

    pub const TITLE: PropertyIri = Iri::from_static("http://purl.org/dc/terms/title");
    pub const DESCRIPTION: PropertyIri = Iri::from_static("http://purl.org/dc/terms/description");
    pub const CREATOR: PropertyIri = Iri::from_static("http://purl.org/dc/terms/creator");
    pub const CREATED: PropertyIri = Iri::from_static("http://purl.org/dc/terms/created");
    pub const MODIFIED: PropertyIri = Iri::from_static("http://purl.org/dc/terms/modified");
}

pub mod foaf {
    use crate::iri::{ClassIri, Iri, PropertyIri};

    pub const AGENT: ClassIri = Iri::from_static("http://xmlns.com/foaf/0.1/Agent");
    pub const ORGANIZATION: ClassIri = Iri::from_static("http://xmlns.com/foaf/0.1/Organization");
    pub const HOMEPAGE: PropertyIri = Iri::from_static("http://xmlns.com/foaf/0.1/homepage");
}

pub mod schema {
    use crate::iri::{Iri, PropertyIri};

    pub const KEYWORDS: PropertyIri = Iri::from_static("http://schema.org/keywords");
    pub const VERSION: PropertyIri = Iri::from_static("http://schema.org/version");
}

/// DoDAF 2.0 (DM2) classes and properties.
pub mod dodaf {
    use crate::iri::{ClassIri, Iri, PropertyIri};

    pub const ARCHITECTURE: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Architecture");
    pub const VIEW: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#View");
    pub const PRODUCT: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Product");
    pub const ELEMENT: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Element");
    pub const RELATIONSHIP: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Relationship");

    // Element types
    pub const ACTIVITY: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Activity");
    pub const CAPABILITY: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Capability");
    pub const CONDITION: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Condition");
    pub const DATA: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Data");
    pub const INFORMATION: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Information");
    pub const LOCATION: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Location");
    pub const MEASURE: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Measure");
    pub const ORGANIZATION: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Organization");
    pub const PERFORMER: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Performer");
    pub const PERSON_ROLE: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#PersonRole");
    pub const PROJECT: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Project");
    pub const RESOURCE: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Resource");
    pub const RULE: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Rule");
    pub const SERVICE: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Service");
    pub const SKILL: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Skill");
    pub const STANDARD: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#Standard");
    pub const SYSTEM: ClassIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#System");

    // Relationship types
    pub const ACTIVITY_PERFORMED_BY_PERFORMER: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#ActivityPerformedByPerformer");
    pub const ACTIVITY_CONSUMES_RESOURCE: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#ActivityConsumesResource");
    pub const ACTIVITY_PRODUCES_RESOURCE: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#ActivityProducesResource");
    pub const ACTIVITY_PART_OF_CAPABILITY: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#ActivityPartOfCapability");
    pub const RULE_CONSTRAINS_ACTIVITY: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#RuleConstrainsActivity");
    pub const PERFORMER_AT_LOCATION: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#PerformerAtLocation");
    pub const SERVICE_PROVIDES_CAPABILITY: ClassIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#ServiceProvidesCapability");

    // Properties
    pub const NAME: PropertyIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#name");
    pub const VIEWPOINT: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#viewpoint");
    pub const PRODUCT_TYPE: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#productType");
    pub const HAS_VIEW: PropertyIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#hasView");
    pub const HAS_PRODUCT: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#hasProduct");
    pub const HAS_ELEMENT: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#hasElement");
    pub const HAS_RELATIONSHIP: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#hasRelationship");
    pub const SOURCE: PropertyIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#source");
    pub const TARGET: PropertyIri = Iri::from_static("https://w3id.org/dodaf/2.0/ontology#target");
    pub const UNIT_OF_MEASURE: PropertyIri =
        Iri::from_static("https://w3id.org/dodaf/2.0/ontology#unitOfMeasure");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in(namespace: Namespace, iris: &[&str]) {
        for iri in iris {
            assert!(
                iri.starts_with(namespace.base()),
                "{iri} is not in the {} namespace",
                namespace.prefix()
            );
            oxiri::Iri::parse(*iri).unwrap();
        }
    }

    #[test]
    fn constants_use_their_namespace() {
        assert_in(RDF, &[rdf::TYPE.as_str(), rdf::FIRST.as_str(), rdf::REST.as_str(), rdf::NIL.as_str()]);
        assert_in(RDFS, &[rdfs::LABEL.as_str(), rdfs::SUB_CLASS_OF.as_str(), rdfs::RANGE.as_str()]);
        assert_in(OWL, &[owl::ONTOLOGY.as_str(), owl::FUNCTIONAL_PROPERTY.as_str()]);
        assert_in(XSD, &[xsd::STRING.as_str(), xsd::INTEGER.as_str(), xsd::BOOLEAN.as_str()]);
        assert_in(SH, &[sh::IN.as_str(), sh::VIOLATION.as_str(), sh::RESULT_SEVERITY.as_str()]);
        assert_in(DCT, &[dct::DESCRIPTION.as_str(), dct::CREATOR.as_str()]);
        assert_in(FOAF, &[foaf::AGENT.as_str()]);
        assert_in(SCHEMA, &[schema::KEYWORDS.as_str()]);
        assert_in(
            DODAF,
            &[dodaf::ARCHITECTURE.as_str(), dodaf::NAME.as_str(), dodaf::SERVICE_PROVIDES_CAPABILITY.as_str()],
        );
    }

    #[test]
    fn term_matches_constant() {
        assert_eq!(DODAF.term::<crate::iri::kind::Class>("View").unwrap(), dodaf::VIEW);
        assert_eq!(SH.term::<crate::iri::kind::Property>("path").unwrap(), sh::PATH);
        DODAF.term::<crate::iri::kind::Class>("not valid").unwrap_err();
    }

    #[test]
    fn compact_and_expand() {
        assert_eq!(compact_iri(dodaf::ACTIVITY.as_str()).as_deref(), Some("dodaf:Activity"));
        assert_eq!(compact_iri("https://ex.org#Widget"), None);
        assert_eq!(
            expand_curie("xsd:string").as_deref(),
            Some("http://www.w3.org/2001/XMLSchema#string")
        );
        assert_eq!(expand_curie("http://example.com"), None);
        assert_eq!(namespace("sh"), Some(SH));
    }

    #[test]
    fn prefixes_are_unique() {
        for (i, a) in STANDARD_PREFIXES.iter().enumerate() {
            for b in &STANDARD_PREFIXES[i + 1..] {
                assert_ne!(a.prefix(), b.prefix());
                assert_ne!(a.base(), b.base());
            }
        }
    }
}
