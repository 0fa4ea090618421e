//! The semantic schema DSL.
//!
//! A [`SemanticSchema`] is a structural object schema (named fields with JSON types) plus RDF
//! metadata: the class the objects belong to and, for some fields, a [`PropertyMeta`] record
//! describing the RDF property the field maps to. Metadata lives in a side table keyed by field
//! name, so the structural part is never altered by annotating it.
//!
//! ```
//! use dodaf_semantic::vocab::xsd;
//! use dodaf_semantic::{data_property, ClassIri, FieldSchema, PropertyIri, PropertyMeta, SemanticSchema};
//!
//! let widget = SemanticSchema::builder(ClassIri::parse("https://ex.org#Widget")?)
//!     .comment("A widget")
//!     .field(
//!         "name",
//!         data_property(
//!             FieldSchema::string(),
//!             PropertyMeta::new(PropertyIri::parse("https://ex.org#name")?)
//!                 .with_min_count(1)
//!                 .with_datatype(xsd::STRING),
//!         ),
//!     )
//!     .field("revision", FieldSchema::integer().optional())
//!     .build()?;
//!
//! assert_eq!(widget.properties().count(), 1);
//! assert!(widget.property("revision").is_none());
//! # Result::<_, Box<dyn std::error::Error>>::Ok(())
//! ```

use crate::error::SchemaError;
use crate::iri::{ClassIri, DatatypeIri, Iri, PropertyIri, ResourceIri};
use crate::vocab::sh;
use regex::Regex;
use serde_json::Value as Json;
use std::fmt;
use tracing::debug;

/// JSON type of a structural field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
    /// A string holding an IRI reference.
    Uri,
    Object,
    Array(Box<FieldType>),
    /// A string drawn from a fixed set.
    Enum(Vec<String>),
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => f.write_str("string"),
            Self::Integer => f.write_str("integer"),
            Self::Number => f.write_str("number"),
            Self::Boolean => f.write_str("boolean"),
            Self::Uri => f.write_str("IRI string"),
            Self::Object => f.write_str("object"),
            Self::Array(item) => write!(f, "array of {item}"),
            Self::Enum(values) => write!(f, "one of {}", values.join(", ")),
        }
    }
}

/// Structural definition of a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    field_type: FieldType,
    optional: bool,
}

impl FieldSchema {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            optional: false,
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn integer() -> Self {
        Self::new(FieldType::Integer)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn uri() -> Self {
        Self::new(FieldType::Uri)
    }

    pub fn object() -> Self {
        Self::new(FieldType::Object)
    }

    pub fn array(item: FieldType) -> Self {
        Self::new(FieldType::Array(Box::new(item)))
    }

    pub fn enumeration(values: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::new(FieldType::Enum(values.into_iter().map(Into::into).collect()))
    }

    /// Marks the field as not required by the structural check.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    #[inline]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

/// Whether a property relates a resource to a literal or to another resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    Data,
    Object,
}

/// How a property value must be represented in RDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Iri,
    BlankNode,
    Literal,
}

impl NodeKind {
    /// The matching `sh:nodeKind` value.
    pub fn shacl_iri(self) -> ResourceIri {
        match self {
            Self::Iri => sh::IRI,
            Self::BlankNode => sh::BLANK_NODE,
            Self::Literal => sh::LITERAL,
        }
    }
}

/// A constant used by `sh:in` and `sh:hasValue`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    Iri(ResourceIri),
    String(String),
    Integer(i64),
    Boolean(bool),
}

impl Value {
    /// The lexical form of the value.
    pub fn lexical_form(&self) -> String {
        match self {
            Self::Iri(iri) => iri.as_str().to_owned(),
            Self::String(s) => s.clone(),
            Self::Integer(i) => i.to_string(),
            Self::Boolean(b) => b.to_string(),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl<K> From<Iri<K>> for Value {
    fn from(value: Iri<K>) -> Self {
        Self::Iri(value.to_resource())
    }
}

impl<K> From<&Iri<K>> for Value {
    fn from(value: &Iri<K>) -> Self {
        Self::Iri(value.to_resource())
    }
}

/// RDF metadata attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMeta {
    iri: PropertyIri,
    kind: Option<PropertyKind>,
    min_count: Option<u32>,
    max_count: Option<u32>,
    datatype: Option<DatatypeIri>,
    node_kind: Option<NodeKind>,
    enumeration: Option<Vec<Value>>,
    pattern: Option<String>,
    has_value: Option<Value>,
    functional: Option<bool>,
    inverse_functional: Option<bool>,
    domain: Option<ClassIri>,
    range: Option<ResourceIri>,
}

impl PropertyMeta {
    pub fn new(iri: PropertyIri) -> Self {
        Self {
            iri,
            kind: None,
            min_count: None,
            max_count: None,
            datatype: None,
            node_kind: None,
            enumeration: None,
            pattern: None,
            has_value: None,
            functional: None,
            inverse_functional: None,
            domain: None,
            range: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: PropertyKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_min_count(mut self, min_count: u32) -> Self {
        self.min_count = Some(min_count);
        self
    }

    #[must_use]
    pub fn with_max_count(mut self, max_count: u32) -> Self {
        self.max_count = Some(max_count);
        self
    }

    #[must_use]
    pub fn with_datatype(mut self, datatype: DatatypeIri) -> Self {
        self.datatype = Some(datatype);
        self
    }

    #[must_use]
    pub fn with_node_kind(mut self, node_kind: NodeKind) -> Self {
        self.node_kind = Some(node_kind);
        self
    }

    /// Allowed values, in the order they must be listed in `sh:in`.
    #[must_use]
    pub fn with_enumeration(mut self, values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.enumeration = Some(values.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    #[must_use]
    pub fn with_has_value(mut self, value: impl Into<Value>) -> Self {
        self.has_value = Some(value.into());
        self
    }

    #[must_use]
    pub fn with_functional(mut self, functional: bool) -> Self {
        self.functional = Some(functional);
        self
    }

    #[must_use]
    pub fn with_inverse_functional(mut self, inverse_functional: bool) -> Self {
        self.inverse_functional = Some(inverse_functional);
        self
    }

    #[must_use]
    pub fn with_domain(mut self, domain: ClassIri) -> Self {
        self.domain = Some(domain);
        self
    }

    /// The class or datatype values must belong to.
    #[must_use]
    pub fn with_range<K>(mut self, range: Iri<K>) -> Self {
        self.range = Some(range.to_resource());
        self
    }

    #[inline]
    pub fn iri(&self) -> &PropertyIri {
        &self.iri
    }

    /// The property kind, `Data` when it was never set.
    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind.unwrap_or(PropertyKind::Data)
    }

    #[inline]
    pub fn min_count(&self) -> Option<u32> {
        self.min_count
    }

    #[inline]
    pub fn max_count(&self) -> Option<u32> {
        self.max_count
    }

    #[inline]
    pub fn datatype(&self) -> Option<&DatatypeIri> {
        self.datatype.as_ref()
    }

    #[inline]
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.node_kind
    }

    #[inline]
    pub fn enumeration(&self) -> Option<&[Value]> {
        self.enumeration.as_deref()
    }

    #[inline]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    #[inline]
    pub fn has_value(&self) -> Option<&Value> {
        self.has_value.as_ref()
    }

    #[inline]
    pub fn is_functional(&self) -> bool {
        self.functional.unwrap_or(false)
    }

    #[inline]
    pub fn is_inverse_functional(&self) -> bool {
        self.inverse_functional.unwrap_or(false)
    }

    #[inline]
    pub fn domain(&self) -> Option<&ClassIri> {
        self.domain.as_ref()
    }

    #[inline]
    pub fn range(&self) -> Option<&ResourceIri> {
        self.range.as_ref()
    }
}

/// A structural field with optional RDF metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    schema: FieldSchema,
    meta: Option<PropertyMeta>,
}

impl FieldDefinition {
    #[inline]
    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    #[inline]
    pub fn meta(&self) -> Option<&PropertyMeta> {
        self.meta.as_ref()
    }
}

impl From<FieldSchema> for FieldDefinition {
    fn from(schema: FieldSchema) -> Self {
        Self { schema, meta: None }
    }
}

fn attach(schema: FieldSchema, mut meta: PropertyMeta, default_kind: PropertyKind) -> FieldDefinition {
    // An explicitly set kind is kept.
    if meta.kind.is_none() {
        meta.kind = Some(default_kind);
    }
    FieldDefinition {
        schema,
        meta: Some(meta),
    }
}

/// Attaches literal-valued property metadata to a field.
pub fn data_property(schema: FieldSchema, meta: PropertyMeta) -> FieldDefinition {
    attach(schema, meta, PropertyKind::Data)
}

/// Attaches resource-valued property metadata to a field.
pub fn object_property(schema: FieldSchema, meta: PropertyMeta) -> FieldDefinition {
    attach(schema, meta, PropertyKind::Object)
}

fn mark_functional(mut meta: PropertyMeta) -> PropertyMeta {
    match meta.functional {
        None => meta.functional = Some(true),
        Some(false) => debug!(
            property = meta.iri.as_str(),
            "explicit non-functional flag kept by a functional property constructor"
        ),
        Some(true) => (),
    }
    meta
}

/// Like [`data_property`], also flagging the property `owl:FunctionalProperty`.
///
/// A flag set explicitly on `meta` wins over the one this constructor adds.
pub fn functional_data_property(schema: FieldSchema, meta: PropertyMeta) -> FieldDefinition {
    data_property(schema, mark_functional(meta))
}

/// Like [`object_property`], also flagging the property `owl:FunctionalProperty`.
///
/// A flag set explicitly on `meta` wins over the one this constructor adds.
pub fn functional_object_property(schema: FieldSchema, meta: PropertyMeta) -> FieldDefinition {
    object_property(schema, mark_functional(meta))
}

/// A structural schema tagged with an RDF class.
///
/// Immutable once built; generators only read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticSchema {
    class_iri: ClassIri,
    comment: Option<String>,
    context: Vec<(String, String)>,
    fields: Vec<(String, FieldSchema)>,
    properties: Vec<(String, PropertyMeta)>,
}

impl SemanticSchema {
    pub fn builder(class_iri: ClassIri) -> SemanticSchemaBuilder {
        SemanticSchemaBuilder {
            class_iri,
            comment: None,
            context: Vec::new(),
            fields: Vec::new(),
        }
    }

    #[inline]
    pub fn class_iri(&self) -> &ClassIri {
        &self.class_iri
    }

    #[inline]
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Raw JSON-LD context overrides, in declaration order.
    pub fn context_overrides(&self) -> impl Iterator<Item = (&str, &str)> {
        self.context.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All structural fields, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The fields carrying RDF metadata, in declaration order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyMeta)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn property(&self, field: &str) -> Option<&PropertyMeta> {
        self.properties
            .iter()
            .find_map(|(name, meta)| (name == field).then_some(meta))
    }

    /// Checks a JSON object against the structural part of the schema.
    ///
    /// A field declared as an array also accepts a single item, since JSON-LD treats both forms
    /// alike. Returns one message per problem.
    pub fn check_structure(&self, value: &Json) -> Vec<String> {
        let Some(object) = value.as_object() else {
            return vec![format!(
                "Expected a JSON object for <{}>",
                self.class_iri.as_str()
            )];
        };
        let mut errors = Vec::new();
        for (name, schema) in &self.fields {
            match object.get(name) {
                None | Some(Json::Null) => {
                    if !schema.optional {
                        errors.push(format!("Missing required field '{name}'"));
                    }
                }
                Some(value) => check_type(name, schema.field_type(), value, &mut errors),
            }
        }
        errors
    }
}

fn check_type(path: &str, field_type: &FieldType, value: &Json, errors: &mut Vec<String>) {
    let ok = match field_type {
        FieldType::String => value.is_string(),
        FieldType::Integer => value.is_i64() || value.is_u64(),
        FieldType::Number => value.is_number(),
        FieldType::Boolean => value.is_boolean(),
        FieldType::Uri => value
            .as_str()
            .is_some_and(|s| oxiri::IriRef::parse(s).is_ok()),
        FieldType::Object => value.is_object(),
        FieldType::Enum(values) => value
            .as_str()
            .is_some_and(|s| values.iter().any(|v| v == s)),
        FieldType::Array(item) => {
            if let Some(items) = value.as_array() {
                for (i, element) in items.iter().enumerate() {
                    check_type(&format!("{path}[{i}]"), item, element, errors);
                }
            } else {
                check_type(path, item, value, errors);
            }
            true
        }
    };
    if !ok {
        errors.push(format!("Field '{path}' should be {field_type}, found {value}"));
    }
}

/// Builder for [`SemanticSchema`].
#[derive(Debug, Clone)]
#[must_use]
pub struct SemanticSchemaBuilder {
    class_iri: ClassIri,
    comment: Option<String>,
    context: Vec<(String, String)>,
    fields: Vec<(String, FieldDefinition)>,
}

impl SemanticSchemaBuilder {
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Adds a raw JSON-LD context entry, overriding generated mappings for the same term.
    pub fn context_entry(mut self, term: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((term.into(), value.into()));
        self
    }

    pub fn field(mut self, name: impl Into<String>, field: impl Into<FieldDefinition>) -> Self {
        self.fields.push((name.into(), field.into()));
        self
    }

    /// Validates the definition and derives the property table.
    pub fn build(self) -> Result<SemanticSchema, SchemaError> {
        let class = self.class_iri.as_str();
        for (term, value) in &self.context {
            if !value.starts_with('@') && oxiri::Iri::parse(value.as_str()).is_err() {
                return Err(SchemaError::InvalidContextEntry {
                    class: class.to_owned(),
                    term: term.clone(),
                    value: value.clone(),
                });
            }
        }

        let mut fields = Vec::with_capacity(self.fields.len());
        let mut properties = Vec::new();
        for (name, definition) in self.fields {
            if fields.iter().any(|(n, _): &(String, FieldSchema)| *n == name) {
                return Err(SchemaError::DuplicateField {
                    class: class.to_owned(),
                    field: name,
                });
            }
            if let Some(meta) = definition.meta {
                check_meta(class, &name, &meta)?;
                properties.push((name.clone(), meta));
            }
            fields.push((name, definition.schema));
        }

        Ok(SemanticSchema {
            class_iri: self.class_iri,
            comment: self.comment,
            context: self.context,
            fields,
            properties,
        })
    }
}

fn check_meta(class: &str, field: &str, meta: &PropertyMeta) -> Result<(), SchemaError> {
    if let (Some(min), Some(max)) = (meta.min_count, meta.max_count) {
        if min > max {
            return Err(SchemaError::InvalidCardinality {
                class: class.to_owned(),
                field: field.to_owned(),
                min,
                max,
            });
        }
    }
    if let Some(pattern) = &meta.pattern {
        Regex::new(pattern).map_err(|e| SchemaError::InvalidPattern {
            class: class.to_owned(),
            field: field.to_owned(),
            message: e.to_string(),
        })?;
    }
    Ok(())
}
