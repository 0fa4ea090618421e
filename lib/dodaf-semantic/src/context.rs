//! JSON-LD context generation.

use crate::report::ArtifactReport;
use crate::schema::SemanticSchema;
use crate::vocab::{STANDARD_PREFIXES, rdf};
use serde_json::{Map, Value, json};
use tracing::{debug, info, warn};

/// Options for [`generate_context`].
#[derive(Debug, Clone)]
pub struct ContextOptions {
    base: Option<String>,
    version: f64,
    include_standard_prefixes: bool,
    custom_prefixes: Vec<(String, String)>,
}

impl Default for ContextOptions {
    fn default() -> Self {
        Self {
            base: None,
            version: 1.1,
            include_standard_prefixes: true,
            custom_prefixes: Vec::new(),
        }
    }
}

impl ContextOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `@base`.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Sets `@version`, `1.1` by default.
    #[must_use]
    pub fn with_version(mut self, version: f64) -> Self {
        self.version = version;
        self
    }

    #[must_use]
    pub fn with_standard_prefixes(mut self, include: bool) -> Self {
        self.include_standard_prefixes = include;
        self
    }

    /// Declares an extra prefix.
    ///
    /// Custom prefixes are written after the standard ones and replace them on a name clash.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.custom_prefixes.push((prefix.into(), iri.into()));
        self
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }
}

/// A generated JSON-LD context: the value of an `@context` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonLdContext {
    terms: Map<String, Value>,
}

impl JsonLdContext {
    pub fn get(&self, term: &str) -> Option<&Value> {
        self.terms.get(term)
    }

    pub fn terms(&self) -> &Map<String, Value> {
        &self.terms
    }

    /// The IRI a term maps to, for plain and `{"@id": ...}` definitions.
    pub fn iri_of(&self, term: &str) -> Option<&str> {
        term_iri(self.terms.get(term)?)
    }

    /// The first term mapped to `iri`, ignoring keyword aliases.
    pub fn term_for(&self, iri: &str) -> Option<&str> {
        self.terms
            .iter()
            .filter(|(term, _)| !term.starts_with('@'))
            .find_map(|(term, value)| (term_iri(value)? == iri).then_some(term.as_str()))
    }

    /// Prefix declarations: terms whose IRI ends with `#` or `/`.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms.iter().filter_map(|(term, value)| {
            let iri = value.as_str()?;
            (!term.starts_with('@') && iri.ends_with(['#', '/'])).then_some((term.as_str(), iri))
        })
    }

    /// `{"@context": ...}`, the document served to JSON-LD processors.
    pub fn to_document(&self) -> Value {
        json!({ "@context": Value::Object(self.terms.clone()) })
    }

    /// The context document as 2-space indented JSON.
    pub fn to_pretty_string(&self) -> String {
        let mut text =
            serde_json::to_string_pretty(&self.to_document()).unwrap_or_else(|_| String::from("{}"));
        text.push('\n');
        text
    }
}

fn term_iri(value: &Value) -> Option<&str> {
    match value {
        Value::String(iri) => Some(iri),
        Value::Object(definition) => definition.get("@id")?.as_str(),
        _ => None,
    }
}

fn is_keyword_alias(value: Option<&Value>) -> bool {
    value
        .and_then(Value::as_str)
        .is_some_and(|iri| iri.starts_with('@'))
}

/// Merges the schemas into a single JSON-LD context.
///
/// Later entries win on a key clash except for keyword aliases (`id`, `type`), which are never
/// replaced, and class short names, which only fill free keys. Keys keep the order in which they
/// were first inserted.
///
/// A schema override or property named like a keyword alias is dropped with a warning, so
/// [`validate_context`] reports such a property as unmapped.
pub fn generate_context(schemas: &[SemanticSchema], options: &ContextOptions) -> JsonLdContext {
    let mut terms = Map::new();
    if let Some(base) = &options.base {
        terms.insert("@base".into(), base.as_str().into());
    }
    terms.insert("@version".into(), json!(options.version));
    terms.insert("id".into(), "@id".into());
    terms.insert("type".into(), "@type".into());

    if options.include_standard_prefixes {
        for namespace in STANDARD_PREFIXES {
            terms.insert(namespace.prefix().into(), namespace.base().into());
        }
    }
    for (prefix, iri) in &options.custom_prefixes {
        if let Some(previous) = terms.insert(prefix.clone(), iri.as_str().into()) {
            debug!(prefix, %previous, "custom prefix replaces an existing entry");
        }
    }

    for schema in schemas {
        let class = schema.class_iri().as_str();
        for (term, iri) in schema.context_overrides() {
            if is_keyword_alias(terms.get(term)) {
                if !iri.starts_with('@') {
                    warn!(class, term, iri, "context override shadowed by a keyword alias");
                }
                continue;
            }
            terms.insert(term.into(), iri.into());
        }
        for (field, meta) in schema.properties() {
            if is_keyword_alias(terms.get(field)) {
                warn!(
                    class,
                    field,
                    iri = meta.iri().as_str(),
                    "property shadowed by a keyword alias, it is left out of the context"
                );
                continue;
            }
            terms.insert(field.into(), meta.iri().as_str().into());
        }
        let class_name = schema.class_iri().local_name();
        if !class_name.is_empty() && !terms.contains_key(class_name) {
            terms.insert(class_name.into(), schema.class_iri().as_str().into());
        }
    }

    info!(schemas = schemas.len(), terms = terms.len(), "generated JSON-LD context");
    JsonLdContext { terms }
}

/// Checks that every schema property is mapped and that no IRI has two terms.
///
/// Advisory: problems are reported, never raised.
pub fn validate_context(context: &JsonLdContext, schemas: &[SemanticSchema]) -> ArtifactReport {
    let mut errors = Vec::new();

    for schema in schemas {
        for (field, meta) in schema.properties() {
            let iri = meta.iri().as_str();
            let mapped = match context.get(field) {
                Some(Value::String(value)) if value == "@type" => iri == rdf::TYPE.as_str(),
                Some(value) => term_iri(value) == Some(iri),
                None => false,
            };
            if !mapped {
                errors.push(format!("Property '{field}' is not mapped in context"));
            }
        }
    }

    let mut by_iri: Vec<(&str, Vec<&str>)> = Vec::new();
    for (term, value) in context.terms() {
        if term.starts_with('@') {
            continue;
        }
        let Some(iri) = term_iri(value) else {
            continue;
        };
        if iri.starts_with('@') {
            continue;
        }
        match by_iri.iter_mut().find(|(i, _)| *i == iri) {
            Some((_, terms)) => terms.push(term),
            None => by_iri.push((iri, vec![term])),
        }
    }
    for (iri, terms) in by_iri {
        if terms.len() > 1 {
            errors.push(format!(
                "IRI '{iri}' is mapped to multiple terms: {}",
                terms.join(", ")
            ));
        }
    }

    ArtifactReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iri::{ClassIri, PropertyIri};
    use crate::schema::{FieldSchema, PropertyMeta, data_property, object_property};
    use crate::vocab::{dodaf, xsd};

    fn widget() -> SemanticSchema {
        SemanticSchema::builder(ClassIri::parse("https://ex.org#Widget").unwrap())
            .field(
                "name",
                data_property(
                    FieldSchema::string(),
                    PropertyMeta::new(PropertyIri::parse("https://ex.org#name").unwrap())
                        .with_datatype(xsd::STRING),
                ),
            )
            .field(
                "parts",
                object_property(
                    FieldSchema::uri(),
                    PropertyMeta::new(PropertyIri::parse("https://ex.org#part").unwrap()),
                ),
            )
            .field("cache", FieldSchema::string().optional())
            .build()
            .unwrap()
    }

    #[test]
    fn seeds_keywords_and_prefixes() {
        let context = generate_context(&[], &ContextOptions::new().with_base("https://ex.org/"));
        assert_eq!(context.get("@base"), Some(&json!("https://ex.org/")));
        assert_eq!(context.get("@version"), Some(&json!(1.1)));
        assert_eq!(context.get("id"), Some(&json!("@id")));
        assert_eq!(context.get("type"), Some(&json!("@type")));
        assert_eq!(context.iri_of("dodaf"), Some("https://w3id.org/dodaf/2.0/ontology#"));
        assert_eq!(context.prefixes().count(), STANDARD_PREFIXES.len());

        let bare = generate_context(&[], &ContextOptions::new().with_standard_prefixes(false));
        assert!(bare.get("@base").is_none());
        assert_eq!(bare.prefixes().count(), 0);
    }

    #[test]
    fn maps_properties_and_classes() {
        let context = generate_context(&[widget()], &ContextOptions::new());
        assert_eq!(context.iri_of("name"), Some("https://ex.org#name"));
        assert_eq!(context.iri_of("parts"), Some("https://ex.org#part"));
        assert_eq!(context.iri_of("Widget"), Some("https://ex.org#Widget"));
        assert!(context.get("cache").is_none());
        assert_eq!(context.term_for("https://ex.org#part"), Some("parts"));
        assert!(validate_context(&context, &[widget()]).valid);
    }

    #[test]
    fn custom_prefixes_win() {
        let context = generate_context(
            &[],
            &ContextOptions::new().with_prefix("schema", "https://schema.org/"),
        );
        assert_eq!(context.iri_of("schema"), Some("https://schema.org/"));
    }

    #[test]
    fn schema_overrides_and_class_priority() {
        let schema = SemanticSchema::builder(dodaf::VIEW)
            .context_entry("xsd", "http://www.w3.org/2001/XMLSchema#")
            .context_entry("View", "https://ex.org#CustomView")
            .context_entry("type", "https://ex.org#kind")
            .build()
            .unwrap();
        let context = generate_context(&[schema], &ContextOptions::new());
        assert_eq!(context.iri_of("View"), Some("https://ex.org#CustomView"));
        assert_eq!(context.get("type"), Some(&json!("@type")));
    }

    #[test]
    fn keyword_aliases_shadow_properties() {
        let schema = SemanticSchema::builder(ClassIri::parse("https://ex.org#Gadget").unwrap())
            .field(
                "type",
                data_property(
                    FieldSchema::string(),
                    PropertyMeta::new(PropertyIri::parse("https://ex.org#gadgetType").unwrap()),
                ),
            )
            .build()
            .unwrap();
        let context = generate_context(std::slice::from_ref(&schema), &ContextOptions::new());
        assert_eq!(context.get("type"), Some(&json!("@type")));
        assert!(context.term_for("https://ex.org#gadgetType").is_none());
        assert_eq!(
            validate_context(&context, &[schema]).errors,
            ["Property 'type' is not mapped in context"]
        );
    }

    #[test]
    fn reports_unmapped_properties_and_collisions() {
        let mut terms = Map::new();
        terms.insert("id".into(), "@id".into());
        terms.insert("type".into(), "@type".into());
        terms.insert("name".into(), "https://ex.org#name".into());
        terms.insert("label".into(), json!({"@id": "https://ex.org#name"}));
        let context = JsonLdContext { terms };
        let report = validate_context(&context, &[widget()]);
        assert!(!report.valid);
        assert_eq!(
            report.errors,
            [
                "Property 'parts' is not mapped in context",
                "IRI 'https://ex.org#name' is mapped to multiple terms: name, label",
            ]
        );
    }

    #[test]
    fn rdf_type_fields_are_satisfied_by_the_type_alias() {
        let schema = SemanticSchema::builder(dodaf::ELEMENT)
            .field("type", object_property(FieldSchema::uri(), PropertyMeta::new(rdf::TYPE)))
            .build()
            .unwrap();
        let context = generate_context(std::slice::from_ref(&schema), &ContextOptions::new());
        assert_eq!(context.get("type"), Some(&json!("@type")));
        assert!(validate_context(&context, &[schema]).valid);
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_context(&[widget()], &ContextOptions::new()).to_pretty_string();
        let b = generate_context(&[widget()], &ContextOptions::new()).to_pretty_string();
        assert_eq!(a, b);
        assert!(a.starts_with("{\n  \"@context\": {\n    \"@version\": 1.1,"));
    }
}
