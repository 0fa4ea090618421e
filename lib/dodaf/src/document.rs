//! Validation of DoDAF architecture documents.

use crate::metamodel::{
    declared_type, relationship_record, validate_element_against_metamodel,
    validate_relationship_against_metamodel,
};
use crate::normalize::Compactor;
use crate::ontology::{CONTEXT_URL, DOCUMENT_BASE};
use dodaf_semantic::{FieldType, JsonLdContext, SemanticSchema};
use dodaf_shacl::{ResultSeverity, ShaclValidator};
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

/// The `type` an architecture document's root must have, in compact form.
pub const ARCHITECTURE_TYPE: &str = "dodaf:Architecture";

/// Which passes [`DocumentValidator::validate`] runs after the structural checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    pub shacl: bool,
    pub metamodel: bool,
}

impl ValidationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_shacl(mut self, shacl: bool) -> Self {
        self.shacl = shacl;
        self
    }

    #[must_use]
    pub fn with_metamodel(mut self, metamodel: bool) -> Self {
        self.metamodel = metamodel;
        self
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            shacl: true,
            metamodel: true,
        }
    }
}

/// Outcome of [`DocumentValidator::validate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// The compacted document. Only present when the document is valid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized: Option<Value>,
}

impl DocumentValidationResult {
    fn new() -> Self {
        Self {
            valid: false,
            errors: Vec::new(),
            warnings: Vec::new(),
            normalized: None,
        }
    }

    fn finish(mut self, normalized: Option<Value>) -> Self {
        self.valid = self.errors.is_empty();
        if self.valid {
            self.normalized = normalized;
        }
        info!(
            valid = self.valid,
            errors = self.errors.len(),
            warnings = self.warnings.len(),
            "validated architecture document"
        );
        self
    }
}

/// Validates architecture documents in stages.
///
/// 1. JSON-LD expansion. A document without `@context` gets the ontology context.
/// 2. Compaction into a normalized tree.
/// 3. Required top-level fields. Any miss stops validation here.
/// 4. Field types of the architecture, views, products, elements and relationships against the
///    schema of their declared type. Errors stop validation here.
/// 5. Metamodel checks of elements and relationships, if enabled. Errors stop validation here.
/// 6. SHACL conformance, if enabled.
#[derive(Debug, Clone)]
pub struct DocumentValidator {
    context: JsonLdContext,
    shacl: ShaclValidator,
    /// Keyed by the local name of the schema class.
    schemas: FxHashMap<String, SemanticSchema>,
    options: ValidationOptions,
}

impl DocumentValidator {
    pub fn new(
        context: JsonLdContext,
        shacl: ShaclValidator,
        schemas: &[SemanticSchema],
        options: ValidationOptions,
    ) -> Self {
        let schemas = schemas
            .iter()
            .map(|schema| (schema.class_iri().local_name().to_owned(), schema.clone()))
            .collect();
        Self {
            context,
            shacl,
            schemas,
            options,
        }
    }

    pub fn options(&self) -> ValidationOptions {
        self.options
    }

    pub fn validate(&self, document: &Value) -> DocumentValidationResult {
        let mut result = DocumentValidationResult::new();

        let graph = match self.shacl.expander().to_graph(document) {
            Ok(graph) => graph,
            Err(error) => {
                result.errors.push(error.to_string());
                return result.finish(None);
            }
        };
        if graph.is_empty() {
            result
                .errors
                .push("JSON-LD expansion produced no data".to_owned());
            return result.finish(None);
        }
        debug!(triples = graph.len(), "expanded architecture document");

        let base = self.shacl.expander().base_iri().unwrap_or(DOCUMENT_BASE);
        let Some(normalized) = Compactor::new(&self.context, base).compact(&graph, CONTEXT_URL) else {
            result
                .errors
                .push("Unable to compact the expanded document".to_owned());
            return result.finish(None);
        };

        result.errors.extend(check_architecture_fields(&normalized));
        if !result.errors.is_empty() {
            return result.finish(None);
        }

        self.check_structure(&normalized, &mut result);
        if !result.errors.is_empty() {
            return result.finish(None);
        }

        if self.options.metamodel {
            check_metamodel(&normalized, &mut result);
            if !result.errors.is_empty() {
                return result.finish(None);
            }
        }

        if self.options.shacl {
            let shacl = self.shacl.validate_graph(&graph);
            for finding in shacl.results {
                match finding.severity {
                    ResultSeverity::Error => result.errors.push(finding.to_string()),
                    ResultSeverity::Warning | ResultSeverity::Info => {
                        result.warnings.push(finding.to_string());
                    }
                }
            }
        }
        result.finish(Some(normalized))
    }

    /// Errors are prefixed with the id of the offending node.
    fn check_structure(&self, root: &Value, result: &mut DocumentValidationResult) {
        let mut nodes = vec![(root, "Architecture")];
        for view in definitions(root, "views") {
            nodes.push((view, "View"));
            for product in definitions(view, "products") {
                nodes.push((product, "Product"));
                nodes.extend(definitions(product, "elements").map(|e| (e, "Element")));
                nodes.extend(definitions(product, "relationships").map(|r| (r, "Relationship")));
            }
        }

        for (node, fallback) in nodes {
            let Some(schema) = declared_type(node)
                .and_then(|t| self.schemas.get(t))
                .or_else(|| self.schemas.get(fallback))
            else {
                continue;
            };
            let id = reference_id(node).unwrap_or("<no id>");
            result.errors.extend(
                schema
                    .check_structure(&structural_form(node, schema))
                    .into_iter()
                    .map(|e| format!("{id}: {e}")),
            );
        }
        debug!(errors = result.errors.len(), "checked document structure");
    }
}

/// The required root fields: `id`, `type`, `name` and `description`. All misses are reported.
pub fn check_architecture_fields(root: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    if !has_value(root, "id") {
        errors.push("Missing required field 'id'".to_owned());
    }
    let type_ok = match root.get("type") {
        Some(Value::String(t)) => t == ARCHITECTURE_TYPE,
        Some(Value::Array(types)) => types.iter().any(|t| t == ARCHITECTURE_TYPE),
        _ => false,
    };
    if !type_ok {
        errors.push(match root.get("type") {
            Some(found) => format!("Incorrect field 'type': expected '{ARCHITECTURE_TYPE}', found {found}"),
            None => format!("Missing required field 'type': expected '{ARCHITECTURE_TYPE}'"),
        });
    }
    for field in ["name", "description"] {
        if !has_value(root, field) {
            errors.push(format!("Missing required field '{field}'"));
        }
    }
    errors
}

fn has_value(object: &Value, field: &str) -> bool {
    object.get(field).is_some_and(|v| !v.is_null())
}

/// Objects under `key`, whether it holds one object or an array of them.
pub(crate) fn children<'a>(node: &'a Value, key: &str) -> Vec<&'a Value> {
    match node.get(key) {
        Some(Value::Array(items)) => items.iter().filter(|v| v.is_object()).collect(),
        Some(item @ Value::Object(_)) => vec![item],
        _ => Vec::new(),
    }
}

/// Only nodes defined inline are checked, not `{"id": ...}` references.
fn is_definition(node: &Value) -> bool {
    node.as_object().is_some_and(|o| o.keys().any(|k| k != "id"))
}

fn definitions<'a>(node: &'a Value, key: &str) -> impl Iterator<Item = &'a Value> {
    children(node, key).into_iter().filter(|n| is_definition(n))
}

/// The node as the structural schemas describe it.
///
/// In the compacted tree a reference is an `{"id": ...}` object, a typed or tagged literal is a
/// value object and a node with several types has a `type` array.
fn structural_form(node: &Value, schema: &SemanticSchema) -> Value {
    let mut node = node.clone();
    if let Some(object) = node.as_object_mut() {
        for (name, field) in schema.fields() {
            let Some(value) = object.get_mut(name) else {
                continue;
            };
            if name == "type" {
                if let Some(first) = value.as_array().and_then(|types| types.first()).cloned() {
                    *value = first;
                }
            }
            flatten(value, field.field_type());
        }
    }
    node
}

fn flatten(value: &mut Value, field_type: &FieldType) {
    match field_type {
        FieldType::Object => {}
        FieldType::Array(item) => {
            if let Value::Array(items) = value {
                for element in items {
                    flatten(element, item);
                }
            } else {
                flatten(value, item);
            }
        }
        FieldType::Uri => {
            if let Some(id) = value.get("id").and_then(Value::as_str).map(str::to_owned) {
                *value = Value::String(id);
            }
        }
        _ => {
            if let Some(literal) = value.get("@value").cloned() {
                *value = literal;
            }
        }
    }
}

fn reference_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(id) => Some(id),
        other => other.get("id")?.as_str(),
    }
}

fn check_metamodel(root: &Value, result: &mut DocumentValidationResult) {
    let mut element_types: FxHashMap<&str, &str> = FxHashMap::default();
    let mut relationships = Vec::new();
    for view in children(root, "views") {
        for product in children(view, "products") {
            for element in children(product, "elements").into_iter().filter(|e| is_definition(e)) {
                let id = reference_id(element).unwrap_or("<no id>");
                let check = validate_element_against_metamodel(element);
                if !check.known_type {
                    result.warnings.push(format!(
                        "{id}: unknown element type '{}', checked against the default record",
                        check.record
                    ));
                }
                result
                    .errors
                    .extend(check.errors.into_iter().map(|e| format!("{id}: {e}")));
                if let Some(element_type) = declared_type(element) {
                    element_types.insert(id, element_type);
                }
            }
            relationships.extend(
                children(product, "relationships")
                    .into_iter()
                    .filter(|r| is_definition(r)),
            );
        }
    }

    for relationship in relationships {
        let id = reference_id(relationship).unwrap_or("<no id>");
        let check = validate_relationship_against_metamodel(relationship);
        if !check.known_type {
            result.warnings.push(format!(
                "{id}: unknown relationship type '{}', checked against the default record",
                check.record
            ));
        }
        result
            .errors
            .extend(check.errors.into_iter().map(|e| format!("{id}: {e}")));

        let Some(record) = declared_type(relationship).and_then(relationship_record) else {
            continue;
        };
        for field in ["source", "target"] {
            let Some(endpoint) = relationship.get(field).and_then(reference_id) else {
                continue;
            };
            let Some(&endpoint_type) = element_types.get(endpoint) else {
                continue;
            };
            let (accepted, allowed) = if field == "source" {
                (record.accepts_source(endpoint_type), record.source_types)
            } else {
                (record.accepts_target(endpoint_type), record.target_types)
            };
            if !accepted {
                result.warnings.push(format!(
                    "{id}: {field} '{endpoint}' is a {endpoint_type}, {} expects one of {}",
                    record.name,
                    allowed.join(", ")
                ));
            }
        }
    }
}
