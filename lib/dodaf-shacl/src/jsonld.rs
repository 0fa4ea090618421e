//! JSON-LD expansion of instance documents into RDF.

use crate::error::ShaclError;
use oxjsonld::{JsonLdParser, JsonLdRemoteDocument};
use oxrdf::{Graph, Quad, Triple};
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

/// Expands JSON-LD documents to quads.
///
/// Documents without a top-level `@context` get the configured default context. Remote contexts are
/// never fetched: only the URLs registered with [`Self::with_remote_context`] resolve.
#[derive(Debug, Clone, Default)]
pub struct JsonLdExpander {
    base_iri: Option<String>,
    context: Option<Value>,
    remote_contexts: Arc<FxHashMap<String, String>>,
}

impl JsonLdExpander {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base IRI used to resolve relative `@id` values.
    #[must_use]
    pub fn with_base_iri(mut self, base_iri: impl Into<String>) -> Self {
        self.base_iri = Some(base_iri.into());
        self
    }

    /// Context used when a document has none.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Serves `document` whenever a context references `url`.
    #[must_use]
    pub fn with_remote_context(mut self, url: impl Into<String>, document: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.remote_contexts).insert(url.into(), document.into());
        self
    }

    pub fn base_iri(&self) -> Option<&str> {
        self.base_iri.as_deref()
    }

    /// The document as it is handed to the parser: `@context` first, injected if missing.
    ///
    /// A top-level array becomes the `@graph` of an object carrying the default context. Nodes of
    /// the array may still declare their own `@context`.
    pub fn prepare(&self, document: &Value) -> Value {
        let object = match (document, &self.context) {
            (Value::Object(object), _) => object,
            (Value::Array(nodes), Some(context)) => {
                debug!(nodes = nodes.len(), "wrapping a top-level array with the default JSON-LD context");
                let mut prepared = Map::new();
                prepared.insert("@context".into(), context.clone());
                prepared.insert("@graph".into(), document.clone());
                return Value::Object(prepared);
            }
            _ => return document.clone(),
        };
        let mut prepared = Map::new();
        match (object.get("@context"), &self.context) {
            (Some(context), _) => {
                prepared.insert("@context".into(), context.clone());
            }
            (None, Some(context)) => {
                debug!("injecting default JSON-LD context");
                prepared.insert("@context".into(), context.clone());
            }
            (None, None) => (),
        }
        for (key, value) in object {
            if key != "@context" {
                prepared.insert(key.clone(), value.clone());
            }
        }
        Value::Object(prepared)
    }

    pub fn expand(&self, document: &Value) -> Result<Vec<Quad>, ShaclError> {
        let bytes = serde_json::to_vec(&self.prepare(document))?;
        let mut parser = JsonLdParser::new();
        if let Some(base_iri) = &self.base_iri {
            parser = parser.with_base_iri(base_iri.as_str())?;
        }
        let remote_contexts = Arc::clone(&self.remote_contexts);
        let quads = parser
            .for_slice(&bytes)
            .with_load_document_callback(move |url, _options| {
                let document = remote_contexts
                    .get(url)
                    .ok_or_else(|| format!("remote context {url} is not available offline"))?;
                Ok(JsonLdRemoteDocument {
                    document: document.as_bytes().to_vec(),
                    document_url: url.to_owned(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(quads = quads.len(), "expanded JSON-LD document");
        Ok(quads)
    }

    /// Expands `document` and merges every graph into one.
    pub fn to_graph(&self, document: &Value) -> Result<Graph, ShaclError> {
        let mut graph = Graph::new();
        for quad in self.expand(document)? {
            graph.insert(&Triple::from(quad));
        }
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn context_is_moved_first() {
        let document = json!({ "name": "x", "@context": { "name": "http://ex.org#name" } });
        let prepared = JsonLdExpander::new().prepare(&document);
        let keys: Vec<&String> = prepared.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["@context", "name"]);
    }

    #[test]
    fn default_context_is_injected() {
        let expander = JsonLdExpander::new()
            .with_base_iri("https://ex.org/")
            .with_context(json!({ "name": "http://ex.org#name" }));
        let graph = expander
            .to_graph(&json!({ "@id": "w1", "name": "Widget" }))
            .unwrap();
        assert_eq!(graph.len(), 1);
        let triple = graph.iter().next().unwrap();
        assert_eq!(triple.subject.to_string(), "<https://ex.org/w1>");
        assert_eq!(triple.predicate.as_str(), "http://ex.org#name");
    }

    #[test]
    fn default_context_applies_to_top_level_arrays() {
        let expander = JsonLdExpander::new()
            .with_base_iri("https://ex.org/")
            .with_context(json!({ "name": "http://ex.org#name" }));
        let graph = expander
            .to_graph(&json!([
                { "@id": "w1", "name": "Widget" },
                { "@id": "w2", "name": "Gadget" }
            ]))
            .unwrap();
        assert_eq!(graph.len(), 2);
        assert!(
            graph
                .iter()
                .all(|t| t.predicate.as_str() == "http://ex.org#name")
        );

        let untouched = json!([{ "@id": "https://ex.org/w1" }]);
        assert_eq!(JsonLdExpander::new().prepare(&untouched), untouched);
    }

    #[test]
    fn registered_remote_contexts_resolve() {
        let expander = JsonLdExpander::new().with_remote_context(
            "https://ex.org/context.jsonld",
            r#"{ "@context": { "name": "http://ex.org#name" } }"#,
        );
        let quads = expander
            .expand(&json!({
                "@context": "https://ex.org/context.jsonld",
                "@id": "https://ex.org/w1",
                "name": "Widget"
            }))
            .unwrap();
        assert_eq!(quads.len(), 1);
    }

    #[test]
    fn unknown_remote_contexts_fail() {
        let error = JsonLdExpander::new()
            .expand(&json!({ "@context": "https://ex.org/missing.jsonld", "@id": "https://ex.org/w1" }))
            .unwrap_err();
        assert!(matches!(error, ShaclError::JsonLd(_)), "{error}");
    }
}
