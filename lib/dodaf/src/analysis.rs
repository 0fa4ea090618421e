//! Counts over a normalized architecture document.

use crate::document::children;
use crate::metamodel::{declared_type, element_record};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ArchitectureSummary {
    pub views: usize,
    pub products: usize,
    pub elements: usize,
    pub relationships: usize,
    /// Number of elements per declared type.
    pub element_types: BTreeMap<String, usize>,
    /// Declared element types with no metamodel record.
    pub unknown_element_types: Vec<String>,
}

/// Walks views, products, elements and relationships the way they are nested in `document`.
///
/// References (`{"id": ...}` only) are counted like inline definitions.
pub fn summarize(document: &Value) -> ArchitectureSummary {
    let mut summary = ArchitectureSummary::default();
    for view in children(document, "views") {
        summary.views += 1;
        for product in children(view, "products") {
            summary.products += 1;
            for element in children(product, "elements") {
                summary.elements += 1;
                let Some(element_type) = declared_type(element) else {
                    continue;
                };
                *summary
                    .element_types
                    .entry(element_type.to_owned())
                    .or_default() += 1;
                if element_record(element_type).is_none()
                    && !summary
                        .unknown_element_types
                        .iter()
                        .any(|t| t == element_type)
                {
                    summary.unknown_element_types.push(element_type.to_owned());
                }
            }
            summary.relationships += children(product, "relationships").len();
        }
    }
    summary.unknown_element_types.sort_unstable();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn counts_nested_nodes() {
        let summary = summarize(&json!({
            "views": [
                { "products": [
                    { "elements": [
                        { "id": "a1", "type": "dodaf:Activity" },
                        { "id": "a2", "type": "Activity" },
                        { "id": "x", "type": "Widget" }
                    ],
                      "relationships": { "id": "r1" } }
                ] },
                { "products": { "id": "p2" } }
            ]
        }));
        assert_eq!(summary.views, 2);
        assert_eq!(summary.products, 2);
        assert_eq!(summary.elements, 3);
        assert_eq!(summary.relationships, 1);
        assert_eq!(summary.element_types["Activity"], 2);
        assert_eq!(summary.unknown_element_types, ["Widget"]);
    }
}
