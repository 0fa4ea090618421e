use dodaf_semantic::vocab::{sh, xsd};
use dodaf_semantic::{
    ClassIri, ContextOptions, FieldSchema, NodeKind, PropertyIri, PropertyMeta, SemanticSchema,
    ShaclOptions, Value, data_property, generate_shacl_turtle, object_property,
};
use dodaf_shacl::{ResultSeverity, ShaclValidator};
use serde_json::json;

fn widget_schema() -> SemanticSchema {
    SemanticSchema::builder(ClassIri::parse("https://ex.org#Widget").unwrap())
        .field(
            "name",
            data_property(
                FieldSchema::string(),
                PropertyMeta::new(PropertyIri::parse("https://ex.org#name").unwrap())
                    .with_min_count(1)
                    .with_datatype(xsd::STRING),
            ),
        )
        .build()
        .unwrap()
}

fn widget_validator() -> ShaclValidator {
    ShaclValidator::from_schemas(&[widget_schema()], &ShaclOptions::new(), &ContextOptions::new())
        .unwrap()
}

#[test]
fn missing_required_property_is_one_violation() {
    let result = widget_validator().validate(&json!({
        "@id": "https://ex.org/w1",
        "@type": "https://ex.org#Widget"
    }));
    assert!(!result.conforms);
    assert_eq!(result.results.len(), 1, "{:?}", result.results);
    let violation = &result.results[0];
    assert_eq!(violation.path.as_deref(), Some("https://ex.org#name"));
    assert_eq!(violation.focus_node, "https://ex.org/w1");
    assert_eq!(violation.severity, ResultSeverity::Error);
    assert_eq!(violation.constraint, "sh:MinCountConstraintComponent");
    assert_eq!(violation.source_shape, "https://ex.org#WidgetShape_name");
    assert!(!result.report.is_empty());
}

#[test]
fn complete_document_conforms() {
    let result = widget_validator().validate(&json!({
        "@id": "https://ex.org/w1",
        "@type": "https://ex.org#Widget",
        "name": "Widget One"
    }));
    assert!(result.conforms, "{:?}", result.results);
    assert!(result.results.is_empty());
}

#[test]
fn validation_is_repeatable_on_one_instance() {
    let validator = widget_validator();
    let document = json!({ "@id": "https://ex.org/w1", "@type": "https://ex.org#Widget" });
    let first = validator.validate(&document);
    let second = validator.validate(&document);
    assert_eq!(first.results, second.results);
}

#[test]
fn custom_severity_is_an_error() {
    let validator = ShaclValidator::from_turtle(
        r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
        <https://ex.org#WidgetShape> a sh:NodeShape ;
            sh:targetClass <https://ex.org#Widget> ;
            sh:property [
                sh:path <https://ex.org#name> ;
                sh:minCount 1 ;
                sh:severity <https://ex.org#Critical>
            ] ."#,
    )
    .unwrap();
    let result = validator.validate(&json!({
        "@id": "https://ex.org/w1",
        "@type": "https://ex.org#Widget"
    }));
    assert!(!result.conforms);
    assert_eq!(result.results[0].severity, ResultSeverity::Error);
}

#[test]
fn warnings_do_not_break_conformance() {
    let validator = ShaclValidator::from_turtle(
        r#"@prefix sh: <http://www.w3.org/ns/shacl#> .
        <https://ex.org#WidgetShape> a sh:NodeShape ;
            sh:targetClass <https://ex.org#Widget> ;
            sh:property [ sh:path <https://ex.org#name> ; sh:minCount 1 ; sh:severity sh:Warning ] ."#,
    )
    .unwrap();
    let result = validator.validate(&json!({
        "@id": "https://ex.org/w1",
        "@type": "https://ex.org#Widget"
    }));
    assert!(result.conforms);
    assert_eq!(result.warnings().count(), 1);
    assert_eq!(result.errors().count(), 0);
}

#[test]
fn expansion_failure_is_reported_not_raised() {
    let result = widget_validator().validate(&json!({
        "@context": "https://unreachable.example/context.jsonld",
        "@id": "https://ex.org/w1"
    }));
    assert!(!result.conforms);
    let [error] = result.results.as_slice() else {
        panic!("{:?}", result.results)
    };
    assert_eq!(error.severity, ResultSeverity::Error);
    assert_eq!(error.focus_node, "https://ex.org/w1");
    assert!(error.message.contains("JSON-LD expansion failed"), "{}", error.message);
}

#[test]
fn generated_facets_are_enforced() {
    let kind = PropertyIri::parse("https://ex.org#kind").unwrap();
    let code = PropertyIri::parse("https://ex.org#code").unwrap();
    let owner = PropertyIri::parse("https://ex.org#owner").unwrap();
    let status = PropertyIri::parse("https://ex.org#status").unwrap();
    let schema = SemanticSchema::builder(ClassIri::parse("https://ex.org#Gadget").unwrap())
        .field(
            "kind",
            data_property(
                FieldSchema::enumeration(["small", "large"]),
                PropertyMeta::new(kind).with_enumeration(["small", "large"]),
            ),
        )
        .field(
            "code",
            data_property(
                FieldSchema::string(),
                PropertyMeta::new(code).with_pattern("^G-\\d+$"),
            ),
        )
        .field(
            "owner",
            object_property(
                FieldSchema::uri(),
                PropertyMeta::new(owner).with_node_kind(NodeKind::Iri),
            ),
        )
        .field(
            "status",
            data_property(
                FieldSchema::string(),
                PropertyMeta::new(status).with_has_value(Value::String("active".into())),
            ),
        )
        .build()
        .unwrap();
    let shapes = generate_shacl_turtle(&[schema.clone()], &ShaclOptions::new());
    assert!(shapes.contains("sh:in"), "{shapes}");
    let validator = ShaclValidator::from_schemas(&[schema], &ShaclOptions::new(), &ContextOptions::new())
        .unwrap();

    let conforming = validator.validate(&json!({
        "@id": "https://ex.org/g1",
        "@type": "https://ex.org#Gadget",
        "kind": "small",
        "code": "G-7",
        "owner": { "@id": "https://ex.org/people/ann" },
        "status": "active"
    }));
    assert!(conforming.conforms, "{:?}", conforming.results);

    let broken = validator.validate(&json!({
        "@id": "https://ex.org/g1",
        "@type": "https://ex.org#Gadget",
        "kind": "medium",
        "code": "X-7",
        "owner": "ann",
        "status": "retired"
    }));
    assert!(!broken.conforms);
    let mut constraints: Vec<&str> = broken.results.iter().map(|r| r.constraint.as_str()).collect();
    constraints.sort_unstable();
    assert_eq!(
        constraints,
        [
            "sh:HasValueConstraintComponent",
            "sh:InConstraintComponent",
            "sh:NodeKindConstraintComponent",
            "sh:PatternConstraintComponent"
        ]
    );
    let report = broken.report_turtle().unwrap();
    assert!(report.contains("sh:ValidationReport"), "{report}");
    assert!(report.contains(sh::CONFORMS.local_name()), "{report}");
}
