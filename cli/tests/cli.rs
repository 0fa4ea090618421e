use anyhow::Result;
use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn cli_command() -> Result<Command> {
    Ok(Command::cargo_bin("dodaf")?)
}

const VALID_ARCHITECTURE: &str = r#"{
    "@context": "https://w3id.org/dodaf/2.0/context.jsonld",
    "id": "logistics",
    "type": "Architecture",
    "name": "Theater Logistics",
    "description": "Supply chain architecture",
    "views": [{
        "id": "ov",
        "type": "View",
        "name": "Operational",
        "viewpoint": "OV",
        "products": [{
            "id": "ov-5a",
            "type": "Product",
            "name": "Activities",
            "productType": "OV-5a",
            "elements": [
                { "id": "resupply", "type": "Activity", "name": "Resupply", "description": "Deliver supplies" },
                { "id": "convoy", "type": "Widget", "name": "Convoy", "description": "Road move" }
            ]
        }]
    }]
}"#;

#[test]
fn cli_help() -> Result<()> {
    cli_command()?
        .assert()
        .failure()
        .stdout("")
        .stderr(predicate::str::contains("Usage"));
    Ok(())
}

#[test]
fn generate_context_to_stdout() -> Result<()> {
    cli_command()?
        .arg("generate")
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""id": "@id""#))
        .stdout(predicate::str::contains("https://w3id.org/dodaf/2.0/resource/"));
    Ok(())
}

#[test]
fn generate_with_base() -> Result<()> {
    cli_command()?
        .args(["generate", "context", "--base", "https://example.org/arch/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.org/arch/"));
    cli_command()?
        .args(["generate", "context", "--base", "not an iri"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid base IRI"));
    Ok(())
}

#[test]
fn generate_all_to_directory() -> Result<()> {
    let dir = TempDir::new()?;
    cli_command()?
        .arg("generate")
        .arg("all")
        .arg("--output")
        .arg(dir.path())
        .assert()
        .success();
    dir.child("context.jsonld")
        .assert(predicate::str::contains("@context"));
    dir.child("ontology.ttl")
        .assert(predicate::str::contains("owl:Ontology"));
    dir.child("shapes.ttl")
        .assert(predicate::str::contains("sh:NodeShape"));
    Ok(())
}

#[test]
fn generate_owl_to_file() -> Result<()> {
    let file = assert_fs::NamedTempFile::new("ontology.ttl")?;
    cli_command()?
        .args(["generate", "owl", "--output"])
        .arg(file.path())
        .assert()
        .success()
        .stdout("");
    file.assert(predicate::str::contains("owl:ObjectProperty"));
    Ok(())
}

#[test]
fn check_artifacts() -> Result<()> {
    cli_command()?
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("consistent"));
    Ok(())
}

#[test]
fn validate_valid_document() -> Result<()> {
    let file = assert_fs::NamedTempFile::new("architecture.jsonld")?;
    file.write_str(VALID_ARCHITECTURE)?;
    cli_command()?
        .arg("validate")
        .arg(file.path())
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Document is valid"))
        .stdout(predicate::str::contains("unknown element type 'Widget'"));
    Ok(())
}

#[test]
fn validate_invalid_document_from_stdin() -> Result<()> {
    cli_command()?
        .args(["validate", "--format", "json"])
        .write_stdin(r#"{"@id": "arch-1", "name": "Test", "description": "d"}"#)
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""valid": false"#))
        .stdout(predicate::str::contains("'type'"))
        .stderr(predicate::str::contains("The document is not valid"));
    Ok(())
}

#[test]
fn validate_without_shacl() -> Result<()> {
    let document = VALID_ARCHITECTURE.replace(r#""productType": "OV-5a""#, r#""productType": "five""#);
    cli_command()?
        .arg("validate")
        .write_stdin(document.as_str())
        .assert()
        .failure()
        .stdout(predicate::str::contains("productType"));
    cli_command()?
        .args(["validate", "--no-shacl"])
        .write_stdin(document)
        .assert()
        .success();
    Ok(())
}

#[test]
fn validate_rejects_malformed_json() -> Result<()> {
    cli_command()?
        .arg("validate")
        .write_stdin("{ not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
    Ok(())
}

#[test]
fn analyze_document() -> Result<()> {
    cli_command()?
        .arg("analyze")
        .write_stdin(VALID_ARCHITECTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Views: 1"))
        .stdout(predicate::str::contains("Elements: 2"))
        .stdout(predicate::str::contains("Unknown element types: Widget"));
    cli_command()?
        .args(["analyze", "--format", "json"])
        .write_stdin(VALID_ARCHITECTURE)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""products": 1"#));
    Ok(())
}

#[test]
fn json_logs_go_to_stderr() -> Result<()> {
    cli_command()?
        .args(["--log-format", "json", "check"])
        .env("RUST_LOG", "info")
        .assert()
        .success()
        .stderr(predicate::str::contains(r#""level":"INFO""#));
    Ok(())
}
