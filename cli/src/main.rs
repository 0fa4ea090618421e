#![expect(clippy::print_stdout, clippy::print_stderr)]

use crate::cli::{Args, Artifact, Command, LogFormat, OutputFormat};
use anyhow::{Context, bail};
use clap::Parser;
use dodaf::{
    ArchitectureSummary, DocumentValidationResult, Ontology, OntologyConfig, ValidationOptions,
    summarize,
};
use serde_json::Value;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod cli;

pub fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_format);
    match args.command {
        Command::Generate {
            artifact,
            output,
            base,
        } => {
            let ontology = ontology(base)?;
            let content = match artifact {
                Artifact::Context => ontology.context().to_pretty_string(),
                Artifact::Owl => ontology.owl_turtle(),
                Artifact::Shacl => ontology.shacl_turtle(),
                Artifact::All => {
                    let dir = output.unwrap_or_else(|| PathBuf::from("."));
                    let written = ontology.artifacts().write_to_dir(&dir).with_context(|| {
                        format!("Failed to write the artifacts to {}", dir.display())
                    })?;
                    for path in written {
                        eprintln!("Wrote {}", path.display());
                    }
                    return Ok(());
                }
            };
            if let Some(output) = output {
                fs::write(&output, content)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
            } else {
                io::stdout().write_all(content.as_bytes())?;
            }
            Ok(())
        }
        Command::Validate {
            file,
            no_shacl,
            no_metamodel,
            format,
            base,
        } => {
            let document = read_document(file.as_deref())?;
            let options = ValidationOptions::new()
                .with_shacl(!no_shacl)
                .with_metamodel(!no_metamodel);
            let result = ontology(base)?
                .document_validator(options)?
                .validate(&document);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
                OutputFormat::Text => print_validation(&result),
            }
            if !result.valid {
                bail!(
                    "The document is not valid: {} error(s)",
                    result.errors.len()
                )
            }
            Ok(())
        }
        Command::Check { base } => {
            let report = ontology(base)?.artifacts().check();
            if !report.valid {
                bail!("The generated artifacts are inconsistent: {report}")
            }
            println!("All artifacts are consistent");
            Ok(())
        }
        Command::Analyze { file, format } => {
            let document = read_document(file.as_deref())?;
            let result = ontology(None)?
                .document_validator(ValidationOptions::new().with_shacl(false).with_metamodel(false))?
                .validate(&document);
            let Some(normalized) = result.normalized else {
                print_validation(&result);
                bail!("The document cannot be analyzed")
            };
            let summary = summarize(&normalized);
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Text => print_summary(&summary),
            }
            Ok(())
        }
    }
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr);
    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn ontology(base: Option<String>) -> anyhow::Result<Ontology> {
    let mut config = OntologyConfig::default();
    if let Some(base) = base {
        oxiri::Iri::parse(base.as_str()).with_context(|| format!("Invalid base IRI {base}"))?;
        config = config.with_document_base(base);
    }
    Ok(Ontology::new(config)?)
}

fn read_document(file: Option<&Path>) -> anyhow::Result<Value> {
    let text = if let Some(file) = file {
        info!(file = %file.display(), "reading document");
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?
    } else {
        debug!("reading document from stdin");
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        text
    };
    serde_json::from_str(&text).context("The document is not valid JSON")
}

fn print_validation(result: &DocumentValidationResult) {
    if result.valid {
        println!("Document is valid");
    } else {
        println!("Document is not valid");
    }
    if !result.errors.is_empty() {
        println!("Errors:");
        for error in &result.errors {
            println!("  - {error}");
        }
    }
    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {warning}");
        }
    }
}

fn print_summary(summary: &ArchitectureSummary) {
    println!("Views: {}", summary.views);
    println!("Products: {}", summary.products);
    println!("Elements: {}", summary.elements);
    for (element_type, count) in &summary.element_types {
        println!("  {element_type}: {count}");
    }
    println!("Relationships: {}", summary.relationships);
    if !summary.unknown_element_types.is_empty() {
        println!(
            "Unknown element types: {}",
            summary.unknown_element_types.join(", ")
        );
    }
}
