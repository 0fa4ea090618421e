use dodaf_semantic::{
    ArtifactReport, JsonLdContext, SemanticSchema, validate_context, validate_owl_turtle,
    validate_shacl_turtle,
};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONTEXT_FILE: &str = "context.jsonld";
pub const OWL_FILE: &str = "ontology.ttl";
pub const SHACL_FILE: &str = "shapes.ttl";

/// The generated JSON-LD context, OWL ontology and SHACL shapes.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub context: JsonLdContext,
    pub owl: String,
    pub shacl: String,
    context_report: ArtifactReport,
}

impl ArtifactBundle {
    /// The context is checked against `schemas` immediately, as the schemas are not kept.
    pub fn new(
        context: JsonLdContext,
        owl: String,
        shacl: String,
        schemas: &[SemanticSchema],
    ) -> Self {
        let context_report = validate_context(&context, schemas);
        Self {
            context,
            owl,
            shacl,
            context_report,
        }
    }

    /// Runs the three artifact checks and merges their findings.
    pub fn check(&self) -> ArtifactReport {
        let mut report = ArtifactReport::from_errors(Vec::new());
        report.merge("context", self.context_report.clone());
        report.merge("owl", validate_owl_turtle(&self.owl));
        report.merge("shacl", validate_shacl_turtle(&self.shacl));
        debug!(valid = report.valid, errors = report.errors.len(), "checked artifacts");
        report
    }

    pub fn context_json(&self) -> String {
        self.context.to_pretty_string()
    }

    /// Writes the artifacts to [`CONTEXT_FILE`], [`OWL_FILE`] and [`SHACL_FILE`] under `dir`,
    /// creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        let files = [
            (CONTEXT_FILE, self.context_json()),
            (OWL_FILE, self.owl.clone()),
            (SHACL_FILE, self.shacl.clone()),
        ];
        let mut written = Vec::with_capacity(files.len());
        for (name, content) in files {
            let path = dir.join(name);
            fs::write(&path, content)?;
            info!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(written)
    }
}
