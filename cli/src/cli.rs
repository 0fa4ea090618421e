use clap::{Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about, version, name = "dodaf")]
/// DoDAF 2.0 ontology generator and architecture document validator
pub struct Args {
    /// Format of the log lines written to stderr
    ///
    /// The verbosity is set with the RUST_LOG environment variable and defaults to "warn".
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the JSON-LD context, the OWL ontology or the SHACL shapes
    Generate {
        /// Artifact to generate
        #[arg(value_enum)]
        artifact: Artifact,
        /// Where to write the artifact
        ///
        /// A file for a single artifact, stdout if not given.
        /// A directory for "all", the current directory if not given.
        #[arg(short, long, value_hint = ValueHint::AnyPath)]
        output: Option<PathBuf>,
        /// Base IRI against which relative identifiers of documents resolve
        #[arg(long, value_hint = ValueHint::Url)]
        base: Option<String>,
    },
    /// Validate an architecture document
    ///
    /// The command fails if the document is not valid.
    Validate {
        /// JSON-LD file to validate
        ///
        /// If no file is given, stdin is used.
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Skip the SHACL conformance pass
        #[arg(long)]
        no_shacl: bool,
        /// Skip the metamodel pass over elements and relationships
        #[arg(long)]
        no_metamodel: bool,
        /// Output format of the validation report
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Base IRI against which relative identifiers resolve
        #[arg(long, value_hint = ValueHint::Url)]
        base: Option<String>,
    },
    /// Check that the generated artifacts are consistent with each other
    Check {
        /// Base IRI against which relative identifiers of documents resolve
        #[arg(long, value_hint = ValueHint::Url)]
        base: Option<String>,
    },
    /// Print views, products, elements and relationships counts of an architecture document
    Analyze {
        /// JSON-LD file to analyze
        ///
        /// If no file is given, stdin is used.
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Output format of the summary
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Artifact {
    Context,
    Owl,
    Shacl,
    All,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
