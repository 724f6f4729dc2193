use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use itertools::Itertools;
use mimalloc::MiMalloc;
use schemagen_map::{AvroTypeMapper, map_model};
use schemagen_order::{
    CyclePolicy, EmitConfig, EmitReport, JsonRenderer, PipelineConfig,
};
use schemagen_schemas::{SchemaSet, TypeModel};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Crates to include in the logging allowlist.
const CRATES: &[&str] = &[
    "schemagen",
    "schemagen_map",
    "schemagen_order",
    "schemagen_schemas",
];

/// Generate Avro schema files from a typed object model, written in an
/// order where every schema follows the schemas it references.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a type model to a schema set (JSON)
    ///
    /// Translates every class and enum of the model into a named Avro
    /// definition and records which wrapper definitions were requested.
    Map {
        /// Type model JSON file (reads stdin if not specified)
        input: Option<PathBuf>,

        /// Output file path (writes to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Order and write an already-mapped schema set
    Emit {
        /// Schema set JSON file (reads stdin if not specified)
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Map a type model, then order and write the result
    Generate {
        /// Type model JSON file (reads stdin if not specified)
        input: Option<PathBuf>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Directory to write schemas under
    #[arg(short = 'd', long, default_value = ".")]
    out_dir: PathBuf,

    /// Fail instead of dropping schemas caught in dependency cycles
    #[arg(long)]
    fail_on_cycle: bool,

    /// Name of the flat, numbered output directory
    #[arg(long, default_value = "avro-schemas-ordered")]
    ordered_dir: PathBuf,

    /// Name of the namespace-partitioned output directory
    #[arg(long, default_value = "avro-schemas")]
    namespace_dir: PathBuf,

    /// Name of the combined manifest file
    #[arg(long, default_value = "avro-schemas.avsc")]
    manifest: PathBuf,

    /// Extension of the per-schema files
    #[arg(long, default_value = "avsc")]
    extension: String,
}

impl OutputArgs {
    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            cycle_policy: if self.fail_on_cycle {
                CyclePolicy::FailFast
            } else {
                CyclePolicy::Drop
            },
            emit: EmitConfig {
                ordered_dir: self.ordered_dir.clone(),
                namespace_dir: self.namespace_dir.clone(),
                manifest_name: self.manifest.clone(),
                extension: self.extension.clone(),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Output goes to stderr so JSON on stdout stays clean for piping.
    // Default to warn, allowlist our crates.
    let level = cli.verbose.tracing_level_filter();
    let allowlist = CRATES.iter().map(|c| format!("{c}={level}")).join(",");
    let filter = EnvFilter::new(format!("warn,{allowlist}"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    match cli.command {
        Commands::Map { input, output } => {
            let model: TypeModel = read_json(input.as_deref())?;
            let set = map_model(&model, &AvroTypeMapper);

            let stdout = std::io::stdout();
            let mut writer: Box<dyn Write> = match output {
                Some(path) => Box::new(BufWriter::new(
                    File::create(&path).with_context(|| {
                        format!("failed to create {}", path.display())
                    })?,
                )),
                None => Box::new(stdout.lock()),
            };
            serde_json::to_writer_pretty(&mut writer, &set)
                .context("failed to write schema set")?;
            writeln!(writer)?;
            Ok(())
        }
        Commands::Emit { input, output } => {
            let report = emit_schema_set(input.as_deref(), &output)?;
            log_report(&report);
            Ok(())
        }
        Commands::Generate { input, output } => {
            let model: TypeModel = read_json(input.as_deref())?;
            write_schemas(map_model(&model, &AvroTypeMapper), &output)
        }
    }
}

/// Opens a file for reading, or stdin when `path` is `None`.
fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    let reader: Box<dyn Read> = match path {
        Some(path) => Box::new(BufReader::new(File::open(path).with_context(
            || format!("failed to open {}", path.display()),
        )?)),
        None => Box::new(std::io::stdin().lock()),
    };
    Ok(reader)
}

/// Reads and parses JSON from a file, or from stdin when `path` is `None`.
fn read_json<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let source = path.map_or_else(
        || "stdin".to_owned(),
        |path| path.display().to_string(),
    );
    serde_json::from_reader(open_input(path)?)
        .with_context(|| format!("failed to parse {source}"))
}

/// Orders and writes an already-mapped schema set.
fn emit_schema_set(
    input: Option<&Path>,
    output: &OutputArgs,
) -> Result<EmitReport> {
    let report = schemagen_order::run(
        open_input(input)?,
        &output.out_dir,
        &output.config(),
    )?;
    Ok(report)
}

fn write_schemas(set: SchemaSet, output: &OutputArgs) -> Result<()> {
    let report = schemagen_order::generate(
        set,
        &JsonRenderer,
        &output.out_dir,
        &output.config(),
    )?;
    log_report(&report);
    Ok(())
}

fn log_report(report: &EmitReport) {
    info!(
        schemas = report.entries.len(),
        manifest = %report.manifest_path.display(),
        "done"
    );
}
