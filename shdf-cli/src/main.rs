//! SHDF CLI - hardware diagram conversion and validation from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use shdf::{
    ConvertMode, ConvertOptions, Direction, MappingSet, ModuleCatalog, ShdfCore,
    ValidationReport,
};
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "shdf")]
#[command(about = "Hardware description format conversion and validation tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a diagram file between the native format and SHDF
    Convert {
        /// Path to the input JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target format
        #[arg(long, value_enum)]
        to: TargetFormat,

        /// Whether breadboard wiring is translated or abstracted away
        #[arg(long, value_enum, default_value = "logical")]
        mode: ModeArg,

        /// Directory of extra module descriptor files
        #[arg(long, value_name = "DIR")]
        catalog: Option<PathBuf>,

        /// Write output here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Validate an SHDF document
    Validate {
        /// Path to the SHDF JSON file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Directory of extra module descriptor files
        #[arg(long, value_name = "DIR")]
        catalog: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List known component types and their native spellings
    Types {
        /// Directory of extra module descriptor files
        #[arg(long, value_name = "DIR")]
        catalog: Option<PathBuf>,

        /// Show pin names for each type
        #[arg(short, long)]
        verbose: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum TargetFormat {
    /// Native diagram -> SHDF document
    Shdf,
    /// SHDF document -> native diagram
    Wokwi,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Logical,
    Physical,
}

impl From<ModeArg> for ConvertMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Logical => ConvertMode::Logical,
            ModeArg::Physical => ConvertMode::Physical,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Convert {
            file,
            to,
            mode,
            catalog,
            output,
        } => handle_convert(&file, to, mode, catalog.as_deref(), output.as_deref()),
        Commands::Validate {
            file,
            catalog,
            format,
        } => handle_validate(&file, catalog.as_deref(), format),
        Commands::Types { catalog, verbose } => handle_types(catalog.as_deref(), verbose),
    };

    process::exit(exit_code);
}

fn load_mappings(catalog: Option<&Path>) -> Result<MappingSet, shdf::ShdfError> {
    match catalog {
        Some(dir) => {
            let catalog = ModuleCatalog::load_dir(dir)?;
            for warning in catalog.warnings() {
                eprintln!("Warning: {warning}");
            }
            Ok(MappingSet::with_catalog(&catalog)?)
        }
        None => Ok(MappingSet::builtin()?),
    }
}

fn handle_convert(
    file: &Path,
    to: TargetFormat,
    mode: ModeArg,
    catalog: Option<&Path>,
    output: Option<&Path>,
) -> i32 {
    let mappings = match load_mappings(catalog) {
        Ok(mappings) => mappings,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let direction = match to {
        TargetFormat::Shdf => Direction::ToShdf,
        TargetFormat::Wokwi => Direction::ToNative,
    };
    let options = ConvertOptions { mode: mode.into() };

    match ShdfCore::convert_file(file, direction, &mappings, options) {
        Ok(outcome) => {
            let rendered = match serde_json::to_string_pretty(&outcome.output) {
                Ok(rendered) => rendered,
                Err(e) => {
                    eprintln!("Error: {e}");
                    return 1;
                }
            };
            match output {
                Some(path) => {
                    if let Err(e) = std::fs::write(path, rendered + "\n") {
                        eprintln!("Error: cannot write {}: {e}", path.display());
                        return 1;
                    }
                    eprintln!(
                        "Wrote {} ({} components, {} connections)",
                        path.display(),
                        outcome.component_count,
                        outcome.connection_count
                    );
                }
                None => println!("{rendered}"),
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_validate(file: &Path, catalog: Option<&Path>, format: OutputFormat) -> i32 {
    let mappings = match load_mappings(catalog) {
        Ok(mappings) => mappings,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    match ShdfCore::validate_file(file, &mappings) {
        Ok(report) => {
            output_report(file, &report, format);
            if report.is_valid() {
                0
            } else {
                2
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn output_report(file: &Path, report: &ValidationReport, format: OutputFormat) {
    match format {
        OutputFormat::Human => {
            println!("File: {}", file.display());
            if report.is_valid() {
                println!("  No issues found");
                return;
            }
            println!("  {} issue(s):", report.errors.len());
            for error in &report.errors {
                println!("    - {error}");
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "valid": report.is_valid(),
                "errors": report.errors,
            });
            match serde_json::to_string_pretty(&output) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => eprintln!("Error: {e}"),
            }
        }
    }
}

fn handle_types(catalog: Option<&Path>, verbose: bool) -> i32 {
    let mappings = match load_mappings(catalog) {
        Ok(mappings) => mappings,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    println!("Known component types:\n");
    for canonical in mappings.canonical_types() {
        match mappings.native_spelling(canonical) {
            Some(native) => println!("  {canonical}  ({native})"),
            None => println!("  {canonical}"),
        }
        if verbose {
            let pins = mappings.pins_for(canonical);
            if !pins.is_empty() {
                println!("    pins: {}", pins.join(", "));
            }
        }
    }
    0
}
