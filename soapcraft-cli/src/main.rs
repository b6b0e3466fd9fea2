//! SOAP Client CLI - Quick validation and code generation tool
//!
//! This CLI allows you to quickly test if a WSDL file can be parsed
//! and generate Rust code without needing to set up a build.rs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use soapcraft_codegen::parser::wsdl::parse_wsdl;
use soapcraft_codegen::{CodegenError, SoapClientGenerator};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "soapcraft-cli")]
#[command(about = "soapcraft - WSDL Parser and Code Generator CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a WSDL file and validate its structure
    Parse {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL_FILE")]
        wsdl_path: PathBuf,

        /// Show detailed parsing information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate Rust code from a WSDL file
    Generate {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL_FILE")]
        wsdl_path: PathBuf,

        /// Output directory for generated code
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,

        /// Name of the generated client struct
        #[arg(short, long, value_name = "NAME")]
        client_name: Option<String>,

        /// SOAP version (1.1 or 1.2)
        #[arg(short, long, value_name = "VERSION")]
        soap_version: Option<String>,
    },

    /// Show information about a WSDL file
    Info {
        /// Path to the WSDL file
        #[arg(value_name = "WSDL_FILE")]
        wsdl_path: PathBuf,
    },

    /// Generate a SOAP client from a WSDL file or URL (spec.md §6 entry point)
    GenerateClient {
        /// Path to the WSDL file (a bare path; no HTTP(S) fetching is
        /// performed by this CLI, see spec.md §10 Non-goals)
        #[arg(value_name = "WSDL_PATH")]
        wsdl_path: PathBuf,

        /// Output file for the generated client (default: soap_client.rs
        /// in the current directory)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Override the mangled-name suffix used to disambiguate a
        /// cross-namespace type collision, in `uri=prefix` form. May be
        /// given multiple times.
        #[arg(long = "namespace", value_name = "URI=PREFIX")]
        namespace: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::GenerateClient {
            wsdl_path,
            output,
            namespace,
        } => generate_client_command(wsdl_path, output, namespace),
        other => match run_legacy_command(other) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error: {e:?}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_legacy_command(command: Commands) -> Result<()> {
    match command {
        Commands::Parse { wsdl_path, verbose } => parse_command(wsdl_path, verbose),
        Commands::Generate {
            wsdl_path,
            output,
            client_name,
            soap_version,
        } => generate_command(wsdl_path, output, client_name, soap_version),
        Commands::Info { wsdl_path } => info_command(wsdl_path),
        Commands::GenerateClient { .. } => unreachable!("handled in main"),
    }
}

/// Implements spec.md §6's exit-code contract precisely: 0 on success, 1
/// for parse/resolve errors (message on stderr), 2 for I/O errors. This
/// can't reuse `anyhow`'s bubble-to-`main` convention (which always exits
/// 1), so it classifies the error explicitly instead.
fn generate_client_command(
    wsdl_path: PathBuf,
    output: Option<PathBuf>,
    namespace: Vec<String>,
) -> ExitCode {
    let mut namespace_prefixes = Vec::new();
    for entry in &namespace {
        match entry.split_once('=') {
            Some((uri, prefix)) => namespace_prefixes.push((uri.to_string(), prefix.to_string())),
            None => {
                eprintln!("Invalid --namespace value '{entry}': expected 'uri=prefix'");
                return ExitCode::from(1);
            }
        }
    }

    let output_path = output.unwrap_or_else(|| PathBuf::from("soap_client.rs"));
    let out_dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));

    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("I/O error creating output directory '{}': {e}", out_dir.display());
        return ExitCode::from(2);
    }

    let mut builder = SoapClientGenerator::builder()
        .wsdl_path(&wsdl_path)
        .out_dir(out_dir);
    for (uri, prefix) in namespace_prefixes {
        builder = builder.namespace_prefix(uri, prefix);
    }

    match builder.generate() {
        Ok(generated) => {
            // The generator always writes to `<out_dir>/soap_client.rs`;
            // rename to the caller's requested file name if different.
            if generated.output_file != output_path {
                if let Err(e) = fs::rename(&generated.output_file, &output_path) {
                    eprintln!("I/O error writing '{}': {e}", output_path.display());
                    return ExitCode::from(2);
                }
            }
            println!("Generated client: {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(CodegenError::IoError { path, source }) => {
            eprintln!("I/O error reading '{path}': {source}");
            ExitCode::from(2)
        }
        Err(CodegenError::FileWrite { path, source }) => {
            eprintln!("I/O error writing '{}': {source}", path.display());
            ExitCode::from(2)
        }
        Err(e @ CodegenError::ImportError { .. }) => {
            // An import cycle short-circuits silently (spec.md §5); the
            // only way this variant surfaces is a fetch genuinely failing
            // (spec.md §6 scenario "broken_import.wsdl": an unreachable
            // schemaLocation), which is an I/O error, not a parse error.
            eprintln!("I/O error resolving import: {e}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

fn parse_command(wsdl_path: PathBuf, verbose: bool) -> Result<()> {
    println!("Parsing WSDL file: {}", wsdl_path.display());

    let wsdl_content = fs::read_to_string(&wsdl_path)
        .with_context(|| format!("Failed to read WSDL file: {}", wsdl_path.display()))?;

    let description =
        parse_wsdl(&wsdl_content).map_err(|e| anyhow::anyhow!("Failed to parse WSDL: {}", e))?;

    println!("WSDL parsed successfully!");

    if verbose {
        println!("\nWSDL Details:");
        println!(
            "  Target Namespace: {}",
            description.target_namespace.as_deref().unwrap_or("<none>")
        );
        println!("  Messages: {}", description.messages.len());
        println!("  Port Types: {}", description.port_types.len());
        println!("  Bindings: {}", description.bindings.len());
        println!("  Services: {}", description.services.len());

        for schema in &description.schemas {
            println!("\nXSD Schema:");
            println!(
                "  Target Namespace: {}",
                schema.target_namespace.as_deref().unwrap_or("<none>")
            );
            println!("  Elements: {}", schema.elements().count());
            println!("  Complex Types: {}", schema.complex_types().count());
            println!("  Simple Types: {}", schema.simple_types().count());
        }

        if !description.unsupported_bindings.is_empty() {
            println!("\nUnsupported bindings (skipped):");
            for name in &description.unsupported_bindings {
                println!("  - {name}");
            }
        }
    }

    Ok(())
}

fn generate_command(
    wsdl_path: PathBuf,
    output: PathBuf,
    client_name: Option<String>,
    soap_version: Option<String>,
) -> Result<()> {
    println!("Generating code from WSDL: {}", wsdl_path.display());
    println!("Output directory: {}", output.display());

    fs::create_dir_all(&output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))?;

    let mut builder = SoapClientGenerator::builder()
        .wsdl_path(wsdl_path.to_str().context("Invalid WSDL path")?)
        .out_dir(output.to_str().context("Invalid output path")?);

    if let Some(name) = client_name {
        builder = builder.client_name(&name);
        println!("Client name: {name}");
    }

    if let Some(version) = soap_version {
        let soap_ver = match version.as_str() {
            "1.1" | "11" => soapcraft_codegen::SoapVersion::Soap11,
            "1.2" | "12" => soapcraft_codegen::SoapVersion::Soap12,
            _ => anyhow::bail!("Invalid SOAP version: {}. Use '1.1' or '1.2'", version),
        };
        builder = builder.soap_version(soap_ver);
        println!("SOAP version: {version}");
    }

    builder.generate().context("Failed to generate code")?;

    let output_file = output.join("soap_client.rs");
    println!("Code generated successfully!");
    println!("Output file: {}", output_file.display());

    Ok(())
}

fn info_command(wsdl_path: PathBuf) -> Result<()> {
    println!("WSDL Information: {}", wsdl_path.display());
    println!();

    let wsdl_content = fs::read_to_string(&wsdl_path)
        .with_context(|| format!("Failed to read WSDL file: {}", wsdl_path.display()))?;

    let description =
        parse_wsdl(&wsdl_content).map_err(|e| anyhow::anyhow!("Failed to parse WSDL: {}", e))?;

    println!("Services:");
    for service in &description.services {
        for port in &service.ports {
            println!(
                "  - {} ({})",
                service.name.local,
                port.address.as_deref().unwrap_or("<no address>")
            );
        }
    }

    println!("\nOperations:");
    for port_type in &description.port_types {
        println!("  Port Type: {}", port_type.name.local);
        for operation in &port_type.operations {
            let input = operation
                .input
                .as_ref()
                .map(|q| q.local.as_str())
                .unwrap_or("<none>");
            let output = operation
                .output
                .as_ref()
                .map(|q| q.local.as_str())
                .unwrap_or("<none>");

            println!("    - {} ({} -> {})", operation.name, input, output);
        }
    }

    for schema in &description.schemas {
        println!("\nTypes:");
        let complex_types: Vec<_> = schema.complex_types().collect();
        if !complex_types.is_empty() {
            println!("  Complex Types: {}", complex_types.len());
            for complex_type in complex_types.iter().take(5) {
                if let Some(name) = &complex_type.name {
                    println!("    - {}", name.local);
                }
            }
            if complex_types.len() > 5 {
                println!("    ... and {} more", complex_types.len() - 5);
            }
        }

        let simple_types: Vec<_> = schema.simple_types().collect();
        if !simple_types.is_empty() {
            println!("  Simple Types: {}", simple_types.len());
            for simple_type in simple_types.iter().take(5) {
                if let Some(name) = &simple_type.name {
                    println!("    - {}", name.local);
                }
            }
            if simple_types.len() > 5 {
                println!("    ... and {} more", simple_types.len() - 5);
            }
        }
    }

    println!("\nAnalysis complete!");

    Ok(())
}
