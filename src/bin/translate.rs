//! Schema Translate CLI
//!
//! Translates schema files into document-store field definitions.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use odm_schemas::{export_directory, ModelSchema, OdmConfig, OutputFormat};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "schema-translate")]
#[command(about = "Translate schema nodes into document-store field definitions")]
#[command(version)]
struct Cli {
    /// Config file to load (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a single schema file
    Translate {
        /// Input schema (JSON)
        input: PathBuf,

        /// Schema-level options passed through to the model (JSON object file)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compact JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Translate every schema in a directory
    Export {
        /// Directory containing schema files
        #[arg(short, long)]
        source: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show current configuration
    Config {
        /// Output as TOML
        #[arg(long)]
        toml: bool,
    },

    /// Initialize a new config file
    Init {
        /// Output path
        #[arg(short, long, default_value = "odm.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = OdmConfig::load_from(cli.config.as_deref()).context("loading configuration")?;

    match cli.command {
        Commands::Translate {
            input,
            options,
            output,
            compact,
        } => {
            let translator = config.translator();
            let schema: serde_json::Value = serde_json::from_str(
                &fs::read_to_string(&input).with_context(|| format!("reading {:?}", input))?,
            )
            .with_context(|| format!("parsing {:?}", input))?;

            let format = if compact {
                OutputFormat::Compact
            } else {
                config.export.output_format
            };

            let rendered = match options {
                Some(path) => {
                    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
                    let serde_json::Value::Object(options) = raw else {
                        bail!("{:?} must contain a JSON object", path);
                    };
                    format.render(&ModelSchema::from_value(&translator, &schema, options)?)?
                }
                None => format.render(&translator.translate_value(&schema)?)?,
            };

            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("✅ Wrote {:?}", path);
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Export { source, output } => {
            println!("📦 Schema Export");
            println!("  Source: {:?}", source);
            println!("  Output: {:?}", output);
            println!();

            let manifest = export_directory(&source, &output, &config.translator(), &config.export)?;

            for entry in &manifest.entries {
                println!("  - {} -> {}", entry.name, entry.output_file);
            }
            println!();
            println!("✅ Exported {} schemas", manifest.entries.len());
        }

        Commands::Config { toml } => {
            if toml {
                println!("{}", ::toml::to_string_pretty(&config)?);
            } else {
                println!("📋 Translation Configuration\n");
                println!("Translate:");
                println!("  Annotation key: {}", config.translate.annotation_key);
                println!("  Required policy: {:?}", config.translate.required_policy);
                println!("  Max depth: {}", config.translate.max_depth);

                println!("\nExport:");
                println!("  Format: {:?}", config.export.output_format);
                println!("  Checksums: {}", config.export.include_checksums);
                println!("  Manifest: {}", config.export.include_manifest);
            }
        }

        Commands::Init { output } => {
            OdmConfig::default().save(&output)?;
            println!("✅ Created config file: {}", output);
        }
    }

    Ok(())
}
