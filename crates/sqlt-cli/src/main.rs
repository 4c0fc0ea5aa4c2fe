//! # sqlt-cli
//!
//! Command-line front end of the schema translator.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use sqlt_pipeline::{EngineConfig, Input, Ir, Outcome, PluginRegistry, Role, Translator};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sqlt")]
#[command(about = "Translate schema descriptions between formats")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate an input file (or stdin) with a parser and a producer
    Translate {
        /// Input file path; reads stdin when omitted
        input: Option<PathBuf>,

        /// Parser identifier (e.g. uml, json, sqlt::parser::yaml)
        #[arg(short, long)]
        from: Option<String>,

        /// Producer identifier (e.g. yaml, json)
        #[arg(short, long)]
        to: Option<String>,

        /// Minimum visibility admitted by class-model parsers
        #[arg(long)]
        visibility: Option<String>,

        /// Engine configuration file (YAML or JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output file path; writes stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Extra plugin option as key=value, repeatable
        #[arg(long = "option", value_parser = parse_key_value)]
        options: Vec<(String, String)>,
    },

    /// List registered parsers and producers
    Plugins,
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn build_registry() -> anyhow::Result<PluginRegistry> {
    let registry = PluginRegistry::with_builtins();
    sqlt_uml::register(&registry)?;
    sqlt_adapter_serde::register(&registry)?;
    Ok(registry)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = build_registry()?;

    match cli.command {
        Commands::Translate {
            input,
            from,
            to,
            visibility,
            config,
            output,
            options,
        } => {
            let mut engine_config = match &config {
                Some(path) => EngineConfig::from_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => EngineConfig::default(),
            };
            if let Some(parser) = from {
                engine_config.parser = parser;
            }
            if let Some(producer) = to {
                engine_config.producer = producer;
            }
            if visibility.is_some() {
                engine_config.visibility = visibility;
            }
            for (key, value) in options {
                engine_config.options.set(key, value);
            }

            let mut translator = Translator::from_config(registry, &engine_config)?;
            let source = match input {
                Some(path) => {
                    tracing::info!("Translating {}", path.display());
                    Input::Path(path)
                }
                None => Input::Reader(Box::new(std::io::stdin())),
            };

            let outcome = translator.translate(source)?;
            if !translator.last_error().is_empty() {
                tracing::warn!("{}", translator.last_error());
            }

            let ir = match outcome {
                Outcome::Produced(ir) => ir,
                Outcome::NoData => {
                    tracing::warn!("No input data");
                    return Ok(());
                }
            };
            let text = match ir {
                Ir::Text(text) => text,
                Ir::Schema(schema) => serde_yaml::to_string(&schema)?,
            };

            match output {
                Some(path) => std::fs::write(&path, text)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => std::io::stdout().write_all(text.as_bytes())?,
            }
        }
        Commands::Plugins => {
            let mut stdout = std::io::stdout().lock();
            for role in [Role::Parser, Role::Producer] {
                writeln!(stdout, "{role}s:")?;
                for name in registry.names(role) {
                    writeln!(stdout, "  {name}")?;
                }
                for (alias, target) in registry.aliases(role) {
                    writeln!(stdout, "  {alias} -> {target}")?;
                }
            }
        }
    }

    Ok(())
}
